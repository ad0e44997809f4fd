//! District rankings for a state.
//!
//! Each district is scored from its own records only. A district whose data
//! could not be fetched is passed in as `None` and scores zero rather than
//! being dropped from the table.
use std::cmp::Ordering;

use crate::aggregate::{aggregate_state_snapshot, group_by_district};
use crate::trends::inclusion_totals;
use crate::types::{
    AggregateSnapshot, InclusionTotals, LeaderboardEntry, LeaderboardSummary, NormalizedRecord,
};
use crate::util::{finite_sum, round_to, safe_div};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingParameter {
    PersondaysGenerated,
    HouseholdParticipation,
    /// Ranked by `Total_Individuals_Worked`, not `Total_No_of_Active_Workers`:
    /// active workers hold a live job card but need not have worked.
    IndividualsWorked,
    HundredDayGoal,
    InclusionIndex,
    RuralDevelopmentIndex,
}

impl RankingParameter {
    pub const ALL: [RankingParameter; 6] = [
        RankingParameter::PersondaysGenerated,
        RankingParameter::HouseholdParticipation,
        RankingParameter::IndividualsWorked,
        RankingParameter::HundredDayGoal,
        RankingParameter::InclusionIndex,
        RankingParameter::RuralDevelopmentIndex,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RankingParameter::PersondaysGenerated => "Persondays Generated",
            RankingParameter::HouseholdParticipation => "Household Participation",
            RankingParameter::IndividualsWorked => "Individuals Worked",
            RankingParameter::HundredDayGoal => "100-Day Goal Achievement",
            RankingParameter::InclusionIndex => "Inclusion Index",
            RankingParameter::RuralDevelopmentIndex => "Rural Development Index",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            RankingParameter::PersondaysGenerated => "persondays_generated",
            RankingParameter::HouseholdParticipation => "household_participation",
            RankingParameter::IndividualsWorked => "individuals_worked",
            RankingParameter::HundredDayGoal => "hundred_day_goal",
            RankingParameter::InclusionIndex => "inclusion_index",
            RankingParameter::RuralDevelopmentIndex => "rural_development_index",
        }
    }

    pub fn value(self, card: &DistrictScorecard) -> f64 {
        let s = &card.snapshot;
        match self {
            RankingParameter::PersondaysGenerated => s.persondays_generated,
            RankingParameter::HouseholdParticipation => s.households_benefitted,
            RankingParameter::IndividualsWorked => s.individuals_worked,
            RankingParameter::HundredDayGoal => s.hh_completed_100_days,
            RankingParameter::InclusionIndex => card.inclusion.combined(),
            RankingParameter::RuralDevelopmentIndex => s.assets_created,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistrictScorecard {
    pub district: String,
    pub snapshot: AggregateSnapshot,
    pub inclusion: InclusionTotals,
}

impl DistrictScorecard {
    pub fn from_records(district: impl Into<String>, records: Option<&[NormalizedRecord]>) -> Self {
        let records = records.unwrap_or_default();
        Self {
            district: district.into(),
            snapshot: aggregate_state_snapshot(records),
            inclusion: inclusion_totals(records),
        }
    }
}

/// One scorecard per district present in `records`, ordered by district key.
pub fn scorecards(records: &[NormalizedRecord]) -> Vec<DistrictScorecard> {
    group_by_district(records)
        .into_iter()
        .map(|(district, rows)| DistrictScorecard::from_records(district, Some(rows.as_slice())))
        .collect()
}

/// Rank by `parameter`, highest first. Equal values keep input order.
pub fn rank_districts(
    cards: &[DistrictScorecard],
    parameter: RankingParameter,
) -> Vec<LeaderboardEntry> {
    let mut scored: Vec<(&str, f64)> = cards
        .iter()
        .map(|c| (c.district.as_str(), parameter.value(c)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (district, value))| LeaderboardEntry {
            rank: idx + 1,
            district: district.to_string(),
            value,
        })
        .collect()
}

pub fn summarize(entries: &[LeaderboardEntry]) -> LeaderboardSummary {
    let total = finite_sum(entries.iter().map(|e| e.value));
    let top = entries.first();
    LeaderboardSummary {
        total_districts: entries.len(),
        top_performer: top.map(|e| e.district.clone()).unwrap_or_default(),
        top_value: top.map(|e| e.value).unwrap_or(0.0),
        average_value: round_to(safe_div(total, entries.len() as f64), 0),
    }
}
