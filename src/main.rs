// Entry point and high-level CLI flow.
//
// - Option [1] loads the configured data.gov.in dump and keeps the records
//   for the configured state and financial year.
// - Option [2] builds one district's breakdown and exports it.
// - Option [3] builds the state snapshot, inclusion trends and leaderboards.
// - Option [4] compares two districts month by month.
use mgnrega_report::compare::{compare_monthly_wages, compare_monthly_works, compare_summary};
use mgnrega_report::config::Config;
use mgnrega_report::leaderboard::{rank_districts, scorecards, summarize, RankingParameter};
use mgnrega_report::loader::{self, RecordFilter};
use mgnrega_report::types::{
    LeaderboardEntry, LeaderboardSummary, MetricComparison, WagesComparisonRow, WorksComparisonRow,
};
use mgnrega_report::util::{format_int, format_number};
use mgnrega_report::{
    aggregate_district_detail, aggregate_inclusion_trends, aggregate_state_snapshot, logging,
    output, rollup_districts, AggregateSnapshot, InclusionTrends, NormalizedRecord,
};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use tracing::{error, info, warn};

// Loaded once, reused for every report in the session.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Vec<NormalizedRecord>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateSummary {
    state: String,
    fin_year: String,
    snapshot: AggregateSnapshot,
    district_rollup: AggregateSnapshot,
    inclusion: InclusionTrends,
    leaderboards: Vec<LeaderboardReport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LeaderboardReport {
    parameter: &'static str,
    rankings: Vec<LeaderboardEntry>,
    summary: LeaderboardSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DistrictComparison {
    district1: String,
    district2: String,
    monthly_wages: Vec<WagesComparisonRow>,
    monthly_works: Vec<WorksComparisonRow>,
    summary: Vec<MetricComparison>,
}

fn prompt(label: &str) -> String {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_choice() -> String {
    prompt("Enter choice: ")
}

/// Ask whether to go back to the report selection menu.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        let resp = prompt("Back to Report Selection (Y/N): ").to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn loaded_records() -> Option<Vec<NormalizedRecord>> {
    let state = APP_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    state.data.clone()
}

fn district_records(records: &[NormalizedRecord], district: &str) -> Vec<NormalizedRecord> {
    let filter = RecordFilter::default().with_district(district);
    records.iter().filter(|r| filter.matches(r)).cloned().collect()
}

/// File-name friendly form of a district name: `"Imphal West"` -> `imphal_west`.
fn file_slug(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

fn save_json<T: Serialize>(config: &Config, file: &str, value: &T) {
    let path = config.output_path(file);
    if let Err(e) = output::write_json(&path, value) {
        error!(path = %path.display(), error = %e, "write failed");
    }
}

fn save_csv<T: Serialize>(config: &Config, file: &str, rows: &[T]) {
    let path = config.output_path(file);
    if let Err(e) = output::write_csv(&path, rows) {
        error!(path = %path.display(), error = %e, "write failed");
    }
}

/// Handle option [1]: load, normalize and filter the configured dump.
fn handle_load(config: &Config) {
    let filter = RecordFilter::from_config(config);
    match loader::load_records(&config.data_file, &filter) {
        Ok((data, report)) => {
            println!(
                "Processing dataset... ({} rows read, {} kept for {} {})",
                format_int(report.total_rows),
                format_int(report.kept_rows),
                config.state_name,
                config.fin_year
            );
            println!(
                "Districts: {}. Loaded at {}.",
                format_int(report.districts),
                report.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            if report.parse_errors > 0 {
                println!(
                    "Note: {} rows skipped as unreadable.",
                    format_int(report.parse_errors)
                );
            }
            println!();
            save_json(config, "load_report.json", &report);
            let mut state = APP_STATE.lock().unwrap_or_else(PoisonError::into_inner);
            state.data = Some(data);
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Handle option [2]: one district's breakdown plus its monthly series.
fn handle_district_report(config: &Config, data: &[NormalizedRecord]) {
    let district = prompt("Enter district: ");
    if district.is_empty() {
        println!("No district entered.\n");
        return;
    }
    let rows = district_records(data, &district);
    if rows.is_empty() {
        warn!(district = %district, "no records for district, reporting zeros");
    }
    let detail = aggregate_district_detail(&rows, &config.fin_year, &district);
    let slug = file_slug(&district);

    save_json(config, &format!("district_{}_detail.json", slug), &detail);
    save_csv(config, &format!("district_{}_wages_trend.csv", slug), &detail.monthly_wages_trends);
    save_csv(config, &format!("district_{}_works_trend.csv", slug), &detail.monthly_works_trends);
    save_csv(config, &format!("district_{}_expenditure_trend.csv", slug), &detail.trends);

    println!("\nDistrict Report: {} ({})", detail.meta.district, detail.meta.fin_year);
    println!(
        "Households worked: {} | Individuals: {} | Avg days: {}",
        format_number(detail.employment.total_households, 0),
        format_number(detail.employment.total_individuals, 0),
        format_number(detail.employment.average_days, 1)
    );
    println!(
        "Total wages: ₹{} ({} lakhs) | Avg wage: ₹{}/day | Growth: {}%",
        format_number(detail.wages.total_wages, 0),
        format_number(detail.wages.total_wages_lakhs, 2),
        format_number(detail.wages.average_wage, 1),
        format_number(detail.wages.wage_growth_pct, 1)
    );
    println!(
        "Women participation: {}% | SC/ST participation: {}%\n",
        format_number(detail.inclusivity.women_participation_pct, 1),
        format_number(detail.inclusivity.sc_st_participation_pct, 1)
    );
    output::preview_table(
        "Monthly Wages Trend",
        Some("₹ lakhs, April to March"),
        &detail.monthly_wages_trends,
        config.preview_rows,
    );
    output::preview_table(
        "Monthly Works Trend",
        None,
        &detail.monthly_works_trends,
        config.preview_rows,
    );
    println!("(Full breakdown exported to district_{}_detail.json)\n", slug);
}

/// Handle option [3]: state snapshot, inclusion trends and leaderboards.
fn handle_state_report(config: &Config, data: &[NormalizedRecord]) {
    let cards = scorecards(data);
    let leaderboards: Vec<LeaderboardReport> = RankingParameter::ALL
        .iter()
        .map(|&parameter| {
            let rankings = rank_districts(&cards, parameter);
            let summary = summarize(&rankings);
            save_csv(config, &format!("leaderboard_{}.csv", parameter.slug()), &rankings);
            LeaderboardReport {
                parameter: parameter.label(),
                rankings,
                summary,
            }
        })
        .collect();

    let summary = StateSummary {
        state: config.state_name.clone(),
        fin_year: config.fin_year.clone(),
        snapshot: aggregate_state_snapshot(data),
        district_rollup: rollup_districts(data),
        inclusion: aggregate_inclusion_trends(data),
        leaderboards,
    };
    save_json(config, "state_summary.json", &summary);

    let s = &summary.district_rollup;
    println!("\nState Summary: {} ({})", summary.state, summary.fin_year);
    println!(
        "Persondays: {} | Households: {} | Active workers: {} | Worksites: {}",
        format_number(s.persondays_generated, 0),
        format_number(s.households_benefitted, 0),
        format_number(s.total_active_workers, 0),
        format_number(s.number_of_worksites, 0)
    );
    println!(
        "Inclusion index: {} (women {}%, SC {}%, ST {}%)\n",
        format_number(summary.inclusion.inclusion_index, 0),
        format_number(summary.inclusion.shares.women, 0),
        format_number(summary.inclusion.shares.sc, 0),
        format_number(summary.inclusion.shares.st, 0)
    );
    if let Some(board) = summary.leaderboards.first() {
        let note = format!(
            "{} districts, average {}",
            board.summary.total_districts,
            format_number(board.summary.average_value, 0)
        );
        output::preview_table(
            &format!("Leaderboard: {}", board.parameter),
            Some(note.as_str()),
            &board.rankings,
            config.preview_rows,
        );
    }
    output::preview_table(
        "Inclusion by Month",
        None,
        &summary.inclusion.monthly_trends,
        config.preview_rows,
    );
    println!("(Full summary exported to state_summary.json)\n");
}

/// Handle option [4]: two districts side by side.
fn handle_compare(config: &Config, data: &[NormalizedRecord]) {
    let first = prompt("First district: ");
    let second = prompt("Second district: ");
    if first.is_empty() || second.is_empty() {
        println!("Two districts are needed for a comparison.\n");
        return;
    }
    let a = aggregate_district_detail(&district_records(data, &first), &config.fin_year, &first);
    let b = aggregate_district_detail(&district_records(data, &second), &config.fin_year, &second);

    let comparison = DistrictComparison {
        district1: a.meta.district.clone(),
        district2: b.meta.district.clone(),
        monthly_wages: compare_monthly_wages(&a, &b),
        monthly_works: compare_monthly_works(&a, &b),
        summary: compare_summary(&a, &b),
    };
    let file = format!("compare_{}_{}.json", file_slug(&first), file_slug(&second));
    save_json(config, &file, &comparison);

    let title = format!("{} vs {}", comparison.district1, comparison.district2);
    output::preview_table(&title, None, &comparison.summary, comparison.summary.len());
    output::preview_table(
        "Monthly Wages (₹ lakhs)",
        None,
        &comparison.monthly_wages,
        config.preview_rows,
    );
    println!("(Full comparison exported to {})\n", file);
}

fn main() {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    info!(
        data_file = %config.data_file.display(),
        state = %config.state_name,
        fin_year = %config.fin_year,
        "starting"
    );

    loop {
        println!("MGNREGA {} ({})", config.state_name, config.fin_year);
        println!("[1] Load the file");
        println!("[2] District Report");
        println!("[3] State Summary & Leaderboard");
        println!("[4] Compare Districts\n");
        let choice = read_choice();
        if choice == "1" {
            handle_load(&config);
            continue;
        }
        if !matches!(choice.as_str(), "2" | "3" | "4") {
            println!("Invalid choice. Please enter 1, 2, 3 or 4.\n");
            continue;
        }
        let Some(data) = loaded_records() else {
            println!("Error: No data loaded. Please load the file first (option 1).\n");
            continue;
        };
        println!();
        match choice.as_str() {
            "2" => handle_district_report(&config, &data),
            "3" => handle_state_report(&config, &data),
            _ => handle_compare(&config, &data),
        }
        if !prompt_back_to_menu() {
            println!("Exiting the program.");
            break;
        }
    }
}
