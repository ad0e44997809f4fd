//! MGNREGA district metrics.
//!
//! Raw monthly rows from the data.gov.in MGNREGA dataset are normalized
//! ([`normalize`]) and folded into chart-ready views: a cumulative snapshot
//! ([`aggregate_state_snapshot`]), a per-district breakdown
//! ([`aggregate_district_detail`]) and inclusion trends
//! ([`aggregate_inclusion_trends`]). The aggregation functions are pure and
//! can be called from any number of threads at once.
pub mod aggregate;
pub mod calendar;
pub mod compare;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod loader;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod policy;
pub mod trends;
pub mod types;
pub mod util;

pub use aggregate::{aggregate_district_detail, aggregate_state_snapshot, rollup_districts};
pub use normalize::{normalize, normalize_all};
pub use policy::{Metric, Policy};
pub use trends::aggregate_inclusion_trends;
pub use types::{
    AggregateSnapshot, DistrictDetail, InclusionTrends, NormalizedRecord, RawRecord,
};
