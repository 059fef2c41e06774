//! Report aggregation
//!
//! Pure, stateless summaries derived from the current transaction set on
//! every call. No aggregate state is cached anywhere, so there is nothing
//! to invalidate: correctness comes from recomputing.

pub mod breakdown;
pub mod monthly;

pub use breakdown::{category_breakdown, CategorySlice};
pub use monthly::{monthly_summary, monthly_trend, MonthPoint, MonthlySummary};
