//! Column filters and comparators

pub mod comparator;
pub mod date_range;

pub use comparator::date_time_comparator;
pub use date_range::{parse_date, parse_ranges, readable_ranges, DateRange, DateRangeFilter, FilterModel};
