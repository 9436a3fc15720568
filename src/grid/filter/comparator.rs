//! Sort comparator for date-range columns

use chrono::NaiveDate;
use std::cmp::Ordering;

use super::date_range::parse_date;

const ISO_DATE_LEN: usize = "YYYY-MM-DD".len();

/// Compare two range strings by the first date of each.
///
/// Values without a readable first date sort before all others.
pub fn date_time_comparator(a: &str, b: &str) -> Ordering {
    first_date(a).cmp(&first_date(b))
}

/// The first date of a range string: the text before the first `" - "`
/// (or a bare `-` when the bounds are written without spaces). ISO bounds
/// joined by a bare `-` are read by their leading `YYYY-MM-DD`.
fn first_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let head = match value.split_once(" - ") {
        Some((head, _)) => head,
        None if parse_date(value).is_ok() => value,
        None => match value.get(..ISO_DATE_LEN) {
            Some(prefix) if NaiveDate::parse_from_str(prefix, "%Y-%m-%d").is_ok() => prefix,
            _ => value.split('-').next().unwrap_or(value),
        },
    };
    parse_date(head.split(',').next().unwrap_or(head)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_by_first_date() {
        assert_eq!(
            date_time_comparator("2024-03-01 - 2024-03-31", "2024-01-01 - 2024-12-31"),
            Ordering::Greater
        );
        assert_eq!(
            date_time_comparator("01.01.2024 - 31.01.2024", "02.01.2024 - 03.01.2024"),
            Ordering::Less
        );
        assert_eq!(
            date_time_comparator("2024-01-01 - 2024-01-02", "2024-01-01 - 2024-12-31"),
            Ordering::Equal
        );
    }

    #[test]
    fn test_bounds_without_spaces() {
        assert_eq!(
            date_time_comparator("05.01.2024-10.01.2024", "04.01.2024-20.01.2024"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_iso_bounds_without_spaces() {
        assert_eq!(
            date_time_comparator("2024-01-01-2024-02-01", "2023-06-01 - 2023-07-01"),
            Ordering::Greater
        );
        assert_eq!(
            date_time_comparator("2024-01-01-2024-02-01", "2024-01-02"),
            Ordering::Less
        );
        assert_eq!(date_time_comparator("2024-01-01-2024-02-01", "tbd"), Ordering::Greater);
    }

    #[test]
    fn test_single_date_and_list() {
        assert_eq!(
            date_time_comparator("2024-05-01", "2024-04-01 - 2024-04-02, 2023-01-01 - 2023-01-02"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_unreadable_sorts_first() {
        assert_eq!(date_time_comparator("", "2024-01-01"), Ordering::Less);
        assert_eq!(date_time_comparator("2024-01-01", "tbd"), Ordering::Greater);
        assert_eq!(date_time_comparator("", "tbd"), Ordering::Equal);
    }
}
