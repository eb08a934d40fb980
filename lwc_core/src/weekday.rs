//! French day names, independent of the host locale.

use chrono::{Datelike, NaiveDate};

static DAY_NAMES: [&str; 7] = [
    "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi", "Dimanche",
];

/// Get the French name of the day of the week of `date`.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    DAY_NAMES[date.weekday().num_days_from_monday() as usize]
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{Days, NaiveDate};

    use crate::weekday::{weekday_name, DAY_NAMES};

    #[test]
    fn test_weekday_name() {
        let christmas = NaiveDate::from_str("2024-12-25").unwrap();
        assert_eq!(weekday_name(christmas), "Mercredi");
        let new_year = NaiveDate::from_str("2025-01-01").unwrap();
        assert_eq!(weekday_name(new_year), "Mercredi");
        let leap_day = NaiveDate::from_str("2024-02-29").unwrap();
        assert_eq!(weekday_name(leap_day), "Jeudi");
    }

    /// A whole week starting on a Monday walks through the table in order.
    #[test]
    fn test_weekday_name_week() {
        let monday = NaiveDate::from_str("2024-12-23").unwrap();
        let names: Vec<&str> = (0..7)
            .map(|offset| weekday_name(monday + Days::new(offset)))
            .collect();
        assert_eq!(names, DAY_NAMES);
    }
}
