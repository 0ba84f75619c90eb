use chrono::{Duration, NaiveDate};

/// Iterates calendar days starting at `newest` and walking backward,
/// `count` days in total. Used by the history view and the weekly average.
pub fn days_back(newest: NaiveDate, count: u32) -> impl Iterator<Item = NaiveDate> + Clone {
    (0..i64::from(count)).map(move |offset| newest - Duration::days(offset))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::days_back;

    #[test]
    fn days_back_is_newest_first() {
        let newest = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let days = days_back(newest, 3).collect::<Vec<_>>();
        assert_eq!(
            days,
            vec![
                newest,
                NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 13).unwrap(),
            ]
        );
    }

    #[test]
    fn days_back_crosses_month_boundaries() {
        let newest = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let days = days_back(newest, 2).collect::<Vec<_>>();
        assert_eq!(days[1], NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }
}
