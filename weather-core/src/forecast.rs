//! Daily sampling of the forecast time series.

use chrono::{Days, NaiveDate, TimeZone};

use crate::model::ForecastEntry;

/// Number of days shown in the forecast strip.
pub const MAX_DAYS: usize = 5;

/// Entries whose label contains this time are the daily samples.
pub const MIDDAY: &str = "12:00:00";

pub const TODAY_LABEL: &str = "Today";
pub const TOMORROW_LABEL: &str = "Tomorrow";

/// The midday sample of each day, at most [`MAX_DAYS`] of them, in upstream order.
pub fn daily_samples(entries: &[ForecastEntry]) -> Vec<&ForecastEntry> {
    entries
        .iter()
        .filter(|entry| entry.label.contains(MIDDAY))
        .take(MAX_DAYS)
        .collect()
}

/// Calendar date of an entry as seen from `tz`, the zone "today" is taken in.
pub fn entry_date<Tz: TimeZone>(entry: &ForecastEntry, tz: &Tz) -> NaiveDate {
    entry.timestamp.with_timezone(tz).date_naive()
}

/// Label for the slot at `index`: the first is always today, a slot dated
/// the day after `today` is tomorrow, anything else is its short weekday name.
pub fn day_label(date: NaiveDate, index: usize, today: NaiveDate) -> String {
    if index == 0 {
        return TODAY_LABEL.to_string();
    }
    if today.checked_add_days(Days::new(1)) == Some(date) {
        return TOMORROW_LABEL.to_string();
    }
    date.format("%a").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDateTime, Utc};

    const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    fn entry(label: &str) -> ForecastEntry {
        let naive = NaiveDateTime::parse_from_str(label, LABEL_FORMAT).unwrap();
        ForecastEntry {
            timestamp: Utc.from_utc_datetime(&naive),
            label: label.to_string(),
            temp_max: 20.0,
            temp_min: 10.0,
            icon: "01d".to_string(),
            description: "clear sky".to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn only_midday_entries_are_sampled() {
        let entries = vec![
            entry("2024-05-01 09:00:00"),
            entry("2024-05-01 12:00:00"),
            entry("2024-05-01 15:00:00"),
            entry("2024-05-02 12:00:00"),
        ];

        let picked: Vec<_> = daily_samples(&entries).iter().map(|e| e.label.as_str()).collect();
        assert_eq!(picked, ["2024-05-01 12:00:00", "2024-05-02 12:00:00"]);
    }

    #[test]
    fn at_most_five_days_are_sampled() {
        let entries: Vec<_> =
            (1..=7).map(|d| entry(&format!("2024-05-0{d} 12:00:00"))).collect();

        let picked = daily_samples(&entries);
        assert_eq!(picked.len(), MAX_DAYS);
        assert_eq!(picked[4].label, "2024-05-05 12:00:00");
    }

    #[test]
    fn first_slot_is_today_even_for_a_later_date() {
        let today = date(2024, 5, 1);
        assert_eq!(day_label(date(2024, 5, 2), 0, today), TODAY_LABEL);
    }

    #[test]
    fn second_slot_is_tomorrow_only_when_dated_so() {
        let today = date(2024, 5, 1);

        assert_eq!(day_label(date(2024, 5, 2), 1, today), TOMORROW_LABEL);
        // 2024-05-03 is a Friday.
        assert_eq!(day_label(date(2024, 5, 3), 1, today), "Fri");
    }

    #[test]
    fn later_slots_use_short_weekday() {
        let today = date(2024, 5, 1);
        assert_eq!(day_label(date(2024, 5, 4), 3, today), "Sat");
    }

    #[test]
    fn entry_date_follows_the_viewer_timezone() {
        let e = entry("2024-05-01 12:00:00");
        assert_eq!(entry_date(&e, &Utc), date(2024, 5, 1));

        let auckland = FixedOffset::east_opt(13 * 3600).unwrap();
        assert_eq!(entry_date(&e, &auckland), date(2024, 5, 2));

        let honolulu = FixedOffset::west_opt(10 * 3600).unwrap();
        assert_eq!(entry_date(&e, &honolulu), date(2024, 5, 1));
    }
}
