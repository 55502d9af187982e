use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Combine a `YYYY-MM-DD` date and an `HH:MM` time in `tz`.
///
/// Returns `None` when either part is blank or unparsable, or when the local
/// time falls into a DST gap. Ambiguous local times resolve to the earliest.
pub fn compose_instant<Tz: TimeZone>(tz: &Tz, date: &str, time: &str) -> Option<DateTime<Tz>> {
    let date = date.trim();
    let time = time.trim();
    if date.is_empty() || time.is_empty() {
        return None;
    }
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
    let time = NaiveTime::parse_from_str(time, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .ok()?;
    tz.from_local_datetime(&date.and_time(time)).earliest()
}

pub fn same_day<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> bool {
    a.date_naive() == b.date_naive()
}

pub fn format_relative<Tz: TimeZone>(instant: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let time = instant.format(TIME_FORMAT);
    if same_day(instant, now) {
        return format!("Today · {}", time);
    }
    if now.date_naive().succ_opt() == Some(instant.date_naive()) {
        return format!("Tomorrow · {}", time);
    }
    format!("{} · {}", instant.format("%d %b %Y"), time)
}

pub fn default_instant<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let later = now.clone() + Duration::minutes(10);
    later
        .with_nanosecond(0)
        .and_then(|d| d.with_second(0))
        .unwrap_or(later)
}

pub fn device_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|err| {
        tracing::debug!("timezone lookup failed: {}", err);
        "UTC".to_string()
    })
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn compose_rejects_missing_parts() {
        assert!(compose_instant(&Utc, "", "10:00").is_none());
        assert!(compose_instant(&Utc, "2025-01-01", "  ").is_none());
        assert!(compose_instant(&Utc, "2025-13-01", "10:00").is_none());
        assert!(compose_instant(&Utc, "2025-01-01", "25:00").is_none());
    }

    #[test]
    fn compose_uses_the_given_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let dt = compose_instant(&tz, "2025-01-01", "10:05").unwrap();
        assert_eq!(dt.with_timezone(&Utc), utc("2025-01-01T08:05:00Z"));
    }

    #[test]
    fn compose_accepts_seconds() {
        let dt = compose_instant(&Utc, "2025-01-01", "10:05:30").unwrap();
        assert_eq!(dt, utc("2025-01-01T10:05:30Z"));
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        assert!(same_day(&utc("2025-06-03T00:00:00Z"), &utc("2025-06-03T23:59:59Z")));
        assert!(!same_day(&utc("2025-06-03T23:59:59Z"), &utc("2025-06-04T00:00:00Z")));
    }

    #[test]
    fn relative_labels_prefer_today_then_tomorrow() {
        let now = utc("2025-06-03T22:00:00Z");
        assert_eq!(format_relative(&utc("2025-06-03T23:15:00Z"), &now), "Today · 23:15");
        assert_eq!(format_relative(&utc("2025-06-04T07:00:00Z"), &now), "Tomorrow · 07:00");
        assert_eq!(format_relative(&utc("2025-06-05T07:00:00Z"), &now), "05 Jun 2025 · 07:00");
    }

    #[test]
    fn tomorrow_follows_the_calendar_across_dst_end() {
        use chrono_tz::Europe::Berlin;
        // 26 Oct 2025 has 25 hours in Berlin.
        let now = Berlin.with_ymd_and_hms(2025, 10, 26, 0, 30, 0).unwrap();
        let at = Berlin.with_ymd_and_hms(2025, 10, 27, 9, 0, 0).unwrap();
        assert_eq!(format_relative(&at, &now), "Tomorrow · 09:00");
        let late = Berlin.with_ymd_and_hms(2025, 10, 26, 23, 45, 0).unwrap();
        assert_eq!(format_relative(&late, &now), "Today · 23:45");
    }

    #[test]
    fn default_instant_is_ten_minutes_out_on_the_minute() {
        let now = utc("2025-01-01T10:00:42.250Z");
        assert_eq!(default_instant(&now), utc("2025-01-01T10:10:00Z"));
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2025, 2), Some(28));
        assert_eq!(days_in_month(2025, 12), Some(31));
        assert_eq!(days_in_month(2025, 13), None);
    }
}
