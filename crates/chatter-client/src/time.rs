use chrono::{DateTime, Local, TimeZone};

/// Human-friendly rendering of `ts` relative to `now`, both in the zone the
/// clock times should be shown in.
pub fn format_timestamp<Tz: TimeZone>(ts: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let diff_mins = now.clone().signed_duration_since(ts.clone()).num_minutes();
    // Timestamps in the future read as "just now".
    if diff_mins < 1 {
        return "just now".to_string();
    }

    let diff_hours = diff_mins / 60;
    if diff_hours < 1 {
        return if diff_mins == 1 {
            "1 minute ago".to_string()
        } else {
            format!("{diff_mins} minutes ago")
        };
    }

    let diff_days = diff_hours / 24;
    match diff_days {
        0 => ts.format("%H:%M").to_string(),
        1 => format!("Yesterday {}", ts.format("%H:%M")),
        2..=6 => format!("{diff_days} days ago"),
        _ => ts.format("%Y-%m-%d %H:%M").to_string(),
    }
}

/// [`format_timestamp`] against the current local time.
pub fn format_timestamp_local<Tz: TimeZone>(ts: &DateTime<Tz>) -> String {
    let ts = ts.with_timezone(&Local);
    format_timestamp(&ts, &Local::now())
}
