use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

/// The report runs on Brasília time (UTC-3) regardless of host timezone
pub fn business_tz() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap()
}

/// The prior-day reporting window: UTC bounds for the API filter plus the
/// date renderings used in filenames, the email subject and the report rows.
#[derive(Debug, Clone)]
pub struct ReportWindow {
    /// Window start, ISO-8601 with millisecond precision (`...T03:00:00.000Z`)
    pub start_utc: String,
    /// Window end, `23:59:59.999` local converted to UTC
    pub end_utc: String,
    /// Business date as `yyyy-mm-dd`
    pub date_iso: String,
    /// Business date as `dd/mm/yyyy`
    pub date_label: String,
    /// Business date as `dd-mm-yy`, used as a filename suffix
    pub date_suffix: String,
}

impl ReportWindow {
    /// Window for yesterday relative to the current instant
    pub fn yesterday() -> Self {
        Self::for_instant(Utc::now())
    }

    /// Window for yesterday relative to `now`, computed in UTC-3
    pub fn for_instant(now: DateTime<Utc>) -> Self {
        let local_today = now.with_timezone(&business_tz()).date_naive();
        Self::for_date(local_today - Duration::days(1))
    }

    /// Window covering one full business day
    pub fn for_date(date: NaiveDate) -> Self {
        let tz = business_tz();
        let start = date
            .and_hms_milli_opt(0, 0, 0, 0)
            .unwrap()
            .and_local_timezone(tz)
            .unwrap();
        let end = date
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap()
            .and_local_timezone(tz)
            .unwrap();

        Self {
            start_utc: format_utc_millis(start.with_timezone(&Utc)),
            end_utc: format_utc_millis(end.with_timezone(&Utc)),
            date_iso: date.format("%Y-%m-%d").to_string(),
            date_label: date.format("%d/%m/%Y").to_string(),
            date_suffix: date.format("%d-%m-%y").to_string(),
        }
    }
}

fn format_utc_millis(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
