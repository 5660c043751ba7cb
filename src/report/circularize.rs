use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use tracing::warn;

use crate::report::project::{dedup_rows, ReportRow};

/// Due-date columns are capped regardless of the payment's installment count
pub const MAX_INSTALLMENTS: usize = 12;

/// Installments fall due on the 15th of each following month
const DUE_DAY: u32 = 15;

const ROW_DATE_FORMAT: &str = "%d/%m/%Y";

/// A report row extended with projected installment due dates
#[derive(Debug, Clone, PartialEq)]
pub struct CircularizedRow {
    pub row: ReportRow,
    pub due_dates: [Option<String>; MAX_INSTALLMENTS],
}

/// Due date of installment `number` (1-based) for an order invoiced on
/// `invoiced`: the 15th of the month `number` months later, shifted off
/// weekends onto the following Monday.
pub fn due_date(invoiced: NaiveDate, number: u32) -> NaiveDate {
    let base = invoiced + Months::new(number);
    let fifteenth = base.with_day(DUE_DAY).unwrap_or(base);

    match fifteenth.weekday() {
        Weekday::Sat => fifteenth + Duration::days(2),
        Weekday::Sun => fifteenth + Duration::days(1),
        _ => fifteenth,
    }
}

/// Project due-date columns for a reloaded row set. Duplicates are dropped
/// before the columns are added; rows without a positive installment count,
/// or whose invoiced date cannot be parsed day-first, keep every column
/// empty. Pure function of its input, so re-running is idempotent.
pub fn circularize(rows: &[ReportRow]) -> Vec<CircularizedRow> {
    dedup_rows(rows.to_vec())
        .into_iter()
        .map(|row| {
            let due_dates = project_due_dates(&row);
            CircularizedRow { row, due_dates }
        })
        .collect()
}

fn project_due_dates(row: &ReportRow) -> [Option<String>; MAX_INSTALLMENTS] {
    let mut due_dates: [Option<String>; MAX_INSTALLMENTS] = Default::default();

    let Some(count) = row.installments.filter(|n| *n > 0) else {
        return due_dates;
    };

    let invoiced = match NaiveDate::parse_from_str(&row.invoiced_date, ROW_DATE_FORMAT) {
        Ok(date) => date,
        Err(_) => {
            warn!(
                "order {}: cannot parse invoiced date '{}'; leaving due dates empty",
                row.order_id, row.invoiced_date
            );
            return due_dates;
        }
    };

    let count = (count as usize).min(MAX_INSTALLMENTS);
    for (number, slot) in due_dates.iter_mut().take(count).enumerate() {
        *slot = Some(
            due_date(invoiced, number as u32 + 1)
                .format(ROW_DATE_FORMAT)
                .to_string(),
        );
    }

    due_dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(invoiced_date: &str, installments: Option<u32>) -> ReportRow {
        ReportRow {
            invoiced_date: invoiced_date.to_string(),
            order_id: "1100306888KDK-01".to_string(),
            seller: "Acme Store".to_string(),
            items_total: 150.0,
            shipping_total: 12.5,
            grand_total: 162.5,
            installments,
        }
    }

    #[test]
    fn weekday_fifteenth_is_kept() {
        // 15 July 2024 is a Monday, no shift needed
        let rows = circularize(&[row("28/06/2024", Some(3))]);
        let due = &rows[0].due_dates;

        assert_eq!(due[0].as_deref(), Some("15/07/2024"));
        assert_eq!(due[1].as_deref(), Some("15/08/2024"));
        assert_eq!(due[2].as_deref(), Some("16/09/2024")); // 15 Sep 2024 is a Sunday
        assert!(due[3].is_none());
    }

    #[test]
    fn saturday_shifts_to_monday() {
        // 15 Feb 2025 is a Saturday
        let date = due_date(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), 1);
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 2, 17).unwrap());
        assert_eq!(date.weekday(), Weekday::Mon);
    }

    #[test]
    fn sunday_shifts_to_monday() {
        // 15 Sep 2024 is a Sunday
        let date = due_date(NaiveDate::from_ymd_opt(2024, 8, 20).unwrap(), 1);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 9, 16).unwrap());
        assert_eq!(date.weekday(), Weekday::Mon);
    }

    #[test]
    fn due_dates_never_land_before_the_fifteenth_or_on_weekends() {
        let invoiced = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        for number in 1..=12 {
            let date = due_date(invoiced, number);
            assert!(date.day() >= 15 && date.day() <= 17);
            assert!(!matches!(date.weekday(), Weekday::Sat | Weekday::Sun));
        }
    }

    #[test]
    fn due_months_increase_monotonically() {
        let invoiced = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
        let dates: Vec<NaiveDate> = (1..=12).map(|n| due_date(invoiced, n)).collect();
        for pair in dates.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn installment_count_is_capped_at_twelve() {
        let rows = circularize(&[row("28/06/2024", Some(24))]);
        assert!(rows[0].due_dates.iter().all(Option::is_some));
    }

    #[test]
    fn zero_or_missing_installments_leave_columns_empty() {
        for installments in [None, Some(0)] {
            let rows = circularize(&[row("28/06/2024", installments)]);
            assert!(rows[0].due_dates.iter().all(Option::is_none));
        }
    }

    #[test]
    fn unparseable_invoiced_date_degrades_per_row() {
        let rows = circularize(&[row("not-a-date", Some(3)), row("28/06/2024", Some(1))]);
        assert!(rows[0].due_dates.iter().all(Option::is_none));
        assert_eq!(rows[1].due_dates[0].as_deref(), Some("15/07/2024"));
    }

    #[test]
    fn duplicate_rows_collapse_before_projection() {
        let rows = circularize(&[row("28/06/2024", Some(1)), row("28/06/2024", Some(1))]);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn circularization_is_idempotent() {
        let input = [row("28/06/2024", Some(6)), row("28/06/2024", None)];
        assert_eq!(circularize(&input), circularize(&input));
    }
}
