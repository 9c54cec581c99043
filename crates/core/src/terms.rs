//! Billing terms and due-date derivation.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use arvo_shared::types::TermsId;

/// How a terms record derives the due date from the document date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "basis", content = "value")]
pub enum TermsBasis {
    /// Due a fixed number of days after the document date.
    NetDays(u32),
    /// Due on a fixed day of the following month.
    Proximo(u32),
}

/// A billing terms record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terms {
    /// Row id.
    pub id: TermsId,
    /// Short code (e.g. "NET30").
    pub code: String,
    /// Due-date derivation rule.
    pub basis: TermsBasis,
}

impl Terms {
    /// Derives the due date for a document dated `doc_date`.
    ///
    /// Proximo terms land on the given day of the following month, clamped
    /// to that month's length.
    #[must_use]
    pub fn due_date(&self, doc_date: NaiveDate) -> NaiveDate {
        match self.basis {
            TermsBasis::NetDays(days) => doc_date
                .checked_add_days(Days::new(u64::from(days)))
                .unwrap_or(doc_date),
            TermsBasis::Proximo(day) => {
                let next_month = doc_date
                    .checked_add_months(Months::new(1))
                    .unwrap_or(doc_date);
                let clamped = day.clamp(1, days_in_month(next_month));
                next_month.with_day(clamped).unwrap_or(next_month)
            }
        }
    }
}

fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    let next = first
        .checked_add_months(Months::new(1))
        .unwrap_or(first);
    next.signed_duration_since(first).num_days().unsigned_abs() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn terms(basis: TermsBasis) -> Terms {
        Terms {
            id: TermsId::from_raw(1),
            code: "T".into(),
            basis,
        }
    }

    #[rstest]
    #[case::net_30(TermsBasis::NetDays(30), (2024, 1, 1), (2024, 1, 31))]
    #[case::net_across_month_end(TermsBasis::NetDays(15), (2024, 1, 25), (2024, 2, 9))]
    #[case::net_zero(TermsBasis::NetDays(0), (2024, 1, 1), (2024, 1, 1))]
    #[case::proximo(TermsBasis::Proximo(10), (2024, 3, 22), (2024, 4, 10))]
    // February 2024 has 29 days.
    #[case::proximo_clamped(TermsBasis::Proximo(31), (2024, 1, 5), (2024, 2, 29))]
    #[case::proximo_year_rollover(TermsBasis::Proximo(15), (2024, 12, 20), (2025, 1, 15))]
    fn test_due_date_derivation(
        #[case] basis: TermsBasis,
        #[case] doc: (i32, u32, u32),
        #[case] due: (i32, u32, u32),
    ) {
        let doc = NaiveDate::from_ymd_opt(doc.0, doc.1, doc.2).unwrap();
        let due = NaiveDate::from_ymd_opt(due.0, due.1, due.2).unwrap();
        assert_eq!(terms(basis).due_date(doc), due);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()), 29);
        assert_eq!(days_in_month(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()), 28);
        assert_eq!(days_in_month(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()), 30);
        assert_eq!(days_in_month(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()), 31);
    }
}
