//! Summary statistics shown above each list.
//!
//! These always run over the raw batch, never over the filtered rows.

use super::{Record, ViewContext};
use crate::time::in_same_month;
use std::collections::{BTreeMap, HashSet};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub total: usize,
    /// Records whose timestamp falls in the current calendar month.
    pub this_month: usize,
    /// Distinct values of the record kind's group key (e.g. patients).
    pub unique: usize,
    /// Records with a non-empty URL field (e.g. uploaded reports).
    pub with_attachment: usize,
    pub amount_total: f64,
    /// Record count per status, keyed by the status' display form. Records
    /// without a status are not counted here.
    pub by_status: BTreeMap<String, usize>,
}

impl Summary {
    /// Records that still lack an attachment.
    pub fn without_attachment(&self) -> usize {
        self.total - self.with_attachment
    }

    pub fn status_count(&self, status: &str) -> usize {
        self.by_status.get(status).copied().unwrap_or(0)
    }
}

/// Reduce a raw batch to its summary.
pub fn summarize<'a, R, I>(records: I, ctx: &ViewContext) -> Summary
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut summary = Summary::default();
    let mut groups: HashSet<&'a str> = HashSet::new();

    for record in records {
        summary.total += 1;

        if record
            .timestamp()
            .is_some_and(|at| in_same_month(at, ctx.now, ctx.offset))
        {
            summary.this_month += 1;
        }

        if let Some(key) = record.group_key() {
            groups.insert(key);
        }

        if record
            .attachment_url()
            .is_some_and(|url| !url.trim().is_empty())
        {
            summary.with_attachment += 1;
        }

        if let Some(amount) = record.amount().filter(|a| a.is_finite()) {
            summary.amount_total += amount;
        }

        if let Some(status) = record.status() {
            *summary.by_status.entry(status.to_string()).or_insert(0) += 1;
        }
    }

    summary.unique = groups.len();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Report;
    use chrono::{DateTime, FixedOffset, Utc};

    fn ctx() -> ViewContext {
        let now = DateTime::parse_from_rfc3339("2024-03-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        ViewContext::new(now, FixedOffset::east_opt(0).unwrap())
    }

    fn reports() -> Vec<Report> {
        serde_json::from_str(
            r#"[
                {"id": "r-1", "patientId": "p-1", "status": "completed",
                 "completedAt": "2024-03-02T10:00:00Z", "reportUrl": "https://files/r-1.pdf",
                 "amount": 300},
                {"id": "r-2", "patientId": "p-1", "status": "pending",
                 "createdAt": "2024-02-28T10:00:00Z", "reportUrl": "", "amount": 450.5},
                {"id": "r-3", "patientId": "p-2", "status": "completed",
                 "createdAt": "garbage", "reportUrl": "https://files/r-3.pdf"},
                {"id": "r-4", "status": "processing", "createdAt": "2024-03-10"}
            ]"#,
        )
        .expect("reports should deserialize")
    }

    #[test]
    fn test_summary_counts() {
        let summary = summarize(&reports(), &ctx());

        assert_eq!(summary.total, 4);
        assert_eq!(summary.this_month, 2);
        assert_eq!(summary.unique, 2);
        assert_eq!(summary.with_attachment, 2);
        assert_eq!(summary.without_attachment(), 2);
        assert_eq!(summary.amount_total, 750.5);
        assert_eq!(summary.status_count("completed"), 2);
        assert_eq!(summary.status_count("pending"), 1);
        assert_eq!(summary.status_count("cancelled"), 0);
    }

    #[test]
    fn test_unique_never_exceeds_total() {
        let records = reports();
        for n in 0..=records.len() {
            let summary = summarize(&records[..n], &ctx());
            assert!(summary.unique <= summary.total);
        }
    }

    #[test]
    fn test_empty_batch() {
        let summary = summarize(&Vec::<Report>::new(), &ctx());
        assert_eq!(summary, Summary::default());
    }
}
