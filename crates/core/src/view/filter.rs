//! Predicate filter stage.

use super::{DateRange, QueryFor, Record, Selection, ViewContext};
use crate::time::{days_before, months_before, start_of_day};
use chrono::{DateTime, Utc};

/// A query compiled against a fixed clock.
///
/// The search term is lowercased and the date cutoff computed once, so that
/// matching a batch does not redo that work per row.
#[derive(Debug)]
pub struct RecordFilter<'q, S> {
    needle: Option<String>,
    status: &'q Selection<S>,
    cutoff: Option<DateTime<Utc>>,
}

impl<'q, S: PartialEq> RecordFilter<'q, S> {
    pub fn new<K>(query: &'q super::ViewQuery<S, K>, ctx: &ViewContext) -> Self {
        let needle = query.search.trim();
        Self {
            needle: (!needle.is_empty()).then(|| needle.to_lowercase()),
            status: &query.status,
            cutoff: date_cutoff(query.date_range, ctx),
        }
    }

    /// Whether the record passes every active predicate.
    pub fn matches<R>(&self, record: &R) -> bool
    where
        R: Record<Status = S>,
    {
        self.matches_text(record) && self.matches_status(record) && self.matches_date(record)
    }

    fn matches_text<R: Record>(&self, record: &R) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        record
            .search_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle.as_str()))
    }

    fn matches_status<R: Record<Status = S>>(&self, record: &R) -> bool {
        match self.status {
            Selection::All => true,
            Selection::Only(wanted) => record.status() == Some(wanted),
        }
    }

    fn matches_date<R: Record>(&self, record: &R) -> bool {
        let Some(cutoff) = self.cutoff else {
            return true;
        };
        record.timestamp().is_some_and(|at| at >= cutoff)
    }
}

/// Earliest instant a record may carry to pass the date-range predicate.
/// `None` means the predicate is bypassed.
pub fn date_cutoff(range: DateRange, ctx: &ViewContext) -> Option<DateTime<Utc>> {
    match range {
        DateRange::All => None,
        DateRange::Today => Some(start_of_day(ctx.now, ctx.offset)),
        DateRange::Week => Some(days_before(ctx.now, 7)),
        DateRange::Month => Some(months_before(ctx.now, 1, ctx.offset)),
        DateRange::Quarter => Some(months_before(ctx.now, 3, ctx.offset)),
    }
}

/// Keep the records that satisfy all active predicates, in input order.
pub fn filter_records<'a, R, I>(records: I, query: &QueryFor<R>, ctx: &ViewContext) -> Vec<&'a R>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let filter = RecordFilter::new(query, ctx);
    records
        .into_iter()
        .filter(|record| filter.matches(*record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Order, OrderStatus, Report, ReportStatus};
    use crate::view::{ViewQuery, DateRange};
    use chrono::{Duration, FixedOffset};

    fn ctx() -> ViewContext {
        let now = chrono::DateTime::parse_from_rfc3339("2024-03-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        ViewContext::new(now, FixedOffset::east_opt(0).unwrap())
    }

    fn report(id: &str, patient: &str, status: ReportStatus, at: DateTime<Utc>) -> Report {
        Report {
            id: id.into(),
            patient_id: Some(format!("p-{patient}")),
            patient_name: Some(patient.into()),
            test_type: Some("CBC".into()),
            lab_name: Some("Central Lab".into()),
            status: Some(status),
            priority: None,
            created_at: Some(at.to_rfc3339()),
            completed_at: None,
            report_url: None,
            amount: None,
        }
    }

    fn sample() -> Vec<Report> {
        let now = ctx().now;
        vec![
            report("r-1", "Asha", ReportStatus::Pending, now - Duration::hours(2)),
            report("r-2", "Ravi", ReportStatus::Completed, now - Duration::days(3)),
            report("r-3", "Meera", ReportStatus::Completed, now - Duration::days(40)),
        ]
    }

    #[test]
    fn test_empty_query_is_identity() {
        let records = sample();
        let query = ViewQuery::default();
        let rows = filter_records(&records, &query, &ctx());
        assert_eq!(rows, records.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_status_filter_keeps_only_matching() {
        let records = sample();
        let query = ViewQuery::default().with_status(ReportStatus::Completed);
        let rows = filter_records(&records, &query, &ctx());

        assert_eq!(rows.len(), 2);
        assert!(rows
            .iter()
            .all(|r| r.status == Some(ReportStatus::Completed)));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = sample();
        let query = ViewQuery::default()
            .with_search("a")
            .with_date_range(DateRange::Month);
        let once = filter_records(&records, &query, &ctx());
        let twice = filter_records(once.iter().copied(), &query, &ctx());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let records = sample();

        let by_name = ViewQuery::default().with_search("RAVI");
        assert_eq!(filter_records(&records, &by_name, &ctx()).len(), 1);

        let by_id = ViewQuery::default().with_search("r-3");
        assert_eq!(filter_records(&records, &by_id, &ctx())[0].id, "r-3");

        let by_lab = ViewQuery::default().with_search("central");
        assert_eq!(filter_records(&records, &by_lab, &ctx()).len(), 3);

        let nothing = ViewQuery::default().with_search("zzz-no-match");
        assert!(filter_records(&records, &nothing, &ctx()).is_empty());

        let blank = ViewQuery::default().with_search("   ");
        assert_eq!(filter_records(&records, &blank, &ctx()).len(), 3);
    }

    #[test]
    fn test_eight_days_old_is_outside_week_inside_month() {
        let now = ctx().now;
        let records = vec![report(
            "r-8",
            "Old",
            ReportStatus::Completed,
            now - Duration::days(8),
        )];

        let week = ViewQuery::default().with_date_range(DateRange::Week);
        assert!(filter_records(&records, &week, &ctx()).is_empty());

        let month = ViewQuery::default().with_date_range(DateRange::Month);
        assert_eq!(filter_records(&records, &month, &ctx()).len(), 1);
    }

    #[test]
    fn test_today_starts_at_midnight() {
        let now = ctx().now;
        let records = vec![
            report("early", "A", ReportStatus::Pending, now - Duration::hours(11)),
            report("yesterday", "B", ReportStatus::Pending, now - Duration::hours(13)),
        ];

        let today = ViewQuery::default().with_date_range(DateRange::Today);
        let rows = filter_records(&records, &today, &ctx());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "early");
    }

    #[test]
    fn test_malformed_date_never_matches_a_range() {
        let mut broken = sample().remove(0);
        broken.created_at = Some("not a date".into());
        let records = vec![broken];

        let quarter = ViewQuery::default().with_date_range(DateRange::Quarter);
        assert!(filter_records(&records, &quarter, &ctx()).is_empty());

        let all = ViewQuery::default();
        assert_eq!(filter_records(&records, &all, &ctx()).len(), 1);
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let orders: Vec<Order> = serde_json::from_str(
            r#"[
                {"id": "o-1", "patient": {"name": "Asha"}, "status": "pending",
                 "createdAt": "2024-03-14T09:00:00Z"},
                {"id": "o-2", "patient": {"name": "Asha"}, "status": "approved",
                 "createdAt": "2024-03-14T09:00:00Z"},
                {"id": "o-3", "patient": {"name": "Ravi"}, "status": "pending",
                 "createdAt": "2024-03-14T09:00:00Z"}
            ]"#,
        )
        .unwrap();

        let query = ViewQuery::default()
            .with_search("asha")
            .with_status(OrderStatus::Pending)
            .with_date_range(DateRange::Week);
        let rows = filter_records(&orders, &query, &ctx());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "o-1");
    }

    #[test]
    fn test_unknown_status_matches_only_same_text() {
        let orders: Vec<Order> =
            serde_json::from_str(r#"[{"id": "o-1", "status": "on-hold"}, {"id": "o-2"}]"#)
                .unwrap();

        let query = ViewQuery::default().with_status(OrderStatus::from_wire("On-Hold"));
        let rows = filter_records(&orders, &query, &ctx());
        // Unknown values keep their original spelling.
        assert!(rows.is_empty());

        let exact = ViewQuery::default().with_status(OrderStatus::from_wire("on-hold"));
        assert_eq!(filter_records(&orders, &exact, &ctx()).len(), 1);
    }
}
