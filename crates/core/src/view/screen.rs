//! List screen state: raw store, filter/sort state and fetch lifecycle.
//!
//! A screen shows a loading indicator while a fetch is outstanding, then
//! either the populated table or an error with a retry hint. Each fetch is
//! issued a [`FetchTicket`]; completing with a ticket that is no longer
//! current (a newer fetch started, or the screen was torn down) is a no-op.

use super::{
    derive_rows, summarize, DateRange, QueryFor, Record, RecordStore, Selection, SortSpec,
    Summary, ViewContext,
};
use chrono::Utc;
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Proof that a fetch was started for a particular screen generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use = "a fetch ticket must be handed back to complete_fetch"]
pub struct FetchTicket {
    generation: u64,
}

pub struct ListScreen<R: Record> {
    store: RecordStore<R>,
    query: QueryFor<R>,
    state: LoadState,
    generation: u64,
    mounted: bool,
}

impl<R> fmt::Debug for ListScreen<R>
where
    R: Record + fmt::Debug,
    R::Status: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListScreen")
            .field("store", &self.store)
            .field("query", &self.query)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl<R> Default for ListScreen<R>
where
    R: Record,
    R::SortKey: Default,
{
    fn default() -> Self {
        Self::new(QueryFor::<R>::default())
    }
}

impl<R: Record> ListScreen<R> {
    pub fn new(query: QueryFor<R>) -> Self {
        Self {
            store: RecordStore::new(),
            query,
            state: LoadState::Idle,
            generation: 0,
            mounted: true,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    /// Direct access for optimistic patches after a write call.
    pub fn store_mut(&mut self) -> &mut RecordStore<R> {
        &mut self.store
    }

    pub fn query(&self) -> &QueryFor<R> {
        &self.query
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_status(&mut self, status: Selection<R::Status>) {
        self.query.status = status;
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.query.date_range = range;
    }

    pub fn set_sort(&mut self, sort: SortSpec<R::SortKey>) {
        self.query.sort = sort;
    }

    /// Start a fetch (initial mount or explicit refresh).
    ///
    /// Any fetch started earlier becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        if self.mounted {
            self.state = LoadState::Loading;
        }
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Deliver the result of a fetch.
    ///
    /// Returns `false` when the result was dropped because the ticket is stale
    /// or the screen has been torn down.
    pub fn complete_fetch<E: fmt::Display>(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<R>, E>,
    ) -> bool {
        if !self.mounted || ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                mounted = self.mounted,
                "ignoring stale fetch result"
            );
            return false;
        }

        match result {
            Ok(records) => {
                self.store.replace(records, Utc::now());
                self.state = LoadState::Ready;
            }
            Err(e) => {
                self.state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    /// The screen is going away; outstanding fetches must not touch it.
    pub fn teardown(&mut self) {
        self.mounted = false;
        self.generation += 1;
    }

    /// Filtered and sorted rows for display.
    pub fn rows(&self, ctx: &ViewContext) -> Vec<&R> {
        derive_rows(self.store.records(), &self.query, ctx)
    }

    /// Aggregates over the whole raw batch.
    pub fn summary(&self, ctx: &ViewContext) -> Summary {
        summarize(self.store.records(), ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Report, ReportSortKey, ReportStatus};
    use crate::view::SortDirection;
    use chrono::{DateTime, FixedOffset};

    fn ctx() -> ViewContext {
        let now = DateTime::parse_from_rfc3339("2024-03-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        ViewContext::new(now, FixedOffset::east_opt(0).unwrap())
    }

    fn batch() -> Vec<Report> {
        serde_json::from_str(
            r#"[{"id": "r-1", "patientName": "Asha", "status": "pending", "priority": "normal"},
                {"id": "r-2", "patientName": "Ravi", "status": "completed", "priority": "urgent"},
                {"id": "r-3", "patientName": "Meera", "status": "completed", "priority": "high"}]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_fetch_lifecycle() {
        let mut screen: ListScreen<Report> = ListScreen::default();
        assert_eq!(screen.state(), &LoadState::Idle);

        let ticket = screen.begin_fetch();
        assert!(screen.is_loading());

        assert!(screen.complete_fetch(ticket, Ok::<_, String>(batch())));
        assert_eq!(screen.state(), &LoadState::Ready);
        assert_eq!(screen.store().len(), 3);
    }

    #[test]
    fn test_failed_fetch_reports_message() {
        let mut screen: ListScreen<Report> = ListScreen::default();
        let ticket = screen.begin_fetch();

        assert!(screen.complete_fetch(ticket, Err::<Vec<Report>, _>("connection refused")));
        assert_eq!(
            screen.state(),
            &LoadState::Failed("connection refused".into())
        );
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut screen: ListScreen<Report> = ListScreen::default();
        let first = screen.begin_fetch();
        let second = screen.begin_fetch();

        assert!(screen.complete_fetch(second, Ok::<_, String>(batch())));
        assert!(!screen.complete_fetch(first, Ok::<_, String>(Vec::new())));
        assert_eq!(screen.store().len(), 3);
    }

    #[test]
    fn test_result_after_teardown_is_noop() {
        let mut screen: ListScreen<Report> = ListScreen::default();
        let ticket = screen.begin_fetch();
        screen.teardown();

        assert!(!screen.complete_fetch(ticket, Ok::<_, String>(batch())));
        assert!(screen.store().is_empty());
        assert!(!screen.is_mounted());
    }

    #[test]
    fn test_rows_follow_query_and_summary_ignores_it() {
        let mut screen: ListScreen<Report> = ListScreen::default();
        let ticket = screen.begin_fetch();
        screen.complete_fetch(ticket, Ok::<_, String>(batch()));

        screen.set_status(Selection::Only(ReportStatus::Completed));
        screen.set_sort(SortSpec::new(ReportSortKey::Priority, SortDirection::Descending));
        let rows: Vec<String> = screen.rows(&ctx()).iter().map(|r| r.id.clone()).collect();
        assert_eq!(rows, vec!["r-2", "r-3"]);

        screen.set_search("meera");
        assert_eq!(screen.rows(&ctx()).len(), 1);

        screen.set_date_range(DateRange::Week);
        assert!(screen.rows(&ctx()).is_empty());

        assert_eq!(screen.summary(&ctx()).total, 3);
    }
}
