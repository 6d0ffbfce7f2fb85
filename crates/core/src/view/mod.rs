//! Derived list views.
//!
//! A screen holds the raw batch fetched from the backend in a
//! [`store::RecordStore`]. Every time the user changes the search text or a
//! filter, the [`filter`] stage and then the [`sort`] stage run over the whole
//! raw batch to produce the rows that are displayed. The [`aggregate`] stage
//! runs off the raw batch independently of the current filters.
//!
//! ```text
//! RecordStore ──► filter (text AND status AND date range) ──► sort (key, direction) ──► rows
//!      │
//!      └────────► aggregate (total, this month, unique, with URL) ──► summary
//! ```
//!
//! All stages are total: malformed or missing fields never produce errors,
//! they simply fail to match (filter) or sort last (sort).

pub mod aggregate;
pub mod filter;
pub mod screen;
pub mod sort;
pub mod store;

pub use aggregate::{summarize, Summary};
pub use filter::{filter_records, RecordFilter};
pub use screen::{FetchTicket, ListScreen, LoadState};
pub use sort::{sort_records, SortValue};
pub use store::RecordStore;

use crate::constants::ALL_SENTINEL;
use crate::{DashboardError, DashboardResult};
use chrono::{DateTime, FixedOffset, Utc};
use std::fmt;
use std::str::FromStr;

/// A row that can flow through the list-view pipeline.
pub trait Record {
    /// Status enumeration used by the status filter.
    type Status: PartialEq + fmt::Display;
    /// Keys the sort stage understands for this record kind.
    type SortKey: Copy + fmt::Debug;

    /// Backend identifier. Assumed unique within a batch.
    fn id(&self) -> &str;

    /// The fixed list of fields the search box matches against. Absent fields
    /// are simply left out.
    fn search_fields(&self) -> Vec<&str>;

    fn status(&self) -> Option<&Self::Status>;

    /// The date-time the date-range filter and the "this month" aggregate use.
    fn timestamp(&self) -> Option<DateTime<Utc>>;

    fn sort_value(&self, key: Self::SortKey) -> SortValue<'_>;

    /// Field whose distinct values give the "unique" aggregate.
    fn group_key(&self) -> Option<&str> {
        None
    }

    /// URL-like field counted by the "with attachment" aggregate.
    fn attachment_url(&self) -> Option<&str> {
        None
    }

    fn amount(&self) -> Option<f64> {
        None
    }
}

/// Either no restriction, or exactly one value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: FromStr> Selection<T> {
    /// Parse a user-supplied selection; `all` (any case) or a blank value
    /// means no restriction.
    pub fn parse(raw: &str) -> Result<Self, T::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_SENTINEL) {
            return Ok(Selection::All);
        }
        trimmed.parse().map(Selection::Only)
    }
}

/// Date-range buckets offered by the list screens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    All,
    /// Since the start of the current calendar day.
    Today,
    /// The last 7 days.
    Week,
    /// The last calendar month.
    Month,
    /// The last three calendar months.
    Quarter,
}

impl FromStr for DateRange {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(DateRange::All),
            "today" => Ok(DateRange::Today),
            "week" | "last-week" => Ok(DateRange::Week),
            "month" | "last-month" => Ok(DateRange::Month),
            "quarter" | "last-quarter" => Ok(DateRange::Quarter),
            other => Err(DashboardError::InvalidInput(format!(
                "unknown date range '{other}' (expected all, today, week, month or quarter)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl FromStr for SortDirection {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(DashboardError::InvalidInput(format!(
                "unknown sort direction '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortSpec<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K> SortSpec<K> {
    pub fn new(key: K, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn ascending(key: K) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    pub fn descending(key: K) -> Self {
        Self::new(key, SortDirection::Descending)
    }
}

/// Filter/sort state owned by a list screen.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewQuery<S, K> {
    pub search: String,
    pub status: Selection<S>,
    pub date_range: DateRange,
    pub sort: SortSpec<K>,
}

/// The query type matching a record kind.
pub type QueryFor<R> = ViewQuery<<R as Record>::Status, <R as Record>::SortKey>;

impl<S, K: Default> Default for ViewQuery<S, K> {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: Selection::All,
            date_range: DateRange::All,
            sort: SortSpec::default(),
        }
    }
}

impl<S, K> ViewQuery<S, K> {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_status(mut self, status: S) -> Self {
        self.status = Selection::Only(status);
        self
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn with_sort(mut self, key: K, direction: SortDirection) -> Self {
        self.sort = SortSpec::new(key, direction);
        self
    }

    /// True when no filter would remove anything.
    pub fn is_unfiltered(&self) -> bool {
        self.search.trim().is_empty()
            && matches!(self.status, Selection::All)
            && self.date_range == DateRange::All
    }
}

/// Clock and calendar used when evaluating date-relative filters.
#[derive(Clone, Copy, Debug)]
pub struct ViewContext {
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl ViewContext {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Context for the current wall-clock time.
    pub fn current(offset: FixedOffset) -> Self {
        Self::new(Utc::now(), offset)
    }
}

/// Filter then sort `records` for display.
pub fn derive_rows<'a, R: Record>(
    records: &'a [R],
    query: &QueryFor<R>,
    ctx: &ViewContext,
) -> Vec<&'a R> {
    let mut rows = filter_records(records, query, ctx);
    sort_records(&mut rows, query.sort);
    rows
}

/// Parse a sort key name, mapping failures to an input error that lists the
/// accepted names.
pub(crate) fn parse_sort_key<K: Copy>(
    raw: &str,
    table: &[(&str, K)],
) -> DashboardResult<K> {
    let wanted = raw.trim().to_ascii_lowercase();
    table
        .iter()
        .find(|(name, _)| *name == wanted)
        .map(|(_, key)| *key)
        .ok_or_else(|| {
            let names: Vec<&str> = table.iter().map(|(name, _)| *name).collect();
            DashboardError::InvalidInput(format!(
                "unknown sort key '{}' (expected one of: {})",
                raw.trim(),
                names.join(", ")
            ))
        })
}
