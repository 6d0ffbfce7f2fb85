//! Comparator sort stage.

use super::{Record, SortDirection, SortSpec};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// A typed sort key extracted from a record.
///
/// `None` inside any variant means the value is missing or could not be
/// interpreted (unparseable date, priority outside the rank table). Missing
/// values sort after every present value, whatever the direction.
#[derive(Clone, Debug, PartialEq)]
pub enum SortValue<'a> {
    Instant(Option<DateTime<Utc>>),
    Text(Option<&'a str>),
    Number(Option<f64>),
    Rank(Option<u8>),
}

impl SortValue<'_> {
    fn is_missing(&self) -> bool {
        match self {
            SortValue::Instant(v) => v.is_none(),
            SortValue::Text(v) => v.is_none(),
            SortValue::Number(v) => v.is_none(),
            SortValue::Rank(v) => v.is_none(),
        }
    }
}

fn cmp_text_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Ascending comparison of two present values of the same kind.
fn cmp_present(a: &SortValue<'_>, b: &SortValue<'_>) -> Ordering {
    match (a, b) {
        (SortValue::Instant(Some(a)), SortValue::Instant(Some(b))) => a.cmp(b),
        (SortValue::Text(Some(a)), SortValue::Text(Some(b))) => cmp_text_ignore_case(a, b),
        (SortValue::Number(Some(a)), SortValue::Number(Some(b))) => a.total_cmp(b),
        (SortValue::Rank(Some(a)), SortValue::Rank(Some(b))) => a.cmp(b),
        // A record kind never mixes kinds for one key.
        _ => Ordering::Equal,
    }
}

/// Compare two sort values under a direction.
pub fn compare_values(a: &SortValue<'_>, b: &SortValue<'_>, direction: SortDirection) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = cmp_present(a, b);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
    }
}

/// Sort rows in place. The sort is stable: rows with equal keys keep their
/// input order in both directions.
pub fn sort_records<R: Record>(rows: &mut [&R], spec: SortSpec<R::SortKey>) {
    rows.sort_by(|a, b| {
        compare_values(
            &a.sort_value(spec.key),
            &b.sort_value(spec.key),
            spec.direction,
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Order, OrderSortKey, Priority};

    fn orders(json: &str) -> Vec<Order> {
        serde_json::from_str(json).expect("orders should deserialize")
    }

    fn ids(rows: &[&Order]) -> Vec<String> {
        rows.iter().map(|o| o.id.clone()).collect()
    }

    fn sorted(records: &[Order], key: OrderSortKey, direction: SortDirection) -> Vec<String> {
        let mut rows: Vec<&Order> = records.iter().collect();
        sort_records(&mut rows, SortSpec::new(key, direction));
        ids(&rows)
    }

    #[test]
    fn test_text_compares_case_insensitively() {
        let a = SortValue::Text(Some("alice"));
        let b = SortValue::Text(Some("Bob"));
        assert_eq!(
            compare_values(&a, &b, SortDirection::Ascending),
            Ordering::Less
        );
        assert_eq!(
            compare_values(
                &SortValue::Text(Some("ALICE")),
                &a,
                SortDirection::Ascending
            ),
            Ordering::Equal
        );
    }

    #[test]
    fn test_missing_values_sort_last_in_both_directions() {
        let present = SortValue::Rank(Some(1));
        let missing = SortValue::Rank(None);

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            assert_eq!(
                compare_values(&missing, &present, direction),
                Ordering::Greater
            );
            assert_eq!(
                compare_values(&present, &missing, direction),
                Ordering::Less
            );
        }
    }

    #[test]
    fn test_descending_reverses_present_values() {
        let low = SortValue::Number(Some(100.0));
        let high = SortValue::Number(Some(250.5));

        assert_eq!(
            compare_values(&low, &high, SortDirection::Ascending),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&low, &high, SortDirection::Descending),
            Ordering::Greater
        );
    }

    #[test]
    fn test_priority_descending_ranks_urgent_first() {
        let records = orders(
            r#"[{"id": "n", "priority": "normal"},
                {"id": "h", "priority": "high"},
                {"id": "u", "priority": "urgent"}]"#,
        );
        assert_eq!(
            sorted(&records, OrderSortKey::Priority, SortDirection::Descending),
            vec!["u", "h", "n"]
        );
    }

    #[test]
    fn test_unranked_priority_sorts_last() {
        let records = orders(
            r#"[{"id": "x", "priority": "stat"},
                {"id": "n", "priority": "normal"},
                {"id": "none"},
                {"id": "u", "priority": "urgent"}]"#,
        );
        assert_eq!(records[0].priority, Some(Priority::Other("stat".into())));

        assert_eq!(
            sorted(&records, OrderSortKey::Priority, SortDirection::Descending),
            vec!["u", "n", "x", "none"]
        );
        assert_eq!(
            sorted(&records, OrderSortKey::Priority, SortDirection::Ascending),
            vec!["n", "u", "x", "none"]
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let records = orders(
            r#"[{"id": "a", "status": "pending"},
                {"id": "b", "status": "approved"},
                {"id": "c", "status": "pending"},
                {"id": "d", "status": "approved"}]"#,
        );
        assert_eq!(
            sorted(&records, OrderSortKey::Status, SortDirection::Ascending),
            vec!["b", "d", "a", "c"]
        );
        assert_eq!(
            sorted(&records, OrderSortKey::Status, SortDirection::Descending),
            vec!["a", "c", "b", "d"]
        );
    }

    #[test]
    fn test_sort_is_idempotent() {
        let records = orders(
            r#"[{"id": "1", "totalAmount": 500},
                {"id": "2", "totalAmount": 120},
                {"id": "3"},
                {"id": "4", "totalAmount": 500}]"#,
        );
        let spec = SortSpec::descending(OrderSortKey::Amount);

        let mut once: Vec<&Order> = records.iter().collect();
        sort_records(&mut once, spec);
        let mut twice = once.clone();
        sort_records(&mut twice, spec);

        assert_eq!(ids(&once), vec!["1", "4", "2", "3"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_descending_is_reverse_of_ascending_for_distinct_keys() {
        let records = orders(
            r#"[{"id": "b", "createdAt": "2024-03-02T00:00:00Z"},
                {"id": "c", "createdAt": "2024-03-03T00:00:00Z"},
                {"id": "a", "createdAt": "2024-03-01T00:00:00Z"}]"#,
        );
        let ascending = sorted(&records, OrderSortKey::Date, SortDirection::Ascending);
        let mut descending = sorted(&records, OrderSortKey::Date, SortDirection::Descending);
        descending.reverse();

        assert_eq!(ascending, vec!["a", "b", "c"]);
        assert_eq!(ascending, descending);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let records = orders(
            r#"[{"id": "1", "patient": {"name": "ravi"}},
                {"id": "2", "patient": {"name": "Asha"}},
                {"id": "3", "patient": {"name": "meera"}}]"#,
        );
        assert_eq!(
            sorted(&records, OrderSortKey::PatientName, SortDirection::Ascending),
            vec!["2", "3", "1"]
        );
    }
}
