//! Client-side search, categorical filtering and summary statistics.
//!
//! A record passes when the search term is empty or occurs (case-insensitive)
//! in one of its searchable fields, AND every selected facet equals the
//! record's value for that facet. Aggregates are computed over the filtered
//! view only; facet options over the whole collection.

use std::collections::{BTreeMap, BTreeSet};

/// A categorical column that can be used as a filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Facet {
    pub key: &'static str,
    pub label: &'static str,
}

pub trait Filterable {
    /// Free-text fields the search box looks into.
    fn search_fields(&self) -> Vec<&str>;

    /// Display value of a categorical field, `None` for unknown keys.
    fn facet_value(&self, key: &str) -> Option<String>;

    /// Monetary value summed by the list page, if the record has one.
    fn amount(&self) -> Option<f64> {
        None
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterState {
    search: String,
    selections: BTreeMap<&'static str, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// An empty value means "no constraint" and removes the selection.
    pub fn select(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.selections.remove(key);
        } else {
            self.selections.insert(key, value);
        }
    }

    pub fn selection(&self, key: &str) -> Option<&str> {
        self.selections.get(key).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.search.clear();
        self.selections.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || !self.selections.is_empty()
    }

    pub fn matches<R: Filterable>(&self, record: &R) -> bool {
        let term = self.search.trim().to_lowercase();
        let search_ok = term.is_empty()
            || record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&term));

        search_ok
            && self
                .selections
                .iter()
                .all(|(key, wanted)| record.facet_value(key).as_deref() == Some(wanted.as_str()))
    }

    /// Filtered view, in collection order.
    pub fn apply<'a, R: Filterable>(&self, items: &'a [R]) -> Vec<&'a R> {
        items.iter().filter(|record| self.matches(*record)).collect()
    }
}

/// Distinct values of a facet across the unfiltered collection, sorted.
pub fn distinct_values<R: Filterable>(items: &[R], key: &str) -> Vec<String> {
    items
        .iter()
        .filter_map(|record| record.facet_value(key))
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aggregates {
    pub count: usize,
    pub sum: f64,
    pub average: f64,
}

impl Aggregates {
    pub fn compute<R: Filterable>(view: &[&R]) -> Self {
        let count = view.len();
        let sum: f64 = view.iter().filter_map(|record| record.amount()).sum();
        let average = if count > 0 { sum / count as f64 } else { 0.0 };
        Self {
            count,
            sum,
            average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        title: String,
        note: String,
        category: String,
        status: String,
        amount: f64,
    }

    fn row(title: &str, category: &str, status: &str, amount: f64) -> Row {
        Row {
            title: title.to_string(),
            note: String::new(),
            category: category.to_string(),
            status: status.to_string(),
            amount,
        }
    }

    impl Filterable for Row {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.title.as_str(), self.note.as_str()]
        }

        fn facet_value(&self, key: &str) -> Option<String> {
            match key {
                "category" => Some(self.category.clone()),
                "status" => Some(self.status.clone()),
                _ => None,
            }
        }

        fn amount(&self) -> Option<f64> {
            Some(self.amount)
        }
    }

    #[test]
    fn category_filter_narrows_view_and_sum() {
        let rows = vec![
            row("Vacinas", "Saúde", "paid", 100.0),
            row("Merenda", "Educação", "paid", 50.0),
        ];
        let mut state = FilterState::new();
        state.select("category", "Saúde");

        let view = state.apply(&rows);
        let stats = Aggregates::compute(&view);
        assert_eq!(view.len(), 1);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.sum, 100.0);
        assert_eq!(stats.average, 100.0);
    }

    #[test]
    fn empty_collection_has_zero_average() {
        let rows: Vec<Row> = Vec::new();
        let mut state = FilterState::new();
        state.set_search("anything");
        state.select("status", "paid");

        let view = state.apply(&rows);
        let stats = Aggregates::compute(&view);
        assert!(view.is_empty());
        assert_eq!(stats, Aggregates::default());
        assert!(!stats.average.is_nan());
    }

    #[test]
    fn search_is_case_insensitive_substring_over_any_field() {
        let mut with_note = row("Paving", "Obras", "paid", 10.0);
        with_note.note = "Rua das FLORES".to_string();
        let rows = vec![row("Escola Municipal", "Educação", "paid", 1.0), with_note];

        let mut state = FilterState::new();
        state.set_search("  flores ");
        assert_eq!(state.apply(&rows), vec![&rows[1]]);

        state.set_search("ESCOLA");
        assert_eq!(state.apply(&rows), vec![&rows[0]]);
    }

    #[test]
    fn unmatched_search_yields_empty_view() {
        let rows = vec![row("Vacinas", "Saúde", "paid", 100.0)];
        let mut state = FilterState::new();
        state.set_search("zzz");
        assert!(state.apply(&rows).is_empty());
    }

    #[test]
    fn filters_are_conjunctive() {
        let rows = vec![
            row("a", "Saúde", "paid", 1.0),
            row("b", "Saúde", "cancelled", 2.0),
            row("c", "Educação", "paid", 4.0),
        ];
        let mut state = FilterState::new();
        state.select("category", "Saúde");
        state.select("status", "paid");
        assert_eq!(state.apply(&rows), vec![&rows[0]]);
    }

    #[test]
    fn empty_selection_removes_constraint() {
        let mut state = FilterState::new();
        state.select("category", "Saúde");
        state.select("category", "");
        assert_eq!(state.selection("category"), None);
        assert!(!state.is_active());
    }

    #[test]
    fn unknown_facet_key_never_matches() {
        let rows = vec![row("a", "Saúde", "paid", 1.0)];
        let mut state = FilterState::new();
        state.select("department", "Saúde");
        assert!(state.apply(&rows).is_empty());
    }

    #[test]
    fn clear_filters_is_idempotent() {
        let mut state = FilterState::new();
        state.set_search("x");
        state.select("status", "paid");

        state.clear();
        let once = state.clone();
        state.clear();
        assert_eq!(state, once);
        assert_eq!(state, FilterState::new());
    }

    #[test]
    fn distinct_values_are_sorted_and_unique() {
        let rows = vec![
            row("a", "Saúde", "paid", 1.0),
            row("b", "Educação", "paid", 1.0),
            row("c", "Saúde", "paid", 1.0),
        ];
        assert_eq!(distinct_values(&rows, "category"), vec!["Educação", "Saúde"]);
        assert!(distinct_values(&rows, "missing").is_empty());
    }

    fn arb_row() -> impl Strategy<Value = Row> {
        (
            "[a-cA-C ]{0,6}",
            prop::sample::select(vec!["Saúde", "Educação", "Obras"]),
            prop::sample::select(vec!["paid", "cancelled"]),
            0u32..10_000,
        )
            .prop_map(|(title, category, status, cents)| {
                row(&title, category, status, f64::from(cents) / 100.0)
            })
    }

    fn arb_state() -> impl Strategy<Value = FilterState> {
        (
            "[a-c]{0,2}",
            prop::option::of(prop::sample::select(vec!["Saúde", "Educação", "Obras"])),
            prop::option::of(prop::sample::select(vec!["paid", "cancelled"])),
        )
            .prop_map(|(search, category, status)| {
                let mut state = FilterState::new();
                state.set_search(search);
                state.select("category", category.unwrap_or(""));
                state.select("status", status.unwrap_or(""));
                state
            })
    }

    proptest! {
        #[test]
        fn view_is_ordered_subset_of_matching_records(
            rows in prop::collection::vec(arb_row(), 0..30),
            state in arb_state(),
        ) {
            let view = state.apply(&rows);
            let expected: Vec<&Row> = rows.iter().filter(|r| state.matches(*r)).collect();
            prop_assert_eq!(&view, &expected);

            let mut cursor = 0;
            for picked in &view {
                let pos = rows[cursor..].iter().position(|r| std::ptr::eq(r, *picked));
                prop_assert!(pos.is_some());
                cursor += pos.unwrap_or(0) + 1;
            }
        }

        #[test]
        fn aggregates_match_view(
            rows in prop::collection::vec(arb_row(), 0..30),
            state in arb_state(),
        ) {
            let view = state.apply(&rows);
            let stats = Aggregates::compute(&view);
            let sum: f64 = view.iter().map(|r| r.amount).sum();
            prop_assert_eq!(stats.count, view.len());
            prop_assert!((stats.sum - sum).abs() < 1e-9);
            if view.is_empty() {
                prop_assert_eq!(stats.average, 0.0);
            } else {
                prop_assert!((stats.average - sum / view.len() as f64).abs() < 1e-9);
            }
        }

        #[test]
        fn options_do_not_depend_on_selection(
            rows in prop::collection::vec(arb_row(), 0..30),
            state in arb_state(),
        ) {
            let before = distinct_values(&rows, "status");
            let _ = state.apply(&rows);
            prop_assert_eq!(distinct_values(&rows, "status"), before);
        }
    }
}
