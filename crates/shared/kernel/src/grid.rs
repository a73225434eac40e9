//! Grid engine shared by every manager: column visibility, search, sort and pagination over
//! any [`GridRow`].
//!
//! Pipeline: visible columns, then search (over visible cells), then sort, then paginate.

use crate::domain::constants::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use crate::domain::grid::{Column, GridRow, GridStyle, SortSpec};
use crate::prefs::GridPreferences;
use std::cmp::Ordering;

/// Why a grid page has no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The list itself is empty.
    NoRecords,
    /// Rows exist but none matches the search.
    NoMatches,
}

/// User-controlled grid state. Everything but `search` and `page` is persisted per grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    pub search: Option<String>,
    pub sort: Option<SortSpec>,
    pub page: usize,
    pub page_size: usize,
    /// `None` shows every declared column.
    pub visible: Option<Vec<String>>,
}

impl Default for GridState {
    fn default() -> Self {
        Self { search: None, sort: None, page: 1, page_size: DEFAULT_PAGE_SIZE, visible: None }
    }
}

impl GridState {
    #[must_use]
    pub fn from_preferences(prefs: &GridPreferences) -> Self {
        Self {
            sort: prefs.sort.clone(),
            page_size: prefs.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            visible: prefs.visible_columns.clone(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn to_preferences(&self) -> GridPreferences {
        GridPreferences {
            visible_columns: self.visible.clone(),
            sort: self.sort.clone(),
            page_size: Some(self.page_size),
        }
    }
}

/// One rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    pub columns: Vec<Column>,
    pub row_ids: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows before search.
    pub total: usize,
    /// Rows after search.
    pub matched: usize,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub style: GridStyle,
    pub empty: Option<EmptyReason>,
}

impl GridView {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text by row index and column key.
    #[must_use]
    pub fn cell(&self, row: usize, key: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c.key == key)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Every value of one column on this page.
    #[must_use]
    pub fn column_values(&self, key: &str) -> Vec<&str> {
        (0..self.rows.len()).filter_map(|i| self.cell(i, key)).collect()
    }
}

/// Falls back to the default for sizes outside [`PAGE_SIZE_OPTIONS`].
#[must_use]
pub fn normalize_page_size(size: usize) -> usize {
    if PAGE_SIZE_OPTIONS.contains(&size) { size } else { DEFAULT_PAGE_SIZE }
}

#[must_use]
pub const fn page_count(rows: usize, page_size: usize) -> usize {
    if rows == 0 || page_size == 0 { 1 } else { rows.div_ceil(page_size) }
}

/// Visible columns in declaration order. Unknown keys are ignored; at least one column stays.
#[must_use]
pub fn visible_columns<T: GridRow>(visible: Option<&[String]>) -> Vec<Column> {
    let all = T::columns();
    let Some(keys) = visible else {
        return all.to_vec();
    };

    let selected: Vec<Column> =
        all.iter().filter(|c| keys.iter().any(|k| k == c.key)).copied().collect();
    if selected.is_empty() { all.iter().take(1).copied().collect() } else { selected }
}

/// Runs the pipeline over `rows`.
#[must_use]
pub fn apply<T: GridRow>(rows: &[T], state: &GridState) -> GridView {
    let columns = visible_columns::<T>(state.visible.as_deref());
    let needle = state
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<(String, Vec<String>)> = rows
        .iter()
        .map(|row| {
            let cells = columns.iter().map(|c| row.cell(c.key).unwrap_or_default()).collect();
            (row.row_id(), cells)
        })
        .filter(|(_, cells): &(String, Vec<String>)| {
            needle.as_ref().is_none_or(|n| cells.iter().any(|cell| cell.to_lowercase().contains(n)))
        })
        .collect();

    if let Some(sort) = &state.sort
        && let Some(index) = columns.iter().position(|c| c.key == sort.column && c.sortable)
    {
        matched.sort_by(|(_, a), (_, b)| {
            let ord = compare_text(&a[index], &b[index]);
            if sort.descending { ord.reverse() } else { ord }
        });
    }

    let page_size = normalize_page_size(state.page_size);
    let matched_len = matched.len();
    let count = page_count(matched_len, page_size);
    let page = state.page.clamp(1, count);

    let (row_ids, page_rows): (Vec<_>, Vec<_>) =
        matched.into_iter().skip((page - 1) * page_size).take(page_size).unzip();

    let empty = match (rows.is_empty(), matched_len) {
        (true, _) => Some(EmptyReason::NoRecords),
        (false, 0) => Some(EmptyReason::NoMatches),
        _ => None,
    };

    GridView {
        columns,
        row_ids,
        rows: page_rows,
        total: rows.len(),
        matched: matched_len,
        page,
        page_count: count,
        page_size,
        style: GridStyle::default(),
        empty,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, GridRow)]
    #[grid(id = "id")]
    struct Row {
        id: String,
        #[grid(label = "Name", sortable)]
        name: String,
        #[grid(label = "City")]
        city: String,
    }

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| Row {
                id: format!("r{i}"),
                name: format!("Member {i:02}"),
                city: if i % 2 == 0 { "Rotterdam" } else { "Antwerp" }.to_owned(),
            })
            .collect()
    }

    #[test]
    fn search_runs_before_pagination() {
        let state = GridState { search: Some("rotterdam".into()), page_size: 10, ..GridState::default() };
        let view = apply(&rows(30), &state);

        assert_eq!(view.total, 30);
        assert_eq!(view.matched, 15);
        assert_eq!(view.page_count, 2);
        assert_eq!(view.rows.len(), 10);
        assert!(view.column_values("city").iter().all(|c| *c == "Rotterdam"));
    }

    #[test]
    fn hidden_columns_are_not_searched() {
        let state = GridState {
            search: Some("antwerp".into()),
            visible: Some(vec!["name".into()]),
            ..GridState::default()
        };
        let view = apply(&rows(4), &state);
        assert_eq!(view.empty, Some(EmptyReason::NoMatches));
        assert_eq!(view.columns.len(), 1);
    }

    #[test]
    fn sorting_ignores_unsortable_columns() {
        let desc = GridState { sort: SortSpec::parse("name:desc"), ..GridState::default() };
        let view = apply(&rows(3), &desc);
        assert_eq!(view.row_ids, ["r2", "r1", "r0"]);

        let city = GridState { sort: SortSpec::parse("city:desc"), ..GridState::default() };
        assert_eq!(apply(&rows(3), &city).row_ids, ["r0", "r1", "r2"]);
    }

    #[test]
    fn page_is_clamped_and_size_normalized() {
        let state = GridState { page: 99, page_size: 7, ..GridState::default() };
        let view = apply(&rows(25), &state);
        assert_eq!(view.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(view.page, 3);
        assert_eq!(view.rows.len(), 5);
    }

    #[test]
    fn empty_list_has_one_page() {
        let view = apply::<Row>(&[], &GridState { page: 0, ..GridState::default() });
        assert_eq!(view.empty, Some(EmptyReason::NoRecords));
        assert_eq!((view.page, view.page_count), (1, 1));
    }

    #[test]
    fn unknown_visible_keys_keep_the_first_column() {
        let cols = visible_columns::<Row>(Some(&["nope".to_owned()]));
        assert_eq!(cols.iter().map(|c| c.key).collect::<Vec<_>>(), ["name"]);
    }

    #[test]
    fn preferences_round_trip_without_search() {
        let state = GridState {
            search: Some("x".into()),
            sort: SortSpec::parse("name"),
            page: 3,
            page_size: 50,
            visible: Some(vec!["city".into()]),
        };
        let restored = GridState::from_preferences(&state.to_preferences());
        assert_eq!(restored.search, None);
        assert_eq!(restored.page, 1);
        assert_eq!(restored.page_size, 50);
        assert_eq!(restored.sort, state.sort);
        assert_eq!(restored.visible, state.visible);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pages_partition_the_matched_rows(n in 0usize..120, size_idx in 0usize..4, page in 0usize..20) {
                let page_size = PAGE_SIZE_OPTIONS[size_idx];
                let data = rows(n);
                let view = apply(&data, &GridState { page, page_size, ..GridState::default() });

                prop_assert!(view.page >= 1 && view.page <= view.page_count);
                prop_assert_eq!(view.page_count, page_count(n, page_size));
                prop_assert!(view.rows.len() <= page_size);

                let seen: usize = (1..=view.page_count)
                    .map(|p| apply(&data, &GridState { page: p, page_size, ..GridState::default() }).rows.len())
                    .sum();
                prop_assert_eq!(seen, n);
            }

            #[test]
            fn search_results_contain_the_needle(needle in "[a-z0-9 ]{0,4}") {
                let data = rows(40);
                let view = apply(&data, &GridState { search: Some(needle.clone()), page_size: 100, ..GridState::default() });
                let n = needle.trim().to_lowercase();
                for row in &view.rows {
                    prop_assert!(n.is_empty() || row.iter().any(|c| c.to_lowercase().contains(&n)));
                }
            }
        }
    }
}
