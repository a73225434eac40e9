//! Row/column model shared by every grid.
//!
//! DTOs declare their columns with `#[derive(GridRow)]`; the kernel grid engine filters, sorts
//! and paginates any `GridRow` generically through the text returned by [`GridRow::cell`].

use bitflags::bitflags;
use chrono::{DateTime, Utc};

pub use ctn_derive::GridRow;

/// Column descriptor. `key` is the stable identifier used in preferences and `--sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
}

pub trait GridRow {
    /// Declared columns in display order.
    fn columns() -> &'static [Column];

    /// Stable row identity (selection, detail navigation).
    fn row_id(&self) -> String;

    /// Display text of a cell, `None` for unknown keys.
    fn cell(&self, key: &str) -> Option<String>;

    #[must_use]
    fn column(key: &str) -> Option<&'static Column> {
        Self::columns().iter().find(|c| c.key == key)
    }
}

/// Display text of a single cell value.
pub trait GridCell {
    fn cell_text(&self) -> String;
}

impl GridCell for String {
    fn cell_text(&self) -> String {
        self.clone()
    }
}

impl GridCell for bool {
    fn cell_text(&self) -> String {
        if *self { "Yes" } else { "No" }.to_owned()
    }
}

impl GridCell for DateTime<Utc> {
    fn cell_text(&self) -> String {
        self.format("%Y-%m-%d %H:%M").to_string()
    }
}

impl<T: GridCell> GridCell for Option<T> {
    fn cell_text(&self) -> String {
        self.as_ref().map(GridCell::cell_text).unwrap_or_default()
    }
}

impl<T: GridCell> GridCell for Vec<T> {
    fn cell_text(&self) -> String {
        self.iter().map(GridCell::cell_text).collect::<Vec<_>>().join(", ")
    }
}

/// Implements [`GridCell`] through `Display`.
#[macro_export]
macro_rules! grid_cell_display {
    ($($ty:ty),+ $(,)?) => {
        $(impl $crate::grid::GridCell for $ty {
            fn cell_text(&self) -> String {
                self.to_string()
            }
        })+
    };
}

grid_cell_display!(u32, u64, i64, usize);

bitflags! {
    /// Rendering options of a grid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GridStyle: u8 {
        const BORDERED = 1 << 0;
        const COLUMN_BORDERS = 1 << 1;
        const STRIPED = 1 << 2;
        const ROW_HIGHLIGHT = 1 << 3;
    }
}

impl Default for GridStyle {
    /// Every manager grid is bordered, column-bordered, striped and highlights rows.
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sort request: column key and direction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub column: String,
    #[serde(default)]
    pub descending: bool,
}

impl SortSpec {
    /// Parses `col` or `col:desc` / `col:asc`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (column, dir) = raw.split_once(':').unwrap_or((raw, "asc"));
        let column = column.trim();
        if column.is_empty() {
            return None;
        }
        let descending = match dir.trim().to_ascii_lowercase().as_str() {
            "asc" | "" => false,
            "desc" => true,
            _ => return None,
        };
        Some(Self { column: column.to_owned(), descending })
    }

    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        if self.descending { SortDirection::Desc } else { SortDirection::Asc }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(GridRow)]
    #[grid(id = "code")]
    #[allow(dead_code)]
    struct Country {
        code: String,
        #[grid(label = "Name", sortable)]
        display_name: String,
        #[grid(label = "Members")]
        member_count: u32,
        #[grid(label = "EU", key = "eu")]
        in_eu: bool,
    }

    #[test]
    fn derived_columns_follow_declaration() {
        let keys: Vec<_> = Country::columns().iter().map(|c| c.key).collect();
        assert_eq!(keys, ["displayName", "memberCount", "eu"]);
        assert!(Country::column("displayName").is_some_and(|c| c.sortable));
        assert!(Country::column("memberCount").is_some_and(|c| !c.sortable));
    }

    #[test]
    fn derived_cells_render_text() {
        let row = Country { code: "NL".into(), display_name: "Netherlands".into(), member_count: 12, in_eu: true };
        assert_eq!(row.row_id(), "NL");
        assert_eq!(row.cell("memberCount").as_deref(), Some("12"));
        assert_eq!(row.cell("eu").as_deref(), Some("Yes"));
        assert_eq!(row.cell("code"), None);
    }

    #[test]
    fn sort_spec_parses_direction() {
        assert_eq!(SortSpec::parse("legalName"), Some(SortSpec { column: "legalName".into(), descending: false }));
        assert_eq!(SortSpec::parse("createdAt:desc").map(|s| s.direction()), Some(SortDirection::Desc));
        assert_eq!(SortSpec::parse(":desc"), None);
        assert_eq!(SortSpec::parse("x:sideways"), None);
    }

    #[test]
    fn default_style_enables_everything() {
        let style = GridStyle::default();
        assert!(style.contains(GridStyle::STRIPED | GridStyle::BORDERED));
    }
}
