//! Filter, sort, and pagination over flat rows for on-screen browsing.
//!
//! Operates purely on [`FlatRow`] slices; document generation never goes
//! through here.

use core::cmp::Ordering;

use smallvec::SmallVec;

use crate::record::{FieldValue, FlatRow};

/// Selectable page sizes.
pub const PAGE_SIZES: [usize; 4] = [5, 10, 20, 50];

/// Page size used when a requested size is not selectable.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// True when any field's string form contains the query, case-insensitively.
///
/// An empty query matches every row.
pub fn matches_query(row: &FlatRow, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    row.iter()
        .any(|(_, value)| value.display_string().to_lowercase().contains(&needle))
}

/// Filter rows by free-text query.
pub fn filter_rows<'a>(rows: &'a [FlatRow], query: &str) -> Vec<&'a FlatRow> {
    rows.iter().filter(|row| matches_query(row, query)).collect()
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn flip(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Single-key sort state with click-to-toggle semantics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SortState {
    key: Option<String>,
    direction: SortDirection,
}

impl SortState {
    /// Select a sort key. Re-selecting the current key flips direction;
    /// selecting a new key resets to ascending.
    pub fn toggle(&mut self, key: &str) {
        if self.key.as_deref() == Some(key) {
            self.direction = self.direction.flip();
        } else {
            self.key = Some(key.to_string());
            self.direction = SortDirection::Ascending;
        }
    }

    /// Current key, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Current direction.
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Sort the row set in place according to the current state.
    pub fn apply(&self, rows: &mut [&FlatRow]) {
        let Some(key) = self.key.as_deref() else {
            return;
        };
        rows.sort_by(|a, b| {
            let ord = compare_field(a.get(key), b.get(key));
            match self.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }
}

/// Natural ordering by runtime type: numbers numerically, everything else by
/// string form. Missing values order after present ones.
fn compare_field(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.display_string().cmp(&b.display_string()),
        },
    }
}

/// 1-indexed fixed-size pager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    pub page_size: usize,
    pub page: usize,
}

impl Pager {
    /// Pager at page 1. Sizes outside [`PAGE_SIZES`] fall back to
    /// [`DEFAULT_PAGE_SIZE`].
    pub fn new(page_size: usize) -> Self {
        let page_size = if PAGE_SIZES.contains(&page_size) {
            page_size
        } else {
            DEFAULT_PAGE_SIZE
        };
        Self { page_size, page: 1 }
    }

    /// Total pages for `len` rows; at least 1.
    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// The current page's slice, clamped to the row set.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let page = self.page.clamp(1, self.page_count(rows.len()));
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(rows.len());
        if start >= rows.len() {
            &[]
        } else {
            &rows[start..end]
        }
    }
}

/// One entry in the rendered page-navigation strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Page-navigation window: first page, last page, current page ±1, with a
/// single ellipsis per gap.
pub fn page_window(current: usize, total: usize) -> SmallVec<[PageItem; 9]> {
    let mut items = SmallVec::new();
    if total == 0 {
        return items;
    }
    let current = current.clamp(1, total);
    let mut gap_open = false;
    for page in 1..=total {
        let shown = page == 1 || page == total || page.abs_diff(current) <= 1;
        if shown {
            items.push(PageItem::Page(page));
            gap_open = false;
        } else if !gap_open {
            items.push(PageItem::Ellipsis);
            gap_open = true;
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_row(name: &str) -> FlatRow {
        let mut row = FlatRow::new();
        row.insert("name", name);
        row
    }

    #[test]
    fn free_text_filter_is_case_insensitive_substring() {
        let rows = [named_row("Juan Dela Cruz"), named_row("Maria Santos")];
        let hits = filter_rows(&rows, "juan");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text("name"), Some("Juan Dela Cruz"));
        assert_eq!(filter_rows(&rows, "").len(), 2);
    }

    #[test]
    fn sort_toggle_flips_direction_on_same_key() {
        let a = named_row("Ana");
        let b = named_row("Ben");
        let c = named_row("Carla");
        let rows = [b.clone(), c.clone(), a.clone()];
        let mut refs: Vec<&FlatRow> = rows.iter().collect();

        let mut sort = SortState::default();
        sort.toggle("name");
        sort.apply(&mut refs);
        assert_eq!(refs[0].text("name"), Some("Ana"));

        sort.toggle("name");
        assert_eq!(sort.direction(), SortDirection::Descending);
        sort.apply(&mut refs);
        assert_eq!(refs[0].text("name"), Some("Carla"));

        sort.toggle("other");
        assert_eq!(sort.direction(), SortDirection::Ascending);
    }

    #[test]
    fn numeric_fields_sort_numerically() {
        let mut r1 = FlatRow::new();
        r1.insert("age", 9i64);
        let mut r2 = FlatRow::new();
        r2.insert("age", 10i64);
        let rows = [r2.clone(), r1.clone()];
        let mut refs: Vec<&FlatRow> = rows.iter().collect();
        let mut sort = SortState::default();
        sort.toggle("age");
        sort.apply(&mut refs);
        // Lexicographic order would put "10" before "9".
        assert_eq!(refs[0].number("age"), Some(9.0));
    }

    #[test]
    fn pager_slices_one_indexed_pages() {
        let rows: Vec<usize> = (0..23).collect();
        let mut pager = Pager::new(10);
        assert_eq!(pager.page_count(rows.len()), 3);
        assert_eq!(pager.slice(&rows), &rows[0..10]);
        pager.page = 3;
        assert_eq!(pager.slice(&rows), &rows[20..23]);
        pager.page = 99;
        assert_eq!(pager.slice(&rows), &rows[20..23]);
    }

    #[test]
    fn unselectable_page_sizes_fall_back_to_the_default() {
        assert_eq!(Pager::new(7).page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(Pager::new(0).page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(Pager::new(50).page_size, 50);
    }

    #[test]
    fn page_window_keeps_edges_and_neighbors_with_ellipses() {
        let window = page_window(5, 10);
        assert_eq!(
            window.as_slice(),
            [
                PageItem::Page(1),
                PageItem::Ellipsis,
                PageItem::Page(4),
                PageItem::Page(5),
                PageItem::Page(6),
                PageItem::Ellipsis,
                PageItem::Page(10),
            ]
        );
        assert_eq!(
            page_window(1, 3).as_slice(),
            [PageItem::Page(1), PageItem::Page(2), PageItem::Page(3)]
        );
        assert!(page_window(1, 0).is_empty());
    }
}
