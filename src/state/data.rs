/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the catalog sources, the filter pipeline and the display bindings.
use std::ops::Deref;
use std::sync::Arc;

/// Represents a single plot in the gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Image path relative to the gallery directory (e.g., "mjj_2tag.png")
    pub name: String,
    /// An `.eps` sibling exists
    pub has_eps: bool,
    /// A `.pdf` sibling exists
    pub has_pdf: bool,
    /// A `.root` sibling exists, so the plot opens in the ROOT viewer
    pub has_root: bool,
}

impl Entry {
    pub fn new(name: impl Into<String>, has_eps: bool, has_pdf: bool, has_root: bool) -> Self {
        Self {
            name: name.into(),
            has_eps,
            has_pdf,
            has_root,
        }
    }
}

/// The full ordered set of entries for a session.
///
/// Built once from a catalog file or a directory scan and never mutated
/// afterwards. Cloning is cheap: the entries live behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Arc<[Entry]>,
}

impl Catalog {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// The unfiltered view, sharing the catalog's storage
    pub fn view(&self) -> FilteredView {
        FilteredView {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deref for Catalog {
    type Target = [Entry];

    fn deref(&self) -> &[Entry] {
        &self.entries
    }
}

/// Ordered subsequence of a catalog matching the active query
#[derive(Debug, Clone)]
pub struct FilteredView {
    entries: Arc<[Entry]>,
}

impl FilteredView {
    /// True when this view is the catalog itself rather than a filtered copy
    pub fn is_full_view_of(&self, catalog: &Catalog) -> bool {
        Arc::ptr_eq(&self.entries, &catalog.entries)
    }
}

impl Default for FilteredView {
    fn default() -> Self {
        Self {
            entries: Arc::from(Vec::new()),
        }
    }
}

impl FromIterator<Entry> for FilteredView {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Deref for FilteredView {
    type Target = [Entry];

    fn deref(&self) -> &[Entry] {
        &self.entries
    }
}
