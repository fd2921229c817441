use log::{debug, warn};
use regex::RegexBuilder;

use crate::state::data::{Catalog, FilteredView};

/// Queries shorter than this (in characters) show the whole catalog
pub const MIN_QUERY_LEN: usize = 3;

/// Select the catalog entries whose name matches `query`.
///
/// The query is a case-insensitive regular expression and any match inside
/// the name counts. Catalog order is kept. A query that does not compile
/// leaves `previous` in place so the gallery keeps showing the last good
/// result.
pub fn filter(query: &str, catalog: &Catalog, previous: &FilteredView) -> FilteredView {
    if query.chars().count() < MIN_QUERY_LEN {
        return catalog.view();
    }

    let pattern = match RegexBuilder::new(query).case_insensitive(true).build() {
        Ok(pattern) => pattern,
        Err(err) => {
            warn!("Ignoring query {:?}: {}", query, err);
            return previous.clone();
        }
    };

    let view: FilteredView = catalog
        .iter()
        .filter(|entry| pattern.is_match(&entry.name))
        .cloned()
        .collect();

    debug!("Query {:?} matched {} of {} entries", query, view.len(), catalog.len());
    view
}
