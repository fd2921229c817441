/// The gallery session
///
/// A `Session` owns the catalog, the last rendered view and the display
/// surface. Each query event runs filter, diff and render in that order and
/// only touches the surface when the filtered view actually changed.
use std::time::Duration;

use log::{debug, info};

use super::data::{Catalog, FilteredView};
use crate::error::{GalleryError, Result};
use crate::gallery::differ::same_entries;
use crate::gallery::filter::filter;
use crate::gallery::render::{render, Cell};

/// The container cells are written into.
///
/// The session is its only writer.
pub trait Surface {
    /// Remove every cell currently shown
    fn clear(&mut self);
    /// Append cells after the ones already shown
    fn append(&mut self, cells: Vec<Cell>);
}

/// The text input that feeds queries to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryInput {
    /// Coalescing interval the event source applies before forwarding a query
    pub debounce: Option<Duration>,
}

impl QueryInput {
    pub fn new(debounce: Option<Duration>) -> Self {
        Self { debounce }
    }
}

/// A UI element looked up by id when the session starts
#[derive(Debug)]
pub struct Binding<T> {
    id: String,
    element: Option<T>,
}

impl<T> Binding<T> {
    pub fn lookup(id: impl Into<String>, element: Option<T>) -> Self {
        Self {
            id: id.into(),
            element,
        }
    }

    pub fn found(id: impl Into<String>, element: T) -> Self {
        Self::lookup(id, Some(element))
    }

    pub fn is_found(&self) -> bool {
        self.element.is_some()
    }

    fn require(self, missing: fn(String) -> GalleryError) -> Result<(String, T)> {
        match self.element {
            Some(element) => Ok((self.id, element)),
            None => Err(missing(self.id)),
        }
    }
}

/// What a query event did to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// Same view as before, surface untouched
    Unchanged,
    /// Surface replaced with this many cells
    Rendered(usize),
}

#[derive(Debug)]
pub struct Session<S> {
    catalog: Catalog,
    last_view: FilteredView,
    surface: S,
    input: QueryInput,
    input_id: String,
}

impl<S: Surface> Session<S> {
    /// Bind the catalog to a surface and an input, then render everything once.
    ///
    /// Both bindings must exist; there is nothing useful to do without them.
    pub fn start(
        catalog: Catalog,
        surface: Binding<S>,
        input: Binding<QueryInput>,
    ) -> Result<Self> {
        let (_, surface) = surface.require(GalleryError::MissingSurface)?;
        let (input_id, input) = input.require(GalleryError::MissingQueryInput)?;

        let mut session = Session {
            last_view: catalog.view(),
            catalog,
            surface,
            input,
            input_id,
        };
        let view = session.last_view.clone();
        session.show(view);
        info!(
            "Gallery started with {} entries, reading queries from `{}`",
            session.catalog.len(),
            session.input_id
        );
        Ok(session)
    }

    /// Handle one query event
    pub fn on_query(&mut self, query: &str) -> Update {
        let candidate = filter(query, &self.catalog, &self.last_view);
        if same_entries(&candidate, &self.last_view) {
            debug!("Query {:?} left the view unchanged", query);
            return Update::Unchanged;
        }

        let count = candidate.len();
        self.show(candidate);
        debug!("Contents have been refreshed with {} cells", count);
        Update::Rendered(count)
    }

    fn show(&mut self, view: FilteredView) {
        let cells = render(&view);
        self.surface.clear();
        self.surface.append(cells);
        self.last_view = view;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn last_view(&self) -> &FilteredView {
        &self.last_view
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn input(&self) -> &QueryInput {
        &self.input
    }

    /// Give the surface back, e.g. to write it out
    pub fn into_surface(self) -> S {
        self.surface
    }
}
