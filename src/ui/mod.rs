/// Display bindings
///
/// Each binding implements `Surface` for one way of showing cells:
/// - app.rs / grid.rs: the desktop window
/// - listing.rs: plain text for the terminal
/// - thumbnail.rs: cached thumbnails for the window's grid

pub mod app;
pub mod grid;
pub mod listing;
pub mod thumbnail;
