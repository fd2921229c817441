/// State management module
///
/// This module handles all session state, including:
/// - Shared data structures (data.rs)
/// - Loading and scanning catalogs (catalog.rs)
/// - The session that drives filtering and rendering (session.rs)

pub mod catalog;
pub mod data;
pub mod session;
