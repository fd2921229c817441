/// The filter / diff / render pipeline
///
/// Every function here is pure: it takes entries in and hands values back.
/// Applying the result to something visible is the session's job
/// (see `state::session`).
pub mod differ;
pub mod filter;
pub mod render;
