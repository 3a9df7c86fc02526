// GroupScout - core/mod.rs
//
// Core business logic layer.
// Dependencies: util layer, regex, serde.
// Must NOT depend on: ui, platform, app, or any I/O.

pub mod debounce;
pub mod model;
pub mod search_term;
pub mod selection;
