// GroupScout - app/mod.rs
//
// Application layer: the log group search controller, its background search
// workers, notifications, and the owner-side query state.
// Dependencies: core layer.
// Must NOT depend on: ui, platform specifics.

pub mod controller;
pub mod notify;
pub mod search;
pub mod session;
pub mod source;
pub mod state;
