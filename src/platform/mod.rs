// GroupScout - platform/mod.rs
//
// Platform abstraction layer: filesystem-backed configuration and the
// catalog-backed log group source.
// Dependencies: util, core models, the app::source trait, directories crate.
// Must NOT depend on: ui.

pub mod catalog;
pub mod config;
