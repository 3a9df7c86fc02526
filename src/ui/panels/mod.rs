// GroupScout - ui/panels/mod.rs

pub mod log_groups;
pub mod notifications;
pub mod query_header;
