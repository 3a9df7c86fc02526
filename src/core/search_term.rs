// GroupScout - core/search_term.rs
//
// Validation of user-typed search terms and recognition of template
// variable references.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::util::constants::MAX_LOG_GROUP_NAME_LENGTH;
use regex::Regex;
use std::sync::OnceLock;

/// Characters the remote service accepts in a log group name.
const LOG_GROUP_NAME_PATTERN: &str = r"^[.\-_/#A-Za-z0-9]+$";

/// `$var`, `${var}`, `${var:format}` and `[[var]]` references.
const TEMPLATE_VARIABLE_PATTERN: &str =
    r"^(?:\$[A-Za-z_][A-Za-z0-9_]*|\$\{[A-Za-z_][A-Za-z0-9_]*(?::[^}]+)?\}|\[\[[A-Za-z_][A-Za-z0-9_]*\]\])$";

fn log_group_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LOG_GROUP_NAME_PATTERN).expect("static pattern compiles"))
}

fn template_variable_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TEMPLATE_VARIABLE_PATTERN).expect("static pattern compiles"))
}

/// Returns true if `term` may be sent to the remote service as a name prefix.
///
/// Empty terms and terms containing anything outside letters, digits and
/// `. - _ / #` are rejected. A rejected term usually means the user is
/// half-way through typing a template variable such as `$env`.
pub fn is_valid_search_term(term: &str) -> bool {
    term.len() <= MAX_LOG_GROUP_NAME_LENGTH && log_group_name_regex().is_match(term)
}

/// Returns true if `name` is a complete, well-formed log group name.
pub fn is_valid_log_group_name(name: &str) -> bool {
    is_valid_search_term(name)
}

/// Returns true if `name` is a template variable reference rather than a
/// concrete log group name.
pub fn is_template_variable(name: &str) -> bool {
    template_variable_regex().is_match(name)
}
