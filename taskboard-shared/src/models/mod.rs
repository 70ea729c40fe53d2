/// Database models
///
/// Each model owns its table's queries:
///
/// - `user`: registered accounts
/// - `task`: per-user task items
pub mod task;
pub mod user;
