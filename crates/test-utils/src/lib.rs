//! Shared helpers for tests across the workspace.
//!
//! - [`extract_cursor`] turns `"{ us*er }"` into text plus a cursor position
//! - [`assertions`] formats results for `insta` snapshots
//! - [`TempProject`] lays out an on-disk project with a `.graphqlrc.yml`

pub mod assertions;
mod cursor;
mod fixtures;

pub use cursor::{extract_cursor, CURSOR_MARKER};
pub use fixtures::TempProject;
