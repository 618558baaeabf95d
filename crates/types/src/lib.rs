//! Foundation types for GraphQL language tooling.
//!
//! This crate provides shared types used across the parser, IDE and cache
//! crates. It has zero external dependencies, making it suitable as a
//! foundation layer.
//!
//! # Type Categories
//!
//! - **Position types**: [`Position`], [`Range`], [`OffsetRange`]
//! - **Offset conversion**: [`LineIndex`]
//! - **Severity types**: [`DiagnosticSeverity`]

mod line_index;
mod position;
mod severity;

pub use line_index::LineIndex;
pub use position::{OffsetRange, Position, Range};
pub use severity::DiagnosticSeverity;
