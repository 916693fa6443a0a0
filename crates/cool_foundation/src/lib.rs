//! Source spans and error types shared by the Cool grammar crates.
//!
//! This crate provides:
//! - [`Span`] and [`Point`] - Byte ranges and row/column positions in source text
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod span;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use span::{Point, Span};
