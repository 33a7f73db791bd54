//! pivotstream-core: shared types for the document-to-token pipeline.
//!
//! This crate holds what every reader needs: the error taxonomy, the
//! warning-carrying result wrapper, chapter markers, extraction options,
//! and the two pure normalizers (text and archive paths).

mod error;
mod marker;
mod options;
mod warning;

pub mod normalize;
pub mod path;

pub use error::*;
pub use marker::*;
pub use normalize::normalize;
pub use options::*;
pub use warning::*;
