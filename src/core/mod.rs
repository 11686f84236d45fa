//! Core types shared by every layer of the crate.
//!
//! At the moment this is the error model: [`ResolveError`] and the [`Result`] alias.

pub mod error;

pub use error::{ResolveError, Result};
