//! Bookshelf application library
//!
//! Book records, their presence validation, storage and test factory.

pub mod modules;

pub use modules::*;
