//! Command-line interface for the folio binary

pub mod args;
pub mod commands;
