//! Pedant core library.
//!
//! This crate exposes programmatic APIs for checking that the dependencies
//! and plugins of a build descriptor are declared in a configured order.
//!
//! High-level modules:
//! - `ordering`: priority orderings and their compound, registry-built form.
//! - `matcher`: one-to-one matching of declared items against resolved ones.
//! - `diff`: line diffs rendered as side-by-side columns.
//! - `check`: the order rules and the snapshot runner.
//! - `models`: artifact coordinates and project snapshots.
//! - `config`: discovery and effective configuration resolution.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `output`: Human/JSON printers for check results.
//! - `errors`, `utils`: supporting types and helpers.
pub mod check;
pub mod cli;
pub mod config;
pub mod diff;
pub mod errors;
pub mod matcher;
pub mod models;
pub mod ordering;
pub mod output;
pub mod utils;
