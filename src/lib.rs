//! Command line tracker for daily water intake. Drinks are logged into a
//! small per-day ledger, progress is measured against a configurable daily
//! goal, and a background daemon periodically asks whether it's time for
//! another glass.
//!

pub mod cli;
pub mod daemon;
pub mod ledger;
pub mod prompt;
pub mod utils;
