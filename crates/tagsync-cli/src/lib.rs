//! Command-line driver for tag reconciliation passes.

pub mod cli;
pub mod commands;
pub mod config;
pub mod exit;
pub mod observability;
pub mod output;
