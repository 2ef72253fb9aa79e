//! Core application module
//!
//! This module contains:
//! - The command line entry point and subcommands

pub mod app;
