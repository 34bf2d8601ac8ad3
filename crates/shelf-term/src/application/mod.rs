//! Application layer orchestrating the terminal interface.
//!
//! This module handles command-line parsing and the main UI loop, wiring
//! user input to the domain services.

pub mod cli;
pub mod ui;
