//! Command-line interface for generating synthetic motif graphs.
//!
//! The `generate` command assembles one graph from a basis and a list of
//! motifs and renders it as JSON or as an edge list.

mod commands;

pub use commands::{
    Cli, CliError, Command, EdgePolicy, GenerateCommand, GeneratedGraph, GraphDocument,
    OutputFormat, emit, render, run_cli,
};

#[cfg(test)]
mod tests;
