// src/main.rs

pub mod cli;
pub mod session;
pub mod tree;
pub mod tui;

use anyhow::Result;

fn main() -> Result<()> {
    cli::run_cli()
}
