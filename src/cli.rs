// treegen/src/cli.rs

use anyhow::{
    bail,
    Result,
};
use log::info;
use std::{
    env,
    path::{
        Path,
        PathBuf,
    },
};
use crate::{
    session::Session,
    tree,
    tui,
};

pub fn run_cli() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let root = resolve_root(args.get(1).map(|s| s.as_str()))?;

    info!("generating trees for {}", root.display());
    let trees = tree::build(&root);
    info!(
        "trees generated: {} lines, {} top-level nodes",
        trees.lines.len(),
        trees.root.children.len()
    );

    let session = Session::new(trees, env!("CARGO_PKG_VERSION"))?;
    tui::run(session)?;
    println!("Thanks for using treegen!");
    Ok(())
}

/// Validate the single positional argument before any tree building: it must
/// be present, exist, and be a directory. Canonicalized when possible so the
/// displayed and serialized root path is absolute.
fn resolve_root(arg: Option<&str>) -> Result<PathBuf> {
    let Some(input) = arg else {
        bail!("Usage: treegen <path>");
    };
    let path = Path::new(input);
    if !path.exists() {
        bail!("the provided path does not exist: {}", path.display());
    }
    if !path.is_dir() {
        bail!("the provided path is not a directory: {}", path.display());
    }
    Ok(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
}

/* ================================== Tests ================================== */
