// treegen/src/tree.rs

use log::warn;
use serde::Serialize;
use std::{
    fs,
    path::Path,
};

/// Classification of a directory entry, used for styling and recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One rendered line of the text tree. Lines are immutable records appended
/// during the walk and joined only when a full string is needed, so the
/// builder can be tested by inspecting the sequence directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    /// Accumulated guide prefix inherited from all ancestor levels.
    pub indent: String,
    /// Whether this entry was the last item in its parent's listing.
    pub last: bool,
    pub name: String,
    pub kind: EntryKind,
}

impl TreeLine {
    pub fn glyph(&self) -> &'static str {
        if self.last { "└── " } else { "├── " }
    }

    /// The line with no styling markers, safe for clipboard export.
    pub fn plain(&self) -> String {
        format!("{}{}{}", self.indent, self.glyph(), self.name)
    }
}

/// A non-root node of the structured tree. A node is a directory iff it
/// carries a `children` field; an unreadable-but-listable directory keeps an
/// empty list so the invariant holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DirNode>>,
}

/// Root of the structured tree. Carries the resolved input path instead of a
/// name; always present, even when every child walk fails.
#[derive(Debug, Clone, Serialize)]
pub struct DirTreeRoot {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub children: Vec<DirNode>,
}

/// Both representations of one traversal, produced in lock-step so they
/// always describe the identical set of entries in the identical order.
#[derive(Debug, Clone)]
pub struct RenderedTrees {
    pub lines: Vec<TreeLine>,
    pub root: DirTreeRoot,
}

/// Walk `root_path` depth-first in platform listing order and render both
/// trees in a single pass. The caller guarantees the path is a directory;
/// failures below the root are isolated per node and never abort the walk.
pub fn build(root_path: &Path) -> RenderedTrees {
    let mut lines = Vec::new();
    let mut children = Vec::new();
    if let Some(entries) = list(root_path) {
        walk(&entries, "", &mut lines, &mut children);
    }
    RenderedTrees {
        lines,
        root: DirTreeRoot {
            path: root_path.to_string_lossy().into_owned(),
            kind: "directory",
            children,
        },
    }
}

/// List a directory in whatever order the platform returns. No sorting is
/// performed; raw filesystem order is part of the output contract.
/// Returns None when the listing itself fails, so the caller can omit the
/// directory from both representations entirely.
fn list(dir: &Path) -> Option<Vec<fs::DirEntry>> {
    let rd = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            warn!("skipping unreadable directory {}: {}", dir.display(), e);
            return None;
        }
    };
    let entries = rd
        .filter_map(|e| match e {
            Ok(dent) => Some(dent),
            Err(e) => {
                warn!("skipping unreadable entry under {}: {}", dir.display(), e);
                None
            }
        })
        .collect();
    Some(entries)
}

/// Pre-order over one directory's listing: for each entry, append its text
/// line and its structured node in the same iteration, recursing into
/// subdirectories before moving to the next sibling.
fn walk(
    entries: &[fs::DirEntry],
    indent: &str,
    lines: &mut Vec<TreeLine>,
    siblings: &mut Vec<DirNode>,
) {
    let count = entries.len();
    for (idx, entry) in entries.iter().enumerate() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        // Follow symlinks when classifying. An unstatable entry is
        // dropped from both trees.
        let is_dir = match fs::metadata(&path) {
            Ok(meta) => meta.is_dir(),
            Err(e) => {
                warn!("skipping unstatable entry {}: {}", path.display(), e);
                continue;
            }
        };

        // `last` reflects position in the listing, not in the rendered
        // output, so a skipped later sibling does not change the glyph.
        let last = idx + 1 == count;

        if is_dir {
            // Probe the listing before emitting anything: a directory we
            // cannot list is omitted entirely, not rendered half-way.
            let Some(child_entries) = list(&path) else {
                continue;
            };
            lines.push(TreeLine {
                indent: indent.to_string(),
                last,
                name: name.clone(),
                kind: EntryKind::Directory,
            });
            let next_indent = format!("{indent}{}", if last { "    " } else { "│   " });
            let mut kids = Vec::new();
            walk(&child_entries, &next_indent, lines, &mut kids);
            siblings.push(DirNode { name, children: Some(kids) });
        } else {
            lines.push(TreeLine {
                indent: indent.to_string(),
                last,
                name: name.clone(),
                kind: EntryKind::File,
            });
            siblings.push(DirNode { name, children: None });
        }
    }
}

/* ================================== Tests ================================== */
