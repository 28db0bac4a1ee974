// treegen/src/session.rs

use anyhow::{
    Context,
    Result,
};
use crate::tree::{
    RenderedTrees,
    TreeLine,
};

/// Which representation is bound to the visible pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Tree,
    Structured,
}

/// A discrete scroll request, passed through to the terminal layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollStep {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

/// The closed set of inputs the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleView,
    CopyToClipboard,
    Scroll(ScrollStep),
}

/// Side effect requested by a state transition. The session itself performs
/// no I/O; the terminal layer executes these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Quit,
    Redraw,
    Copy(String),
    Scroll(ScrollStep),
}

/// One interactive run over an immutable pair of rendered trees. Created
/// once at startup; `current_view` is the only field that ever changes.
pub struct Session {
    lines: Vec<TreeLine>,
    json: String,
    root_path: String,
    version: &'static str,
    current_view: View,
}

impl Session {
    pub fn new(trees: RenderedTrees, version: &'static str) -> Result<Self> {
        let json = serde_json::to_string_pretty(&trees.root)
            .context("serializing structured tree")?;
        Ok(Self {
            lines: trees.lines,
            json,
            root_path: trees.root.path,
            version,
            current_view: View::Tree,
        })
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    pub fn lines(&self) -> &[TreeLine] {
        self.lines.as_slice()
    }

    /// The structured tree, serialized once with a 2-space indent.
    pub fn json(&self) -> &str {
        &self.json
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Line count of the representation currently on screen.
    pub fn content_height(&self) -> usize {
        match self.current_view {
            View::Tree => self.lines.len(),
            View::Structured => self.json.lines().count(),
        }
    }

    /// Single dispatch point for every command the UI can emit.
    pub fn apply(&mut self, cmd: Command) -> Effect {
        match cmd {
            Command::Quit => Effect::Quit,
            Command::ToggleView => {
                self.current_view = match self.current_view {
                    View::Tree => View::Structured,
                    View::Structured => View::Tree,
                };
                Effect::Redraw
            }
            Command::CopyToClipboard => Effect::Copy(self.copy_payload()),
            Command::Scroll(step) => Effect::Scroll(step),
        }
    }

    /// Serialize the current view for clipboard export: plain text for the
    /// tree (styling is display-only), indented JSON for the structured
    /// document, each followed by the attribution trailer.
    pub fn copy_payload(&self) -> String {
        let body = match self.current_view {
            View::Tree => {
                let plain: Vec<String> = self.lines.iter().map(TreeLine::plain).collect();
                plain.join("\n")
            }
            View::Structured => self.json.clone(),
        };
        format!("{body}\n\nMade with treegen@{}", self.version)
    }
}

/* ================================== Tests ================================== */
