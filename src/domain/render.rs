//! Text views of a cursor tree
//!
//! The plain view is the diagnostic dump: a header naming the current node,
//! then one line per node in left, self, right order, indented once per
//! depth level, then a blank line. It is not meant to be parsed back.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{CursorTree, NodeId, Slot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// Indented in-order listing
    #[default]
    Plain,
    /// Box-drawing outline, children listed left then right
    Outline,
}

impl FromStr for RenderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(RenderStyle::Plain),
            "outline" => Ok(RenderStyle::Outline),
            other => Err(format!("unknown render style: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Repeated once per depth level
    pub indent: String,
    /// Shown instead of a label when there is no current node
    pub null_marker: String,
    pub header: String,
    pub style: RenderStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: "\t".into(),
            null_marker: "NULL".into(),
            header: "Tree".into(),
            style: RenderStyle::Plain,
        }
    }
}

fn header_line(options: &RenderOptions, current: &dyn Display) -> String {
    format!("{} (current node: {}):\n", options.header, current)
}

/// Render a tree, or the bare header with the absence marker when there is
/// no tree.
#[instrument(level = "trace", skip_all)]
pub fn render<T: Display>(tree: Option<&CursorTree<T>>, options: &RenderOptions) -> String {
    match tree {
        Some(tree) => match options.style {
            RenderStyle::Plain => render_plain(tree, options),
            RenderStyle::Outline => render_outline(tree, options),
        },
        None => {
            let mut out = header_line(options, &options.null_marker);
            out.push('\n');
            out
        }
    }
}

fn render_plain<T: Display>(tree: &CursorTree<T>, options: &RenderOptions) -> String {
    let mut out = header_line(options, tree.current_label());
    for (_, depth, node) in tree.iter_in_order() {
        out.push_str(&format!("{}{}\n", options.indent.repeat(depth), node.label()));
    }
    out.push('\n');
    out
}

fn render_outline<T: Display>(tree: &CursorTree<T>, options: &RenderOptions) -> String {
    let mut out = header_line(options, tree.current_label());
    out.push_str(&tree.to_outline().to_string());
    out.push('\n');
    out
}

impl<T: Display> CursorTree<T> {
    /// Plain view with default options.
    pub fn render(&self) -> String {
        render(Some(self), &RenderOptions::default())
    }

    pub fn render_with(&self, options: &RenderOptions) -> String {
        render(Some(self), options)
    }
}

pub trait TreeOutline {
    fn to_outline(&self) -> Tree<String>;
}

impl<T: Display> TreeOutline for CursorTree<T> {
    fn to_outline(&self) -> Tree<String> {
        fn entry<T: Display>(tree: &CursorTree<T>, id: NodeId, slot: Option<Slot>) -> String {
            let marker = if id == tree.current() { "* " } else { "" };
            let label = tree.label(id).map(|l| l.to_string()).unwrap_or_default();
            match slot {
                Some(Slot::Left) => format!("L: {}{}", marker, label),
                Some(Slot::Right) => format!("R: {}{}", marker, label),
                None => format!("{}{}", marker, label),
            }
        }

        fn build<T: Display>(tree: &CursorTree<T>, id: NodeId, out: &mut Tree<String>) {
            for slot in [Slot::Left, Slot::Right] {
                if let Some(child) = tree.child(id, slot) {
                    let mut child_tree = Tree::new(entry(tree, child, Some(slot)));
                    build(tree, child, &mut child_tree);
                    out.push(child_tree);
                }
            }
        }

        let mut outline = Tree::new(entry(self, self.root(), None));
        build(self, self.root(), &mut outline);
        outline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_root_plain() {
        let tree = CursorTree::create("A".to_string()).unwrap();
        assert_eq!(tree.render(), "Tree (current node: A):\nA\n\n");
    }

    #[test]
    fn test_absent_tree_uses_null_marker() {
        let out = render::<String>(None, &RenderOptions::default());
        assert_eq!(out, "Tree (current node: NULL):\n\n");
    }

    #[test]
    fn test_custom_indent_and_header() {
        let mut tree = CursorTree::create("A".to_string()).unwrap();
        let _ = tree.insert_right("C".to_string()).unwrap();
        let options = RenderOptions {
            indent: "..".into(),
            header: "Baum".into(),
            ..RenderOptions::default()
        };
        assert_eq!(
            tree.render_with(&options),
            "Baum (current node: A):\nA\n..C\n\n"
        );
    }

    #[test]
    fn test_render_style_from_str() {
        assert_eq!("Outline".parse::<RenderStyle>(), Ok(RenderStyle::Outline));
        assert!("fancy".parse::<RenderStyle>().is_err());
    }
}
