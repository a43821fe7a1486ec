//! Binary tree editor with a movable cursor.
//!
//! A [`CursorTree`] owns its nodes in an arena and keeps one node in focus.
//! Children are attached to, and whole subtrees removed from, the focused
//! node only; the cursor moves one step at a time (parent, left or right
//! child). Refused edits come back as [`Outcome::Rejected`] instead of
//! being printed and swallowed.
//!
//! ```
//! use cursortree::CursorTree;
//!
//! let mut tree = CursorTree::create("A".to_string()).unwrap();
//! let _ = tree.insert_left("B".to_string()).unwrap();
//! let _ = tree.insert_right("C".to_string()).unwrap();
//! let _ = tree.move_to_left_child();
//! assert_eq!(tree.render(), "Tree (current node: B):\n\tB\nA\n\tC\n\n");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    CursorTree, InvalidOperation, NodeId, Outcome, RenderOptions, RenderStyle, Slot, TreeError,
    TreeResult,
};
