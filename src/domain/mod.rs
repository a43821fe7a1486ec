//! Domain layer: the cursor tree and its text views
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod render;

pub use arena::{CursorTree, InOrderIterator, NodeId, PostOrderIterator, Slot, TreeNode};
pub use error::{InvalidOperation, Outcome, TreeError, TreeResult};
pub use render::{render, RenderOptions, RenderStyle, TreeOutline};
