//! Editing session: applies script commands to a cursor tree

use tracing::{debug, instrument, warn};

use crate::application::script::{parse_script, Command};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{render, CursorTree, InvalidOperation, Outcome, RenderOptions, TreeResult};

/// What a single command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Applied,
    Rendered(String),
    Rejected(InvalidOperation),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: usize,
    /// Output of every `print`, in script order
    pub outputs: Vec<String>,
    pub rejections: Vec<(usize, InvalidOperation)>,
}

/// Holds the tree being edited. There is no tree until the first `new`;
/// until then every edit is rejected with [`InvalidOperation::NoCursor`].
#[derive(Debug)]
pub struct Session {
    tree: Option<CursorTree>,
    options: RenderOptions,
    max_nodes: Option<usize>,
    /// Turn rejected edits into errors
    strict: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl Session {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            tree: None,
            options,
            max_nodes: None,
            strict: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.render_options())
            .with_max_nodes(settings.max_nodes)
            .with_strict(settings.strict)
    }

    pub fn with_max_nodes(mut self, max_nodes: Option<usize>) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn tree(&self) -> Option<&CursorTree> {
        self.tree.as_ref()
    }

    pub fn render(&self) -> String {
        render(self.tree.as_ref(), &self.options)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, line: usize, command: &Command) -> ApplicationResult<Step> {
        let outcome = match command {
            Command::New(label) => {
                let tree = CursorTree::with_max_nodes(label.clone(), self.max_nodes)?;
                if let Some(old) = self.tree.replace(tree) {
                    let released = old.destroy();
                    debug!("discarded previous tree: {} nodes", released);
                }
                Outcome::Done(())
            }
            Command::Print => return Ok(Step::Rendered(self.render())),
            _ => match self.tree.as_mut() {
                Some(tree) => apply(tree, command)?,
                None => Outcome::Rejected(InvalidOperation::NoCursor),
            },
        };

        match outcome {
            Outcome::Done(()) => Ok(Step::Applied),
            Outcome::Rejected(op) if self.strict => {
                Err(ApplicationError::Rejected { line, source: op })
            }
            Outcome::Rejected(op) => {
                warn!("line {}: {} ignored: {}", line, command, op);
                Ok(Step::Rejected(op))
            }
        }
    }

    /// Parse and execute a whole script.
    #[instrument(level = "debug", skip_all)]
    pub fn run(&mut self, source: &str) -> ApplicationResult<RunSummary> {
        let mut summary = RunSummary::default();
        for (line, command) in parse_script(source)? {
            match self.execute(line, &command)? {
                Step::Applied => summary.applied += 1,
                Step::Rendered(text) => summary.outputs.push(text),
                Step::Rejected(op) => summary.rejections.push((line, op)),
            }
        }
        debug!(
            "script done: {} applied, {} rejected",
            summary.applied,
            summary.rejections.len()
        );
        Ok(summary)
    }
}

fn apply(tree: &mut CursorTree, command: &Command) -> TreeResult<Outcome> {
    let outcome = match command {
        Command::Insert(slot, label) => tree.insert(*slot, label.clone())?.discard(),
        Command::Delete(slot) => tree.delete_subtree(*slot).discard(),
        Command::Parent => tree.move_to_parent().discard(),
        Command::Child(slot) => tree.move_to_child(*slot).discard(),
        Command::Root => {
            tree.move_to_root();
            Outcome::Done(())
        }
        Command::Rename(label) => {
            tree.set_current_label(label.clone());
            Outcome::Done(())
        }
        // handled by the session itself
        Command::New(_) | Command::Print => Outcome::Done(()),
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Slot;

    #[test]
    fn test_edits_before_new_are_rejected() {
        let mut session = Session::default();
        let step = session.execute(1, &Command::Child(Slot::Left)).unwrap();
        assert_eq!(step, Step::Rejected(InvalidOperation::NoCursor));
        assert!(session.tree().is_none());
    }

    #[test]
    fn test_print_without_tree_shows_null_marker() {
        let mut session = Session::default();
        let step = session.execute(1, &Command::Print).unwrap();
        assert_eq!(step, Step::Rendered("Tree (current node: NULL):\n\n".into()));
    }

    #[test]
    fn test_new_replaces_tree() {
        let mut session = Session::default();
        session.run("new A\nadd-left B\nnew Z\n").unwrap();
        let tree = session.tree().unwrap();
        assert_eq!(tree.current_label(), "Z");
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_strict_session_fails_on_rejection() {
        let mut session = Session::default().with_strict(true);
        let err = session.run("new A\nup\n").unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Rejected {
                line: 2,
                source: InvalidOperation::AtRoot
            }
        ));
    }
}
