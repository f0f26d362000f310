//! Ordered groups of commands applied as one.

use super::{not_executed, Command};
use crate::collection::RecordStore;
use crate::error::{CoreError, CoreResult};
use tracing::error;

/// Runs its commands in order and undoes them in reverse.
///
/// If one command fails, those already applied are undone before the
/// failure is reported, so the collection is left as it was.
#[derive(Debug, Clone, Default)]
pub struct Composite {
    commands: Vec<Command>,
    executed: bool,
}

impl Composite {
    /// Groups `commands`.
    #[must_use]
    pub fn new(commands: Vec<Command>) -> Self {
        Self {
            commands,
            executed: false,
        }
    }

    /// Appends a command. Only meaningful before execution.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Number of grouped commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if the group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(super) fn execute(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        for index in 0..self.commands.len() {
            if let Err(e) = self.commands[index].execute(store) {
                self.roll_back(store, index);
                return Err(CoreError::CompositeFailed {
                    index,
                    source: Box::new(e),
                });
            }
        }
        self.executed = true;
        Ok(())
    }

    fn roll_back(&mut self, store: &mut RecordStore, applied: usize) {
        for command in self.commands[..applied].iter_mut().rev() {
            if let Err(e) = command.undo(store) {
                error!(command = command.name(), error = %e, "rollback step failed");
            }
        }
    }

    pub(super) fn undo(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        if !self.executed {
            return Err(not_executed());
        }
        for index in (0..self.commands.len()).rev() {
            if let Err(e) = self.commands[index].undo(store) {
                self.roll_forward(store, index + 1);
                return Err(e);
            }
        }
        self.executed = false;
        Ok(())
    }

    /// Re-applies the commands from `from` onwards after a failed undo.
    fn roll_forward(&mut self, store: &mut RecordStore, from: usize) {
        for command in &mut self.commands[from..] {
            if let Err(e) = command.execute(store) {
                error!(command = command.name(), error = %e, "roll-forward step failed");
            }
        }
    }
}
