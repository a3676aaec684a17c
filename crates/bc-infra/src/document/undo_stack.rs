//! # Undo/Redo Stack
//!
//! Snapshot based history of a document state `S`.
//!
//! ## Design
//!
//! - The first mutation after a sync point records the state it started from
//! - `capture` closes the open transaction as one undo step
//! - Undo restores the recorded state and moves the current one to redo
//! - New transactions clear the redo stack
//! - A transaction that left the state unchanged records nothing

#[derive(Debug)]
pub struct UndoStack<S> {
    /// States before each closed transaction (most recent last)
    undo_stack: Vec<S>,

    /// States replaced by undo (most recent last)
    redo_stack: Vec<S>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// State before the first mutation of the open transaction
    pending: Option<S>,
}

impl<S: Clone + PartialEq> UndoStack<S> {
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            pending: None,
        }
    }

    /// Call before mutating `current`; only the first call of a transaction
    /// records anything.
    pub fn before_mutation(&mut self, current: &S) {
        if self.pending.is_none() {
            self.pending = Some(current.clone());
        }
    }

    /// Close the open transaction. Returns `true` when a step was recorded.
    pub fn capture(&mut self, current: &S) -> bool {
        let Some(before) = self.pending.take() else {
            return false;
        };
        if &before == current {
            return false;
        }

        self.undo_stack.push(before);
        self.redo_stack.clear();
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }
        true
    }

    /// State to restore for one undo step, if any.
    pub fn undo(&mut self, current: &S) -> Option<S> {
        self.capture(current);
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current.clone());
        Some(previous)
    }

    /// State to restore for one redo step, if any.
    pub fn redo(&mut self, current: &S) -> Option<S> {
        self.capture(current);
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current.clone());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.pending.is_some()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending = None;
    }
}
