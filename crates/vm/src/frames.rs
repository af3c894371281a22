//! Variable frames: one global frame, a stack of local frames and an
//! optional temporary frame.
//!
//! `LF@` always addresses the top of the local stack. PUSHFRAME moves the
//! temporary frame onto that stack and POPFRAME moves the top back, so a
//! frame's variables survive a push/pop round trip unchanged.

use crate::error::FrameError;
use ipp_common::{Scope, Value, VarRef};
use std::collections::HashMap;
use tracing::trace;

/// A mapping from names to slots. `None` marks a declared variable that has
/// not been assigned yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    slots: HashMap<String, Option<Value>>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// The slot for `name`: `None` if undeclared, `Some(None)` if
    /// declared but uninitialized.
    pub fn get(&self, name: &str) -> Option<Option<&Value>> {
        self.slots.get(name).map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// All frames visible to a running program.
#[derive(Debug, Clone, Default)]
pub struct FrameSet {
    global: Frame,
    locals: Vec<Frame>,
    temporary: Option<Frame>,
}

impl FrameSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(&self) -> &Frame {
        &self.global
    }

    /// Top of the local frame stack.
    pub fn local(&self) -> Option<&Frame> {
        self.locals.last()
    }

    pub fn temporary(&self) -> Option<&Frame> {
        self.temporary.as_ref()
    }

    /// Number of frames on the local stack.
    pub fn depth(&self) -> usize {
        self.locals.len()
    }

    fn frame(&self, scope: Scope) -> Result<&Frame, FrameError> {
        match scope {
            Scope::Global => Ok(&self.global),
            Scope::Local => self.locals.last().ok_or(FrameError::NoFrame(scope)),
            Scope::Temporary => self.temporary.as_ref().ok_or(FrameError::NoFrame(scope)),
        }
    }

    fn frame_mut(&mut self, scope: Scope) -> Result<&mut Frame, FrameError> {
        match scope {
            Scope::Global => Ok(&mut self.global),
            Scope::Local => self.locals.last_mut().ok_or(FrameError::NoFrame(scope)),
            Scope::Temporary => self.temporary.as_mut().ok_or(FrameError::NoFrame(scope)),
        }
    }

    /// Declare `var` as uninitialized in its frame.
    pub fn declare(&mut self, var: &VarRef) -> Result<(), FrameError> {
        let frame = self.frame_mut(var.scope)?;
        if frame.contains(&var.name) {
            return Err(FrameError::Redefinition(var.clone()));
        }
        frame.slots.insert(var.name.clone(), None);
        Ok(())
    }

    /// Assign to a declared variable.
    pub fn write(&mut self, var: &VarRef, value: Value) -> Result<(), FrameError> {
        let slot = self
            .frame_mut(var.scope)?
            .slots
            .get_mut(&var.name)
            .ok_or_else(|| FrameError::Undefined(var.clone()))?;
        *slot = Some(value);
        Ok(())
    }

    /// Value of a declared, initialized variable.
    pub fn read(&self, var: &VarRef) -> Result<&Value, FrameError> {
        self.slot(var)?
            .ok_or_else(|| FrameError::Uninitialized(var.clone()))
    }

    /// Slot of a declared variable, which may still be uninitialized.
    pub fn slot(&self, var: &VarRef) -> Result<Option<&Value>, FrameError> {
        self.frame(var.scope)?
            .get(&var.name)
            .ok_or_else(|| FrameError::Undefined(var.clone()))
    }

    /// Replace the temporary frame with a fresh empty one.
    pub fn create_temporary(&mut self) {
        if self.temporary.is_some() {
            trace!("discarding temporary frame");
        }
        self.temporary = Some(Frame::new());
    }

    /// Move the temporary frame onto the local stack.
    pub fn push_frame(&mut self) -> Result<(), FrameError> {
        let frame = self
            .temporary
            .take()
            .ok_or(FrameError::NoFrame(Scope::Temporary))?;
        self.locals.push(frame);
        trace!(depth = self.locals.len(), "pushed frame");
        Ok(())
    }

    /// Move the top local frame into the temporary slot, discarding any
    /// temporary frame already there.
    pub fn pop_frame(&mut self) -> Result<(), FrameError> {
        let frame = self.locals.pop().ok_or(FrameError::NoFrame(Scope::Local))?;
        self.temporary = Some(frame);
        trace!(depth = self.locals.len(), "popped frame");
        Ok(())
    }
}
