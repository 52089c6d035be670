//! RAII guards for block scopes and call frames.
//!
//! Both guards hold `&mut Interpreter` and deref to it, so code inside a
//! scope keeps using interpreter methods directly. The matching pop runs in
//! `Drop`, which also covers a fault unwinding through the scope.

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::environment::Scope;

/// Pops a block scope on drop.
pub struct ScopedInterpreter<'guard> {
    interpreter: &'guard mut Interpreter,
}

impl Drop for ScopedInterpreter<'_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
    }
}

impl Deref for ScopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

/// Pops a call frame on drop.
pub struct FrameGuard<'guard> {
    interpreter: &'guard mut Interpreter,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_frame();
    }
}

impl Deref for FrameGuard<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for FrameGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Open a block scope that closes when the guard drops.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_> {
        self.env.push_scope();
        ScopedInterpreter { interpreter: self }
    }

    /// Enter a call frame whose base scope holds the bound parameters.
    pub fn enter_frame(&mut self, params: Scope) -> FrameGuard<'_> {
        self.env.push_frame(params);
        FrameGuard { interpreter: self }
    }
}
