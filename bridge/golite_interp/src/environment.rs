//! Variable storage: persistent globals plus a stack of call frames.
//!
//! Frame 0 is the top level of the current `evaluate` call. While it has no
//! block scopes open, definitions land in the globals and survive into later
//! evaluations; anything defined inside a block or function body is dropped
//! with its scope.

use rustc_hash::FxHashMap;

use crate::value::Value;

pub type Scope = FxHashMap<String, Value>;

#[derive(Debug, Default)]
struct Frame {
    scopes: Vec<Scope>,
    loops: usize,
}

#[derive(Debug)]
pub struct Environment {
    globals: Scope,
    frames: Vec<Frame>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            globals: Scope::default(),
            frames: vec![Frame::default()],
        }
    }

    /// Drop every frame and scope above the top level.
    pub fn reset_frames(&mut self) {
        self.frames.clear();
        self.frames.push(Frame::default());
    }

    /// Number of active function calls.
    pub fn call_depth(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    pub fn push_frame(&mut self, params: Scope) {
        self.frames.push(Frame {
            scopes: vec![params],
            loops: 0,
        });
    }

    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn push_scope(&mut self) {
        self.frame_mut().scopes.push(Scope::default());
    }

    pub fn pop_scope(&mut self) {
        self.frame_mut().scopes.pop();
    }

    pub fn enter_loop(&mut self) {
        self.frame_mut().loops += 1;
    }

    pub fn exit_loop(&mut self) {
        let frame = self.frame_mut();
        frame.loops = frame.loops.saturating_sub(1);
    }

    pub fn in_loop(&self) -> bool {
        self.frames.last().is_some_and(|frame| frame.loops > 0)
    }

    /// Bind `name` in the innermost scope (or the globals at top level).
    pub fn define(&mut self, name: &str, value: Value) {
        if name == "_" {
            return;
        }
        let scope = self
            .frames
            .last_mut()
            .and_then(|frame| frame.scopes.last_mut());
        match scope {
            Some(scope) => scope.insert(name.to_string(), value),
            None => self.globals.insert(name.to_string(), value),
        };
    }

    pub fn define_global(&mut self, name: &str, value: Value) {
        self.globals.insert(name.to_string(), value);
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.frames
            .last()
            .and_then(|frame| frame.scopes.iter().rev().find_map(|scope| scope.get(name)))
            .or_else(|| self.globals.get(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Value> {
        if let Some(frame) = self.frames.last_mut() {
            if let Some(value) = frame
                .scopes
                .iter_mut()
                .rev()
                .find_map(|scope| scope.get_mut(name))
            {
                return Some(value);
            }
        }
        self.globals.get_mut(name)
    }

    pub fn global_names(&self) -> impl Iterator<Item = &str> {
        self.globals.keys().map(String::as_str)
    }

    fn frame_mut(&mut self) -> &mut Frame {
        if self.frames.is_empty() {
            self.frames.push(Frame::default());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}
