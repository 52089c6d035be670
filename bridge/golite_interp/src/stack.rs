//! Stack growth for the recursive tree walker.
//!
//! User recursion is bounded by the configured call depth, but every call
//! nests several Rust frames (`call` → `exec_block` → `exec_stmt` →
//! `eval_expr` ...). On native targets the stack is grown on demand so the
//! depth limit, not the thread's stack size, decides when a program faults.

/// Grow when less than this remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
