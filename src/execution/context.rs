//! Execution mode and context

use std::fmt;

/// The environment a store operation is asked to run under.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Bounded batch computation. The only mode supported for reads.
    Batch,
    /// Unbounded streaming computation. Reads fail fast under this mode.
    Streaming,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Batch => write!(f, "batch"),
            ExecutionMode::Streaming => write!(f, "streaming"),
        }
    }
}

/// Capability handed to a [`LazyProducer`](super::LazyProducer) when the
/// caller drives evaluation.
///
/// Owning a context is what authorizes work to start; nothing is computed
/// before one is supplied. The shipped backends only consult the mode, but
/// the type is the seam where an embedding engine attaches whatever its
/// evaluation needs.
#[derive(Clone, Debug)]
pub struct ExecutionContext {
    mode: ExecutionMode,
}

impl ExecutionContext {
    /// Creates a context for the given mode.
    pub fn new(mode: ExecutionMode) -> Self {
        Self { mode }
    }

    /// Creates a batch-mode context.
    pub fn batch() -> Self {
        Self::new(ExecutionMode::Batch)
    }

    /// Returns the mode this context runs under.
    #[inline]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }
}
