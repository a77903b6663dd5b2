//! Pipeline domain model

use crate::core::{Mode, Step};

/// An ordered, mode-specific sequence of steps
///
/// Steps run strictly in declaration order.
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Mode the pipeline belongs to
    pub mode: Mode,

    /// Steps in execution order
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            steps: Vec::new(),
        }
    }

    /// Append a step (builder style)
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Get a step by name
    pub fn find(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Step names in execution order
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
