//! Stage Record - one node of the pipeline graph

use serde::{Deserialize, Serialize};

/// Stage Record represents a single pipeline stage in the metadata document.
///
/// Records are created once per stage in declaration order. Everything
/// except `inputs` is fixed at creation; `inputs` grows as parameters are
/// attributed to the stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageRecord {
    step: usize,
    name: String,
    dependencies: Vec<String>,
    inputs: Vec<String>,
    command: String,
}

impl StageRecord {
    /// Create a new stage record with no inputs.
    ///
    /// # Arguments
    ///
    /// * `step` - 1-based position of the stage in `dvc.yaml`
    /// * `name` - Stage name (unique within the pipeline)
    /// * `dependencies` - Paths the stage depends on, in declared order
    /// * `command` - Shell command DVC runs for the stage
    #[must_use]
    pub fn new(
        step: usize,
        name: impl Into<String>,
        dependencies: Vec<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            step,
            name: name.into(),
            dependencies,
            inputs: Vec::new(),
            command: command.into(),
        }
    }

    /// Get the 1-based step number.
    #[must_use]
    pub const fn step(&self) -> usize {
        self.step
    }

    /// Get the stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the declared dependencies.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Get the names of parameters attributed to this stage.
    #[must_use]
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Get the stage command.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Record that parameter `name` feeds this stage.
    pub fn push_input(&mut self, name: impl Into<String>) {
        self.inputs.push(name.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_record_new() {
        let stage = StageRecord::new(2, "train", vec!["prepare".to_string()], "run train");
        assert_eq!(stage.step(), 2);
        assert_eq!(stage.name(), "train");
        assert_eq!(stage.dependencies(), ["prepare".to_string()]);
        assert_eq!(stage.command(), "run train");
        assert!(stage.inputs().is_empty());
    }

    #[test]
    fn test_stage_record_inputs_append_in_order() {
        let mut stage = StageRecord::new(1, "train", Vec::new(), "run train");
        stage.push_input("seed");
        stage.push_input("split");
        assert_eq!(stage.inputs(), ["seed".to_string(), "split".to_string()]);
    }
}
