//! Workflow entry points independent of argument parsing.

pub mod orchestration;

pub use orchestration::{run_draft_workflow, DraftWorkflowArgs, ReleaseOutputs, WorkflowResult};
