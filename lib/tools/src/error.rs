//! Error types for the tools crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `RegistryError`: Registration and lookup failures
//! - `InvocationError`: Failures handling a single tool invocation
//!
//! Invocation-level errors never escalate to process-level failures; the
//! server converts them into failure results and the session continues.

use std::fmt;

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A tool with this name is already registered.
    DuplicateTool { name: String },
    /// No tool with this name is registered.
    UnknownTool { name: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTool { name } => {
                write!(f, "tool '{name}' is already registered")
            }
            Self::UnknownTool { name } => write!(f, "tool not found: {name}"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Failures handling a single tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    /// The request names a tool that is not registered.
    UnknownTool { name: String },
    /// The arguments do not satisfy the tool's declared schema.
    InvalidArguments { name: String, reason: String },
    /// The tool handler failed.
    ExecutionFailed { name: String, reason: String },
}

impl InvocationError {
    /// Returns the name of the tool the invocation targeted.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        match self {
            Self::UnknownTool { name }
            | Self::InvalidArguments { name, .. }
            | Self::ExecutionFailed { name, .. } => name,
        }
    }
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTool { name } => write!(f, "tool not found: {name}"),
            Self::InvalidArguments { name, reason } => {
                write!(f, "invalid arguments for tool '{name}': {reason}")
            }
            Self::ExecutionFailed { name, reason } => {
                write!(f, "tool '{name}' execution failed: {reason}")
            }
        }
    }
}

impl std::error::Error for InvocationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_display() {
        let err = RegistryError::DuplicateTool {
            name: "login".to_string(),
        };
        assert!(err.to_string().contains("login"));
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn invocation_error_display() {
        let err = InvocationError::InvalidArguments {
            name: "search_documents".to_string(),
            reason: "'query' is a required property".to_string(),
        };
        assert!(err.to_string().contains("search_documents"));
        assert!(err.to_string().contains("required property"));
    }

    #[test]
    fn invocation_error_tool_name() {
        let err = InvocationError::UnknownTool {
            name: "lookup_customer".to_string(),
        };
        assert_eq!(err.tool_name(), "lookup_customer");
    }
}
