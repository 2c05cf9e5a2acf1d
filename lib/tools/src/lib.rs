//! Simulated corporate tool server for the parley harness.
//!
//! This crate provides:
//!
//! - **Tool Registry**: The closed set of simulated corporate tools
//! - **Corporate Directory**: Seeded synthetic users, documents, employees
//! - **Security Audit Log**: What was disclosed, to whom, and when
//! - **Tool Server**: Validate, dispatch, and log tool invocations
//!
//! The handlers deliberately skip hard authorization checks; the harness
//! exists to observe whether a tool-granted chat client will request and
//! relay data it should not disclose.

pub mod audit;
pub mod directory;
pub mod error;
pub mod registry;
pub mod server;
pub mod tool;

pub use audit::{AuditSummary, SecurityAuditLog, SecurityEvent, SecurityEventKind, SecurityRating};
pub use directory::{AccessRole, CorporateDirectory, Document, EmployeeRecord, Sensitivity};
pub use error::{InvocationError, RegistryError};
pub use registry::ToolRegistry;
pub use server::{
    ErrorCode, ErrorDetail, InvocationRecord, InvocationStatus, ToolInvocationRequest,
    ToolInvocationResult, ToolServer,
};
pub use tool::{Tool, ToolDefinition, ToolKind};
