//! Tool registry.
//!
//! The registry is the single source of truth for what the server claims to
//! support and what it actually dispatches to. Registration happens once at
//! startup; lookups afterwards are read-only.

use crate::error::RegistryError;
use crate::tool::{Tool, ToolDefinition, ToolKind};
use std::collections::HashMap;

/// Registry of available tools.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Creates a registry with every built-in corporate tool registered.
    #[must_use]
    pub fn corporate() -> Self {
        let mut registry = Self::new();
        for kind in ToolKind::ALL {
            registry
                .register(Tool::builtin(kind))
                .expect("built-in tool names are unique");
        }
        registry
    }

    /// Registers a tool.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTool` if a tool with the same name is already
    /// registered; the existing registration is left untouched.
    pub fn register(&mut self, tool: Tool) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateTool { name });
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Looks up a tool by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTool` if no tool with this name is registered.
    pub fn lookup(&self, name: &str) -> Result<&Tool, RegistryError> {
        self.tools.get(name).ok_or_else(|| RegistryError::UnknownTool {
            name: name.to_string(),
        })
    }

    /// Returns the definitions to advertise, sorted by name.
    #[must_use]
    pub fn list(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|tool| tool.definition.clone())
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
