//! Tool trait: the abstraction over agent capabilities.
//!
//! A tool takes the positional string arguments parsed from a model's
//! `Action:` directive and returns a plain-text observation.

use async_trait::async_trait;
use crate::error::ToolError;

/// The core Tool trait.
///
/// Tools are registered under a name in a [`ToolRegistry`]; the name is the
/// identifier the model writes in `Action: name(...)`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// A description of what this tool does (rendered into the system prompt).
    fn description(&self) -> &str;

    /// Invoke the tool with positional arguments.
    async fn invoke(&self, args: &[String]) -> std::result::Result<String, ToolError>;
}

/// A tool backed by a plain closure.
pub struct FnTool<F> {
    description: String,
    func: F,
}

impl<F> FnTool<F>
where
    F: Fn(&[String]) -> std::result::Result<String, ToolError> + Send + Sync,
{
    pub fn new(description: impl Into<String>, func: F) -> Self {
        Self {
            description: description.into(),
            func,
        }
    }
}

#[async_trait]
impl<F> Tool for FnTool<F>
where
    F: Fn(&[String]) -> std::result::Result<String, ToolError> + Send + Sync,
{
    fn description(&self) -> &str {
        &self.description
    }

    async fn invoke(&self, args: &[String]) -> std::result::Result<String, ToolError> {
        (self.func)(args)
    }
}

/// A registry of available tools, kept in registration order.
///
/// The agent loop uses this to:
/// 1. Render the tool listing into the system prompt
/// 2. Resolve and invoke the tool named by an `Action:` directive
pub struct ToolRegistry {
    tools: Vec<(String, Box<dyn Tool>)>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool under `name`.
    ///
    /// An existing entry with the same name is replaced in place, so it keeps
    /// its original position in the listing.
    pub fn register(&mut self, name: impl Into<String>, tool: impl Tool + 'static) {
        let name = name.into();
        let tool: Box<dyn Tool> = Box::new(tool);
        match self.tools.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => {
                tracing::debug!(tool = %name, "Replacing registered tool");
                slot.1 = tool;
            }
            None => self.tools.push((name, tool)),
        }
    }

    /// Register a closure as a tool.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, description: impl Into<String>, func: F)
    where
        F: Fn(&[String]) -> std::result::Result<String, ToolError> + Send + Sync + 'static,
    {
        self.register(name, FnTool::new(description, func));
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t.as_ref())
    }

    /// Resolve a tool by name, failing with `ToolError::NotFound` on a miss.
    pub fn resolve(&self, name: &str) -> std::result::Result<&dyn Tool, ToolError> {
        self.get(name).ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    /// Resolve and invoke a tool.
    pub async fn invoke(&self, name: &str, args: &[String]) -> std::result::Result<String, ToolError> {
        self.resolve(name)?.invoke(args).await
    }

    /// `(name, description)` pairs in registration order.
    pub fn descriptions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tools.iter().map(|(n, t)| (n.as_str(), t.description()))
    }

    /// List all registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
