//! Tool invocation coordination

use crate::invoker::{FunctionRegistry, ToolArguments};
use crate::provider::{ToolInvocation, ToolResult};
use tracing::{debug, warn};

/// Tool execution result
#[derive(Debug, Clone, PartialEq)]
pub struct ToolExecutionResult {
    /// Unique ID for this tool call
    pub tool_call_id: String,
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Arguments as the model sent them
    pub arguments: serde_json::Value,
    /// Tool output content, or the error text fed back to the model
    pub content: String,
    /// Whether tool execution succeeded
    pub success: bool,
}

impl ToolExecutionResult {
    /// Tool-result message payload for the model.
    pub fn to_tool_result(&self) -> ToolResult {
        if self.success {
            ToolResult::success(&self.tool_call_id, &self.tool_name, &self.content)
        } else {
            ToolResult::error(&self.tool_call_id, &self.tool_name, &self.content)
        }
    }
}

/// Tool coordinator
///
/// Runs the model's tool calls against the registry for one request and
/// keeps the execution history.
#[derive(Debug, Default)]
pub struct ToolCoordinator {
    execution_history: Vec<ToolExecutionResult>,
}

impl ToolCoordinator {
    /// Create a new tool coordinator
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one invocation and record it.
    ///
    /// Failures (unknown function, bad arguments, body error) never abort
    /// the request; they become an error result the model can react to.
    pub fn execute(
        &mut self,
        registry: &FunctionRegistry,
        invocation: &ToolInvocation,
    ) -> ToolExecutionResult {
        let outcome = ToolArguments::from_value(invocation.arguments.clone())
            .and_then(|args| registry.invoke(&invocation.name, &args));

        let (content, success) = match outcome {
            Ok(content) => {
                debug!(tool = %invocation.name, id = %invocation.id, "tool call succeeded");
                (content, true)
            }
            Err(e) => {
                warn!(tool = %invocation.name, id = %invocation.id, error = %e, "tool call failed");
                (format!("Error: {}", e), false)
            }
        };

        let result = ToolExecutionResult {
            tool_call_id: invocation.id.clone(),
            tool_name: invocation.name.clone(),
            arguments: invocation.arguments.clone(),
            content,
            success,
        };
        self.record_invocation(result.clone());
        result
    }

    /// Record a tool invocation
    pub fn record_invocation(&mut self, result: ToolExecutionResult) {
        self.execution_history.push(result);
    }

    /// Get total number of tool invocations
    pub fn invocation_count(&self) -> usize {
        self.execution_history.len()
    }

    /// Get execution history
    pub fn execution_history(&self) -> &[ToolExecutionResult] {
        &self.execution_history
    }

    /// Get successful executions
    pub fn successful_executions(&self) -> Vec<&ToolExecutionResult> {
        self.execution_history.iter().filter(|r| r.success).collect()
    }

    /// Get failed executions
    pub fn failed_executions(&self) -> Vec<&ToolExecutionResult> {
        self.execution_history.iter().filter(|r| !r.success).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::InvokerRegistry;
    use crate::plugins::WeatherPlugin;
    use crate::invoker::Plugin;
    use serde_json::json;

    fn registry() -> FunctionRegistry {
        let mut registry = FunctionRegistry::new();
        WeatherPlugin.register_all(&mut registry).unwrap();
        registry
    }

    #[test]
    fn test_execute_success() {
        let registry = registry();
        let mut coordinator = ToolCoordinator::new();

        let result = coordinator.execute(
            &registry,
            &ToolInvocation::new("call_1", "get_weather", json!({ "city": "London" })),
        );
        assert!(result.success);
        assert_eq!(result.content, "59°F (15°C)");
        assert_eq!(coordinator.invocation_count(), 1);
        assert_eq!(coordinator.successful_executions().len(), 1);
        assert!(!result.to_tool_result().is_error);
    }

    #[test]
    fn test_execute_failures_become_error_results() {
        let registry = registry();
        assert!(registry.contains("get_weather"));
        let mut coordinator = ToolCoordinator::new();

        let unknown = coordinator.execute(&registry, &ToolInvocation::new("c1", "nope", json!({})));
        assert!(!unknown.success);
        assert!(unknown.content.starts_with("Error: function not found: nope"));

        let missing = coordinator.execute(&registry, &ToolInvocation::new("c2", "get_weather", json!({})));
        assert!(!missing.success);
        assert!(missing.content.contains("invalid arguments"));

        let garbled =
            coordinator.execute(&registry, &ToolInvocation::new("c3", "get_weather", json!("{oops")));
        assert!(!garbled.success);
        assert!(garbled.to_tool_result().is_error);

        assert_eq!(coordinator.failed_executions().len(), 3);
        assert_eq!(coordinator.execution_history()[0].tool_call_id, "c1");
    }
}
