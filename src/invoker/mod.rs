//! Tool registry: named, described, synchronous functions a remote model
//! may ask the kernel to call.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │WeatherPlugin │   │ TimePlugin   │   │ StaticPlugin │
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!        │                  │                  │
//!        ▼                  ▼                  ▼
//! ┌─────────────────────────────────────────────────┐
//! │                  Plugin trait                   │
//! └─────────────────────────┬───────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────┐
//! │          InvokerRegistry / FunctionRegistry     │
//! └─────────────────────────┬───────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────┐
//! │   KernelFunction = ToolDescriptor + body        │
//! │   - to_openai_function() for LLM integration    │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! The registry is populated explicitly at startup; schemas are plain data.
//!
//! # Quick Start
//!
//! ```
//! use toolchat::invoker::{
//!     generate_openai_tools, FunctionRegistry, InvokerRegistry, KernelFunction,
//!     ToolArguments, ToolDescriptor, ToolParameter,
//! };
//!
//! let mut registry = FunctionRegistry::new();
//! registry.register(KernelFunction::new(
//!     ToolDescriptor::new("shout", "Upper-case the input")
//!         .with_parameter(ToolParameter::string("text", "Text to shout")),
//!     |args| Ok(args.get_str("text").unwrap_or_default().to_uppercase()),
//! )).unwrap();
//!
//! let tools = generate_openai_tools(&registry);
//! assert_eq!(tools[0]["function"]["name"], "shout");
//!
//! let out = registry.invoke("shout", &ToolArguments::new().with("text", "hi")).unwrap();
//! assert_eq!(out, "HI");
//! ```

mod definition;
mod error;
mod function;
mod plugin;
mod registry;

pub use definition::{ParameterType, ToolDescriptor, ToolParameter};
pub use error::InvokerError;
pub use function::{KernelFunction, ToolArguments};
pub use plugin::{Plugin, StaticPlugin};
pub use registry::{FunctionRegistry, InvokerRegistry};

/// Result type for invoker operations.
pub type InvokerResult<T> = Result<T, InvokerError>;

/// Generate OpenAI-compatible tool schemas from a registry.
pub fn generate_openai_tools(registry: &dyn InvokerRegistry) -> Vec<serde_json::Value> {
	registry
		.list()
		.iter()
		.map(|f| f.descriptor().to_openai_function())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generate_openai_tools() {
		let mut registry = FunctionRegistry::new();
		registry
			.register(KernelFunction::new(
				ToolDescriptor::new("tool_b", "Tool B description")
					.with_parameter(ToolParameter::new("x", "x", ParameterType::Number)),
				|_| Ok(String::new()),
			))
			.unwrap();
		registry
			.register(KernelFunction::new(
				ToolDescriptor::new("tool_a", "Tool A description"),
				|_| Ok(String::new()),
			))
			.unwrap();

		let tools = generate_openai_tools(&registry);
		assert_eq!(tools.len(), 2);
		assert_eq!(tools[0]["function"]["name"], "tool_a");

		for tool in &tools {
			assert_eq!(tool["type"], "function");
			assert!(tool["function"]["description"].is_string());
			assert_eq!(tool["function"]["parameters"]["type"], "object");
		}
	}

	#[test]
	fn test_invoker_result_type() {
		fn returns_error() -> InvokerResult<i32> {
			Err(InvokerError::not_found("test"))
		}

		assert!(returns_error().is_err());
	}
}
