//! Executable tool functions: a descriptor bound to a synchronous body.

use crate::invoker::{InvokerError, ToolDescriptor};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Arguments passed to a tool function, keyed by parameter name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToolArguments {
	values: Map<String, Value>,
}

impl ToolArguments {
	/// Create an empty argument set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Build arguments from a JSON value, which must be an object (or null).
	pub fn from_value(value: Value) -> Result<Self, InvokerError> {
		match value {
			Value::Object(values) => Ok(Self { values }),
			Value::Null => Ok(Self::new()),
			other => Err(InvokerError::serialization_error(format!(
				"expected a JSON object of arguments, got {}",
				other
			))),
		}
	}

	/// Parse the raw argument string a model produced for a tool call.
	///
	/// An empty string means "no arguments".
	pub fn parse(raw: &str) -> Result<Self, InvokerError> {
		if raw.trim().is_empty() {
			return Ok(Self::new());
		}
		let value: Value = serde_json::from_str(raw)
			.map_err(|e| InvokerError::serialization_error(e.to_string()))?;
		Self::from_value(value)
	}

	/// Add an argument using builder pattern.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.values.insert(name.into(), value.into());
		self
	}

	/// Raw JSON value of an argument.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	/// String argument, if present and a string.
	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.values.get(name).and_then(Value::as_str)
	}

	/// Integer argument, if present and integral.
	pub fn get_i64(&self, name: &str) -> Option<i64> {
		self.values.get(name).and_then(Value::as_i64)
	}

	/// Number of supplied arguments.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Check if no arguments were supplied.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// The arguments as a JSON object.
	pub fn to_value(&self) -> Value {
		Value::Object(self.values.clone())
	}
}

type FunctionBody = dyn Fn(&ToolArguments) -> Result<String, InvokerError> + Send + Sync;

/// A registered, callable tool: descriptor plus implementation.
///
/// Bodies are synchronous and must not hold mutable state; the kernel calls
/// them from concurrent requests without synchronization.
///
/// # Example
///
/// ```
/// use toolchat::invoker::{KernelFunction, ToolArguments, ToolDescriptor, ToolParameter};
///
/// let echo = KernelFunction::new(
///     ToolDescriptor::new("echo", "Echo the input")
///         .with_parameter(ToolParameter::string("text", "Text to echo")),
///     |args| Ok(args.get_str("text").unwrap_or_default().to_string()),
/// );
///
/// let out = echo.invoke(&ToolArguments::new().with("text", "hi")).unwrap();
/// assert_eq!(out, "hi");
/// ```
#[derive(Clone)]
pub struct KernelFunction {
	descriptor: ToolDescriptor,
	body: Arc<FunctionBody>,
}

impl KernelFunction {
	/// Bind a descriptor to its implementation.
	pub fn new<F>(descriptor: ToolDescriptor, body: F) -> Self
	where
		F: Fn(&ToolArguments) -> Result<String, InvokerError> + Send + Sync + 'static,
	{
		Self {
			descriptor,
			body: Arc::new(body),
		}
	}

	/// Function name.
	pub fn name(&self) -> &str {
		&self.descriptor.name
	}

	/// Declared schema.
	pub fn descriptor(&self) -> &ToolDescriptor {
		&self.descriptor
	}

	/// Check arguments against the declared parameters.
	///
	/// Required parameters must be present and every supplied declared
	/// parameter must have the declared type. Undeclared extra arguments are
	/// ignored.
	pub fn validate(&self, args: &ToolArguments) -> Result<(), InvokerError> {
		for param in &self.descriptor.parameters {
			match args.get(&param.name) {
				None | Some(Value::Null) if param.required => {
					return Err(InvokerError::invalid_arguments(
						self.name(),
						format!("missing required parameter '{}'", param.name),
					));
				}
				Some(value) if !value.is_null() && !param.kind.accepts(value) => {
					return Err(InvokerError::invalid_arguments(
						self.name(),
						format!("parameter '{}' must be of type {}", param.name, param.kind),
					));
				}
				_ => {}
			}
		}
		Ok(())
	}

	/// Validate the arguments and run the function body.
	pub fn invoke(&self, args: &ToolArguments) -> Result<String, InvokerError> {
		self.validate(args)?;
		(self.body)(args)
	}
}

impl fmt::Debug for KernelFunction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("KernelFunction")
			.field("descriptor", &self.descriptor)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::invoker::{ParameterType, ToolParameter};
	use serde_json::json;

	fn repeat() -> KernelFunction {
		KernelFunction::new(
			ToolDescriptor::new("repeat", "Repeat text")
				.with_parameter(ToolParameter::string("text", "Text"))
				.with_parameter(ToolParameter::new("times", "Count", ParameterType::Integer).optional()),
			|args| {
				let text = args.get_str("text").unwrap_or_default();
				let times = args.get_i64("times").unwrap_or(1).max(0) as usize;
				Ok(text.repeat(times))
			},
		)
	}

	#[test]
	fn test_parse_arguments() {
		let args = ToolArguments::parse(r#"{"city": "London"}"#).unwrap();
		assert_eq!(args.get_str("city"), Some("London"));
		assert_eq!(args.len(), 1);

		assert!(ToolArguments::parse("").unwrap().is_empty());
		assert!(ToolArguments::parse("  ").unwrap().is_empty());
		assert!(ToolArguments::parse("null").unwrap().is_empty());
	}

	#[test]
	fn test_parse_rejects_non_objects() {
		assert!(matches!(
			ToolArguments::parse("[1, 2]"),
			Err(InvokerError::SerializationError { .. })
		));
		assert!(matches!(
			ToolArguments::parse("{not json"),
			Err(InvokerError::SerializationError { .. })
		));
	}

	#[test]
	fn test_invoke() {
		let f = repeat();
		let out = f
			.invoke(&ToolArguments::new().with("text", "ab").with("times", 3))
			.unwrap();
		assert_eq!(out, "ababab");

		let out = f.invoke(&ToolArguments::new().with("text", "ab")).unwrap();
		assert_eq!(out, "ab");
	}

	#[test]
	fn test_missing_required_argument() {
		let err = repeat().invoke(&ToolArguments::new()).unwrap_err();
		match err {
			InvokerError::InvalidArguments { name, message } => {
				assert_eq!(name, "repeat");
				assert!(message.contains("'text'"));
			}
			other => panic!("Expected InvalidArguments, got {:?}", other),
		}
	}

	#[test]
	fn test_wrong_argument_type() {
		let err = repeat()
			.invoke(&ToolArguments::new().with("text", "x").with("times", "two"))
			.unwrap_err();
		assert!(err.to_string().contains("integer"));
	}

	#[test]
	fn test_extra_arguments_ignored() {
		let out = repeat()
			.invoke(&ToolArguments::from_value(json!({"text": "x", "unit": "celsius"})).unwrap())
			.unwrap();
		assert_eq!(out, "x");
	}
}
