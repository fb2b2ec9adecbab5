//! Plugin trait for grouping tool functions and registering them together.

use crate::invoker::{InvokerError, InvokerRegistry, KernelFunction};

/// A named group of tool functions.
///
/// Plugins are registered once at startup; the registry owns the functions
/// afterwards.
///
/// # Object Safety
///
/// This trait is object-safe and can be used with `dyn Plugin`.
///
/// # Example
///
/// ```
/// use toolchat::invoker::{
///     FunctionRegistry, InvokerRegistry, KernelFunction, Plugin, ToolDescriptor,
/// };
///
/// struct PingPlugin;
///
/// impl Plugin for PingPlugin {
///     fn name(&self) -> &str {
///         "ping"
///     }
///
///     fn functions(&self) -> Vec<KernelFunction> {
///         vec![KernelFunction::new(ToolDescriptor::new("ping", "Ping"), |_| Ok("pong".into()))]
///     }
/// }
///
/// let mut registry = FunctionRegistry::new();
/// let count = PingPlugin.register_all(&mut registry).unwrap();
/// assert_eq!(count, 1);
/// ```
pub trait Plugin {
	/// Plugin name, used for logging.
	fn name(&self) -> &str;

	/// Functions this plugin provides.
	fn functions(&self) -> Vec<KernelFunction>;

	/// Register all functions into a registry.
	///
	/// Stops at the first registration failure (e.g. a duplicate name).
	/// Returns the number of registered functions.
	fn register_all(&self, registry: &mut dyn InvokerRegistry) -> Result<usize, InvokerError> {
		let functions = self.functions();
		let count = functions.len();
		for function in functions {
			registry.register(function)?;
		}
		Ok(count)
	}
}

/// A plugin wrapping a fixed list of functions.
///
/// Useful for testing or for ad-hoc functions registered by the host.
#[derive(Debug, Clone)]
pub struct StaticPlugin {
	name: String,
	functions: Vec<KernelFunction>,
}

impl StaticPlugin {
	/// Create a new static plugin with the given functions.
	pub fn new(name: impl Into<String>, functions: Vec<KernelFunction>) -> Self {
		Self {
			name: name.into(),
			functions,
		}
	}

	/// Add a function to this plugin.
	pub fn add(&mut self, function: KernelFunction) {
		self.functions.push(function);
	}

	/// Get the number of functions in this plugin.
	pub fn len(&self) -> usize {
		self.functions.len()
	}

	/// Check if this plugin is empty.
	pub fn is_empty(&self) -> bool {
		self.functions.is_empty()
	}
}

impl Plugin for StaticPlugin {
	fn name(&self) -> &str {
		&self.name
	}

	fn functions(&self) -> Vec<KernelFunction> {
		self.functions.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::invoker::{FunctionRegistry, ToolDescriptor};

	fn make_fn(name: &str) -> KernelFunction {
		KernelFunction::new(ToolDescriptor::new(name, "test"), |_| Ok(String::new()))
	}

	#[test]
	fn test_static_plugin_register_all() {
		let plugin = StaticPlugin::new("test", vec![make_fn("a"), make_fn("b")]);
		assert_eq!(plugin.name(), "test");
		assert_eq!(plugin.len(), 2);

		let mut registry = FunctionRegistry::new();
		assert_eq!(plugin.register_all(&mut registry).unwrap(), 2);
		assert!(registry.contains("a"));
		assert!(registry.contains("b"));
	}

	#[test]
	fn test_register_all_fails_on_duplicate() {
		let plugin = StaticPlugin::new("test", vec![make_fn("a")]);
		let mut registry = FunctionRegistry::new();
		plugin.register_all(&mut registry).unwrap();

		assert!(matches!(
			plugin.register_all(&mut registry),
			Err(InvokerError::DuplicateName { .. })
		));
	}

	#[test]
	fn test_add() {
		let mut plugin = StaticPlugin::new("empty", Vec::new());
		assert!(plugin.is_empty());
		plugin.add(make_fn("x"));
		assert_eq!(plugin.functions().len(), 1);
	}
}
