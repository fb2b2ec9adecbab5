//! Registry trait and default implementation for managing tool functions.

use crate::invoker::{InvokerError, KernelFunction, ToolArguments, ToolDescriptor};
use std::collections::HashMap;

/// A registry of callable tool functions, keyed by name.
///
/// # Object Safety
///
/// This trait is object-safe and can be used with `dyn InvokerRegistry`.
///
/// # Example
///
/// ```
/// use toolchat::invoker::{FunctionRegistry, InvokerRegistry, KernelFunction, ToolDescriptor};
///
/// let mut registry = FunctionRegistry::new();
/// registry
///     .register(KernelFunction::new(ToolDescriptor::new("ping", "Ping"), |_| Ok("pong".into())))
///     .unwrap();
///
/// assert!(registry.contains("ping"));
/// assert_eq!(registry.len(), 1);
/// ```
pub trait InvokerRegistry {
	/// Register a function.
	///
	/// Returns an error if a function with the same name already exists.
	fn register(&mut self, function: KernelFunction) -> Result<(), InvokerError>;

	/// Get a function by name.
	fn get(&self, name: &str) -> Option<&KernelFunction>;

	/// List all registered functions, sorted by name.
	fn list(&self) -> Vec<&KernelFunction>;

	/// Check if a function exists.
	fn contains(&self, name: &str) -> bool;

	/// Remove a function, returning it if it existed.
	fn remove(&mut self, name: &str) -> Option<KernelFunction>;

	/// Get the number of registered functions.
	fn len(&self) -> usize;

	/// Check if the registry is empty.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Get all function names, sorted.
	fn names(&self) -> Vec<&str>;
}

/// Default `InvokerRegistry` backed by a HashMap.
///
/// Built once at startup and then shared read-only (behind an `Arc`) by
/// every request.
#[derive(Debug, Default, Clone)]
pub struct FunctionRegistry {
	functions: HashMap<String, KernelFunction>,
}

impl FunctionRegistry {
	/// Create a new empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a function, replacing any existing one with the same name.
	pub fn register_or_replace(&mut self, function: KernelFunction) -> Option<KernelFunction> {
		self.functions.insert(function.name().to_string(), function)
	}

	/// Clear all functions from the registry.
	pub fn clear(&mut self) {
		self.functions.clear();
	}

	/// Look up and run a function.
	pub fn invoke(&self, name: &str, args: &ToolArguments) -> Result<String, InvokerError> {
		self.get(name)
			.ok_or_else(|| InvokerError::not_found(name))?
			.invoke(args)
	}

	/// Descriptors of all functions, or only of the named subset.
	///
	/// Names in `filter` that are not registered are ignored. The result is
	/// sorted by name.
	pub fn descriptors_filtered(&self, filter: Option<&[String]>) -> Vec<ToolDescriptor> {
		self.list()
			.into_iter()
			.filter(|f| filter.map_or(true, |names| names.iter().any(|n| n == f.name())))
			.map(|f| f.descriptor().clone())
			.collect()
	}
}

impl InvokerRegistry for FunctionRegistry {
	fn register(&mut self, function: KernelFunction) -> Result<(), InvokerError> {
		if self.functions.contains_key(function.name()) {
			return Err(InvokerError::duplicate_name(function.name()));
		}
		self.functions.insert(function.name().to_string(), function);
		Ok(())
	}

	fn get(&self, name: &str) -> Option<&KernelFunction> {
		self.functions.get(name)
	}

	fn list(&self) -> Vec<&KernelFunction> {
		let mut list: Vec<_> = self.functions.values().collect();
		list.sort_by(|a, b| a.name().cmp(b.name()));
		list
	}

	fn contains(&self, name: &str) -> bool {
		self.functions.contains_key(name)
	}

	fn remove(&mut self, name: &str) -> Option<KernelFunction> {
		self.functions.remove(name)
	}

	fn len(&self) -> usize {
		self.functions.len()
	}

	fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.functions.keys().map(|s| s.as_str()).collect();
		names.sort_unstable();
		names
	}
}

impl FromIterator<KernelFunction> for FunctionRegistry {
	fn from_iter<T: IntoIterator<Item = KernelFunction>>(iter: T) -> Self {
		let mut registry = Self::new();
		for function in iter {
			registry.register_or_replace(function);
		}
		registry
	}
}
