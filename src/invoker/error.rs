//! Error types for the invoker module.

use thiserror::Error;

/// Errors that can occur while registering or invoking tool functions.
///
/// # Example
///
/// ```
/// use toolchat::invoker::InvokerError;
///
/// let error = InvokerError::not_found("unknown_tool");
/// assert!(error.to_string().contains("unknown_tool"));
/// ```
#[derive(Debug, Error)]
pub enum InvokerError {
	/// The requested function was not found in the registry.
	#[error("function not found: {name}")]
	NotFound {
		/// Name of the function that was not found.
		name: String,
	},

	/// A function with the same name is already registered.
	#[error("function already registered: {name}")]
	DuplicateName {
		/// Name of the duplicate function.
		name: String,
	},

	/// The function body reported a failure.
	#[error("execution failed for {name}: {message}")]
	ExecutionFailed {
		/// Name of the function that failed.
		name: String,
		/// Description of the failure.
		message: String,
	},

	/// The arguments did not match the declared parameters.
	#[error("invalid arguments for {name}: {message}")]
	InvalidArguments {
		/// Name of the function with invalid arguments.
		name: String,
		/// Description of the validation failure.
		message: String,
	},

	/// The model's argument string was not a JSON object.
	#[error("serialization error: {message}")]
	SerializationError {
		/// Description of the serialization error.
		message: String,
	},
}

impl InvokerError {
	/// Create a NotFound error for the given function name.
	pub fn not_found(name: impl Into<String>) -> Self {
		Self::NotFound { name: name.into() }
	}

	/// Create a DuplicateName error for the given function name.
	pub fn duplicate_name(name: impl Into<String>) -> Self {
		Self::DuplicateName { name: name.into() }
	}

	/// Create an ExecutionFailed error.
	pub fn execution_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
		Self::ExecutionFailed {
			name: name.into(),
			message: message.into(),
		}
	}

	/// Create an InvalidArguments error.
	pub fn invalid_arguments(name: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidArguments {
			name: name.into(),
			message: message.into(),
		}
	}

	/// Create a SerializationError.
	pub fn serialization_error(message: impl Into<String>) -> Self {
		Self::SerializationError {
			message: message.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_not_found_error() {
		let error = InvokerError::not_found("my_tool");
		assert!(error.to_string().contains("my_tool"));
		assert!(error.to_string().contains("not found"));
	}

	#[test]
	fn test_duplicate_name_error() {
		let error = InvokerError::duplicate_name("get_weather");
		assert_eq!(error.to_string(), "function already registered: get_weather");
	}

	#[test]
	fn test_invalid_arguments_error() {
		let error = InvokerError::invalid_arguments("get_weather", "missing required parameter 'city'");
		assert!(error.to_string().contains("get_weather"));
		assert!(error.to_string().contains("missing required parameter"));
	}

	#[test]
	fn test_error_is_send_sync() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<InvokerError>();
	}
}
