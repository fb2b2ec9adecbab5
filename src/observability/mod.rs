//! Observability for kernel requests.
//!
//! Request, tool and response events are emitted through `tracing`; the
//! [`Logger`] additionally keeps a markdown transcript on disk. The crate
//! never installs a subscriber.
//!
//! # Example
//!
//! ```no_run
//! use toolchat::observability::Logger;
//! use std::path::Path;
//!
//! let logger = Logger::new(Some(Path::new("/tmp/toolchat/transcript.md")), Some("DEBUG")).unwrap();
//!
//! logger.log_tool_execution("get_weather", r#"{"city":"London"}"#, "59°F (15°C)", true).unwrap();
//! logger.log_completion("content returned").unwrap();
//! ```

pub mod logger;

// Re-export main types for convenience
pub use logger::Logger;
