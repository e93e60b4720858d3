//! # check-this-rules
//!
//! Built-in reliability rules for check-this.
//!
//! ## Available Rules
//!
//! | Id | Default | Description |
//! |----|---------|-------------|
//! | `errors.swallowed` | warning | Exception handlers that do nothing |
//! | `net.no_timeout` | warning | HTTP client calls without a timeout |
//! | `retry.unbounded` | warning | Infinite loops with no exit or backoff |
//! | `state.global_mutable` | info | Module-level mutable containers |
//!
//! Every rule supports Python, JavaScript and TypeScript.
//!
//! ## Usage
//!
//! ```ignore
//! use check_this_core::AnalyzeRequest;
//! use check_this_rules::default_engine;
//!
//! let engine = default_engine();
//! let request = AnalyzeRequest::new("python", source).validate()?;
//! let output = engine.analyze(&request);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors_swallowed;
pub mod global_mutable_state;
pub mod net_no_timeout;
mod presets;
pub mod retry_unbounded;

pub use errors_swallowed::ErrorsSwallowed;
pub use global_mutable_state::GlobalMutableState;
pub use net_no_timeout::NetNoTimeout;
pub use presets::{all_rules, default_engine};
pub use retry_unbounded::RetryUnbounded;

/// Re-export core types for convenience.
pub use check_this_core::{Diagnostic, Rule, Severity};
