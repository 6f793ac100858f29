//! Guardrails: content inspection for inbound chat requests
//!
//! Pluggable checks run against the newest user-authored text before a
//! request reaches the agent. A registry evaluates every registered check in
//! order and aggregates to a single pass/fail decision.
//!
//! # Architecture
//!
//! - **Text extractor**: pulls candidate strings out of an arbitrary JSON
//!   request body (newest user message first, deep-scan fallback)
//! - **Check**: one unit of content policy (`GuardrailCheck` trait)
//! - **Registry**: ordered set of checks, short-circuits on first failure
//!
//! # Usage
//!
//! ```rust
//! use tl_guardrails::{GuardrailContext, GuardrailRegistry, SanitizationCheck};
//!
//! let mut registry = GuardrailRegistry::new();
//! let patterns = tl_guardrails::default_blocked_patterns();
//! registry.register(Box::new(SanitizationCheck::new(&patterns, None).unwrap()));
//!
//! let body = serde_json::json!({
//!     "messages": [{"role": "user", "content": "Hello!"}]
//! });
//! let context = GuardrailContext::from_body(body, Default::default());
//! let result = registry.run_all(&context);
//! assert!(result.passed);
//! ```

pub mod check;
pub mod checks;
pub mod context;
pub mod registry;
pub mod text_extractor;

pub use check::{CheckVerdict, GuardrailCheck};
pub use checks::sanitization::{default_blocked_patterns, SanitizationCheck};
pub use context::GuardrailContext;
pub use registry::{GuardrailRegistry, GuardrailResult};
pub use text_extractor::{extract_last_user_message, extract_text_from_json};
