//! Ordered registry of guardrail checks

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::check::GuardrailCheck;
use crate::context::GuardrailContext;

/// Aggregated decision for one request.
///
/// Invariant: `error_message` is `Some` exactly when `passed` is false.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuardrailResult {
    pub passed: bool,
    pub error_message: Option<String>,
}

impl GuardrailResult {
    /// Every check passed (or none ran)
    pub fn allowed() -> Self {
        Self {
            passed: true,
            error_message: None,
        }
    }

    /// A check positively matched; carries its rejection message
    pub fn blocked(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            error_message: Some(message.into()),
        }
    }
}

/// Ordered set of guardrail checks, populated once at startup and then
/// shared read-only across all in-flight requests.
///
/// Registration order is significant: it defines evaluation and
/// short-circuit order.
#[derive(Default)]
pub struct GuardrailRegistry {
    checks: Vec<Box<dyn GuardrailCheck>>,
}

impl GuardrailRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a check. Call before the server starts accepting requests;
    /// registration itself is not synchronized.
    pub fn register(&mut self, check: Box<dyn GuardrailCheck>) {
        info!("Registered guardrail check: {}", check.name());
        self.checks.push(check);
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Evaluate every registered check against one context.
    ///
    /// Stops at the first failing check and returns its message. A check
    /// that errors or panics fails open: it counts as a pass and the
    /// remaining checks still run.
    pub fn run_all(&self, context: &GuardrailContext) -> GuardrailResult {
        for check in &self.checks {
            let verdict = match catch_unwind(AssertUnwindSafe(|| check.evaluate(context))) {
                Ok(Ok(verdict)) => verdict,
                Ok(Err(e)) => {
                    debug!("Check '{}' errored, failing open: {}", check.name(), e);
                    continue;
                }
                Err(_) => {
                    debug!("Check '{}' panicked, failing open", check.name());
                    continue;
                }
            };

            if !verdict.passed {
                let message = verdict
                    .message
                    .unwrap_or_else(|| "Request blocked by content policy.".to_string());
                warn!("Guardrail '{}' blocked request: {}", check.name(), message);
                return GuardrailResult::blocked(message);
            }
        }
        GuardrailResult::allowed()
    }
}

impl std::fmt::Debug for GuardrailRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.checks.iter().map(|c| c.name()).collect();
        f.debug_struct("GuardrailRegistry")
            .field("checks", &names)
            .finish()
    }
}
