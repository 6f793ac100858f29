//! The guardrail check capability

use crate::context::GuardrailContext;

/// Outcome of a single check's evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckVerdict {
    pub passed: bool,
    /// User-facing rejection reason; present only when blocked
    pub message: Option<String>,
}

impl CheckVerdict {
    /// The check found nothing objectionable
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: None,
        }
    }

    /// The check positively matched a policy violation
    pub fn block(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: Some(message.into()),
        }
    }
}

/// One pluggable unit of content policy.
///
/// Implementations must be stateless across requests: `evaluate` is called
/// concurrently by many in-flight requests against a shared instance.
/// Returning an error never blocks the request — the registry treats it as
/// that check failing open.
pub trait GuardrailCheck: Send + Sync {
    /// Stable name for logging
    fn name(&self) -> &str;

    /// Decide pass/fail for one request context
    fn evaluate(&self, context: &GuardrailContext) -> anyhow::Result<CheckVerdict>;
}
