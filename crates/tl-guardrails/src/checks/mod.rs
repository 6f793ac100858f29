//! Concrete guardrail check implementations

pub mod sanitization;
