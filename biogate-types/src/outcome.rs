//! Normalized results of mutating and matching operations

use std::fmt;

use serde::Serialize;

/// Why an operation did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Device answered and declined (no match, nothing to delete, ...)
    Rejected,

    /// No reply: not connected, timeout, socket or HTTP connection error
    Unreachable,

    /// Reply arrived but could not be understood (short frame, bad status,
    /// malformed body)
    Protocol,
}

/// Result of enroll, verify or delete
///
/// `success` is the contract callers check. `failure` and `code` are
/// diagnostics; they never turn a success into a failure or vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationOutcome {
    pub success: bool,

    /// Device result code, when the reply carries one
    pub code: Option<u32>,

    /// Device-supplied message, when the reply carries one
    pub message: Option<String>,

    /// Classification of a negative outcome
    pub failure: Option<FailureKind>,
}

pub type EnrollmentResult = OperationOutcome;
pub type VerificationResult = OperationOutcome;
pub type DeletionResult = OperationOutcome;

impl OperationOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            code: None,
            message: None,
            failure: None,
        }
    }

    pub fn failed(kind: FailureKind) -> Self {
        Self {
            success: false,
            code: None,
            message: None,
            failure: Some(kind),
        }
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// True when the device answered and declined
    pub fn is_rejected(&self) -> bool {
        self.failure == Some(FailureKind::Rejected)
    }

    /// True when the device could not be reached or did not answer usably
    pub fn is_unreachable(&self) -> bool {
        self.failure == Some(FailureKind::Unreachable)
    }
}

impl From<OperationOutcome> for bool {
    fn from(outcome: OperationOutcome) -> bool {
        outcome.success
    }
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.success, self.failure) {
            (true, _) => write!(f, "ok")?,
            (false, Some(kind)) => write!(f, "failed ({:?})", kind)?,
            (false, None) => write!(f, "failed")?,
        }
        if let Some(code) = self.code {
            write!(f, " code={}", code)?;
        }
        if let Some(message) = &self.message {
            write!(f, " message={:?}", message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_builders() {
        let ok = OperationOutcome::succeeded().with_code(1);
        assert!(ok.is_success());
        assert_eq!(ok.failure, None);
        assert_eq!(ok.to_string(), "ok code=1");

        let rejected = OperationOutcome::failed(FailureKind::Rejected)
            .with_code(0)
            .with_message("no match");
        assert!(!rejected.is_success());
        assert!(rejected.is_rejected());
        assert!(!rejected.is_unreachable());
        assert_eq!(rejected.to_string(), "failed (Rejected) code=0 message=\"no match\"");
    }

    #[test]
    fn test_outcome_into_bool() {
        assert!(bool::from(OperationOutcome::succeeded()));
        assert!(!bool::from(OperationOutcome::failed(FailureKind::Unreachable)));
    }
}
