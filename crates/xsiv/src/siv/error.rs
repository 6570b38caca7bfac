//! Error types for SIV operations

use thiserror::Error;

/// Errors from key schedule, seal, and open operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SivError {
    /// Master secret has the wrong size for the selected key mode
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Length required by the key mode
        expected: usize,
        /// Length supplied by the caller
        actual: usize,
    },

    /// Ciphertext is shorter than the authentication tag
    #[error("malformed ciphertext: need at least {minimum} bytes, got {actual}")]
    MalformedCiphertext {
        /// Minimum ciphertext length (the tag size)
        minimum: usize,
        /// Actual ciphertext length
        actual: usize,
    },

    /// Caller-supplied output buffer has the wrong size
    #[error("invalid buffer length: expected {expected}, got {actual}")]
    InvalidBufferLength {
        /// Required buffer length
        expected: usize,
        /// Supplied buffer length
        actual: usize,
    },

    /// Tag mismatch: tampered ciphertext, wrong associated data, or wrong key
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Underlying stream cipher or keyed hash rejected its parameters
    #[error("primitive error: {reason}")]
    Primitive {
        /// What the primitive rejected
        reason: String,
    },
}

impl SivError {
    /// Returns true if this error means the message must be rejected.
    ///
    /// Authentication failures are the expected outcome for forged input and
    /// are never retried with the same inputs.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed)
    }

    /// Returns true if this error is a sizing mistake at the call site.
    pub fn is_caller_misuse(&self) -> bool {
        match self {
            Self::InvalidKeyLength { .. } => true,
            Self::MalformedCiphertext { .. } => true,
            Self::InvalidBufferLength { .. } => true,

            // Security event, not misuse
            Self::AuthenticationFailed => false,
            // Integration bug in the primitive pairing
            Self::Primitive { .. } => false,
        }
    }

    pub(crate) fn primitive(reason: impl Into<String>) -> Self {
        Self::Primitive { reason: reason.into() }
    }
}
