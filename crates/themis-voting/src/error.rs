//! # Voting Error Types
//!
//! Structured errors for the commit-reveal voting engine. As everywhere in
//! the engine, an error means the operation applied nothing.

use thiserror::Error;

use themis_stake::StakeError;

/// Errors from commit-reveal voting operations.
#[derive(Error, Debug)]
pub enum VotingError {
    /// The caller is not a whitelisted arbiter.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The referenced claim does not exist or is not eligible for voting.
    #[error("invalid claim: {0}")]
    InvalidClaim(String),

    /// The operation is invalid for the current poll or record state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The revealed choice and salt do not hash to the committed digest.
    #[error("reveal does not match the committed digest")]
    RevealMismatch,

    /// The relevant window has not opened (or not closed) yet.
    #[error("window still open: {0}")]
    WindowOpen(String),

    /// The relevant window has already closed.
    #[error("window closed: {0}")]
    WindowClosed(String),

    /// Forwarding the ruling into the stake state machine failed.
    #[error(transparent)]
    Stake(#[from] StakeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_mismatch_display() {
        let err = VotingError::RevealMismatch;
        assert!(format!("{err}").contains("committed digest"));
    }

    #[test]
    fn stake_error_passthrough() {
        let err = VotingError::from(StakeError::InvalidClaim(3));
        assert!(format!("{err}").contains("unknown claim 3"));
    }

    #[test]
    fn all_variants_are_debug() {
        let variants: Vec<VotingError> = vec![
            VotingError::Unauthorized("a".to_string()),
            VotingError::InvalidClaim("b".to_string()),
            VotingError::InvalidState("c".to_string()),
            VotingError::RevealMismatch,
            VotingError::WindowOpen("d".to_string()),
            VotingError::WindowClosed("e".to_string()),
        ];
        for v in variants {
            assert!(!format!("{v:?}").is_empty());
        }
    }
}
