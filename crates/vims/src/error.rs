//! Engine error taxonomy.
//!
//! None of these ever escape to the host: a failed match resets the input
//! buffer, a rejected action drains the pending queue, an invalid setting
//! falls back to its default and a missing document turns actions into
//! no-ops.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VimError {
    #[error("no chord matches `{keys}`")]
    MatchFailed { keys: String },

    #[error("action `{action}` rejected")]
    ActionRejected {
        action: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid value `{value}` for `{field}`, using `{fallback}`")]
    InvalidConfiguration {
        field: String,
        value: String,
        fallback: String,
    },

    #[error("no active document")]
    NoActiveContext,
}

impl VimError {
    /// Returns true if `err` is (or wraps) a missing document.
    pub fn is_no_active_context(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<VimError>(), Some(VimError::NoActiveContext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = VimError::InvalidConfiguration {
            field: "editor.cursor_style".into(),
            value: "blinky".into(),
            fallback: "block".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value `blinky` for `editor.cursor_style`, using `block`"
        );
    }

    #[test]
    fn test_rejection_keeps_source() {
        let err = VimError::ActionRejected {
            action: "delete".into(),
            source: anyhow::anyhow!("buffer is read-only"),
        };
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("buffer is read-only"));
    }

    #[test]
    fn test_detects_no_active_context() {
        let err: anyhow::Error = VimError::NoActiveContext.into();
        assert!(VimError::is_no_active_context(&err));
        assert!(!VimError::is_no_active_context(&anyhow::anyhow!("other")));
    }
}
