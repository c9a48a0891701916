//! Error type for the fallible edges of the crate.
//!
//! The kinetics themselves are total functions and never fail. Errors only
//! arise where outside data enters: decoding a persisted type code, validating
//! a loaded configuration, or restoring a snapshot written by a newer format.

/// Errors raised at configuration and persistence boundaries.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum KineticsError {
    /// A persisted antibody type code outside the known range `0..=3`.
    #[error("unknown antibody type code: {0}")]
    UnknownAntibodyType(i32),
    /// A configuration parameter outside its usable domain.
    #[error("invalid immunity parameter {name}: {value}")]
    InvalidParameter {
        /// Field name on [`ImmunityParams`](crate::params::ImmunityParams).
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// A snapshot written with a format version this build cannot read.
    #[error("unsupported snapshot version: {0}")]
    UnsupportedSnapshotVersion(u16),
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate alloc;
    use alloc::string::ToString;

    fn assert_error<E: core::error::Error>(_: &E) {}

    #[test]
    fn test_implements_error_trait() {
        assert_error(&KineticsError::UnsupportedSnapshotVersion(2));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            KineticsError::UnknownAntibodyType(7).to_string(),
            "unknown antibody type code: 7"
        );
        assert_eq!(
            KineticsError::InvalidParameter { name: "antibody_csp_decay_days", value: 0.0 }
                .to_string(),
            "invalid immunity parameter antibody_csp_decay_days: 0"
        );
        assert_eq!(
            KineticsError::UnsupportedSnapshotVersion(9).to_string(),
            "unsupported snapshot version: 9"
        );
    }
}
