//! Build configuration

use serde::{Deserialize, Serialize};

/// What to do when two parts carry the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateNamePolicy {
    /// Abort the build with `DuplicateInstrument`
    Reject,
    /// Rename later parts to "Name (2)", "Name (3)", ...
    Disambiguate,
}

/// Options for building a score from MusicXML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildSettings {
    /// `<forward>` moves the time cursor back like `<backup>`.
    ///
    /// This matches the long-standing behaviour of existing beat maps.
    /// Set to `false` to make `<forward>` advance the cursor.
    pub forward_rewinds: bool,

    pub duplicate_names: DuplicateNamePolicy,

    /// Drop grace notes instead of merging them at the current beat
    pub skip_grace_notes: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            forward_rewinds: true,
            duplicate_names: DuplicateNamePolicy::Reject,
            skip_grace_notes: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: BuildSettings = serde_json::from_str(r#"{"forwardRewinds": false}"#).unwrap();
        assert!(!settings.forward_rewinds);
        assert_eq!(settings.duplicate_names, DuplicateNamePolicy::Reject);
        assert!(settings.skip_grace_notes);
    }

    #[test]
    fn test_policy_names() {
        let settings: BuildSettings =
            serde_json::from_str(r#"{"duplicateNames": "disambiguate"}"#).unwrap();
        assert_eq!(settings.duplicate_names, DuplicateNamePolicy::Disambiguate);
    }
}
