use crate::error::ScriptError;
use jsonmorph_context::Limits;
use serde::{Deserialize, Serialize};

/// Engine-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub limits: Limits,
    /// Stop at the first failing command instead of running the rest.
    pub halt_on_failure: bool,
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(!config.halt_on_failure);

        let config =
            EngineConfig::from_json(r#"{"haltOnFailure": true, "limits": {"maxExpressionDepth": 8}}"#)
                .unwrap();
        assert!(config.halt_on_failure);
        assert_eq!(config.limits.max_expression_depth, 8);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            EngineConfig::from_json("{"),
            Err(ScriptError::Json(_))
        ));
    }
}
