use serde::Deserialize;

use crate::error::Result;

/// Level-wide settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LevelConfig {
    /// Report actor/actor overlaps found while actors move.
    pub report_actor_overlaps: bool,
    /// Maximum number of overlap events kept per frame; extra are dropped.
    pub max_overlap_events: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            report_actor_overlaps: true,
            max_overlap_events: 1024,
        }
    }
}

impl LevelConfig {
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LevelError;

    #[test]
    fn test_missing_fields_use_defaults() {
        let cfg = LevelConfig::from_json_str(r#"{ "max_overlap_events": 8 }"#).unwrap();
        assert_eq!(cfg.max_overlap_events, 8);
        assert!(cfg.report_actor_overlaps);
        assert_eq!(LevelConfig::from_json_str("{}").unwrap(), LevelConfig::default());
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = LevelConfig::from_json_str(r#"{ "report_actor_overlaps": 3 }"#).unwrap_err();
        assert!(matches!(err, LevelError::Config(_)));
    }
}
