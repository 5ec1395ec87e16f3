// ⚙️ Build Options - knobs for a build pass, loadable from a JSON file

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What to do with a second time-series row for an already-populated period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSeriesPolicy {
    /// The later row replaces the earlier one
    #[default]
    Replace,

    /// Fail with `DuplicateTimeSeriesEntry`
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub time_series_policy: TimeSeriesPolicy,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_series_policy(mut self, policy: TimeSeriesPolicy) -> Self {
        self.time_series_policy = policy;
        self
    }

    /// Load options from a JSON file; missing fields keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse options file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_policy_is_replace() {
        assert_eq!(BuildOptions::default().time_series_policy, TimeSeriesPolicy::Replace);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "time_series_policy": "reject" }}"#).unwrap();

        let options = BuildOptions::from_json_file(file.path()).unwrap();
        assert_eq!(options.time_series_policy, TimeSeriesPolicy::Reject);
    }

    #[test]
    fn test_from_json_file_empty_object_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let options = BuildOptions::from_json_file(file.path()).unwrap();
        assert_eq!(options, BuildOptions::default());
    }

    #[test]
    fn test_from_missing_file_fails_with_context() {
        let err = BuildOptions::from_json_file("/nonexistent/options.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read options file"));
    }
}
