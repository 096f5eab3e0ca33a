//! Configuration for a harness run.
//!
//! Everything is read from environment variables with defaults, so the
//! binary runs with no setup at all.

use std::path::PathBuf;

use crate::error::HarnessError;

/// Report path used by `-e` when no path is given.
pub const DEFAULT_EXPORT_PATH: &str = "test_result.json";

/// Complete harness configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Print `[START]`/`[OK]`/`[FAIL]` lines while the scenarios run.
    pub print_progress: bool,
    /// Pause for Enter after printing the on-screen report.
    pub wait_for_key: bool,
    /// Where `-e` writes the JSON report when no path is given.
    pub export_path: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            print_progress: false,
            wait_for_key: true,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `CONTAGION_PRINT_PROGRESS` -- print per-test progress (default `false`)
    /// - `CONTAGION_WAIT_FOR_KEY` -- wait for Enter after the report (default `true`)
    /// - `CONTAGION_EXPORT_PATH` -- default report path (default `test_result.json`)
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HarnessError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let print_progress: bool = lookup("CONTAGION_PRINT_PROGRESS")
            .unwrap_or_else(|| "false".to_owned())
            .parse()
            .map_err(|e| HarnessError::Config(format!("invalid CONTAGION_PRINT_PROGRESS: {e}")))?;

        let wait_for_key: bool = lookup("CONTAGION_WAIT_FOR_KEY")
            .unwrap_or_else(|| "true".to_owned())
            .parse()
            .map_err(|e| HarnessError::Config(format!("invalid CONTAGION_WAIT_FOR_KEY: {e}")))?;

        let export_path = lookup("CONTAGION_EXPORT_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH), PathBuf::from);

        Ok(Self {
            print_progress,
            wait_for_key,
            export_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = HarnessConfig::from_lookup(lookup_in(&[])).ok();
        assert_eq!(config, Some(HarnessConfig::default()));
    }

    #[test]
    fn values_are_parsed() {
        let config = HarnessConfig::from_lookup(lookup_in(&[
            ("CONTAGION_PRINT_PROGRESS", "true"),
            ("CONTAGION_WAIT_FOR_KEY", "false"),
            ("CONTAGION_EXPORT_PATH", "out/report.json"),
        ]))
        .ok();
        assert_eq!(
            config,
            Some(HarnessConfig {
                print_progress: true,
                wait_for_key: false,
                export_path: PathBuf::from("out/report.json"),
            })
        );
    }

    #[test]
    fn malformed_bool_is_a_config_error() {
        let result = HarnessConfig::from_lookup(lookup_in(&[("CONTAGION_WAIT_FOR_KEY", "maybe")]));
        assert!(matches!(result, Err(HarnessError::Config(ref m)) if m.contains("CONTAGION_WAIT_FOR_KEY")));
    }
}
