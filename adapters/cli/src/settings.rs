//! Loading replay settings from TOML.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use jewel_sweep_system_replay::ReplayConfig;

/// Reads and parses the settings file at `path`.
pub(crate) fn load(path: &Path) -> Result<ReplayConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse(contents: &str) -> Result<ReplayConfig> {
    toml::from_str(contents).context("failed to parse replay config toml contents")
}

#[cfg(test)]
mod tests {
    use super::*;
    use jewel_sweep_core::MovePolicy;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(parse("").expect("empty config"), ReplayConfig::default());
    }

    #[test]
    fn reads_every_field() {
        let config = parse("move_policy = \"permit\"\nmax_pattern_len = 500\n").expect("config");
        assert_eq!(config.move_policy, MovePolicy::Permit);
        assert_eq!(config.max_pattern_len, Some(500));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(parse("speed = 3\n").is_err());
    }

    #[test]
    fn rejects_unknown_policies() {
        assert!(parse("move_policy = \"wrap\"\n").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = load(Path::new("/nonexistent/jewel-sweep.toml")).expect_err("missing file");
        assert!(format!("{error:#}").contains("/nonexistent/jewel-sweep.toml"));
    }
}
