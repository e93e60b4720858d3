//! Layered configuration loading.
//!
//! An explicit `--config` file is used on its own. Otherwise the global file
//! (`$CHECK_THIS_CONFIG_DIR` or `~/.check-this/`, named `config.json` or
//! `config.toml`) is loaded first and the project file found next to the
//! analyzed path is merged over it, rule entry by rule entry. Missing layers
//! are skipped; with no layers at all the defaults apply.

use check_this_core::{Config, ConfigError};
use std::path::{Path, PathBuf};

/// File names recognised in the directory of the analyzed file.
const PROJECT_CONFIG_NAMES: &[&str] = &[
    "check-this.json",
    ".check-this.json",
    "check-this.toml",
    ".check-this.toml",
];

/// File names recognised in the global config directory.
const GLOBAL_CONFIG_NAMES: &[&str] = &["config.json", "config.toml"];

/// Overrides the global config directory.
const CONFIG_DIR_ENV: &str = "CHECK_THIS_CONFIG_DIR";

/// Configuration together with the files it was built from, lowest
/// precedence first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedConfig {
    /// Effective configuration.
    pub config: Config,
    /// Files that contributed to `config`.
    pub sources: Vec<PathBuf>,
}

/// Why a configuration layer could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Two config files compete for the same layer.
    #[error("Ambiguous config: both {} and {} exist", first.display(), second.display())]
    Ambiguous {
        /// File that would have been picked.
        first: PathBuf,
        /// File that would have been ignored.
        second: PathBuf,
    },

    /// A config file exists but cannot be read or parsed.
    #[error(transparent)]
    Load(#[from] ConfigError),
}

/// Loads the configuration that applies to files in `project_dir`.
///
/// # Errors
///
/// See [`ResolveError`].
pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<LoadedConfig, ResolveError> {
    load_from(project_dir, explicit, global_config_dir().as_deref())
}

/// [`load`] with the global directory passed in, so tests stay off the
/// process environment.
fn load_from(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<&Path>,
) -> Result<LoadedConfig, ResolveError> {
    if let Some(path) = explicit {
        return Ok(LoadedConfig {
            config: Config::from_file(path)?,
            sources: vec![path.to_path_buf()],
        });
    }

    let layers = [
        global_dir.map(|dir| (dir, GLOBAL_CONFIG_NAMES)),
        Some((project_dir, PROJECT_CONFIG_NAMES)),
    ];
    let mut loaded = LoadedConfig::default();
    for (dir, names) in layers.into_iter().flatten() {
        let Some(path) = find_single(dir, names)? else {
            continue;
        };
        tracing::debug!("Loading config layer: {}", path.display());
        let layer = Config::from_file(&path)?;
        loaded.config = loaded.config.merge(&layer);
        loaded.sources.push(path);
    }
    Ok(loaded)
}

/// The one file in `dir` matching `names`, if any.
fn find_single(dir: &Path, names: &[&str]) -> Result<Option<PathBuf>, ResolveError> {
    let mut found = names.iter().map(|n| dir.join(n)).filter(|p| p.is_file());
    let Some(first) = found.next() else {
        return Ok(None);
    };
    match found.next() {
        Some(second) => Err(ResolveError::Ambiguous { first, second }),
        None => Ok(Some(first)),
    }
}

/// `$CHECK_THIS_CONFIG_DIR`, else `~/.check-this`.
fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".check-this")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use check_this_core::Severity;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn project_layer_overrides_global_entry_by_entry() {
        let global = TempDir::new().unwrap();
        fs::write(
            global.path().join("config.toml"),
            r#"
[rules."net.no_timeout"]
severity = "info"

[rules."state.global_mutable"]
enabled = false
"#,
        )
        .unwrap();
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join(".check-this.json"),
            r#"{"rules": {"net.no_timeout": {"severity": "error"}}}"#,
        )
        .unwrap();

        let loaded = load_from(project.path(), None, Some(global.path())).unwrap();
        assert_eq!(
            loaded.config.rule_severity("net.no_timeout"),
            Some(Severity::Error)
        );
        assert!(!loaded.config.is_rule_enabled("state.global_mutable"));
        assert_eq!(
            loaded.sources,
            vec![
                global.path().join("config.toml"),
                project.path().join(".check-this.json"),
            ]
        );
    }

    #[test]
    fn explicit_file_ignores_other_layers() {
        let global = TempDir::new().unwrap();
        fs::write(
            global.path().join("config.json"),
            r#"{"rules": {"errors.swallowed": {"enabled": false}}}"#,
        )
        .unwrap();
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join("check-this.toml"),
            "[rules.\"retry.unbounded\"]\nenabled = false\n",
        )
        .unwrap();
        let explicit = project.path().join("ci.toml");
        fs::write(&explicit, "[rules.\"net.no_timeout\"]\nseverity = \"error\"\n").unwrap();

        let loaded = load_from(project.path(), Some(&explicit), Some(global.path())).unwrap();
        assert!(loaded.config.is_rule_enabled("errors.swallowed"));
        assert!(loaded.config.is_rule_enabled("retry.unbounded"));
        assert_eq!(
            loaded.config.rule_severity("net.no_timeout"),
            Some(Severity::Error)
        );
        assert_eq!(loaded.sources, vec![explicit]);
    }

    #[test]
    fn missing_explicit_file_is_a_load_error() {
        let project = TempDir::new().unwrap();
        let missing = project.path().join("absent.json");
        let err = load_from(project.path(), Some(&missing), None).unwrap_err();
        assert!(matches!(err, ResolveError::Load(ConfigError::Io { .. })));
    }

    #[test]
    fn json_and_toml_side_by_side_is_ambiguous() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("check-this.json"), "{}").unwrap();
        fs::write(project.path().join(".check-this.toml"), "").unwrap();

        let err = load_from(project.path(), None, None).unwrap_err();
        match err {
            ResolveError::Ambiguous { first, second } => {
                assert_eq!(first, project.path().join("check-this.json"));
                assert_eq!(second, project.path().join(".check-this.toml"));
            }
            other => panic!("expected ambiguity, got {other}"),
        }
    }

    #[test]
    fn empty_project_file_keeps_defaults() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("check-this.toml"), "\n").unwrap();

        let loaded = load_from(project.path(), None, None).unwrap();
        assert_eq!(loaded.config, Config::default());
        assert_eq!(loaded.sources.len(), 1);
    }

    #[test]
    fn no_files_anywhere_yields_defaults() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let loaded = load_from(project.path(), None, Some(global.path())).unwrap();
        assert_eq!(loaded, LoadedConfig::default());
    }

    #[test]
    fn malformed_global_file_is_reported() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.json"), "{ nope").unwrap();

        let err = load_from(project.path(), None, Some(global.path())).unwrap_err();
        assert!(matches!(err, ResolveError::Load(ConfigError::Json(_))));
    }
}
