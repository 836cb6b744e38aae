use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

use super::diff::CompareMode;
use crate::domain::{ConfigError, DiffError, LineId, Result};

/// Context rows kept around each diff line when folding.
pub const DEFAULT_EXTRA_LINES: usize = 3;

/// Options for computing a side-by-side diff. Every field has a default so
/// an options file only names what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Keep modified lines whole instead of splitting them into fragments.
    pub disable_word_diff: bool,
    /// Strategy for intra-line fragments.
    pub compare_mode: CompareMode,
    /// Added to every line number.
    pub lines_offset: usize,
    /// Lines that are never folded, e.g. `L-12` or `R-3`.
    pub always_show_lines: Vec<LineId>,
    /// Context rows kept visible on each side of a diff line.
    #[serde(deserialize_with = "deserialize_extra_lines")]
    pub extra_lines: usize,
    /// Fold unchanged regions. When false no blocks are computed.
    pub show_diff_only: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            disable_word_diff: false,
            compare_mode: CompareMode::default(),
            lines_offset: 0,
            always_show_lines: Vec::new(),
            extra_lines: DEFAULT_EXTRA_LINES,
            show_diff_only: true,
        }
    }
}

impl DiffOptions {
    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads options from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let wrap = |source: ConfigError| DiffError::Config {
            path: path.to_path_buf(),
            source,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| wrap(e.into()))?;
        let options = Self::from_toml_str(&contents).map_err(wrap)?;
        debug!("loaded diff options from {}", path.display());
        Ok(options)
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Clamps a context width to a non-negative whole number of rows.
pub fn clamp_extra_lines(value: f64) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    if value >= usize::MAX as f64 {
        return usize::MAX;
    }
    value.round() as usize
}

fn deserialize_extra_lines<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<usize, D::Error> {
    f64::deserialize(deserializer).map(clamp_extra_lines)
}

/// Loads the user's options, falling back to defaults when the file is
/// missing or unreadable.
pub fn load_options() -> DiffOptions {
    let path = config_path();
    if !path.exists() {
        debug!("no diff options at {}, using defaults", path.display());
        return DiffOptions::default();
    }
    DiffOptions::load(&path).unwrap_or_else(|err| {
        warn!("{err}; using default diff options");
        DiffOptions::default()
    })
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("SIDEDIFF_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    config_dir().join("options.toml")
}

fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("sidediff");
    }
    if let Some(home) = home::home_dir() {
        return home.join(".config").join("sidediff");
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".sidediff")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::diff::DiffMethod;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(DiffOptions::from_toml_str("").unwrap(), DiffOptions::default());
    }

    #[test]
    fn parses_all_fields() {
        let options = DiffOptions::from_toml_str(
            r#"
disable_word_diff = true
compare_mode = "diffWords"
lines_offset = 10
always_show_lines = ["L-4", "R-7"]
extra_lines = 5
show_diff_only = false
"#,
        )
        .unwrap();

        assert!(options.disable_word_diff);
        assert_eq!(options.compare_mode, CompareMode::Preset(DiffMethod::Words));
        assert_eq!(options.lines_offset, 10);
        assert_eq!(options.always_show_lines, vec![LineId::left(4), LineId::right(7)]);
        assert_eq!(options.extra_lines, 5);
        assert!(!options.show_diff_only);
    }

    #[test]
    fn extra_lines_are_clamped() {
        let negative = DiffOptions::from_toml_str("extra_lines = -2").unwrap();
        assert_eq!(negative.extra_lines, 0);

        let fractional = DiffOptions::from_toml_str("extra_lines = 2.6").unwrap();
        assert_eq!(fractional.extra_lines, 3);

        assert_eq!(clamp_extra_lines(f64::NAN), 0);
        assert_eq!(clamp_extra_lines(1.4), 1);
    }

    #[test]
    fn rejects_unknown_compare_mode_and_bad_line_ids() {
        let err = DiffOptions::from_toml_str(r#"compare_mode = "diffBytes""#).unwrap_err();
        assert!(err.to_string().contains("diffBytes"));

        assert!(DiffOptions::from_toml_str(r#"always_show_lines = ["line-4"]"#).is_err());
    }

    #[test]
    fn load_reports_path_on_failure() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "extra_lines = \"wide\"").unwrap();

        let err = DiffOptions::load(tmp.path()).unwrap_err();
        assert!(matches!(
            err,
            DiffError::Config { ref path, source: ConfigError::Parse(_) } if path == tmp.path()
        ));
    }

    #[test]
    fn toml_round_trip_keeps_options() {
        let options = DiffOptions {
            compare_mode: CompareMode::Preset(DiffMethod::Css),
            always_show_lines: vec![LineId::right(2)],
            extra_lines: 1,
            ..Default::default()
        };
        let text = options.to_toml_string().unwrap();
        assert_eq!(DiffOptions::from_toml_str(&text).unwrap(), options);
    }

    #[test]
    fn load_options_follows_env_path_and_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.toml");
        let prev = std::env::var_os("SIDEDIFF_CONFIG_PATH");
        unsafe {
            std::env::set_var("SIDEDIFF_CONFIG_PATH", &path);
        }

        assert_eq!(load_options(), DiffOptions::default());

        std::fs::write(&path, "extra_lines = 7\ncompare_mode = \"css\"").unwrap();
        let loaded = load_options();
        assert_eq!(loaded.extra_lines, 7);
        assert_eq!(loaded.compare_mode, CompareMode::Preset(DiffMethod::Css));

        std::fs::write(&path, "extra_lines = \"x\"").unwrap();
        assert_eq!(load_options(), DiffOptions::default());

        match prev {
            Some(value) => unsafe {
                std::env::set_var("SIDEDIFF_CONFIG_PATH", value);
            },
            None => unsafe {
                std::env::remove_var("SIDEDIFF_CONFIG_PATH");
            },
        }
    }
}
