//! `smb` settings from TOML files and command-line flags.
//!
//! Layers, lowest first: built-in defaults, `~/.config/smb/config.toml`,
//! `./.smb.toml`, the file named by `$SMB_CONFIG`, the `--config` file, and
//! finally the flags themselves. A key set in a higher layer replaces the
//! same key below it; unset keys fall through.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::materials::navigator::ViewMode;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FILE: &str = "smb.log";

const ENV_CONFIG: &str = "SMB_CONFIG";
const LOCAL_FILE: &str = ".smb.toml";

/// `[general]`
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Catalog JSON to open when no path is given on the command line.
    pub catalog: Option<String>,
    /// Module id or slug; the catalog's first module when unset.
    pub module: Option<String>,
    pub mouse: Option<bool>,
    /// `hierarchical`, `flat`, or `outline`.
    pub view_mode: Option<String>,
}

/// `[tree]`
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// Nerd font glyphs; ASCII markers when false.
    pub use_icons: Option<bool>,
    /// Material count beside each folder.
    pub show_counts: Option<bool>,
}

/// `[log]`
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// An `EnvFilter` directive; `RUST_LOG` beats it.
    pub level: Option<String>,
    pub file: Option<String>,
}

/// `[theme.custom]`: hex overrides applied on top of the dark palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub tree_fg: Option<String>,
    pub tree_selected_bg: Option<String>,
    pub tree_selected_fg: Option<String>,
    pub tree_dir_fg: Option<String>,
    pub tree_file_fg: Option<String>,
    pub breadcrumb_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
    pub dialog_bg: Option<String>,
    pub dialog_border_fg: Option<String>,
}

/// `[theme]`
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// `dark`, `light`, or `custom`.
    pub scheme: Option<String>,
    pub custom: Option<ThemeColorsConfig>,
}

/// One parsed layer, or the result of stacking several.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub tree: TreeConfig,
    pub log: LogConfig,
    pub theme: ThemeConfig,
}

/// The stacked config plus what happened while reading it.
///
/// Logging is configured from this result, so file problems are collected
/// here and logged by the caller once the subscriber exists.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// Files that were found and parsed, lowest layer first.
    pub sources: Vec<PathBuf>,
    /// Files that exist but could not be read or parsed.
    pub warnings: Vec<String>,
}

/// Files to try, lowest layer first. `--config` is stacked separately.
fn layer_paths() -> Vec<PathBuf> {
    let global = dirs::config_dir().map(|dir| dir.join("smb").join("config.toml"));
    let local = std::env::current_dir().ok().map(|cwd| cwd.join(LOCAL_FILE));
    let env = std::env::var_os(ENV_CONFIG).map(PathBuf::from);
    [global, local, env].into_iter().flatten().collect()
}

/// Read one layer. A missing file is `Ok(None)`; a broken one is an error
/// message naming the file.
fn read_layer(path: &Path) -> Result<Option<AppConfig>, String> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(format!("cannot read {}: {}", path.display(), e)),
    };
    toml::from_str(&text)
        .map(Some)
        .map_err(|e| format!("ignoring {}: {}", path.display(), e))
}

fn pick<T: Clone>(top: &Option<T>, below: Option<T>) -> Option<T> {
    top.clone().or(below)
}

impl AppConfig {
    /// `top` stacked over `self`.
    pub fn overlay(self, top: &AppConfig) -> AppConfig {
        let general = GeneralConfig {
            catalog: pick(&top.general.catalog, self.general.catalog),
            module: pick(&top.general.module, self.general.module),
            mouse: pick(&top.general.mouse, self.general.mouse),
            view_mode: pick(&top.general.view_mode, self.general.view_mode),
        };
        let tree = TreeConfig {
            use_icons: pick(&top.tree.use_icons, self.tree.use_icons),
            show_counts: pick(&top.tree.show_counts, self.tree.show_counts),
        };
        let log = LogConfig {
            level: pick(&top.log.level, self.log.level),
            file: pick(&top.log.file, self.log.file),
        };
        // A custom palette is replaced whole, not key by key.
        let theme = ThemeConfig {
            scheme: pick(&top.theme.scheme, self.theme.scheme),
            custom: pick(&top.theme.custom, self.theme.custom),
        };
        AppConfig {
            general,
            tree,
            log,
            theme,
        }
    }

    /// Stack every layer. `explicit` is the `--config` file and `flags` the
    /// command-line layer.
    pub fn load(explicit: Option<&Path>, flags: Option<&AppConfig>) -> LoadedConfig {
        let mut loaded = LoadedConfig::default();
        let files = layer_paths().into_iter().chain(explicit.map(Path::to_path_buf));
        for path in files {
            match read_layer(&path) {
                Ok(Some(layer)) => {
                    loaded.config = loaded.config.overlay(&layer);
                    loaded.sources.push(path);
                }
                Ok(None) => {}
                Err(warning) => loaded.warnings.push(warning),
            }
        }
        if let Some(flags) = flags {
            loaded.config = loaded.config.overlay(flags);
        }
        loaded
    }

    pub fn catalog(&self) -> Option<&str> {
        self.general.catalog.as_deref()
    }

    pub fn module(&self) -> Option<&str> {
        self.general.module.as_deref()
    }

    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(false)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.general
            .view_mode
            .as_deref()
            .map(ViewMode::from_str)
            .unwrap_or_default()
    }

    pub fn use_icons(&self) -> bool {
        self.tree.use_icons.unwrap_or(true)
    }

    pub fn show_counts(&self) -> bool {
        self.tree.show_counts.unwrap_or(true)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Configured file, else `<cache dir>/smb/smb.log`, else `./smb.log`.
    pub fn log_file(&self) -> PathBuf {
        match &self.log.file {
            Some(file) => PathBuf::from(file),
            None => dirs::cache_dir()
                .map(|dir| dir.join("smb").join(DEFAULT_LOG_FILE))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> AppConfig {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn defaults_without_any_layer() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.catalog(), None);
        assert_eq!(cfg.module(), None);
        assert!(!cfg.mouse_enabled());
        assert_eq!(cfg.view_mode(), ViewMode::Hierarchical);
        assert!(cfg.use_icons());
        assert!(cfg.show_counts());
        assert_eq!(cfg.log_level(), DEFAULT_LOG_LEVEL);
        assert!(cfg.log_file().ends_with(DEFAULT_LOG_FILE));
        assert!(cfg.theme.scheme.is_none());
    }

    #[test]
    fn every_section_parses() {
        let cfg = parse(
            r#"
[general]
catalog = "/srv/catalog.json"
module = "saude"
mouse = true
view_mode = "outline"

[tree]
use_icons = false
show_counts = false

[log]
level = "debug"
file = "/tmp/smb-test.log"

[theme]
scheme = "light"
"#,
        );
        assert_eq!(cfg.catalog(), Some("/srv/catalog.json"));
        assert_eq!(cfg.module(), Some("saude"));
        assert!(cfg.mouse_enabled());
        assert_eq!(cfg.view_mode(), ViewMode::Outline);
        assert!(!cfg.use_icons());
        assert!(!cfg.show_counts());
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.log_file(), PathBuf::from("/tmp/smb-test.log"));
        assert_eq!(cfg.theme.scheme.as_deref(), Some("light"));
    }

    #[test]
    fn partial_and_empty_files_keep_defaults() {
        let cfg = parse("[general]\nview_mode = \"flat\"\n");
        assert_eq!(cfg.view_mode(), ViewMode::Flat);
        assert!(cfg.use_icons());
        assert_eq!(parse("").view_mode(), ViewMode::Hierarchical);
    }

    #[test]
    fn unknown_view_mode_is_hierarchical() {
        assert_eq!(
            parse("[general]\nview_mode = \"grid\"").view_mode(),
            ViewMode::Hierarchical
        );
    }

    #[test]
    fn upper_layer_wins_per_key() {
        let below = parse(
            r#"
[general]
module = "ti"
mouse = true
[log]
level = "warn"
file = "/tmp/a.log"
"#,
        );
        let top = parse("[general]\nmodule = \"saude\"\n[log]\nlevel = \"debug\"\n");
        let cfg = below.overlay(&top);
        assert_eq!(cfg.module(), Some("saude"));
        assert!(cfg.mouse_enabled());
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.log_file(), PathBuf::from("/tmp/a.log"));
    }

    #[test]
    fn empty_layer_changes_nothing() {
        let below = parse("[tree]\nuse_icons = false\nshow_counts = false\n");
        let cfg = below.overlay(&AppConfig::default());
        assert!(!cfg.use_icons());
        assert!(!cfg.show_counts());
    }

    #[test]
    fn custom_palette_is_replaced_whole() {
        let below = parse("[theme.custom]\ntree_fg = \"#111111\"\n");
        let top = parse("[theme.custom]\nborder_fg = \"#222222\"\n");
        let custom = below.overlay(&top).theme.custom.unwrap();
        assert_eq!(custom.border_fg.as_deref(), Some("#222222"));
        assert!(custom.tree_fg.is_none());
    }

    #[test]
    fn read_layer_outcomes() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[general]\nmodule = \"engenharia\"\n").unwrap();
        let layer = read_layer(&good).unwrap().unwrap();
        assert_eq!(layer.module(), Some("engenharia"));

        assert!(read_layer(&dir.path().join("absent.toml")).unwrap().is_none());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "this is { not valid toml").unwrap();
        let err = read_layer(&bad).unwrap_err();
        assert!(err.contains("bad.toml"));
    }

    #[test]
    fn explicit_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\nmodule = \"ti\"\nview_mode = \"outline\"\n").unwrap();

        let flags = AppConfig {
            general: GeneralConfig {
                view_mode: Some("flat".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let loaded = AppConfig::load(Some(&path), Some(&flags));
        assert_eq!(loaded.config.view_mode(), ViewMode::Flat);
        assert_eq!(loaded.config.module(), Some("ti"));
        assert_eq!(loaded.sources.last(), Some(&path));
    }

    #[test]
    fn broken_explicit_file_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[general\n").unwrap();
        let loaded = AppConfig::load(Some(&path), None);
        assert!(loaded.warnings.iter().any(|w| w.contains("broken.toml")));
        assert!(!loaded.sources.contains(&path));
    }

    #[test]
    fn custom_colors_parse() {
        let cfg = parse(
            r##"
[theme]
scheme = "custom"

[theme.custom]
tree_dir_fg = "#88c0d0"
breadcrumb_fg = "#ebcb8b"
"##,
        );
        assert_eq!(cfg.theme.scheme.as_deref(), Some("custom"));
        let custom = cfg.theme.custom.as_ref().unwrap();
        assert_eq!(custom.tree_dir_fg.as_deref(), Some("#88c0d0"));
        assert_eq!(custom.breadcrumb_fg.as_deref(), Some("#ebcb8b"));
        assert!(custom.dialog_bg.is_none());
    }
}
