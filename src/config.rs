//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treelist/treelist.toml`
//! 3. Local config: explicit `--config` file, else `./.treelist.toml`
//! 4. Environment variables: `TREELIST_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{FieldNames, Markers, RecordId, TreeOptions, DEFAULT_INDENT};

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    /// Glyphs `[vertical, branch, last_branch]`
    pub markers: Markers,
    /// Indent/continuation token appended per level
    pub indent: String,
    /// Parent value marking top-level records
    pub root: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            indent: DEFAULT_INDENT.to_string(),
            root: RecordId::root().to_string(),
        }
    }
}

/// Raw field names for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawFieldNames {
    pub parent: Option<String>,
    pub child: Option<String>,
    pub name: Option<String>,
    pub spacer: Option<String>,
    pub id: Option<String>,
}

/// Raw render settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub markers: Option<Markers>,
    pub indent: Option<String>,
    pub root: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub fields: RawFieldNames,
    pub render: RawRenderSettings,
}

/// Unified configuration for treelist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Record field names
    pub fields: FieldNames,
    /// Glyphs, indent and root sentinel
    pub render: RenderSettings,
}

/// Get the XDG config directory for treelist.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treelist").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treelist.toml"))
}

/// Get the path to the implicit local config file.
pub fn local_config_path() -> PathBuf {
    PathBuf::from(".treelist.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        let fields = &overlay.fields;
        let render = &overlay.render;
        Self {
            fields: FieldNames {
                parent: fields.parent.clone().unwrap_or_else(|| self.fields.parent.clone()),
                child: fields.child.clone().unwrap_or_else(|| self.fields.child.clone()),
                name: fields.name.clone().unwrap_or_else(|| self.fields.name.clone()),
                spacer: fields.spacer.clone().unwrap_or_else(|| self.fields.spacer.clone()),
                id: fields.id.clone().unwrap_or_else(|| self.fields.id.clone()),
            },
            render: RenderSettings {
                markers: render
                    .markers
                    .clone()
                    .unwrap_or_else(|| self.render.markers.clone()),
                indent: render.indent.clone().unwrap_or_else(|| self.render.indent.clone()),
                root: render.root.clone().unwrap_or_else(|| self.render.root.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit local config file; must exist when given.
    ///   Without it `./.treelist.toml` is used if present.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/treelist/treelist.toml`
    /// 3. Local config
    /// 4. Environment variables: `TREELIST_*` prefix
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        match local {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                debug!("load: local config {}", path.display());
                current = current.merge_with(&load_raw_settings(path)?);
            }
            None => {
                let implicit = local_config_path();
                if implicit.exists() {
                    debug!("load: local config {}", implicit.display());
                    current = current.merge_with(&load_raw_settings(&implicit)?);
                }
            }
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply TREELIST_* environment variables as explicit overrides.
    ///
    /// `TREELIST_FIELDS__NAME=title` sets `fields.name`;
    /// `TREELIST_RENDER__MARKERS="|,|-,`-"` sets all three glyphs.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("TREELIST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("render.markers"),
        );

        let config = builder.build().map_err(config_err)?;

        let targets = [
            ("fields.parent", &mut settings.fields.parent),
            ("fields.child", &mut settings.fields.child),
            ("fields.name", &mut settings.fields.name),
            ("fields.spacer", &mut settings.fields.spacer),
            ("fields.id", &mut settings.fields.id),
            ("render.indent", &mut settings.render.indent),
            ("render.root", &mut settings.render.root),
        ];
        for (key, target) in targets {
            if let Some(val) = env_value(config.get_string(key))? {
                debug!("env override: {key}");
                *target = val;
            }
        }
        if let Some(val) = env_value(config.get::<Vec<String>>("render.markers"))? {
            let glyphs: [String; 3] = val.try_into().map_err(|v: Vec<String>| {
                ApplicationError::Config {
                    message: format!("TREELIST_RENDER__MARKERS needs 3 glyphs, got {}", v.len()),
                }
            })?;
            settings.render.markers = Markers::from(glyphs);
        }

        Ok(settings)
    }

    /// Domain options for the tree builder.
    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            fields: self.fields.clone(),
            markers: self.render.markers.clone(),
            indent: self.render.indent.clone(),
            root: RecordId::new(&self.render.root),
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treelist configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treelist/treelist.toml
#   Local:  ./.treelist.toml or the file given with --config
#   Env:    TREELIST_* environment variables, e.g. TREELIST_FIELDS__NAME=title
#           TREELIST_RENDER__MARKERS="│,├,└"

[fields]
# Field holding the parent record id
# parent = "parentid"

# Output field holding nested children
# child = "child"

# Field holding the display label
# name = "name"

# Output field holding the glyph-decorated label
# spacer = "spacer_name"

# Field used as the record id when the input is a JSON array
# id = "id"

[render]
# Glyphs: [vertical, branch, last_branch]
# markers = ["│", "├", "└"]
# markers = ["&emsp;│", "&emsp;├", "&emsp;└"]

# Token appended for each nesting level
# indent = "&nbsp;"

# Parent value marking top-level records
# root = "0"
"#
        .to_string()
    }
}

/// Unset keys are skipped; values that are set but unusable are errors.
fn env_value<T>(lookup: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match lookup {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
