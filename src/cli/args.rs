//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::config::Settings;
use crate::domain::Markers;

/// Turn flat parent-referencing records into nested trees and glyph-decorated lists
#[derive(Parser, Debug)]
#[command(name = "treelist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: ./.treelist.toml when present)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Per-invocation overrides, applied on top of loaded settings.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Field holding the parent id
    #[arg(long, global = true)]
    pub parent_field: Option<String>,

    /// Field holding the display label
    #[arg(long, global = true)]
    pub name_field: Option<String>,

    /// Output field for nested children
    #[arg(long, global = true)]
    pub child_field: Option<String>,

    /// Output field for decorated labels
    #[arg(long, global = true)]
    pub spacer_field: Option<String>,

    /// Record id field for array inputs
    #[arg(long, global = true)]
    pub id_field: Option<String>,

    /// Indent token per level
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub indent: Option<String>,

    /// Parent value marking top-level records
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Glyph preset
    #[arg(long, global = true, value_enum)]
    pub markers: Option<MarkerStyle>,
}

impl Overrides {
    /// Apply the given overrides to `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        let pairs = [
            (&self.parent_field, &mut settings.fields.parent),
            (&self.name_field, &mut settings.fields.name),
            (&self.child_field, &mut settings.fields.child),
            (&self.spacer_field, &mut settings.fields.spacer),
            (&self.id_field, &mut settings.fields.id),
            (&self.indent, &mut settings.render.indent),
            (&self.root, &mut settings.render.root),
        ];
        for (value, target) in pairs {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        if let Some(style) = self.markers {
            settings.render.markers = style.markers();
        }
    }
}

/// Built-in glyph sets.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// │ ├ └
    Plain,
    /// &emsp;│ &emsp;├ &emsp;└
    Html,
    /// | |- `-
    Ascii,
}

impl MarkerStyle {
    pub fn markers(self) -> Markers {
        match self {
            MarkerStyle::Plain => Markers::default(),
            MarkerStyle::Html => Markers::html(),
            MarkerStyle::Ascii => Markers::ascii(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Depth-first list with glyph-decorated labels
    Flat {
        /// JSON record source ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Start below this parent id (default: root)
        #[arg(short, long)]
        parent: Option<String>,
        /// Print only this field of each row
        #[arg(long)]
        column: Option<String>,
        /// Key the column by this field instead of row position
        #[arg(long, requires = "column")]
        key: Option<String>,
        /// Print rows as JSON
        #[arg(long, conflicts_with = "column")]
        json: bool,
    },

    /// Nested tree as JSON
    Nested {
        /// JSON record source ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Start below this parent id (default: root)
        #[arg(short, long)]
        parent: Option<String>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show hierarchy as text tree
    Tree {
        /// JSON record source ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Start below this parent id (default: root)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Strictly validate records (parents, names, cycles)
    Check {
        /// JSON record source ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config paths
    Path,
}
