use clap::{Parser, Subcommand};
use falcon_core::config::{ConfigOverrides, canonical_key};
use falcon_core::model::{Scope, ViewMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: falcon add "Pay rent" --date 2024-04-01
    /// Example: falcon add "Gym" --repeat Mon,Wed,Fri
    Add {
        title: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,
        /// Weekdays the task recurs on
        #[arg(long, value_name = "DAYS", value_delimiter = ',')]
        repeat: Vec<String>,
    },
    /// Mark a task done for today, or undo it
    ///
    /// Example: falcon done 1712345678901
    Done { id: u64 },
    /// Move a task to the removed list
    ///
    /// Example: falcon remove 1712345678901
    Remove { id: u64 },
    /// Bring a removed task back
    ///
    /// Example: falcon restore 1712345678901
    Restore { id: u64 },
    /// Delete a removed task permanently
    ///
    /// Example: falcon purge 1712345678901
    Purge { id: u64 },
    /// Clear a task's date and repeat days
    ///
    /// Example: falcon unschedule 1712345678901
    Unschedule { id: u64 },
    /// List tasks in a view
    ///
    /// Example: falcon list
    /// Example: falcon list scheduled
    List {
        /// pending, done, scheduled or removed
        #[arg(default_value = "pending")]
        view: ViewMode,
    },
    /// Show pending and completed counts for a scope
    ///
    /// Example: falcon summary --scope weekly
    Summary {
        /// daily, weekly, monthly or yearly
        #[arg(long)]
        scope: Option<Scope>,
    },
    /// Save to local storage and write the export file
    ///
    /// Example: falcon save --output ~/backup/my-todos.json
    Save {
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Replace all tasks with the contents of an exported file
    ///
    /// Example: falcon import my-todos.json
    Import { file: PathBuf },
    /// Copy today's incident status line
    ///
    /// Example: falcon incident
    Incident,
    /// Extract the class key from a share link and copy it
    ///
    /// Example: falcon class-key "https://drive.google.com/file/d/<key>/view"
    ClassKey { link: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    DefaultScope,
    ExportPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field = canonical_key(key_raw);
    if field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    let target = match field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "default_scope" | "scope" => {
            value.parse::<Scope>().map_err(|err| err.message().to_string())?;
            ConfigOverrideTarget::DefaultScope
        }
        "export_path" | "export" => {
            if value.is_empty() {
                return Err("export_path override cannot be empty".to_string());
            }
            ConfigOverrideTarget::ExportPath
        }
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::DefaultScope => overrides.default_scope = Some(parsed.value),
            ConfigOverrideTarget::ExportPath => {
                overrides.export_path = Some(PathBuf::from(parsed.value))
            }
        }
    }
    Ok(overrides)
}
