//! Command dispatch

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::services::RenderService;
use crate::application::JsonResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{value_text, RecordId};
use crate::infrastructure::RealFileSystem;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Flat {
            input,
            parent,
            column,
            key,
            json,
        }) => cmd_flat(
            cli,
            input,
            parent.as_deref(),
            column.as_deref(),
            key.as_deref(),
            *json,
        ),
        Some(Commands::Nested {
            input,
            parent,
            compact,
        }) => cmd_nested(cli, input, parent.as_deref(), *compact),
        Some(Commands::Tree { input, parent }) => cmd_tree(cli, input, parent.as_deref()),
        Some(Commands::Check { input }) => cmd_check(cli, input),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `treelist --help`".to_string(),
        )),
    }
}

/// Effective settings: config layers plus command-line overrides.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.overrides.apply(&mut settings);
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn render_service(cli: &Cli) -> CliResult<RenderService> {
    let settings = load_settings(cli)?;
    Ok(RenderService::new(
        Arc::new(RealFileSystem),
        settings.tree_options(),
    ))
}

fn load(service: &RenderService, input: &Path) -> CliResult<Value> {
    Ok(service.load_source(input)?)
}

#[instrument(skip(cli))]
fn cmd_flat(
    cli: &Cli,
    input: &Path,
    parent: Option<&str>,
    column: Option<&str>,
    key: Option<&str>,
    json: bool,
) -> CliResult<()> {
    let service = render_service(cli)?;
    let source = load(&service, input)?;
    let parent = parent.map(RecordId::new);

    if let Some(field) = column {
        let values = service.column(&source, parent.as_ref(), field, key);
        for (k, v) in &values {
            output::pair(k, &value_text(v));
        }
        return Ok(());
    }

    if json {
        let rows = service.flat_rows(&source, parent.as_ref());
        let text = serde_json::to_string_pretty(&rows)
            .with_operation("serialize flat rows")
            .map_err(CliError::from)?;
        output::info(&text);
        return Ok(());
    }

    for name in service.flat_names(&source, parent.as_ref()) {
        output::info(&name);
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_nested(cli: &Cli, input: &Path, parent: Option<&str>, compact: bool) -> CliResult<()> {
    let service = render_service(cli)?;
    let source = load(&service, input)?;
    let parent = parent.map(RecordId::new);
    let json = service.nested_json(&source, parent.as_ref(), !compact)?;
    output::info(&json);
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_tree(cli: &Cli, input: &Path, parent: Option<&str>) -> CliResult<()> {
    let service = render_service(cli)?;
    let source = load(&service, input)?;
    let parent = parent.map(RecordId::new);
    // termtree output already ends with a newline
    print!("{}", service.text_tree(&source, parent.as_ref()));
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_check(cli: &Cli, input: &Path) -> CliResult<()> {
    let service = render_service(cli)?;
    let source = load(&service, input)?;
    // failures surface once, through the top-level error line
    let count = service.check(&source)?;
    output::success(&format!("{count} records valid"));
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
        ConfigCommands::Path => {
            output::header("Config files (lowest to highest precedence)");
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail(&"global: <no config directory>"),
            }
            let local = cli
                .config
                .clone()
                .unwrap_or_else(local_config_path);
            output::detail(&format!("local:  {}", local.display()));
            output::detail(&"env:    TREELIST_*");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn run(dir: &TempDir, source: &str, command: &str) -> CliResult<()> {
        let input = dir.path().join("records.json");
        let config = dir.path().join("treelist.toml");
        fs::write(&input, source).unwrap();
        fs::write(&config, "").unwrap();
        let cli = Cli::try_parse_from([
            "treelist",
            "-c",
            config.to_str().unwrap(),
            command,
            input.to_str().unwrap(),
        ])
        .unwrap();
        execute_command(&cli)
    }

    #[test]
    fn given_cyclic_records_when_checking_then_returns_single_data_error() {
        let dir = TempDir::new().unwrap();

        let result = run(
            &dir,
            r#"{"1": {"parentid": 2, "name": "A"}, "2": {"parentid": 1, "name": "B"}}"#,
            "check",
        );

        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(err.to_string(), "cycle detected in hierarchy at record: 1");
    }

    #[test]
    fn given_valid_records_when_checking_then_ok() {
        let dir = TempDir::new().unwrap();

        let result = run(&dir, r#"{"1": {"parentid": 0, "name": "A"}}"#, "check");

        assert!(result.is_ok());
    }

    #[test]
    fn given_no_command_when_executing_then_usage_error() {
        let cli = Cli::try_parse_from(["treelist"]).unwrap();

        let err = execute_command(&cli).unwrap_err();

        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }
}
