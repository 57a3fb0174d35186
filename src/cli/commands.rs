//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::render;
use crate::cli::args::{Cli, Commands, ConfigCommands, QueryArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::{InfraError, ServiceContainer};

const TITLE_PROMPT: &str = "Enter a movie title:";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Query(args)) => {
            let settings = Settings::load(cli.config.as_deref())?;
            let container = ServiceContainer::new(apply_query_args(settings, args)?);
            cmd_query(&container, args)
        }
        Some(Commands::Config { command }) => cmd_config(cli.config.as_deref(), command),
        Some(Commands::Completion { shell }) => {
            cmd_completion(*shell);
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".to_string(),
        )),
    }
}

/// Command line flags override loaded settings.
pub fn apply_query_args(mut settings: Settings, args: &QueryArgs) -> CliResult<Settings> {
    if let Some(catalog) = &args.catalog {
        settings.catalog = catalog.clone();
    }
    if let Some(format) = args.format {
        settings.format = format;
    }
    if let Some(v) = args.vertical_spacing {
        settings.layout.vertical_spacing = v;
    }
    if let Some(h) = args.horizontal_spacing {
        settings.layout.horizontal_spacing = h;
    }
    settings
        .layout
        .validate()
        .map_err(|e| CliError::InvalidArgs(e.to_string()))?;
    Ok(settings)
}

#[instrument(skip(container))]
pub fn cmd_query(container: &ServiceContainer, args: &QueryArgs) -> CliResult<()> {
    let title = match &args.title {
        Some(title) => title.clone(),
        None => container
            .prompt
            .ask(TITLE_PROMPT)
            .map_err(|e| InfraError::Prompt {
                message: e.to_string(),
            })?,
    };
    debug!("title: {:?}", title);

    let result = container.query_service().run(&title)?;
    if !result.root_found {
        output::warning(&format!("'{}' not found in {}", title, container.settings.catalog.display()));
    }

    let settings = &container.settings;
    let rendered = render(&result, settings.format, &settings.render)?;

    match &args.output {
        Some(path) => {
            write_output(container, path, &rendered)?;
            output::success(&format!("wrote {}", path.display()));
        }
        None => output::info(rendered.trim_end()),
    }
    Ok(())
}

fn write_output(container: &ServiceContainer, path: &Path, content: &str) -> CliResult<()> {
    let io_err = |e| InfraError::io(format!("write {}", path.display()), e);
    container.fs.ensure_parent(path).map_err(io_err)?;
    let mut content = content.to_string();
    if !content.ends_with('\n') {
        content.push('\n');
    }
    container.fs.write(path, &content).map_err(io_err)?;
    Ok(())
}

fn cmd_config(config: Option<&Path>, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(config)?;
            output::info(settings.to_toml()?.trim_end());
        }
        ConfigCommands::Template => output::info(Settings::template().trim_end()),
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(unavailable)".to_string());
            let local = config
                .map(Path::to_path_buf)
                .unwrap_or_else(local_config_path);
            output::action("global", &global);
            output::action("local", &local.display());
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
