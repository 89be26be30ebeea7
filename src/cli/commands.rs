use crate::cli::args::{Args, Command, ConfigCommand};
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::core::dispatch::{ActionDispatcher, WatchOutcome};
use crate::core::status::{StatusSource, ToolStatusSource};
use crate::domain::config::PbiLinkConfig;
use crate::domain::error::{PbiLinkError, PbiLinkResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::install::{InstallManager, InstallOutcome};
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::process::{LaunchedTool, ToolRunner};
use std::time::Duration;

/// Execute CLI command
pub async fn execute_command(args: Args) -> Result<(), PbiLinkError> {
    let writer = ConsoleWriter::new(args.output.clone());

    // Load configuration using ConfigManager
    let config_manager = ConfigManager::new()?;
    let config = if let Some(config_path) = &args.config {
        config_manager.load_config_from_path(config_path.as_ref())?
    } else {
        config_manager.load_config()?
    };

    // Initialize logging
    if !args.quiet {
        init_logging(&config.global.log_level, args.verbose)
            .map_err(|e| PbiLinkError::Config {
                message: format!("Failed to initialize logging: {}", e),
            })?;
    }

    let runner = ToolRunner::new(
        &config.tool.binary,
        Duration::from_millis(config.global.status_timeout_ms),
    );

    match args.command {
        Command::Extract { file } => {
            let dispatcher = dispatcher(&runner);
            let handle = dispatcher.extract(&file)?;
            writer.write_message(&format!(
                "Extract launched for '{}'{}",
                file.display(),
                pid_suffix(&handle)
            ))?;
            Ok(())
        }
        Command::Compile { folder } => {
            let dispatcher = dispatcher(&runner);
            let handle = dispatcher.compile(&folder)?;
            writer.write_message(&format!(
                "Compile launched for '{}'{}",
                folder.display(),
                pid_suffix(&handle)
            ))?;
            Ok(())
        }
        Command::Watch { file } => {
            let dispatcher = dispatcher(&runner);
            match dispatcher.watch(&file).await? {
                WatchOutcome::Attached { process_id, handle } => {
                    writer.write_message(&format!(
                        "Watch attached to session {} for '{}'{}",
                        process_id,
                        file.display(),
                        pid_suffix(&handle)
                    ))?;
                }
                WatchOutcome::NotOpen => {
                    // Expected outcome, not a failure: the file just is not open
                    writer.write_message(&format!(
                        "'{}' is not currently launched in Power BI Desktop",
                        file.display()
                    ))?;
                }
            }
            Ok(())
        }
        Command::Status => {
            let source = ToolStatusSource::new(runner);
            let report = source.status_report().await?;
            writer.write_sessions(&report.sessions)?;
            Ok(())
        }
        Command::Install => {
            let install_dir =
                config
                    .tool
                    .resolved_install_dir()
                    .ok_or_else(|| PbiLinkError::Config {
                        message: "Could not determine installation directory".to_string(),
                    })?;
            let manager = InstallManager::new(
                runner,
                install_dir,
                config.tool.download_url.clone(),
                Duration::from_millis(config.global.download_timeout_ms),
            );

            match manager.ensure_installed().await? {
                InstallOutcome::AlreadyInstalled => {
                    writer.write_message(&format!(
                        "'{}' is already installed",
                        config.tool.binary
                    ))?;
                }
                InstallOutcome::Installed {
                    install_dir,
                    registration,
                } => {
                    writer.write_message(&format!(
                        "Installed '{}' to '{}'",
                        config.tool.binary,
                        install_dir.display()
                    ))?;
                    if registration.changed {
                        writer.write_message(&format!(
                            "Added '{}' to {}. Restart your shell for the new PATH to take effect.",
                            registration.entry.display(),
                            registration.target
                        ))?;
                    } else {
                        writer.write_message(&format!(
                            "'{}' was already registered in {}",
                            registration.entry.display(),
                            registration.target
                        ))?;
                    }
                }
            }
            Ok(())
        }
        Command::Config(config_args) => {
            execute_config_command(config_args.command, &writer, &config, &config_manager)
        }
        Command::Version => {
            writer.write_message(&format!("pbilink {}", env!("CARGO_PKG_VERSION")))?;
            Ok(())
        }
    }
}

fn dispatcher(runner: &ToolRunner) -> ActionDispatcher<ToolStatusSource> {
    ActionDispatcher::new(runner.clone(), ToolStatusSource::new(runner.clone()))
}

fn pid_suffix(handle: &LaunchedTool) -> String {
    match handle.id() {
        Some(pid) => format!(" (pid {})", pid),
        None => String::new(),
    }
}

fn execute_config_command(
    command: ConfigCommand,
    writer: &ConsoleWriter,
    config: &PbiLinkConfig,
    config_manager: &ConfigManager,
) -> PbiLinkResult<()> {
    match command {
        ConfigCommand::Show => {
            writer.write_config(config)?;
            Ok(())
        }
        ConfigCommand::Init { output, global } => {
            if global {
                let global_path = config_manager.get_global_config_path_ref();
                config_manager.save_config_to_path(global_path, &PbiLinkConfig::default())?;
                writer.write_message(&format!(
                    "Global configuration initialized at '{}'",
                    global_path.display()
                ))?;
            } else if let Some(output_path) = output {
                config_manager.init_project_config(output_path.as_ref())?;
                writer.write_message(&format!(
                    "Project configuration initialized at '{}'",
                    output_path
                ))?;
            } else {
                let current_dir = std::env::current_dir().map_err(|e| PbiLinkError::Config {
                    message: format!("Failed to get current directory: {}", e),
                })?;
                config_manager.init_project_config(&current_dir)?;
                writer.write_message("Project configuration initialized in current directory")?;
            }
            Ok(())
        }
    }
}
