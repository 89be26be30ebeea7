use crate::cli::args::OutputFormat;
use crate::core::status::Session;
use crate::domain::config::PbiLinkConfig;
use serde_json;
use std::io;
use tabled::{Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_sessions(&self, sessions: &[Session]) -> Result<(), OutputError>;
    fn write_config(&self, config: &PbiLinkConfig) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
    fn write_error(&self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("TOML serialization error: {0}")]
    TomlError(#[from] toml::ser::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::PbiLinkError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl OutputWriter for ConsoleWriter {
    fn write_sessions(&self, sessions: &[Session]) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                if sessions.is_empty() {
                    println!("No live Power BI Desktop sessions.");
                }
                for session in sessions {
                    println!("Session (pid {})", session.process_id);
                    println!("  File: {}", session.pbix_path);
                }
            }
            OutputFormat::Json => {
                let output = serde_json::to_string_pretty(sessions)?;
                println!("{}", output);
            }
            OutputFormat::Table => {
                if !sessions.is_empty() {
                    let table_data: Vec<SessionTableRow> =
                        sessions.iter().map(SessionTableRow::from).collect();
                    let table = Table::new(table_data);
                    println!("{}", table);
                }
            }
            OutputFormat::Csv => {
                println!("process_id,pbix_path");
                for session in sessions {
                    println!("{},{}", session.process_id, session.pbix_path);
                }
            }
        }
        Ok(())
    }

    fn write_config(&self, config: &PbiLinkConfig) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::to_string_pretty(config)?;
                println!("{}", output);
            }
            _ => {
                let output = toml::to_string_pretty(config)?;
                print!("{}", output);
            }
        }
        Ok(())
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "message": message,
                    "level": "info"
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                println!("{}", message);
            }
        }
        Ok(())
    }

    fn write_error(&self, error: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "error": error,
                    "level": "error"
                });
                eprintln!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                eprintln!("Error: {}", error);
            }
        }
        Ok(())
    }
}

/// Table row for a live session
#[derive(Tabled)]
struct SessionTableRow {
    pid: u32,
    file: String,
}

impl From<&Session> for SessionTableRow {
    fn from(session: &Session) -> Self {
        Self {
            pid: session.process_id,
            file: session.pbix_path.clone(),
        }
    }
}
