use anyhow::Result;
use crossterm::style::Color;
use std::io::Write;
use std::path::PathBuf;

use crate::core::registry::{ClientPathRegistry, DEFAULT_ENVIRONMENT};
use crate::core::{extract, generate, listing};
use crate::export::{self, ClipboardSink, CopyOutcome, ExportError};
use crate::terminal::write_notice;

/// Options of the one-shot `generate` command.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub client: String,
    /// Falls back to the client's default environment.
    pub environment: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub copy: bool,
}

/// What a `generate` run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub environment: String,
    pub script: String,
    pub written: Option<PathBuf>,
    pub copied: bool,
}

/// Print the filenames referenced in `text`, one per line or as JSON.
pub fn run_extract<W: Write>(text: &str, json: bool, out: &mut W) -> Result<()> {
    let filenames = extract(text);
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&filenames)?)?;
    } else if !filenames.is_empty() {
        writeln!(out, "{}", listing(&filenames))?;
    }
    Ok(())
}

/// Generate the script for one client/environment and print it to `out`.
///
/// Warnings and export results go to `notices`. The clipboard is only
/// opened when there is a script to copy.
pub fn run_generate<W, N, F>(
    registry: &ClientPathRegistry,
    text: &str,
    options: &GenerateOptions,
    out: &mut W,
    notices: &mut N,
    open_clipboard: F,
) -> Result<GenerateReport>
where
    W: Write,
    N: Write,
    F: FnOnce() -> Result<Box<dyn ClipboardSink>, ExportError>,
{
    let filenames = extract(text);
    let client = options.client.as_str();

    let environment = match &options.environment {
        Some(env) => env.clone(),
        None => registry
            .default_environment(client)
            .unwrap_or(DEFAULT_ENVIRONMENT)
            .to_string(),
    };

    let path = registry.resolve_path(client, &environment);
    if path.is_none() {
        log::warn!("no path registered for client '{}' environment '{}'", client, environment);
        write_notice(
            notices,
            Color::Yellow,
            &format!("No path registered for {} / {}; nothing generated", client, environment),
        )?;
    }
    if filenames.is_empty() {
        write_notice(notices, Color::Yellow, "No .sql filenames found in the input; nothing generated")?;
    }

    let script = generate(&filenames, path);
    if !script.is_empty() {
        writeln!(out, "{}", script)?;
    }

    let mut written = None;
    if let Some(dir) = &options.output_dir {
        match export::write_script_file(&script, dir) {
            Ok(Some(path)) => {
                write_notice(notices, Color::Green, &format!("Saved {}", path.display()))?;
                written = Some(path);
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("{}", e);
                write_notice(notices, Color::Red, &format!("[ERROR] {}", e))?;
            }
        }
    }

    let mut copied = false;
    if options.copy && !export::is_blank(&script) {
        let result = open_clipboard().and_then(|mut clipboard| export::copy_script(&script, clipboard.as_mut()));
        match result {
            Ok(CopyOutcome::Copied) => {
                write_notice(notices, Color::Green, "Copied existence check commands to clipboard!")?;
                copied = true;
            }
            Ok(CopyOutcome::Skipped) => {}
            Err(e) => {
                log::error!("{}", e);
                write_notice(notices, Color::Red, &format!("[ERROR] {}", e))?;
            }
        }
    }

    Ok(GenerateReport {
        environment,
        script,
        written,
        copied,
    })
}
