use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::core::registry::ClientPathRegistry;
use crate::export::{self, ClipboardSink, CopyOutcome, SystemClipboard};
use crate::session::{Session, SessionEvent};

const HELP: &str = "\
Paste deployment notes line by line; every line is added to the text.
  :client NAME     select a client
  :env NAME        select an environment
  :clients         list clients and their paths
  :show            print extracted filenames and the generated script
  :copy            copy the generated script to the clipboard
  :download [DIR]  write existance_check.bat (default: current directory)
  :clear           discard the pasted text
  :help            show this help
  :quit            leave the session
";

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Text(String),
    Client(String),
    Environment(String),
    Clients,
    Show,
    Copy,
    Download(Option<PathBuf>),
    Clear,
    Help,
    Quit,
    /// `:client` or `:env` without a name.
    MissingArgument(String),
}

/// Parse one input line.
///
/// Only recognised `:name` commands are commands. Any other line, including
/// batch comments (`:: ...`) and labels (`:deploy`), is pasted text.
pub fn parse_command(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return ReplCommand::Text(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match (name.to_lowercase().as_str(), arg) {
        ("client", "") | ("env", "") => ReplCommand::MissingArgument(trimmed.to_string()),
        ("client", arg) => ReplCommand::Client(arg.to_string()),
        ("env", arg) => ReplCommand::Environment(arg.to_string()),
        ("clients", _) => ReplCommand::Clients,
        ("show", _) => ReplCommand::Show,
        ("copy", _) => ReplCommand::Copy,
        ("download", "") => ReplCommand::Download(None),
        ("download", dir) => ReplCommand::Download(Some(PathBuf::from(dir))),
        ("clear", _) => ReplCommand::Clear,
        ("help", _) => ReplCommand::Help,
        ("quit", _) | ("exit", _) => ReplCommand::Quit,
        _ => ReplCommand::Text(line.to_string()),
    }
}

/// Write a coloured `[sqlcheck]` notice line.
pub fn write_notice<W: Write>(out: &mut W, color: Color, message: &str) -> Result<()> {
    execute!(
        out,
        SetForegroundColor(color),
        Print(format!("[sqlcheck] {}\n", message)),
        ResetColor
    )?;
    Ok(())
}

/// Write the client table, one environment per line.
pub fn print_clients<W: Write>(out: &mut W, registry: &ClientPathRegistry) -> Result<()> {
    for client in registry.clients() {
        execute!(out, SetForegroundColor(Color::Cyan), Print(&client.name), ResetColor, Print("\n"))?;
        for env in &client.environments {
            writeln!(out, "  {:<6} {}", env.name, env.path)?;
        }
    }
    Ok(())
}

/// Interactive session over any line source and writer.
pub struct Repl<W: Write> {
    session: Session,
    out: W,
    clipboard: Option<Box<dyn ClipboardSink>>,
}

impl<W: Write> Repl<W> {
    pub fn new(session: Session, out: W) -> Self {
        Self {
            session,
            out,
            clipboard: None,
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn notice(&mut self, color: Color, message: &str) -> Result<()> {
        write_notice(&mut self.out, color, message)
    }

    fn prompt(&mut self) -> Result<()> {
        let state = self.session.state();
        let prompt = format!("{}/{}> ", state.client, state.environment);
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        self.notice(Color::Green, "Paste deployment notes. Type :help for commands.")?;
        self.report_selection()?;
        self.prompt()?;

        for line in input.lines() {
            let line = line?;
            if !self.handle(parse_command(&line))? {
                return Ok(());
            }
            self.prompt()?;
        }

        writeln!(self.out)?;
        Ok(())
    }

    /// Handle one command; returns `false` when the session should end.
    pub fn handle(&mut self, command: ReplCommand) -> Result<bool> {
        match command {
            ReplCommand::Text(line) => {
                let mut text = self.session.state().text.clone();
                text.push_str(&line);
                text.push('\n');
                self.session.apply(SessionEvent::TextChanged(text));
                self.report_extraction()?;
            }
            ReplCommand::Client(client) => {
                if self.session.registry().client(&client).is_none() {
                    log::warn!("unknown client '{}'", client);
                }
                self.session.apply(SessionEvent::ClientChanged(client));
                self.report_selection()?;
            }
            ReplCommand::Environment(environment) => {
                if self.session.registry().is_single_environment(&self.session.state().client) {
                    let message = format!(
                        "{} only has the {} environment",
                        self.session.state().client,
                        self.session.state().environment
                    );
                    self.notice(Color::Yellow, &message)?;
                }
                self.session.apply(SessionEvent::EnvironmentChanged(environment));
                self.report_selection()?;
            }
            ReplCommand::Clients => {
                print_clients(&mut self.out, self.session.registry())?;
            }
            ReplCommand::Show => self.show()?,
            ReplCommand::Copy => self.copy()?,
            ReplCommand::Download(dir) => self.download(dir.unwrap_or_else(|| PathBuf::from(".")))?,
            ReplCommand::Clear => {
                self.session.apply(SessionEvent::TextChanged(String::new()));
                self.notice(Color::Blue, "Text cleared.")?;
            }
            ReplCommand::Help => write!(self.out, "{}", HELP)?,
            ReplCommand::Quit => {
                self.notice(Color::Yellow, "Session terminated. Goodbye!")?;
                return Ok(false);
            }
            ReplCommand::MissingArgument(command) => {
                let message = format!("{} needs a name, type :help", command);
                self.notice(Color::Red, &message)?;
            }
        }
        Ok(true)
    }

    fn report_extraction(&mut self) -> Result<()> {
        let count = self.session.state().filenames.len();
        let message = format!("{} .sql file(s) extracted", count);
        self.notice(Color::Blue, &message)
    }

    fn report_selection(&mut self) -> Result<()> {
        let state = self.session.state();
        let message = match self.session.resolved_path() {
            Some(path) => format!("{} / {} -> {}", state.client, state.environment, path),
            None => format!(
                "No path registered for {} / {}; nothing will be generated",
                state.client, state.environment
            ),
        };
        let color = if self.session.resolved_path().is_some() {
            Color::Blue
        } else {
            Color::Yellow
        };
        self.notice(color, &message)
    }

    fn show(&mut self) -> Result<()> {
        let listing = self.session.state().listing();
        let script = self.session.state().script.clone();

        self.notice(Color::Cyan, "Extracted .sql filenames:")?;
        if !listing.is_empty() {
            writeln!(self.out, "{}", listing)?;
        }
        self.notice(Color::Cyan, "Generated existance check commands:")?;
        if script.is_empty() {
            self.notice(Color::Yellow, "(nothing generated)")?;
        } else {
            writeln!(self.out, "{}", script)?;
        }
        Ok(())
    }

    fn copy(&mut self) -> Result<()> {
        // Nothing generated: the system clipboard is never opened.
        if export::is_blank(&self.session.state().script) {
            log::debug!("copy skipped: no script generated");
            return Ok(());
        }

        if self.clipboard.is_none() {
            match SystemClipboard::new() {
                Ok(clipboard) => self.clipboard = Some(Box::new(clipboard)),
                Err(e) => {
                    log::error!("{}", e);
                    return self.notice(Color::Red, &format!("[ERROR] {}", e));
                }
            }
        }

        let result = match self.clipboard.as_deref_mut() {
            Some(clipboard) => self.session.copy(clipboard),
            None => return Ok(()),
        };
        match result {
            Ok(CopyOutcome::Copied) => self.notice(Color::Green, "Copied existence check commands to clipboard!"),
            Ok(CopyOutcome::Skipped) => Ok(()),
            Err(e) => {
                log::error!("{}", e);
                self.notice(Color::Red, &format!("[ERROR] {}", e))
            }
        }
    }

    fn download(&mut self, dir: PathBuf) -> Result<()> {
        match self.session.download(&dir) {
            Ok(Some(path)) => self.notice(Color::Green, &format!("Saved {}", path.display())),
            Ok(None) => Ok(()),
            Err(e) => {
                log::error!("{}", e);
                self.notice(Color::Red, &format!("[ERROR] {}", e))
            }
        }
    }
}
