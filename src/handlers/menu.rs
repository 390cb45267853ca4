//! Interactive numbered menu.

use super::tools::Session;
use crate::cli::OutputFormat;
use crate::error::Result;
use log::debug;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Check,
    InstallMissing,
    InstallOne,
    Wordlists,
    SetupEnvironment,
    RunAll,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 7] = [
        MenuChoice::Check,
        MenuChoice::InstallMissing,
        MenuChoice::InstallOne,
        MenuChoice::Wordlists,
        MenuChoice::SetupEnvironment,
        MenuChoice::RunAll,
        MenuChoice::Exit,
    ];

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Check),
            "2" => Some(MenuChoice::InstallMissing),
            "3" => Some(MenuChoice::InstallOne),
            "4" => Some(MenuChoice::Wordlists),
            "5" => Some(MenuChoice::SetupEnvironment),
            "6" => Some(MenuChoice::RunAll),
            "7" => Some(MenuChoice::Exit),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::Check => "Check installed tools",
            MenuChoice::InstallMissing => "Install missing tools",
            MenuChoice::InstallOne => "Install a specific tool",
            MenuChoice::Wordlists => "Install wordlists",
            MenuChoice::SetupEnvironment => "Setup shell environment",
            MenuChoice::RunAll => "Run everything",
            MenuChoice::Exit => "Exit",
        }
    }
}

fn print_menu<W: Write>(output: &mut W) -> std::io::Result<()> {
    writeln!(output)?;
    writeln!(output, "=== Security Tools Installer ===")?;
    for (index, choice) in MenuChoice::ALL.iter().enumerate() {
        writeln!(output, "  {}) {}", index + 1, choice.label())?;
    }
    Ok(())
}

/// Prompt and read one trimmed line. `None` on end of input.
fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> std::io::Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Run the menu until the user exits or input ends.
pub fn run_menu<R: BufRead, W: Write>(
    session: &mut Session<'_>,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    loop {
        print_menu(output)?;

        let choice = loop {
            let Some(line) = read_line(input, output, "Select an option [1-7]: ")? else {
                debug!("Input closed, leaving menu");
                return Ok(());
            };
            match MenuChoice::parse(&line) {
                Some(choice) => break choice,
                None => writeln!(output, "Invalid choice '{}', enter a number from 1 to 7", line)?,
            }
        };

        match choice {
            MenuChoice::Check => {
                session.check_tools();
                session.print_status(OutputFormat::Table);
            }
            MenuChoice::InstallMissing => {
                session.install_missing();
            }
            MenuChoice::InstallOne => {
                let Some(name) = read_line(input, output, "Tool name: ")? else {
                    return Ok(());
                };
                if name.is_empty() {
                    writeln!(output, "No tool name given")?;
                } else {
                    session.install_tool(&name);
                }
            }
            MenuChoice::Wordlists => {
                session.install_wordlists();
            }
            MenuChoice::SetupEnvironment => {
                if let Err(e) = session.setup_environment() {
                    writeln!(output, "Environment setup failed: {}", e)?;
                }
            }
            MenuChoice::RunAll => {
                if let Err(e) = session.run_everything() {
                    writeln!(output, "Full setup stopped: {}", e)?;
                }
            }
            MenuChoice::Exit => {
                writeln!(output, "Goodbye!")?;
                return Ok(());
            }
        }
    }
}
