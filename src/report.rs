//! Plain-text summary of a run, written to the report file and the terminal.

use crate::config::types::InstallPaths;
use crate::error::Result;
use crate::tool_management::environment::Environment;
use crate::tool_management::status::RunState;
use chrono::{DateTime, Local};
use log::info;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const RULE: &str = "==============================================================";

/// Render the report text. Pure formatting.
pub fn render_report(
    env: &Environment,
    state: &RunState,
    paths: &InstallPaths,
    generated_at: DateTime<Local>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "SECURITY TOOLS INSTALLATION REPORT");
    let _ = writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "{}", RULE);

    let _ = writeln!(out, "\nENVIRONMENT");
    let _ = writeln!(out, "  Operating system: {}", env.os);
    let _ = writeln!(out, "  Distribution:     {}", env.distro_name);
    let _ = writeln!(out, "  Package manager:  {}", env.package_manager);

    section(&mut out, "INSTALLED TOOLS", state.installed());
    section(&mut out, "MISSING TOOLS", state.missing());
    section(&mut out, "FAILED INSTALLATIONS", state.failed());

    let _ = writeln!(out, "\nINSTALLATION PATHS");
    let _ = writeln!(out, "  Source tools: {}", paths.install_dir.display());
    let _ = writeln!(out, "  Binaries:     {}", paths.bin_dir.display());
    let _ = writeln!(out, "  Wordlists:    {}", paths.wordlist_dir.display());
    let _ = writeln!(out, "  Shell config: {}", paths.shell_rc.display());

    let _ = writeln!(out, "\nPOST-INSTALL INSTRUCTIONS");
    let _ = writeln!(out, "  1. Reload your shell: source {}", paths.shell_rc.display());
    let _ = writeln!(out, "  2. Make sure {} and ~/go/bin are on your PATH", paths.bin_dir.display());
    let _ = writeln!(out, "  3. Initialise the Metasploit database: msfdb init");
    let _ = writeln!(out, "  4. Update nuclei templates: nuclei -update-templates");
    let _ = writeln!(out, "  5. Re-run the installer or install failed tools manually");
    let _ = writeln!(out, "{}", RULE);

    out
}

fn section(out: &mut String, title: &str, tools: &BTreeSet<String>) {
    let _ = writeln!(out, "\n{} ({})", title, tools.len());
    if tools.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for tool in tools {
        let _ = writeln!(out, "  - {}", tool);
    }
}

/// Write `content` to `path`, creating parent directories.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    info!("Report written to {}", path.display());
    Ok(())
}

/// Render the report, write it to the report path and print it.
pub fn generate_report(env: &Environment, state: &RunState, paths: &InstallPaths) -> Result<String> {
    let content = render_report(env, state, paths, Local::now());
    write_report(&paths.report_path, &content)?;
    println!("{}", content);
    println!("📄 Report saved to {}", paths.report_path.display());
    Ok(content)
}
