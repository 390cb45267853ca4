use crate::config::types::InstallPaths;
use log::info;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub const BLOCK_START: &str = "# >>> sectool environment >>>";
pub const BLOCK_END: &str = "# <<< sectool environment <<<";

/// Export lines appended to the shell startup file.
pub fn environment_block(paths: &InstallPaths) -> String {
    format!(
        "{start}\n\
         export PATH=\"{bin}:$HOME/go/bin:$PATH\"\n\
         export SECTOOL_TOOLS=\"{tools}\"\n\
         export SECTOOL_WORDLISTS=\"{wordlists}\"\n\
         {end}\n",
        start = BLOCK_START,
        bin = paths.bin_dir.display(),
        tools = paths.install_dir.display(),
        wordlists = paths.wordlist_dir.display(),
        end = BLOCK_END,
    )
}

/// Append `block` to `rc_file` unless its start marker is already there.
///
/// Returns `true` when the file was modified. Missing files are created.
pub fn append_environment_block(rc_file: &Path, block: &str) -> io::Result<bool> {
    let existing = match fs::read_to_string(rc_file) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    if existing.contains(BLOCK_START) {
        info!("Environment block already present in {}", rc_file.display());
        return Ok(false);
    }

    if let Some(parent) = rc_file.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(rc_file)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    write!(file, "\n{}", block)?;
    info!("Appended environment block to {}", rc_file.display());
    Ok(true)
}

/// Write the environment block for `paths` into their shell startup file.
pub fn setup_shell_environment(paths: &InstallPaths) -> io::Result<bool> {
    append_environment_block(&paths.shell_rc, &environment_block(paths))
}
