use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

/// Print the completion script for `shell` to stdout
pub fn execute(shell: Shell, cmd: &mut Command) -> Result<()> {
    write_script(shell, cmd, &mut io::stdout())
}

/// Write the completion script for `shell` into `out`
pub fn write_script<W: Write>(shell: Shell, cmd: &mut Command, out: &mut W) -> Result<()> {
    let bin_name = cmd.get_name().to_string();
    tracing::debug!("Generating {} completions for {}", shell, bin_name);
    generate(shell, cmd, bin_name, out);
    out.flush()?;
    Ok(())
}
