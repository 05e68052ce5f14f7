//! Shell completion scripts.

use std::io;

use clap::{CommandFactory, ValueEnum};
use clap_complete::{Shell as CompletionShell, generate};

use crate::cli::Cli;

/// Shells with completion support
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
  Bash,
  Zsh,
  Fish,
  Powershell,
  Elvish,
}

impl From<Shell> for CompletionShell {
  fn from(shell: Shell) -> Self {
    match shell {
      Shell::Bash => CompletionShell::Bash,
      Shell::Zsh => CompletionShell::Zsh,
      Shell::Fish => CompletionShell::Fish,
      Shell::Powershell => CompletionShell::PowerShell,
      Shell::Elvish => CompletionShell::Elvish,
    }
  }
}

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, out: &mut dyn io::Write) {
  let mut cmd = Cli::command();
  let bin_name = cmd.get_name().to_string();
  generate(CompletionShell::from(shell), &mut cmd, bin_name, out);
}

/// Handle completions command
pub(crate) fn handle_completions_command(shell: Shell) {
  write_completions(shell, &mut io::stdout());
}
