//! Shell completions command.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;

pub fn execute(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "dtbackup", &mut std::io::stdout());
}
