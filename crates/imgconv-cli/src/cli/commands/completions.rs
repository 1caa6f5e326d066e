//! `imgconv completions <shell>` – print a completion script.

use clap::Command;
use clap_complete::Shell;

pub fn run_completions(mut cmd: Command, shell: Shell) {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
