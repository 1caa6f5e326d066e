//! `imgconv man` – print the man page.

use anyhow::{Context, Result};
use clap::Command;

pub fn run_man(cmd: Command) -> Result<()> {
    clap_mangen::Man::new(cmd)
        .render(&mut std::io::stdout())
        .context("render man page")
}
