//! Renders the pipeline binary's man page into `OUT_DIR` from the same clap
//! parser the binary uses.

use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli/mod.rs"]
mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cargo = std::io::stdout().lock();
    for watched in ["build.rs", "src/cli/mod.rs"] {
        writeln!(cargo, "cargo:rerun-if-changed={watched}")?;
    }

    let out_dir = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or("OUT_DIR is not set")?;
    let page = out_dir.join(format!("{}.1", env!("CARGO_PKG_NAME")));

    let man = Man::new(cli::Cli::command())
        .section("1")
        .source(concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")));

    let mut writer = BufWriter::new(File::create(&page)?);
    man.render(&mut writer)?;
    writer.flush()?;
    Ok(())
}
