use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crnc::{options::Options, target::Script, Context};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source file
    #[clap(value_parser)]
    file: PathBuf,

    /// Output file, or pass "-" to write to stdout
    #[clap(short, long, value_parser, default_value = "-")]
    output: clio::Output,

    /// Module to compile
    #[clap(short, long, default_value = "main")]
    main: String,

    /// Do not write the `#!` line
    #[clap(long)]
    no_header: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let options = Options {
        root: args.main,
        header: !args.no_header,
    };

    Context::new()
        .set_options(options)
        .add_path(&args.file)?
        .output_stream::<Script>(args.output)?;

    Ok(())
}
