use std::path::PathBuf;

use clap::Parser;
use takdata::concat_files;

/// Joins .takbin files that share a channel count into one file.
#[derive(Parser)]
#[command(name = "takbin-concat")]
struct Args {
    /// Output path.
    #[arg(long)]
    out: PathBuf,
    /// Input .takbin files, in order.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    concat_files(&args.inputs, &args.out)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}
