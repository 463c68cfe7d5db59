use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
struct Args {
    /// Signed PE image to copy the certificate table from
    #[arg(short, long)]
    input: PathBuf,

    /// PE image to graft the certificate onto
    #[arg(short, long)]
    target: PathBuf,

    /// Path of the patched image to write
    #[arg(short, long)]
    output: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    stderrlog::new()
        .verbosity(1 + args.verbose as usize)
        .init()?;

    let grafted = certgraft::transplant(&args.input, &args.target, &args.output)
        .with_context(|| {
            format!(
                "failed to transplant the certificate of {} onto {}",
                args.input.display(),
                args.target.display()
            )
        })?;

    println!(
        "wrote {}: {} certificate bytes appended at offset {:#x}",
        args.output.display(),
        grafted.certificate_size,
        grafted.certificate_offset
    );
    Ok(())
}
