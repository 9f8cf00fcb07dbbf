use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the declc binary.
#[derive(Parser, Debug)]
#[command(
    name = "declc",
    version,
    about = "Compile ambient declaration documents into C++ headers"
)]
pub struct CliArgs {
    /// Input declaration document (JSON).
    pub input: PathBuf,

    /// Output header path; stdout when omitted.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Emit through unresolvable cycles instead of failing. The output may
    /// be broken; intended for diagnosing cycles.
    #[arg(long = "ignoreErrors", alias = "ignore-errors")]
    pub ignore_errors: bool,
}
