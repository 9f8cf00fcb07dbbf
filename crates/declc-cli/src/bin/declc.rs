use clap::Parser;
use declc_cli::args::CliArgs;

fn main() -> anyhow::Result<()> {
    declc_cli::tracing_config::init();
    let args = CliArgs::parse();
    declc_cli::driver::run(&args)
}
