use clap::Parser;
use datetidy::cli::{Args, run_cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    // RUST_LOG still wins over the default level
    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    run_cli(args)
}
