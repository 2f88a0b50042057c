use clap::Parser;
use pricedash::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
