use clap::Parser;
use scalplab::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
