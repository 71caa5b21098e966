use std::process::ExitCode;

use clap::Parser;
use dashboard::runner::run;
use options::run_options::RunOptions;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = RunOptions::parse();

    run(args).await
}
