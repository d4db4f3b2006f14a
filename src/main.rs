// src/main.rs

use std::process::ExitCode;

use livefire::{cli, logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("livefire error: {err:?}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("livefire error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
