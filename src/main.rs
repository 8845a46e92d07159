use clap::Parser;
use portprobe::cli::Args;
use portprobe::{log, output};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    log::init_logger(args.verbose, args.quiet, args.log_file.as_deref())?;

    // Ctrl-C cancels the scan; in-flight probes are torn down before exit.
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    match args.execute(&cancel).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            output::print_error(&e.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}
