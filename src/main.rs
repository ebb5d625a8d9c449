// src/main.rs

use copypasta::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("copypasta error: {err:?}");
        std::process::exit(1);
    }

    match run(args).await {
        Ok(Some(report)) => std::process::exit(report.outcome.exit_code()),
        Ok(None) => {}
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
