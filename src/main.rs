use std::process;

#[tokio::main]
async fn main() {
    let verbose = std::env::args().any(|arg| arg == "--verbose" || arg == "-v");
    init_logging(verbose);

    if let Err(e) = ffa_scraper::cli::run().await {
        use ffa_scraper::output::text;
        eprintln!("{}", text::error(&format!("Error: {}", e)));
        for suggestion in e.suggestions() {
            eprintln!("{}", text::bullet(&suggestion));
        }
        process::exit(e.exit_code());
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt};

    let filter = if verbose {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::DEBUG.into())
            .parse_lossy("chromiumoxide=info")
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy()
            .add_directive(
                "chromiumoxide=off"
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::OFF.into()),
            )
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
