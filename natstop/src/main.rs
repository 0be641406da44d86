//! Entry point for the natstop TUI. Parses args and runs the App.

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use natstop::app::App;
use natstop::config::Cli;
use natstop::logging::init_logging;
use natstop::source::HttpSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(c) => c,
        Err(e) => {
            // --help prints to stdout and succeeds; real parse errors exit 1
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if cli.version {
        println!("natstop v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logging();

    let opts = match cli.into_options() {
        Ok(o) => o,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return Err(e.into());
        }
    };
    let endpoint = opts.endpoint()?;
    info!(
        %endpoint,
        delay_secs = opts.delay.as_secs(),
        limit = opts.conns,
        sort = %opts.sort,
        "starting"
    );

    let source = HttpSource::new(endpoint).context("could not build the HTTP client")?;
    let mut app = App::new(source, opts);
    app.run().await
}
