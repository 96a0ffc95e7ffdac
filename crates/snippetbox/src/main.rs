//! Snippetbox - Entry point

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::{error, info};

use snippetbox::config::{ConfigLoader, SnippetboxConfig};
use snippetbox::server::Server;

/// Snippetbox web server
#[derive(Debug, Parser)]
#[command(name = "snippetbox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// HTTP network address, overrides `server.http_addr`
    #[arg(long, env = "SNIPPETBOX_ADDR")]
    addr: Option<String>,

    /// Config file path (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> anyhow::Result<SnippetboxConfig> {
    let mut loader = ConfigLoader::new().with_defaults();
    if let Some(path) = &cli.config {
        loader = loader
            .with_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
    } else {
        loader = loader.with_optional_file("snippetbox.toml")?;
    }

    let mut config = loader.with_dotenv()?.with_env_prefix("SNIPPETBOX").load()?;
    if let Some(addr) = &cli.addr {
        config.server.http_addr.clone_from(addr);
        config.validate()?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logging is configured by the file, so failures before this point go to stderr.
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("snippetbox: invalid configuration: {e:#}");
            std::process::exit(1);
        }
    };

    if let Err(e) = snippetbox::telemetry::init_logging(&snippetbox::log_config(&config.logging)) {
        eprintln!("snippetbox: failed to initialise logging: {e}");
        std::process::exit(1);
    }

    let app = match snippetbox::build_application(&config) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, dir = %config.ui.template_dir.display(), "failed to build template cache");
            std::process::exit(1);
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.server.http_addr,
        "starting snippetbox"
    );

    if let Err(e) = Server::new(config.server, app).run().await {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
}
