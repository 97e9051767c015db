// Frappe LSP entry point

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use frappe_completion::{ConfigLoader, KnowledgeBase};
use frappe_lsp::{LspServer, StdioTransport};
use tracing::{error, info, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "frappe-lsp")]
#[command(about = "Language server offering Frappe client scripting API completions")]
#[command(version)]
struct Args {
    /// Engine configuration file (YAML or JSON)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Include file, line and thread details in logs
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.debug);

    let config = ConfigLoader::load_or_default(args.config.as_deref())
        .context("Failed to load engine configuration")?;

    info!("Starting Frappe LSP server");
    info!("Log level: {}", args.log_level);

    if let Err(e) = KnowledgeBase::shared().validate() {
        error!("Built-in knowledge base is inconsistent: {}", e);
    }

    let mut server = LspServer::new(config);
    let mut transport = StdioTransport::stdio();
    server
        .run(&mut transport)
        .await
        .context("LSP server terminated with an error")?;

    if !server.exited_cleanly() {
        std::process::exit(1);
    }
    Ok(())
}

/// Install the stderr subscriber. An unknown `--log-level` falls back to
/// `info` and is reported once the subscriber is live.
fn init_logging(log_level: &str, debug: bool) {
    let parsed = log_level.parse::<Level>().ok();

    tracing_subscriber::fmt()
        .with_max_level(parsed.unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(debug)
        .with_thread_ids(debug)
        .with_file(debug)
        .with_line_number(debug)
        .init();

    if parsed.is_none() {
        warn!("Unknown log level '{}', using info", log_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["frappe-lsp"]).unwrap();
        assert_eq!(args.config, None);
        assert_eq!(args.log_level, "info");
        assert!(!args.debug);
    }

    #[test]
    fn test_args_with_config_and_debug() {
        let args =
            Args::try_parse_from(["frappe-lsp", "-c", "frappe.yaml", "--log-level", "DEBUG", "--debug"])
                .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("frappe.yaml")));
        assert_eq!(args.log_level.parse::<Level>().ok(), Some(Level::DEBUG));
        assert!(args.debug);
    }
}
