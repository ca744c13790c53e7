//! AIP runner — validate and dry-run agent interaction plan manifests.
//!
//! ```text
//! aip-runner [--lang en|ru] [--mcp] [--mcp-config <JSON>] validate <MANIFEST>
//! aip-runner [--lang en|ru] [--mcp] [--mcp-config <JSON>] run <MANIFEST>
//! ```

use std::path::{Path, PathBuf};

use aip_cli::commands::{self, Session};
use aip_core::workflow::ARTIFACTS_DIR;
use aip_core::StubToolClient;
use clap::{Parser, Subcommand};

/// AIP CLI — agent interaction plans (i18n + MCP stub + artifacts)
#[derive(Parser)]
#[command(name = "aip-runner", version, about = "AIP CLI — validate and dry-run agent interaction plans")]
pub struct Cli {
    /// UI language (en|ru); defaults to AIP_LANG, then en
    #[arg(long, global = true, value_parser = ["en", "ru"], ignore_case = true)]
    lang: Option<String>,

    /// Enable MCP mode (reads AIP_MCP_SERVERS unless --mcp-config is given)
    #[arg(long, global = true)]
    mcp: bool,

    /// MCP servers config as a JSON string (overrides AIP_MCP_SERVERS)
    #[arg(long, global = true)]
    mcp_config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a manifest against the AIP schema
    Validate {
        /// Path to the AIP JSON manifest
        manifest: PathBuf,
    },

    /// Run the workflow (demo, no LLM) and write artifacts
    Run {
        /// Path to the AIP JSON manifest
        manifest: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Existing environment variables win over both files.
    let env_files = load_dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aip_core=warn,aip_cli=warn".into()),
        )
        .init();

    for file in &env_files {
        tracing::info!("Loaded environment from '{}'", file.display());
    }

    let session = Session::init(cli.lang.as_deref(), cli.mcp, cli.mcp_config.as_deref());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = session.print_banner(&mut out).and_then(|()| match cli.command {
        Commands::Validate { manifest } => commands::workflow::validate(&session, &manifest, &mut out),
        Commands::Run { manifest } => commands::workflow::run(
            &session,
            &manifest,
            &StubToolClient::new(),
            Path::new(ARTIFACTS_DIR),
            &mut out,
        ),
    });

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Load `.env.local` then `.env` from the working directory, if present.
fn load_dotenv() -> Vec<PathBuf> {
    [".env.local", ".env"]
        .iter()
        .filter_map(|name| dotenvy::from_filename(name).ok())
        .collect()
}
