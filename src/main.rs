//! `wg-interface-proxy`: stage, resolve and pack interface configuration
//! from the command line.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use wg_interface_proxy::config::{load_config, load_draft, InterfaceDraft};
use wg_interface_proxy::crypto::Key;
use wg_interface_proxy::observability::init_logging;
use wg_interface_proxy::staging::InterfaceProxy;

#[derive(Parser)]
#[command(name = "wg-interface-proxy", version)]
#[command(about = "Stage and validate WireGuard interface configuration", long_about = None)]
struct Cli {
    /// Tool configuration file (TOML).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new key pair
    Genkey,
    /// Derive the public key for a base64 private key
    Pubkey {
        private_key: String,
    },
    /// Validate a draft and print the resulting interface
    Resolve {
        draft: PathBuf,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Write a draft in the flat byte layout
    Pack {
        draft: PathBuf,
        output: PathBuf,
    },
    /// Read the flat byte layout and print it as a draft
    Unpack {
        input: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    WgQuick,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(load_config).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.observability);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Genkey => {
            let mut proxy = InterfaceProxy::new();
            proxy.generate_key_pair();
            println!("PrivateKey = {}", proxy.private_key());
            println!("PublicKey = {}", proxy.public_key());
        }
        Commands::Pubkey { private_key } => {
            let private_key = Key::from_base64(private_key.trim())?;
            println!("{}", Key::generate_public_key(&private_key).to_base64());
        }
        Commands::Resolve { draft, format } => {
            let proxy = load_proxy(&draft)?;
            let interface = proxy.resolve()?;
            tracing::info!(
                draft = %draft.display(),
                addresses = interface.addresses().len(),
                "Draft resolved"
            );
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&interface)?),
                OutputFormat::WgQuick => print!("[Interface]\n{}", interface.to_wg_quick_string()),
            }
        }
        Commands::Pack { draft, output } => {
            let proxy = load_proxy(&draft)?;
            if [proxy.s1(), proxy.s2(), proxy.h1(), proxy.h2(), proxy.h3(), proxy.h4()]
                .iter()
                .any(|text| !text.is_empty())
            {
                tracing::warn!("S1, S2 and H1-H4 are not part of the byte layout and were dropped");
            }
            let bytes = proxy.to_bytes()?;
            fs::write(&output, &bytes)?;
            tracing::info!(output = %output.display(), bytes = bytes.len(), "Draft packed");
        }
        Commands::Unpack { input } => {
            let bytes = fs::read(&input)?;
            let proxy = InterfaceProxy::from_bytes(&bytes)?;
            let draft = InterfaceDraft::from_proxy(&proxy);
            print!("{}", toml::to_string_pretty(&draft)?);
        }
    }

    Ok(())
}

fn load_proxy(path: &Path) -> Result<InterfaceProxy, Box<dyn std::error::Error>> {
    Ok(load_draft(path)?.into_proxy())
}
