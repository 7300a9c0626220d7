//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, sets up diagnostics and
//! dispatches to the interactive session or one of the subcommands.

pub mod generate;

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::auth::{interactive_auth, interactive_deauth, resolve_api_key, CredentialError};
use crate::cli::generate::run_generate;
use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::core::keyring::KeyStore;
use crate::core::session::Session;
use crate::gateway::gemini::GeminiGateway;
use crate::ui::chat_loop::run_chat;
use crate::ui::render::PENDING_TEXT;

#[derive(Parser)]
#[command(name = "ispace", version)]
#[command(about = "An AI interior design assistant for the terminal")]
#[command(
    long_about = "ISpace turns a description of a room (and optionally a photo of it) into a \
generated interior design, then lets you refine it with feedback, browse earlier versions \
and export the result.\n\n\
Authentication:\n\
  Use 'ispace auth' to store a Gemini API key in your system keyring.\n\n\
Environment Variables (fallback if no key is stored):\n\
  GEMINI_API_KEY    Your Gemini API key\n\
  GOOGLE_API_KEY    Used when GEMINI_API_KEY is not set\n\
  RUST_LOG          Diagnostic filter (overrides -v)\n\n\
Session commands:\n\
  <text>            Describe a room to generate a new design\n\
  /attach <path>    Attach a photo of your room\n\
  /love, /notquite  Tag your next refinement\n\
  /refine <text>    Refine the current design\n\
  /history          List every version\n\
  /select <n>       Load version n\n\
  /export [dir]     Save the current design\n\
  /help             Show all commands"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Image model to use for this run
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Log the session transcript to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,

    /// Increase diagnostic output on stderr (-v info, -vv debug)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive design session (default)
    Chat,
    /// Generate a single design and save it
    Generate {
        /// Description of the room
        #[arg(value_name = "DESCRIPTION")]
        prompt: Vec<String>,
        /// Photo of the room to use as a reference
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
        /// Directory to save the design into
        #[arg(short = 'o', long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Store a Gemini API key in the system keyring
    Auth,
    /// Remove the stored Gemini API key
    Deauth,
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Show the current configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async_main());
    // A pending stdin read holds a blocking thread that never finishes.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let config = Config::load()?;
            let session = connect(&config, args.model.as_deref())?;
            run_chat(session, config.export_dir(), args.log).await
        }
        Commands::Generate { prompt, image, out } => {
            let config = Config::load()?;
            let session = connect(&config, args.model.as_deref())?;
            let out_dir = out.unwrap_or_else(|| config.export_dir());
            eprintln!("{PENDING_TEXT}");
            match run_generate(&session, &prompt.join(" "), image.as_deref(), &out_dir).await {
                Ok(path) => {
                    println!("💾 Saved design to {}", path_display(path));
                    Ok(())
                }
                Err(e) => {
                    eprintln!("❌ Generation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Auth => {
            if let Err(e) = interactive_auth(&KeyStore::new()) {
                eprintln!("❌ Authentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Deauth => {
            if let Err(e) = interactive_deauth(&KeyStore::new()) {
                eprintln!("❌ Deauthentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let value = value.join(" ");
            if let Err(e) = config.set_value(&key, &value) {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Set {key} to: {value}");
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            if let Err(e) = config.unset_value(&key) {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
        Commands::Config => {
            let config = Config::load()?;
            config.print_all();
            if let Ok(path) = Config::get_config_path() {
                println!();
                println!("Config file: {}", path_display(path));
            }
            Ok(())
        }
    }
}

fn default_filter(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    format!("warn,ispace={level}")
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    // A subscriber may already be installed (tests, embedding).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Resolves credentials and opens a session against Gemini. Missing
/// credentials end the process with setup hints.
fn connect(config: &Config, model: Option<&str>) -> Result<Session, Box<dyn Error>> {
    let resolved = match resolve_api_key(&KeyStore::new()) {
        Ok(resolved) => resolved,
        Err(err) => exit_with_quick_fixes(err),
    };
    info!(source = %resolved.source, "Using Gemini API key");

    let settings = config.gemini_settings(resolved.key, model);
    info!(model = %settings.image_model, base_url = %settings.base_url, "Connecting");
    let gateway = GeminiGateway::new(settings)?;
    Ok(Session::new(gateway))
}

fn exit_with_quick_fixes(err: CredentialError) -> ! {
    eprintln!("{err}");
    let fixes = err.quick_fixes();
    if !fixes.is_empty() {
        eprintln!();
        eprintln!("💡 Quick fixes:");
        for fix in fixes {
            eprintln!("  • {fix}");
        }
    }
    std::process::exit(err.exit_code());
}
