//! GolemBase wallet CLI
//!
//! Creates wallets in the formats GolemBase clients load, and shows which
//! account a wallet file belongs to.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use golembase_wallet::password::{DEFAULT_PROMPT, PASSWORD_ENV_VAR};
use golembase_wallet::{
    ConfigRoot, CreatedWallet, Credential, CredentialResolver, KdfConfig, ResolverConfig,
};

const NEW_PASSWORD_PROMPT: &str = "Choose a wallet password: ";

#[derive(Parser)]
#[command(name = "golembase-wallet")]
#[command(about = "Create and inspect GolemBase wallets")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration directory to use instead of the platform default
    #[arg(long, global = true)]
    config_root: Option<PathBuf>,

    /// Encrypt with cheap scrypt parameters (N=2^12), for throwaway wallets
    #[arg(long, global = true)]
    fast_kdf: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Target {
    /// Wallet file path
    #[arg(long, conflicts_with = "filename")]
    path: Option<PathBuf>,

    /// File name inside the golembase configuration directory
    #[arg(long)]
    filename: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new wallet; the password is prompted for or read from stdin
    Create {
        #[command(flatten)]
        target: Target,

        /// Write an unencrypted private key instead of a keystore
        #[arg(long)]
        raw: bool,

        /// Replace an existing raw key file
        #[arg(long, requires = "raw")]
        force: bool,
    },

    /// Create the default wallet.json using the GOLEMDB_PASS password
    CreateDefault,

    /// Load a wallet and print its address
    Address {
        #[command(flatten)]
        target: Target,

        /// Read an unencrypted private key instead of a keystore
        #[arg(long)]
        raw: bool,
    },

    /// Print where a wallet is looked up by default
    Path {
        /// File name inside the golembase configuration directory
        #[arg(long)]
        filename: Option<String>,

        /// Show the raw private key location
        #[arg(long)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut config = ResolverConfig::from_env();
    if let Some(root) = cli.config_root {
        config = config.with_config_root(ConfigRoot::Fixed(root));
    }
    if cli.fast_kdf {
        config = config.with_kdf(KdfConfig::custom_scrypt(12, 8, 1));
    }

    match cli.command {
        Commands::Create { target, raw, force } => {
            let mut resolver = CredentialResolver::new(config.with_overwrite_raw_key(force));
            let filename = target.filename.as_deref();
            let created = match (raw, target.path) {
                (true, Some(path)) => resolver.create_raw_key_file(path).await?,
                (true, None) => resolver.create_raw_key_file_at_default(filename).await?,
                (false, Some(path)) => {
                    resolver
                        .create_encrypted_wallet_ask_password(path, NEW_PASSWORD_PROMPT)
                        .await?
                }
                (false, None) => {
                    resolver
                        .create_encrypted_wallet_at_default_ask_password(
                            filename,
                            NEW_PASSWORD_PROMPT,
                        )
                        .await?
                }
            };
            print_created(&created);
        }
        Commands::CreateDefault => {
            let resolver = CredentialResolver::new(config);
            match resolver.create_default_wallet_from_env(PASSWORD_ENV_VAR).await? {
                Some(created) => print_created(&created),
                None => print_missing_password_help(),
            }
        }
        Commands::Address { target, raw } => {
            let mut resolver = CredentialResolver::new(config);
            let filename = target.filename.as_deref();
            let credential = match (raw, target.path) {
                (true, Some(path)) => resolver.read_raw_key_file(path).await?,
                (true, None) => resolver.read_raw_key_file_at_default(filename).await?,
                (false, Some(path)) => {
                    resolver
                        .read_encrypted_wallet_ask_password(path, DEFAULT_PROMPT)
                        .await?
                }
                (false, None) => {
                    resolver
                        .read_encrypted_wallet_at_default_ask_password(filename, DEFAULT_PROMPT)
                        .await?
                }
            };
            print_credential(&credential)?;
        }
        Commands::Path { filename, raw } => {
            let resolver = CredentialResolver::new(config);
            let path = if raw {
                resolver.raw_key_path(filename.as_deref())?
            } else {
                resolver.keystore_path(filename.as_deref())?
            };
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn print_created(created: &CreatedWallet) {
    println!("New account address: {}", created.address);
    println!("Wallet saved to: {}", created.path.display());
}

fn print_credential(credential: &Credential) -> Result<()> {
    let address = credential
        .address()
        .context("wallet holds an unusable key")?;
    println!("{} {}", credential.kind(), address);
    Ok(())
}

fn print_missing_password_help() {
    println!("No password provided. Create a .env file in the directory you run this from");
    println!("with a line such as:");
    println!();
    println!("    {PASSWORD_ENV_VAR}=abc123");
    println!();
    println!("or set {PASSWORD_ENV_VAR} in your environment, then run this command again.");
}
