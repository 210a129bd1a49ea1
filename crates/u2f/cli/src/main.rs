//! Command-line simulator for the nexum U2F token.
//!
//! Every invocation opens the object store, dispatches exactly one command and
//! prints the response body in hex followed by its status word.

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use nexum_apdu_core::{Bytes, Command, Response};
use nexum_u2f::{
    Authenticator, FileStore, PresenceSignal,
    constants::{auth_p1, cla, ins},
};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

mod config;

#[derive(Parser)]
#[command(version, about = "Simulate a FIDO U2F token backed by a directory of objects")]
struct Cli {
    /// Directory holding the token's persistent objects
    #[arg(short, long, default_value = "./u2f-store")]
    store: PathBuf,

    /// Device config file (defaults to u2f.toml inside the store)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Allow the manufacturing commands for this invocation
    #[arg(long)]
    unlock_provisioning: bool,

    /// Trace level output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new master secret and reset the counter
    Personalize,

    /// Install an attestation certificate (DER file)
    InstallCert {
        /// Path to the certificate
        #[arg(required = true)]
        path: PathBuf,
    },

    /// Print the protocol version
    Version,

    /// Register a new credential
    Register {
        /// Application id, 32 bytes as hex
        #[arg(long, value_parser = parse_hex32)]
        app_id: [u8; 32],

        /// Challenge, 32 bytes as hex
        #[arg(long, value_parser = parse_hex32)]
        challenge: [u8; 32],

        /// Assert user presence before dispatch
        #[arg(long)]
        press: bool,
    },

    /// Sign a challenge with a previously issued key handle
    Authenticate {
        /// Application id, 32 bytes as hex
        #[arg(long, value_parser = parse_hex32)]
        app_id: [u8; 32],

        /// Challenge, 32 bytes as hex
        #[arg(long, value_parser = parse_hex32)]
        challenge: [u8; 32],

        /// Key handle returned by register, as hex
        #[arg(long, value_parser = parse_hex)]
        key_handle: Bytes,

        /// Only check whether the key handle belongs to this token
        #[arg(long)]
        check_only: bool,

        /// Assert user presence before dispatch
        #[arg(long)]
        press: bool,
    },

    /// Send a raw command APDU
    Apdu {
        /// Command bytes as hex
        #[arg(required = true, value_parser = parse_hex)]
        command: Bytes,

        /// Assert user presence before dispatch
        #[arg(long)]
        press: bool,
    },
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let store = FileStore::open(&cli.store)?;
    let config_path = config::config_path(store.root(), cli.config.as_deref());
    let device_config = config::load_config(&config_path, cli.unlock_provisioning)?;
    debug!(
        store = %store.root().display(),
        transport = %device_config.transport,
        provisioning = %device_config.provisioning,
        "Opened token"
    );

    let presence = Arc::new(PresenceSignal::new());
    let mut token = Authenticator::new(store, Arc::clone(&presence), device_config);

    let command = match cli.command {
        Commands::Personalize => Command::new(cla::PROVISIONING, ins::PERSONALIZE, 0, 0),
        Commands::InstallCert { path } => {
            let cert = std::fs::read(&path)?;
            info!(path = %path.display(), size = cert.len(), "Installing certificate");
            Command::new_with_data(cla::PROVISIONING, ins::INSTALL_CERT, 0, 0, cert)
        }
        Commands::Version => Command::new(cla::U2F, ins::VERSION, 0, 0),
        Commands::Register {
            app_id,
            challenge,
            press,
        } => {
            press_if(&presence, press);
            let mut data = challenge.to_vec();
            data.extend_from_slice(&app_id);
            Command::new_with_data(cla::U2F, ins::REGISTER, 0, 0, data)
        }
        Commands::Authenticate {
            app_id,
            challenge,
            key_handle,
            check_only,
            press,
        } => {
            press_if(&presence, press);
            let handle_len = u8::try_from(key_handle.len())
                .map_err(|_| eyre::eyre!("key handle is {} bytes", key_handle.len()))?;
            let mut data = challenge.to_vec();
            data.extend_from_slice(&app_id);
            data.push(handle_len);
            data.extend_from_slice(&key_handle);
            let p1 = if check_only {
                auth_p1::CHECK_ONLY
            } else {
                auth_p1::ENFORCE_USER_PRESENCE
            };
            Command::new_with_data(cla::U2F, ins::AUTHENTICATE, p1, 0, data)
        }
        Commands::Apdu { command, press } => {
            press_if(&presence, press);
            let raw = token.process_bytes(&command)?;
            println!("{}", hex::encode(&raw));
            print_response(&Response::from_bytes(&raw)?);
            return Ok(());
        }
    };

    let response = token.process(&command)?;
    print_response(&response);

    Ok(())
}

fn press_if(presence: &PresenceSignal, press: bool) {
    if press {
        debug!("Asserting user presence");
        presence.assert();
    }
}

fn print_response(response: &Response) {
    if !response.body().is_empty() {
        println!("{}", hex::encode(response.body()));
    }
    println!("SW: {} ({})", response.status(), response.status().description());
}

fn parse_hex(s: &str) -> Result<Bytes, String> {
    hex::decode(s.trim_start_matches("0x"))
        .map(Bytes::from)
        .map_err(|e| e.to_string())
}

fn parse_hex32(s: &str) -> Result<[u8; 32], String> {
    let bytes = parse_hex(s)?;
    <[u8; 32]>::try_from(bytes.as_ref())
        .map_err(|_| format!("expected 32 bytes, got {}", bytes.len()))
}

/// Level used when `RUST_LOG` does not say otherwise
const fn default_level(verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO }
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true), LevelFilter::DEBUG);
        assert_eq!(default_level(false), LevelFilter::INFO);

        let filter = EnvFilter::builder()
            .with_default_directive(default_level(true).into())
            .parse_lossy("");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_parse_hex32() {
        let hex = "a0".repeat(32);
        assert_eq!(parse_hex32(&hex).unwrap(), [0xA0; 32]);
        assert_eq!(parse_hex32(&format!("0x{hex}")).unwrap(), [0xA0; 32]);
        assert!(parse_hex32("a0a0").is_err());
        assert!(parse_hex32("zz").is_err());
    }

    #[test]
    fn test_authenticate_args() {
        let hex = "11".repeat(32);
        let cli = Cli::try_parse_from([
            "u2f",
            "--store",
            "/tmp/token",
            "authenticate",
            "--app-id",
            &hex,
            "--challenge",
            &hex,
            "--key-handle",
            "abcd",
            "--check-only",
        ])
        .unwrap();

        assert_eq!(cli.store, PathBuf::from("/tmp/token"));
        match cli.command {
            Commands::Authenticate {
                key_handle,
                check_only,
                press,
                ..
            } => {
                assert_eq!(key_handle.as_ref(), &[0xAB, 0xCD]);
                assert!(check_only);
                assert!(!press);
            }
            _ => panic!("expected authenticate"),
        }
    }
}
