use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use hoist::cli::{handle_decrypt_command, handle_encrypt_command, handle_show_command, GlobalArgs};
use hoist::config::{ConfigSource, HoistPaths, Settings};

#[derive(Parser)]
#[command(
    name = "hoist",
    version,
    about = "Keep configuration files in version control, encrypted with your RSA key",
    long_about = "hoist encrypts a YAML configuration file with the public half of an \
                  RSA key so it can be committed alongside the templates that use it, \
                  and decrypts it again with the private key."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt the configuration file
    Encrypt {
        /// Destination file; prints the payload as base64 when omitted
        dest: Option<PathBuf>,

        /// Plaintext bytes per encrypted chunk (at most key size in bytes - 11)
        #[arg(long)]
        chunk_size: Option<usize>,
    },

    /// Decrypt an encrypted configuration file
    Decrypt {
        /// Destination file; prints the plaintext when omitted
        dest: Option<PathBuf>,
    },

    /// Print the loaded configuration
    Show,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("ERROR {}", usage_error_line(&err));
            return ExitCode::FAILURE;
        }
    };
    init_logging(cli.global.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = HoistPaths::new()?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Encrypt { dest, chunk_size } => {
            let overrides = cli.global.overrides(chunk_size)?;
            let settings = Settings::resolve(&paths, overrides, ConfigSource::Plain);
            debug!(
                config = %settings.config_file.display(),
                key = %settings.key_file.display(),
                "Resolved settings"
            );
            handle_encrypt_command(&settings, dest.as_deref(), &mut stdout)?;
        }
        Commands::Decrypt { dest } => {
            let overrides = cli.global.overrides(None)?;
            let settings = Settings::resolve(&paths, overrides, ConfigSource::PreferEncrypted);
            debug!(
                config = %settings.config_file.display(),
                key = %settings.key_file.display(),
                "Resolved settings"
            );
            handle_decrypt_command(&settings, dest.as_deref(), &mut stdout)?;
        }
        Commands::Show => {
            let overrides = cli.global.overrides(None)?;
            let settings = Settings::resolve(&paths, overrides, ConfigSource::PreferEncrypted);
            handle_show_command(&settings, &mut stdout)?;
        }
    }

    Ok(())
}

/// First line of a clap usage error, without clap's own `error:` prefix
fn usage_error_line(err: &clap::Error) -> String {
    if err.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand {
        return "no command given; run `hoist --help` for usage".to_string();
    }

    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
