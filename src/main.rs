use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
mod auth;
use pwseal::{Config, Layout, Sealer, Settings, Storage, TAG_LEN, config::default_config_path};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SEALED_EXT: &str = "sealed";

#[derive(Debug, Parser)]
#[command(name = "pwseal")]
#[command(
    version,
    about = "Password-protect any file with PBKDF2-SHA256 and AES-256-GCM."
)]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true, value_name = "PATH", env = "PWSEAL_CONFIG")]
    config: Option<PathBuf>,

    /// PBKDF2 iterations (default: 100000)
    #[arg(long, global = true, env = "PWSEAL_ITERATIONS")]
    iterations: Option<u32>,

    /// Use one fixed salt for every file instead of a per-file salt
    #[arg(
        long,
        global = true,
        value_name = "HEX",
        env = "PWSEAL_SHARED_SALT",
        conflicts_with = "legacy_salt"
    )]
    shared_salt: Option<String>,

    /// Use the fixed salt of the original web tool (bytes 0..=15)
    #[arg(long, global = true)]
    legacy_salt: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts a file with a password
    #[command(arg_required_else_help = true)]
    Encrypt {
        input: PathBuf,

        /// Output path (default: <INPUT>.sealed)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite the output file if it exists
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Decrypts a sealed file
    #[command(arg_required_else_help = true)]
    Decrypt {
        input: PathBuf,

        /// Output path (default: <INPUT> without .sealed)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite the output file if it exists
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Shows the framing of a sealed file without decrypting it
    #[command(arg_required_else_help = true)]
    Inspect { input: PathBuf },
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            iterations: self.iterations,
            shared_salt: self.shared_salt.clone(),
            legacy_salt: self.legacy_salt.then_some(true),
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn encrypted_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(SEALED_EXT);
    PathBuf::from(name)
}

fn decrypted_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == SEALED_EXT) {
        input.with_extension("")
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".decrypted");
        PathBuf::from(name)
    }
}

/// Fails before the password prompt when the output is already taken.
/// `Storage::save` enforces the same rule atomically.
fn refuse_existing(output: &Storage, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.path().display()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    init_tracing(args.verbose);

    let config = Config::load(args.config.as_deref(), args.settings())
        .context("failed to load configuration")?;
    info!(
        iterations = config.kdf().iterations(),
        layout = %config.salt_mode().layout(),
        default_config = ?default_config_path(),
        "configuration resolved"
    );
    let sealer = Sealer::new(config);

    match args.command {
        Commands::Encrypt {
            input,
            output,
            force,
        } => {
            let plaintext = Storage::new(&input).load()?;
            let output = Storage::new(output.unwrap_or_else(|| encrypted_path(&input)));
            refuse_existing(&output, force)?;

            let password = auth::read_password(true)?;
            let sealed = sealer.seal(password.as_bytes(), &plaintext)?;
            drop(password);

            output.save(&sealed, force)?;
            println!(
                "encrypted '{}' -> '{}'",
                input.display(),
                output.path().display()
            );
        }
        Commands::Decrypt {
            input,
            output,
            force,
        } => {
            let sealed = Storage::new(&input).load()?;
            let output = Storage::new(output.unwrap_or_else(|| decrypted_path(&input)));
            refuse_existing(&output, force)?;

            let password = auth::read_password(false)?;
            let plaintext = sealer.open(password.as_bytes(), &sealed)?;
            drop(password);

            output.save(&plaintext, force)?;
            println!(
                "decrypted '{}' -> '{}'",
                input.display(),
                output.path().display()
            );
        }
        Commands::Inspect { input } => {
            let sealed = Storage::new(&input).load()?;
            let file = sealer.inspect(&sealed)?;

            println!("layout:      {}", file.layout());
            match file.layout() {
                Layout::Embedded => println!("salt:        {}", hex::encode(file.salt())),
                Layout::Shared => println!("salt:        (not stored)"),
            }
            println!("nonce:       {}", hex::encode(file.nonce()));
            println!("ciphertext:  {} bytes", file.ciphertext_len());
            println!("tag:         {TAG_LEN} bytes");
            println!(
                "kdf:         PBKDF2-HMAC-SHA256, {} iterations (from config)",
                sealer.config().kdf().iterations()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypted_path_appends_extension() {
        assert_eq!(
            encrypted_path(Path::new("dir/report.pdf")),
            PathBuf::from("dir/report.pdf.sealed")
        );
    }

    #[test]
    fn decrypted_path_strips_extension() {
        assert_eq!(
            decrypted_path(Path::new("dir/report.pdf.sealed")),
            PathBuf::from("dir/report.pdf")
        );
        assert_eq!(
            decrypted_path(Path::new("blob.bin")),
            PathBuf::from("blob.bin.decrypted")
        );
    }

    #[test]
    fn cli_flags_become_settings() {
        let cli = Cli::parse_from([
            "pwseal",
            "--iterations",
            "2000",
            "--legacy-salt",
            "inspect",
            "x",
        ]);
        let settings = cli.settings();
        assert_eq!(settings.iterations, Some(2_000));
        assert_eq!(settings.legacy_salt, Some(true));
        assert_eq!(settings.shared_salt, None);
    }

    #[test]
    fn existing_output_is_refused_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        let output = Storage::new(&path);

        refuse_existing(&output, false).unwrap();
        std::fs::write(&path, b"x").unwrap();
        assert!(refuse_existing(&output, false).is_err());
        refuse_existing(&output, true).unwrap();
    }

    #[test]
    fn shared_and_legacy_salt_conflict() {
        let res = Cli::try_parse_from([
            "pwseal",
            "--legacy-salt",
            "--shared-salt",
            "00",
            "inspect",
            "x",
        ]);
        assert!(res.is_err());
    }
}
