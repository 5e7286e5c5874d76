use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use shamir_rs::{restore_secret, split_secret, Secret, SecretKind, Share, SharedSecret};
use tracing::info;

// Trial-division prime search costs O(sqrt(p)); past u64 it no longer finishes.
// 2^64 - 59: anything at or above it needs a prime wider than u64.
const LARGEST_U64_PRIME: u64 = u64::MAX - 58;

#[derive(Parser, Debug)]
#[command(name = "shamir")]
#[command(about = "Split a secret into threshold shares and restore it", long_about = None)]
struct Args {
    /// Output format
    #[arg(long, value_enum, default_value = "text", env = "SHAMIR_FORMAT", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a secret into n shares with threshold k
    Split {
        /// Secret to split, at most 64 bits wide; all-digit input is read as an integer,
        /// anything else as text (up to 8 bytes of UTF-8)
        #[arg(long)]
        secret: String,

        /// Always encode the secret as UTF-8 text, even when it is all digits
        #[arg(long)]
        text: bool,

        /// Total number of shares (n)
        #[arg(short = 'n', long = "shares")]
        share_count: usize,

        /// Shares required to restore (k)
        #[arg(short = 'k', long)]
        threshold: usize,

        /// Write the shares here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Restore a secret from shares
    Restore {
        /// Prime modulus printed by `split`
        #[arg(long, required_unless_present = "input")]
        prime: Option<BigUint>,

        /// A share as "index value"; repeat for each share
        #[arg(long = "share", conflicts_with = "input")]
        shares: Vec<Share>,

        /// JSON file written by `split --format json`
        #[arg(long, conflicts_with = "prime")]
        input: Option<PathBuf>,

        /// Refuse to restore from fewer than this many shares
        #[arg(short = 'k', long)]
        threshold: Option<usize>,

        /// How to present the recovered value. Shares given with --share carry no kind,
        /// so auto reads small integers such as 65 as text ("A"); pass the kind that
        /// `split` printed to avoid that
        #[arg(long = "as", value_enum, default_value = "auto")]
        decode_as: DecodeAs,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DecodeAs {
    Auto,
    Integer,
    Text,
}

/// JSON shape of a split: the shared secret plus how the payload was encoded.
#[derive(Debug, Serialize, Deserialize)]
struct Artifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<SecretKind>,
    #[serde(flatten)]
    shared: SharedSecret,
}

#[derive(Debug, Serialize)]
struct Restored {
    kind: SecretKind,
    secret: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shamir=info,shamir_rs=info".into()),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Split {
            secret,
            text,
            share_count,
            threshold,
            output,
        } => {
            let secret = if text { Secret::Text(secret) } else { Secret::parse(&secret) };
            let rendered = split(&secret, share_count, threshold, args.format)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("writing shares to {}", path.display()))?;
                    info!("wrote {} shares to {}", share_count, path.display());
                }
                None => print!("{rendered}"),
            }
        }
        Command::Restore {
            prime,
            shares,
            input,
            threshold,
            decode_as,
        } => {
            let artifact = load_artifact(input, prime, shares)?;
            let secret = restore(&artifact, decode_as, threshold)?;
            println!("{}", render_restored(&secret, args.format)?);
        }
    }

    Ok(())
}

fn split(
    secret: &Secret,
    share_count: usize,
    threshold: usize,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let value = secret.to_biguint();
    if value.to_u64().map_or(true, |v| v >= LARGEST_U64_PRIME) {
        bail!(
            "secret is {} bits wide; secrets must stay below {LARGEST_U64_PRIME}, at most 64 bits (8 bytes of text)",
            value.bits()
        );
    }

    let shared = split_secret(&value, share_count, threshold)?;
    info!(
        "split secret into {} shares, {} required",
        share_count, threshold
    );

    let kind = secret.kind();
    let rendered = match format {
        OutputFormat::Text => {
            let kind = match kind {
                SecretKind::Integer => "integer",
                SecretKind::Text => "text",
            };
            let mut out = format!("kind: {kind}\nprime: {}\n", shared.prime);
            for share in &shared.shares {
                out.push_str(&format!("{share}\n"));
            }
            out
        }
        OutputFormat::Json => {
            let artifact = Artifact {
                kind: Some(kind),
                shared,
            };
            serde_json::to_string_pretty(&artifact)? + "\n"
        }
    };
    Ok(rendered)
}

fn load_artifact(
    input: Option<PathBuf>,
    prime: Option<BigUint>,
    shares: Vec<Share>,
) -> anyhow::Result<Artifact> {
    match (input, prime) {
        (Some(path), _) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading shares from {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
        }
        (None, Some(prime)) => Ok(Artifact {
            kind: None,
            shared: SharedSecret { prime, shares },
        }),
        (None, None) => bail!("either --prime or --input is required"),
    }
}

fn restore(
    artifact: &Artifact,
    decode_as: DecodeAs,
    threshold: Option<usize>,
) -> anyhow::Result<Secret> {
    let shared = &artifact.shared;
    if let Some(k) = threshold {
        let supplied = shared.shares.len();
        if supplied < k {
            bail!("threshold is {k} but only {supplied} shares were supplied");
        }
    }

    // an explicit --as wins; otherwise the recorded kind beats guessing
    let decode_as = match (decode_as, artifact.kind) {
        (DecodeAs::Auto, Some(SecretKind::Integer)) => DecodeAs::Integer,
        (DecodeAs::Auto, Some(SecretKind::Text)) => DecodeAs::Text,
        (requested, _) => requested,
    };

    let value = restore_secret(&shared.shares, &shared.prime)?;
    info!("restored secret from {} shares", shared.shares.len());

    let secret = match decode_as {
        DecodeAs::Auto => Secret::detect(value),
        DecodeAs::Integer => Secret::from_biguint(value, SecretKind::Integer)?,
        DecodeAs::Text => Secret::from_biguint(value, SecretKind::Text)?,
    };
    Ok(secret)
}

fn render_restored(secret: &Secret, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => secret.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(&Restored {
            kind: secret.kind(),
            secret: secret.to_string(),
        })?,
    })
}
