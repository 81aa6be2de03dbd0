#![forbid(unsafe_code)]

//! kuvert CLI: encrypt content into, and decrypt it out of, XML-Enc envelopes.

use clap::{Parser, Subcommand};
use kuvert_core::{algorithm, Error};
use kuvert_crypto::{AlgorithmRegistry, OperationKind};
use kuvert_enc::{DecryptOptions, EncryptOptions, InputEncoding};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "kuvert",
    about = "kuvert: XML Encryption envelopes (EncryptedData / EncryptedKey)",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file into an EncryptedData document
    Encrypt {
        /// File whose content is encrypted
        file: PathBuf,

        /// Recipient RSA public key (PEM, SPKI or PKCS#1)
        #[arg(long)]
        pubkey: PathBuf,

        /// Recipient X.509 certificate (PEM)
        #[arg(long)]
        cert: PathBuf,

        /// Key transport algorithm URI
        #[arg(long = "key-wrap", default_value = algorithm::RSA_OAEP)]
        key_wrap: String,

        /// Content encryption algorithm URI
        #[arg(long = "content-alg", default_value = algorithm::AES256_CBC)]
        content_alg: String,

        /// Interpret the file as text in this encoding (utf8, latin1, ascii,
        /// base64, hex); raw bytes are encrypted when omitted
        #[arg(long = "input-encoding")]
        input_encoding: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Decrypt an EncryptedData document
    Decrypt {
        /// Input encrypted XML file
        file: PathBuf,

        /// RSA private key (PEM, PKCS#8 or PKCS#1)
        #[arg(short = 'k', long)]
        key: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List supported algorithms
    Info,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encrypt {
            file,
            pubkey,
            cert,
            key_wrap,
            content_alg,
            input_encoding,
            output,
            verbose,
        } => {
            init_logging(verbose);
            cmd_encrypt(
                file,
                pubkey,
                cert,
                key_wrap,
                content_alg,
                input_encoding,
                output,
                verbose,
            )
        }

        Commands::Decrypt {
            file,
            key,
            output,
            verbose,
        } => {
            init_logging(verbose);
            cmd_decrypt(file, key, output, verbose)
        }

        Commands::Info => cmd_info(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Logs go to stderr; `-v` turns on debug output for the kuvert crates
/// unless `RUST_LOG` says otherwise.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "kuvert=debug,kuvert_enc=debug,kuvert_crypto=debug,kuvert_keys=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[allow(clippy::too_many_arguments)]
fn cmd_encrypt(
    file: PathBuf,
    pubkey: PathBuf,
    cert: PathBuf,
    key_wrap: String,
    content_alg: String,
    input_encoding: Option<String>,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Error> {
    let data = read_bytes(&file)?;
    let mut options = EncryptOptions::new()
        .with_public_key(read_file(&pubkey)?)
        .with_certificate(read_file(&cert)?)
        .with_key_wrap_algorithm(key_wrap)
        .with_content_algorithm(content_alg);

    if verbose {
        eprintln!("Encrypting: {}", file.display());
    }

    let encrypted = match input_encoding {
        Some(name) => {
            options = options.with_input_encoding(name.parse::<InputEncoding>()?);
            let text = String::from_utf8(data)
                .map_err(|e| Error::Encoding(format!("{}: {e}", file.display())))?;
            kuvert_enc::encrypt(&text, &options)?
        }
        None => kuvert_enc::encrypt(&data, &options)?,
    };
    write_output(output, encrypted.as_bytes())
}

fn cmd_decrypt(
    file: PathBuf,
    key: PathBuf,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Error> {
    let data = read_bytes(&file)?;
    let xml = kuvert_xml::text_from_bytes(&data)?;
    let options = DecryptOptions::new().with_private_key(read_file(&key)?);

    if verbose {
        eprintln!("Decrypting: {}", file.display());
    }

    let decrypted = kuvert_enc::decrypt_to_bytes(xml, &options)?;
    write_output(output, &decrypted)
}

fn cmd_info() -> Result<(), Error> {
    println!("kuvert: XML Encryption envelopes");
    for (kind, heading) in [
        (OperationKind::ContentCipher, "Content encryption algorithms:"),
        (OperationKind::KeyWrap, "Key transport algorithms:"),
    ] {
        println!();
        println!("{heading}");
        for descriptor in AlgorithmRegistry::all().iter().filter(|d| d.kind == kind) {
            let mode = if descriptor.encrypt {
                "encrypt, decrypt"
            } else {
                "decrypt only"
            };
            println!("  {:<16} {} ({mode})", descriptor.name, descriptor.uri);
        }
    }
    println!();
    println!("Supported key formats:");
    println!("  RSA private keys: PEM, PKCS#8 or PKCS#1");
    println!("  RSA public keys: PEM, SPKI or PKCS#1");
    println!("  Certificates: PEM X.509");
    Ok(())
}

// ── Utility functions ────────────────────────────────────────────────

fn with_path(path: &Path, e: std::io::Error) -> Error {
    Error::Io(std::io::Error::new(e.kind(), format!("{}: {e}", path.display())))
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|e| with_path(path, e))
}

fn read_file(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|e| with_path(path, e))
}

fn write_output(path: Option<PathBuf>, data: &[u8]) -> Result<(), Error> {
    match path {
        Some(p) => std::fs::write(&p, data).map_err(|e| with_path(&p, e)),
        None => {
            use std::io::Write;
            std::io::stdout().write_all(data).map_err(Error::from)
        }
    }
}
