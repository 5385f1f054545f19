//! Compress or decompress whole files.
//!
//! ```bash
//! cargo run --example huff -- compress notes.txt
//! cargo run --example huff -- inspect notes.txt.huff
//! cargo run --example huff -- decompress notes.txt.huff -o notes.copy.txt
//! ```

use clap::{Parser, Subcommand};
use huffpack::{container, FrequencyTable};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

const EXTENSION: &str = "huff";

#[derive(Parser, Debug)]
#[command(name = "huff")]
#[command(about = "Static Huffman file compressor")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file into a container
    Compress {
        input: PathBuf,

        /// Output path (defaults to INPUT.huff)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the symbol table as MessagePack
        #[arg(long)]
        dump_table: Option<PathBuf>,
    },
    /// Restore a file from a container
    Decompress {
        input: PathBuf,

        /// Output path (defaults to INPUT without .huff, or INPUT.out)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a container's header summary
    Inspect { input: PathBuf },
}

type BoxError = Box<dyn std::error::Error>;

fn read_input(path: &Path) -> Result<Vec<u8>, BoxError> {
    let data = fs::read(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    if data.is_empty() {
        return Err(format!("{} is empty", path.display()).into());
    }
    Ok(data)
}

fn write_output(path: &Path, data: &[u8]) -> Result<(), BoxError> {
    fs::write(path, data).map_err(|e| format!("writing {}: {e}", path.display()))?;
    Ok(())
}

fn decompressed_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == EXTENSION) {
        input.with_extension("")
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".out");
        PathBuf::from(name)
    }
}

fn compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

fn run(command: Command) -> Result<(), BoxError> {
    match command {
        Command::Compress {
            input,
            output,
            dump_table,
        } => {
            let data = read_input(&input)?;
            let packed = huffpack::compress(&data)?;
            let output = output.unwrap_or_else(|| compressed_path(&input));
            write_output(&output, &packed)?;

            if let Some(path) = dump_table {
                let table = FrequencyTable::from_bytes(&data)?;
                write_output(&path, &rmp_serde::to_vec(&table)?)?;
            }

            info!(
                input = %input.display(),
                output = %output.display(),
                original = data.len(),
                compressed = packed.len(),
                "compressed file saved"
            );
        }
        Command::Decompress { input, output } => {
            let packed = read_input(&input)?;
            let data = huffpack::decompress(&packed)?;
            let output = output.unwrap_or_else(|| decompressed_path(&input));
            write_output(&output, &data)?;

            info!(
                input = %input.display(),
                output = %output.display(),
                restored = data.len(),
                "decompressed file saved"
            );
        }
        Command::Inspect { input } => {
            let packed = read_input(&input)?;
            let info = container::inspect(&packed)?;
            println!("symbols:      {}", info.leaf_count);
            println!("header bytes: {}", info.header_len);
            println!("payload:      {} bytes, {} bits", info.payload_len, info.bit_len);
            println!("original:     {} bytes", info.original_len);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("huff=info,huffpack=info")),
        )
        .init();

    let args = Args::parse();
    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
