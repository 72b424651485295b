//! grin CLI: compress and decompress `.grin` containers.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use grin::HuffmanCodec;

/// Exit status for a corrupt or foreign container. clap already owns 2.
const BAD_INPUT: u8 = 3;

/// Huffman compressor over a 9-bit alphabet.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress INFILE into a .grin container at OUTFILE.
    Encode { infile: PathBuf, outfile: PathBuf },
    /// Restore the original bytes of a .grin container.
    Decode { infile: PathBuf, outfile: PathBuf },
}

fn run(command: Command) -> grin::Result<&'static str> {
    match command {
        Command::Encode { infile, outfile } => {
            let input = File::open(&infile)?;
            let output = File::create(&outfile)?;
            HuffmanCodec::encode_from_file(input, output)?;
            Ok("File Encoded.")
        }
        Command::Decode { infile, outfile } => {
            let input = File::open(&infile)?;
            let output = File::create(&outfile)?;
            HuffmanCodec::decode_from_file(input, output)?;
            Ok("File Decoded.")
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args.command) {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(e) if e.is_bad_input() => {
            eprintln!("Error: {e}");
            ExitCode::from(BAD_INPUT)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
