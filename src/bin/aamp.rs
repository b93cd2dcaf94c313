//! Command-line front end: converts between binary `.bgparamlist`-style
//! archives and their textual YAML representation, auto-detecting the
//! conversion direction from the input bytes.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use indexmap::IndexMap;

use aamp::io::doc_tree::{from_doc_tree, to_doc_tree};
use aamp::io::reader::Reader;
use aamp::io::writer::write as write_binary;
use aamp::names::NameResolver;
use aamp::AampError;

const BINARY_SIGNATURE: &[u8] = b"AAMP\x02\x00\x00\x00";
const MIN_BINARY_LEN: usize = 0x30;

#[derive(Parser)]
#[command(name = "aamp", about = "Convert between binary and textual parameter archives")]
struct Args {
    /// Input path, or `-` to read from stdin.
    source: PathBuf,

    /// Output path. `-` (the default) writes to stdout. A `!!` in the
    /// path is replaced with the source's file stem when the source is
    /// a real file.
    #[arg(default_value = "-")]
    destination: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ AampError::CliUsage(_)) => {
            eprintln!("aamp: {err}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("aamp: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AampError> {
    let is_stdin = args.source.to_str() == Some("-");

    let input_data = if is_stdin {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        fs::read(&args.source)?
    };

    let destination = resolve_destination(&args.destination, &args.source, is_stdin)?;

    let output = if input_data.len() <= MIN_BINARY_LEN || &input_data[0..8.min(input_data.len())] != BINARY_SIGNATURE {
        yml_to_aamp(&input_data)?
    } else {
        aamp_to_yml(&input_data)?
    };

    match destination {
        Some(path) => fs::write(path, output)?,
        None => io::stdout().write_all(&output)?,
    }
    Ok(())
}

fn resolve_destination(dst: &str, src: &Path, is_stdin: bool) -> Result<Option<PathBuf>, AampError> {
    if dst == "-" {
        return Ok(None);
    }
    if dst.contains("!!") {
        if is_stdin {
            return Err(AampError::CliUsage(
                "cannot use '!!' in the destination path when reading from stdin".to_string(),
            ));
        }
        let stem = src.with_extension("");
        let stem = stem.to_string_lossy();
        return Ok(Some(PathBuf::from(dst.replace("!!", &stem))));
    }
    Ok(Some(PathBuf::from(dst)))
}

fn aamp_to_yml(data: &[u8]) -> Result<Vec<u8>, AampError> {
    let mut reader = Reader::new(data)?.with_config(aamp::ReaderConfig { track_strings: true });
    let pio = reader.parse()?;
    let seen: IndexMap<_, _> = reader.seen_strings().clone();
    let resolver = NameResolver::new(&seen);
    let doc = to_doc_tree(&pio, &resolver);
    serde_yaml::to_string(&doc)
        .map(String::into_bytes)
        .map_err(AampError::from)
}

fn yml_to_aamp(data: &[u8]) -> Result<Vec<u8>, AampError> {
    let doc: serde_yaml::Value = serde_yaml::from_slice(data)?;
    let pio = from_doc_tree(&doc)?;
    write_binary(&pio)
}
