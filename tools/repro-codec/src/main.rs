// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use anyhow::Context;
use clap::{Parser, Subcommand};
use repro::{value_from_json, value_to_json, Descriptor, EncodeOptions, Value, View};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "repro-codec")]
#[command(about = "Encode, decode and size repro buffers from JSON descriptor literals")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON value
    Encode {
        /// Descriptor literal (JSON)
        #[arg(short, long, value_name = "FILE")]
        descriptor: PathBuf,

        /// Value to encode (JSON)
        #[arg(long, value_name = "FILE")]
        value: PathBuf,

        /// Output buffer (hex dump on stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Validate the value against the descriptor first
        #[arg(long)]
        validate: bool,
    },

    /// Decode a buffer and print it as JSON
    Decode {
        /// Descriptor literal (JSON)
        #[arg(short, long, value_name = "FILE")]
        descriptor: PathBuf,

        /// Encoded buffer
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Dotted path to read lazily, e.g. `items.0.name`
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Print the encoded size of a JSON value
    Size {
        /// Descriptor literal (JSON)
        #[arg(short, long, value_name = "FILE")]
        descriptor: PathBuf,

        /// Value to measure (JSON)
        #[arg(long, value_name = "FILE")]
        value: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            descriptor,
            value,
            output,
            validate,
        } => {
            let bytes = cmd_encode(&descriptor, &value, validate)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &bytes)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("[OK] {} bytes -> {}", bytes.len(), path.display());
                }
                None => print!("{}", hex_dump(&bytes)),
            }
        }
        Commands::Decode {
            descriptor,
            input,
            path,
        } => {
            let json = cmd_decode(&descriptor, &input, path.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Commands::Size { descriptor, value } => {
            println!("{}", cmd_size(&descriptor, &value)?);
        }
    }

    Ok(())
}

fn load_view(descriptor: &Path) -> anyhow::Result<View> {
    let literal = std::fs::read_to_string(descriptor)
        .with_context(|| format!("reading descriptor {}", descriptor.display()))?;
    let desc = Descriptor::from_json(&literal)
        .with_context(|| format!("parsing descriptor {}", descriptor.display()))?;
    log::debug!("[cli] loaded {} descriptor", desc.kind_name());
    Ok(View::with_schema(desc))
}

fn load_value(view: &View, value: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(value)
        .with_context(|| format!("reading value {}", value.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing value {}", value.display()))?;
    Ok(value_from_json(view.descriptor(), &json)?)
}

fn cmd_encode(descriptor: &Path, value: &Path, validate: bool) -> anyhow::Result<Vec<u8>> {
    let view = load_view(descriptor)?;
    let value = load_value(&view, value)?;
    let options = EncodeOptions { validate };
    Ok(view.encode(&value, options)?.into_owned())
}

fn cmd_decode(descriptor: &Path, input: &Path, path: Option<&str>) -> anyhow::Result<serde_json::Value> {
    let view = load_view(descriptor)?;
    let bytes =
        std::fs::read(input).with_context(|| format!("reading buffer {}", input.display()))?;

    let value = match path {
        Some(path) => {
            let lens = view.over(&bytes)?;
            let Some(node) = lens.path(path)? else {
                anyhow::bail!("nothing at path `{path}`");
            };
            node.to_value()?
        }
        None => view.decode(&bytes)?,
    };
    Ok(value_to_json(&value))
}

fn cmd_size(descriptor: &Path, value: &Path) -> anyhow::Result<usize> {
    let view = load_view(descriptor)?;
    let value = load_value(&view, value)?;
    Ok(view.byte_length(&value)?)
}

fn hex_dump(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    for (i, chunk) in bytes.chunks(16).enumerate() {
        let _ = write!(out, "{:08x}  ", i * 16);
        for b in chunk {
            let _ = write!(out, "{b:02x} ");
        }
        for _ in chunk.len()..16 {
            out.push_str("   ");
        }
        out.push('|');
        out.extend(chunk.iter().map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        }));
        out.push_str("|\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DESCRIPTOR: &str = r#"{"type": "struct", "fields": [
        ["a", {"type": "integer", "signed": false, "bits": 32}],
        ["g", {"type": "vector", "items": {"type": "char", "bytes": 5}}]
    ]}"#;

    fn temp_json(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(text.as_bytes()).expect("write");
        file
    }

    #[test]
    fn test_parse_encode_args() {
        let cli = Cli::try_parse_from([
            "repro-codec",
            "encode",
            "-d",
            "d.json",
            "--value",
            "v.json",
            "--validate",
        ])
        .expect("parse");
        match cli.command {
            Commands::Encode {
                descriptor,
                output,
                validate,
                ..
            } => {
                assert_eq!(descriptor, PathBuf::from("d.json"));
                assert!(output.is_none());
                assert!(validate);
            }
            _ => panic!("expected encode"),
        }
    }

    #[test]
    fn test_decode_requires_input() {
        assert!(Cli::try_parse_from(["repro-codec", "decode", "-d", "d.json"]).is_err());
    }

    #[test]
    fn test_encode_decode_through_files() {
        let desc = temp_json(DESCRIPTOR);
        let value = temp_json(r#"{"a": 64, "g": ["12345", "abcde"]}"#);

        let bytes = cmd_encode(desc.path(), value.path(), true).expect("encode");
        assert_eq!(cmd_size(desc.path(), value.path()).expect("size"), bytes.len());

        let mut buffer = tempfile::NamedTempFile::new().expect("tempfile");
        buffer.write_all(&bytes).expect("write");

        let whole = cmd_decode(desc.path(), buffer.path(), None).expect("decode");
        assert_eq!(whole, serde_json::json!({"a": 64, "g": ["12345", "abcde"]}));

        let item = cmd_decode(desc.path(), buffer.path(), Some("g.1")).expect("path");
        assert_eq!(item, serde_json::json!("abcde"));

        assert!(cmd_decode(desc.path(), buffer.path(), Some("g.9")).is_err());
    }

    #[test]
    fn test_validation_failure_is_reported() {
        let desc = temp_json(DESCRIPTOR);
        let value = temp_json(r#"{"a": 64, "g": ["too long"]}"#);
        let err = cmd_encode(desc.path(), value.path(), true).expect_err("invalid");
        assert!(err.to_string().contains("g.0"), "{err}");
    }

    #[test]
    fn test_hex_dump_layout() {
        let dump = hex_dump(b"AB\x00");
        assert!(dump.starts_with("00000000  41 42 00 "));
        assert!(dump.ends_with("|AB.|\n"));
    }
}
