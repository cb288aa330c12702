//! `hdbpart scan`: walk a raw capture of back-to-back parts.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use hdb_proto::{PartHeader, ReplyPart, read_part};
use serde::Serialize;

use crate::OutputFormat;

/// Arguments for `hdbpart scan`.
#[derive(clap::Args)]
pub struct ScanArgs {
    /// Capture file; `-` reads stdin.
    pub path: PathBuf,

    /// Print each payload as hex.
    #[arg(long)]
    pub payload: bool,

    /// Output format.
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

/// Payload kept verbatim when `keep` is set; otherwise left for
/// `read_part` to skip.
#[derive(Debug, Default, Serialize)]
struct RawPart {
    #[serde(skip)]
    keep: bool,
    #[serde(skip)]
    num_arg: usize,
    #[serde(with = "hex_bytes")]
    bytes: Vec<u8>,
}

impl ReplyPart for RawPart {
    fn set_num_arg(&mut self, num_arg: usize) {
        self.num_arg = num_arg;
    }

    fn read(&mut self, r: &mut dyn Read) -> hdb_proto::Result<()> {
        if self.keep {
            r.read_to_end(&mut self.bytes)?;
        }
        Ok(())
    }
}

/// One scanned part.
#[derive(Debug, Serialize)]
struct Entry {
    offset: u64,
    header: PartHeader,
    payload: RawPart,
}

pub fn scan(args: &ScanArgs) -> Result<()> {
    if args.path.as_os_str() == "-" {
        scan_from(io::stdin().lock(), args)
    } else {
        let file = File::open(&args.path)
            .with_context(|| format!("open {}", args.path.display()))?;
        scan_from(BufReader::new(file), args)
    }
}

fn scan_from<R: BufRead>(r: R, args: &ScanArgs) -> Result<()> {
    if matches!(args.format, OutputFormat::Json) {
        let mut entries = Vec::new();
        scan_reader(r, true, |e| {
            entries.push(e);
            Ok(())
        })?;
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let count = scan_reader(r, args.payload, |e| {
        if e.offset == 0 {
            print_row(&[
                "OFFSET".into(),
                "KIND".into(),
                "ATTRIBUTES".into(),
                "ARGS".into(),
                "BIGARGS".into(),
                "LENGTH".into(),
                "SIZE".into(),
            ]);
        }
        let h = &e.header;
        print_row(&[
            e.offset.to_string(),
            h.part_kind.to_string(),
            h.part_attributes.to_string(),
            h.argument_count.to_string(),
            h.big_argument_count.to_string(),
            h.buffer_length.to_string(),
            h.buffer_size.to_string(),
        ]);
        if !e.payload.bytes.is_empty() {
            println!("          {}", hex::encode(&e.payload.bytes));
        }
        Ok(())
    })?;
    if count == 0 {
        println!("No parts.");
    }
    Ok(())
}

fn print_row(cols: &[String; 7]) {
    let [offset, kind, attrs, args, big_args, len, size] = cols;
    println!("{offset:>8}  {kind:<24} {attrs:<40} {args:>6} {big_args:>10} {len:>8} {size:>8}");
}

/// Reads parts until a clean end of stream between parts, handing each to
/// `on_part` as soon as it is read. Payload bytes are only kept when
/// `keep_payload` is set. Returns the number of parts.
fn scan_reader<R, F>(mut r: R, keep_payload: bool, mut on_part: F) -> Result<usize>
where
    R: BufRead,
    F: FnMut(Entry) -> Result<()>,
{
    let mut count = 0;
    let mut offset = 0u64;
    while !r.fill_buf()?.is_empty() {
        let mut payload = RawPart {
            keep: keep_payload,
            ..RawPart::default()
        };
        let header = read_part(&mut r, &mut payload)
            .with_context(|| format!("part {count} at offset {offset}"))?;
        tracing::debug!(offset, %header, "scanned part");

        // read_part consumed exactly buffer_length payload bytes.
        let len = u64::try_from(header.buffer_length).unwrap_or(0);
        let next = offset + PartHeader::SIZE as u64 + len;
        on_part(Entry {
            offset,
            header,
            payload,
        })?;
        count += 1;
        offset = next;
    }
    Ok(count)
}

/// Serializes a byte vector as a lowercase hex string.
mod hex_bytes {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }
}
