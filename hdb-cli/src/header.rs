//! Header commands: decode, encode.

use anyhow::{Context, Result, bail};
use hdb_proto::{PART_HEADER_SIZE, PartAttributes, PartHeader, PartKind};
use serde::Serialize;

use crate::OutputFormat;

/// Arguments for `hdbpart decode`.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Header bytes as hex. Whitespace is ignored; bytes past the
    /// first 16 are treated as payload.
    #[arg(required = true, num_args = 1..)]
    pub hex: Vec<String>,

    /// Output format.
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for `hdbpart encode`.
#[derive(clap::Args)]
pub struct EncodeArgs {
    /// Part kind name or code (e.g. `command`, `5`, `-7`).
    #[arg(short, long, allow_negative_numbers = true)]
    pub kind: PartKind,

    /// Attribute flag to set; repeatable.
    #[arg(short, long = "attr", value_enum)]
    pub attrs: Vec<Flag>,

    /// Raw attribute byte, OR-ed with `--attr`.
    #[arg(long, value_parser = crate::parse_byte, default_value = "0")]
    pub attr_bits: u8,

    /// `argumentCount` field.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub arg_count: i16,

    /// `bigArgumentCount` field.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub big_arg_count: i32,

    /// `bufferLength` field.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub buffer_length: i32,

    /// `bufferSize` field.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub buffer_size: i32,
}

/// Named attribute flags accepted by `--attr`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Flag {
    /// 0x01
    LastPacket,
    /// 0x02
    NextPacket,
    /// 0x04
    FirstPacket,
    /// 0x08
    RowNotFound,
    /// 0x10
    ResultsetClosed,
}

impl From<Flag> for PartAttributes {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::LastPacket => Self::LAST_PACKET,
            Flag::NextPacket => Self::NEXT_PACKET,
            Flag::FirstPacket => Self::FIRST_PACKET,
            Flag::RowNotFound => Self::ROW_NOT_FOUND,
            Flag::ResultsetClosed => Self::RESULTSET_CLOSED,
        }
    }
}

impl EncodeArgs {
    fn header(&self) -> PartHeader {
        let part_attributes = self
            .attrs
            .iter()
            .fold(PartAttributes::from_bits(self.attr_bits), |acc, f| {
                acc | PartAttributes::from(*f)
            });
        PartHeader {
            part_kind: self.kind,
            part_attributes,
            argument_count: self.arg_count,
            big_argument_count: self.big_arg_count,
            buffer_length: self.buffer_length,
            buffer_size: self.buffer_size,
        }
    }
}

/// JSON view of a decoded header with its derived flags.
#[derive(Serialize)]
struct Report<'a> {
    header: &'a PartHeader,
    kind_name: Option<&'static str>,
    flags: Vec<&'static str>,
    last_packet: bool,
    resultset_closed: bool,
    no_rows: bool,
    trailing_bytes: usize,
}

pub fn decode(args: &DecodeArgs) -> Result<()> {
    let bytes = parse_hex(&args.hex.concat())?;
    let (header, trailing) = split_header(&bytes)?;
    tracing::info!(%header, trailing, "decoded header");

    let attrs = header.part_attributes;
    if matches!(args.format, OutputFormat::Json) {
        let report = Report {
            header: &header,
            kind_name: header.part_kind.name(),
            flags: attrs.names().collect(),
            last_packet: attrs.last_packet(),
            resultset_closed: attrs.resultset_closed(),
            no_rows: attrs.no_rows(),
            trailing_bytes: trailing,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("part kind:          {} ({})", header.part_kind, header.part_kind.code());
    println!("attributes:         {attrs} ({:#04x})", attrs.bits());
    println!("argument count:     {}", header.argument_count);
    println!("big argument count: {}", header.big_argument_count);
    println!("buffer length:      {}", header.buffer_length);
    println!("buffer size:        {}", header.buffer_size);
    println!("last packet:        {}", attrs.last_packet());
    println!("resultset closed:   {}", attrs.resultset_closed());
    println!("no rows:            {}", attrs.no_rows());
    if trailing > 0 {
        println!("trailing bytes:     {trailing}");
    }
    Ok(())
}

pub fn encode(args: &EncodeArgs) -> Result<()> {
    let header = args.header();
    tracing::info!(%header, "encoding header");
    println!("{}", to_spaced_hex(&header.encode()));
    Ok(())
}

/// Decodes hex, ignoring whitespace.
fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).with_context(|| format!("invalid hex input {compact:?}"))
}

/// Splits off the header and returns it with the count of bytes after it.
fn split_header(bytes: &[u8]) -> Result<(PartHeader, usize)> {
    let Some((head, rest)) = bytes.split_first_chunk::<PART_HEADER_SIZE>() else {
        bail!(
            "need {PART_HEADER_SIZE} header bytes, got {}",
            bytes.len()
        );
    };
    Ok((PartHeader::decode(head), rest.len()))
}

/// Target that events in this module are logged under.
#[cfg(test)]
pub(crate) const fn event_target() -> &'static str {
    module_path!()
}

fn to_spaced_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
