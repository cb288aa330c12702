//! Fixed 16-byte part header.
//!
//! ```text
//! offset  size  field
//! 0       1     part_kind           i8
//! 1       1     part_attributes     u8 bitmask
//! 2       2     argument_count      i16 LE
//! 4       4     big_argument_count  i32 LE
//! 8       4     buffer_length       i32 LE
//! 12      4     buffer_size         i32 LE
//! ```
//!
//! No padding follows the header; the payload starts at offset 16.

use std::fmt;
use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

use crate::attributes::PartAttributes;
use crate::kind::PartKind;

/// Size of an encoded part header in bytes.
pub const PART_HEADER_SIZE: usize = 16;

/// Header preceding every part payload on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartHeader {
    /// Payload type.
    pub part_kind: PartKind,
    /// Transport and resultset state flags.
    pub part_attributes: PartAttributes,
    /// Element count when it fits in 16 bits.
    pub argument_count: i16,
    /// Element count for payloads beyond the 16-bit range.
    ///
    /// Which of the two counts is authoritative depends on the part kind,
    /// see [`ReplyPart::num_arg_from`](crate::ReplyPart::num_arg_from).
    pub big_argument_count: i32,
    /// Length of the payload that follows, in bytes.
    pub buffer_length: i32,
    /// Size of the buffer available for the payload; may exceed `buffer_length`.
    pub buffer_size: i32,
}

impl PartHeader {
    /// Encoded size in bytes.
    pub const SIZE: usize = PART_HEADER_SIZE;

    /// Encodes the header into its 16-byte wire form.
    pub fn encode(&self) -> [u8; PART_HEADER_SIZE] {
        let mut buf = [0u8; PART_HEADER_SIZE];
        buf[0] = self.part_kind.code().to_le_bytes()[0];
        buf[1] = self.part_attributes.bits();
        buf[2..4].copy_from_slice(&self.argument_count.to_le_bytes());
        buf[4..8].copy_from_slice(&self.big_argument_count.to_le_bytes());
        buf[8..12].copy_from_slice(&self.buffer_length.to_le_bytes());
        buf[12..16].copy_from_slice(&self.buffer_size.to_le_bytes());
        buf
    }

    /// Decodes a header from its 16-byte wire form. Never fails: unknown
    /// kinds and attribute bits are kept as-is.
    pub fn decode(buf: &[u8; PART_HEADER_SIZE]) -> Self {
        Self {
            part_kind: PartKind::new(i8::from_le_bytes([buf[0]])),
            part_attributes: PartAttributes::from_bits(buf[1]),
            argument_count: i16::from_le_bytes([buf[2], buf[3]]),
            big_argument_count: i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            buffer_length: i32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
            buffer_size: i32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
        }
    }

    /// Writes the header to `w`.
    ///
    /// All 16 bytes go out in a single `write_all`. On error the header must
    /// be treated as not sent and the stream as unusable.
    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.encode())?;
        tracing::trace!(header = %self, "write part header");
        Ok(())
    }

    /// Reads a header from `r`.
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] when fewer than 16 bytes
    /// are available. No header value is produced on failure.
    pub fn read<R: Read + ?Sized>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; PART_HEADER_SIZE];
        r.read_exact(&mut buf)?;
        let header = Self::decode(&buf);
        tracing::trace!(header = %header, "read part header");
        Ok(header)
    }

    /// Shorthand for `self.part_attributes`.
    pub const fn attributes(&self) -> PartAttributes {
        self.part_attributes
    }
}

impl fmt::Display for PartHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "part kind {} partAttributes {} argumentCount {} bigArgumentCount {} bufferLength {} bufferSize {}",
            self.part_kind,
            self.part_attributes,
            self.argument_count,
            self.big_argument_count,
            self.buffer_length,
            self.buffer_size,
        )
    }
}
