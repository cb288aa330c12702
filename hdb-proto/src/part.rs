//! Part role contracts and header-then-payload framing.
//!
//! A part never frames itself. The caller writes (or reads) the header
//! first and then hands the stream to the part for its payload.

use std::io::{self, Read, Write};

use crate::attributes::PartAttributes;
use crate::error::{Error, Result};
use crate::header::PartHeader;
use crate::kind::PartKind;

/// A part that can be sent to the peer.
pub trait RequestPart {
    /// Kind written into the header.
    fn kind(&self) -> PartKind;

    /// Encoded payload size in bytes, excluding the header.
    fn size(&self) -> Result<usize>;

    /// Number of logical arguments (rows, parameters, options) carried.
    fn num_arg(&self) -> usize;

    /// Serializes the payload. Must write exactly [`size`](Self::size) bytes.
    fn write(&self, w: &mut dyn Write) -> Result<()>;
}

/// A part that can be received from the peer.
pub trait ReplyPart {
    /// Injects the argument count decoded from the header.
    fn set_num_arg(&mut self, num_arg: usize);

    /// Deserializes the payload using the injected argument count.
    fn read(&mut self, r: &mut dyn Read) -> Result<()>;

    /// Picks the authoritative argument count for this kind.
    ///
    /// The default trusts `argument_count` and falls back to
    /// `big_argument_count` when the small count is negative, mirroring
    /// [`PartHeader::for_request`]. Kinds with another convention override
    /// this.
    fn num_arg_from(&self, header: &PartHeader) -> usize {
        match usize::try_from(header.argument_count) {
            Ok(n) => n,
            Err(_) => usize::try_from(header.big_argument_count).unwrap_or(0),
        }
    }
}

impl PartHeader {
    /// Builds the header for an outgoing part.
    ///
    /// Counts up to `i16::MAX` go into `argument_count`. Larger counts set
    /// `argument_count` to `-1` and use `big_argument_count`.
    pub fn for_request<P: RequestPart + ?Sized>(
        part: &P,
        attributes: PartAttributes,
        buffer_size: i32,
    ) -> Result<Self> {
        let kind = part.kind();
        let count = part.num_arg();
        let (argument_count, big_argument_count) = match i16::try_from(count) {
            Ok(n) => (n, 0),
            Err(_) => {
                let big = i32::try_from(count)
                    .map_err(|_| Error::TooManyArguments { kind, count })?;
                (-1, big)
            }
        };
        let size = part.size()?;
        let buffer_length =
            i32::try_from(size).map_err(|_| Error::PartTooLarge { kind, size })?;

        Ok(Self {
            part_kind: kind,
            part_attributes: attributes,
            argument_count,
            big_argument_count,
            buffer_length,
            buffer_size,
        })
    }
}

/// Writes `part` framed by its header and returns the header sent.
///
/// Fails with [`Error::Encoding`] if the part writes a different number of
/// bytes than its [`RequestPart::size`] announced.
pub fn write_part<W, P>(
    w: &mut W,
    part: &P,
    attributes: PartAttributes,
    buffer_size: i32,
) -> Result<PartHeader>
where
    W: Write,
    P: RequestPart + ?Sized,
{
    let header = PartHeader::for_request(part, attributes, buffer_size)?;
    header.write(w)?;

    let mut counter = CountingWriter { inner: w, written: 0 };
    part.write(&mut counter)?;
    let written = counter.written;
    if i32::try_from(written).ok() != Some(header.buffer_length) {
        return Err(Error::encoding(
            header.part_kind,
            format!(
                "wrote {written} bytes, header announced {}",
                header.buffer_length
            ),
        ));
    }

    tracing::debug!(kind = %header.part_kind, len = written, "wrote part");
    Ok(header)
}

/// Reads a header, injects the argument count into `part` and reads its
/// payload.
///
/// The part sees at most `buffer_length` bytes. Whatever it leaves unread
/// is discarded so the stream stays aligned on the next part.
pub fn read_part<R, P>(r: &mut R, part: &mut P) -> Result<PartHeader>
where
    R: Read,
    P: ReplyPart + ?Sized,
{
    let header = PartHeader::read(r)?;
    let len = u64::try_from(header.buffer_length).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("negative part buffer length {}", header.buffer_length),
        )
    })?;

    part.set_num_arg(part.num_arg_from(&header));

    let mut payload = r.take(len);
    part.read(&mut payload)?;
    let skipped = io::copy(&mut payload, &mut io::sink())?;
    if payload.limit() > 0 {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    if skipped > 0 {
        tracing::debug!(kind = %header.part_kind, skipped, "skipped unread part payload");
    }

    tracing::debug!(kind = %header.part_kind, len, "read part");
    Ok(header)
}

/// Counts the bytes that pass through to `inner`.
struct CountingWriter<'a, W: ?Sized> {
    /// Destination stream.
    inner: &'a mut W,
    /// Bytes accepted so far.
    written: usize,
}

impl<W: Write + ?Sized> Write for CountingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
