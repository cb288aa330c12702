//! Header-then-payload framing over in-memory streams.

#![allow(clippy::unwrap_used, clippy::missing_docs_in_private_items)]

use std::io::{self, Cursor, Read, Write};

use hdb_proto::wire::{ReadExt, WriteExt};
use hdb_proto::{
    Error, PartAttributes, PartHeader, PartKind, ReplyPart, RequestPart, read_part, write_part,
};

/// SQL text sent as a single argument.
struct Command(String);

impl RequestPart for Command {
    fn kind(&self) -> PartKind {
        PartKind::COMMAND
    }

    fn size(&self) -> hdb_proto::Result<usize> {
        Ok(self.0.len())
    }

    fn num_arg(&self) -> usize {
        1
    }

    fn write(&self, w: &mut dyn Write) -> hdb_proto::Result<()> {
        w.write_all(self.0.as_bytes())?;
        Ok(())
    }
}

/// Fetch size option: one `i32`.
struct FetchSize(i32);

impl RequestPart for FetchSize {
    fn kind(&self) -> PartKind {
        PartKind::FETCH_SIZE
    }

    fn size(&self) -> hdb_proto::Result<usize> {
        Ok(4)
    }

    fn num_arg(&self) -> usize {
        1
    }

    fn write(&self, w: &mut dyn Write) -> hdb_proto::Result<()> {
        w.write_i32(self.0)?;
        Ok(())
    }
}

/// Announces more bytes than it writes.
struct Liar;

impl RequestPart for Liar {
    fn kind(&self) -> PartKind {
        PartKind::PARAMETERS
    }

    fn size(&self) -> hdb_proto::Result<usize> {
        Ok(8)
    }

    fn num_arg(&self) -> usize {
        1
    }

    fn write(&self, w: &mut dyn Write) -> hdb_proto::Result<()> {
        w.write_i32(1)?;
        Ok(())
    }
}

/// Cannot determine its size.
struct Unsized;

impl RequestPart for Unsized {
    fn kind(&self) -> PartKind {
        PartKind::PARAMETERS
    }

    fn size(&self) -> hdb_proto::Result<usize> {
        Err(Error::encoding(self.kind(), "unsupported parameter type"))
    }

    fn num_arg(&self) -> usize {
        1
    }

    fn write(&self, _w: &mut dyn Write) -> hdb_proto::Result<()> {
        unreachable!("size failed first")
    }
}

/// Affected row counts, one `i32` per argument.
#[derive(Default)]
struct RowsAffected {
    num_arg: usize,
    rows: Vec<i32>,
}

impl ReplyPart for RowsAffected {
    fn set_num_arg(&mut self, num_arg: usize) {
        self.num_arg = num_arg;
    }

    fn read(&mut self, r: &mut dyn Read) -> hdb_proto::Result<()> {
        self.rows.clear();
        for _ in 0..self.num_arg {
            self.rows.push(r.read_i32()?);
        }
        Ok(())
    }
}

/// A kind that always trusts `big_argument_count`.
#[derive(Default)]
struct BigCounted {
    num_arg: usize,
}

impl ReplyPart for BigCounted {
    fn set_num_arg(&mut self, num_arg: usize) {
        self.num_arg = num_arg;
    }

    fn read(&mut self, _r: &mut dyn Read) -> hdb_proto::Result<()> {
        Ok(())
    }

    fn num_arg_from(&self, header: &PartHeader) -> usize {
        usize::try_from(header.big_argument_count).unwrap_or(0)
    }
}

/// Ignores its payload entirely.
#[derive(Default)]
struct Skip;

impl ReplyPart for Skip {
    fn set_num_arg(&mut self, _num_arg: usize) {}

    fn read(&mut self, _r: &mut dyn Read) -> hdb_proto::Result<()> {
        Ok(())
    }
}

/// Accepts `budget` bytes, then fails every write.
struct BrokenPipe {
    budget: usize,
}

impl Write for BrokenPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        let n = buf.len().min(self.budget);
        self.budget -= n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn rows_affected_frame(rows: &[i32], attrs: PartAttributes) -> Vec<u8> {
    let header = PartHeader {
        part_kind: PartKind::ROWS_AFFECTED,
        part_attributes: attrs,
        argument_count: i16::try_from(rows.len()).unwrap(),
        big_argument_count: 0,
        buffer_length: i32::try_from(rows.len() * 4).unwrap(),
        buffer_size: 0,
    };
    let mut buf = Vec::new();
    header.write(&mut buf).unwrap();
    for r in rows {
        buf.write_i32(*r).unwrap();
    }
    buf
}

#[test]
fn request_parts_as_trait_objects() {
    let parts: Vec<Box<dyn RequestPart>> = vec![
        Box::new(Command("SELECT 1 FROM DUMMY".into())),
        Box::new(FetchSize(32)),
    ];

    let mut wire = Vec::new();
    for part in &parts {
        write_part(&mut wire, part.as_ref(), PartAttributes::EMPTY, 1024).unwrap();
    }
    assert_eq!(wire.len(), 16 + 19 + 16 + 4);

    let mut cursor = Cursor::new(&wire);
    let first = PartHeader::read(&mut cursor).unwrap();
    assert_eq!(first.part_kind, PartKind::COMMAND);
    assert_eq!(first.argument_count, 1);
    assert_eq!(first.buffer_length, 19);
    assert_eq!(first.buffer_size, 1024);

    let mut sql = vec![0u8; 19];
    cursor.read_exact(&mut sql).unwrap();
    assert_eq!(sql, b"SELECT 1 FROM DUMMY");

    let second = PartHeader::read(&mut cursor).unwrap();
    assert_eq!(second.part_kind, PartKind::FETCH_SIZE);
    assert_eq!(cursor.read_i32().unwrap(), 32);
}

#[test]
fn reply_sequence_until_last_packet() {
    let mut wire = rows_affected_frame(&[1, 2], PartAttributes::FIRST_PACKET);
    wire.extend(rows_affected_frame(&[3], PartAttributes::LAST_PACKET));
    let mut cursor = Cursor::new(wire);

    let mut rows = Vec::new();
    loop {
        let mut part = RowsAffected::default();
        let header = read_part(&mut cursor, &mut part).unwrap();
        rows.extend(part.rows);
        if header.part_attributes.last_packet() {
            break;
        }
    }
    assert_eq!(rows, [1, 2, 3]);
}

#[test]
fn unread_payload_is_skipped() {
    let mut wire = rows_affected_frame(&[10, 20, 30], PartAttributes::EMPTY);
    wire.extend(rows_affected_frame(&[40], PartAttributes::LAST_PACKET));
    let mut cursor = Cursor::new(wire);

    read_part(&mut cursor, &mut Skip).unwrap();

    let mut part = RowsAffected::default();
    read_part(&mut cursor, &mut part).unwrap();
    assert_eq!(part.rows, [40]);
}

#[test]
fn kind_specific_count_selection() {
    let header = PartHeader {
        part_kind: PartKind::RESULTSET,
        argument_count: 5,
        big_argument_count: 70_000,
        ..PartHeader::default()
    };
    let mut wire = Vec::new();
    header.write(&mut wire).unwrap();

    let mut big = BigCounted::default();
    read_part(&mut wire.as_slice(), &mut big).unwrap();
    assert_eq!(big.num_arg, 70_000);

    assert_eq!(RowsAffected::default().num_arg_from(&header), 5);
}

#[test]
fn truncated_payload_fails() {
    let mut wire = rows_affected_frame(&[1, 2], PartAttributes::LAST_PACKET);
    wire.truncate(wire.len() - 2);

    let err = read_part(&mut wire.as_slice(), &mut Skip).unwrap_err();
    assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
}

#[test]
fn truncated_header_fails() {
    let wire = rows_affected_frame(&[], PartAttributes::LAST_PACKET);
    let err = read_part(&mut &wire[..10], &mut Skip).unwrap_err();
    assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
}

#[test]
fn negative_buffer_length_is_rejected() {
    let header = PartHeader {
        buffer_length: -4,
        ..PartHeader::default()
    };
    let mut wire = Vec::new();
    header.write(&mut wire).unwrap();

    let err = read_part(&mut wire.as_slice(), &mut Skip).unwrap_err();
    assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::InvalidData));
}

#[test]
fn broken_sink_fails_header_write() {
    let header = PartHeader::default();
    let err = header.write(&mut BrokenPipe { budget: 7 }).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}

#[test]
fn broken_sink_fails_payload_write() {
    let mut sink = BrokenPipe { budget: 18 };
    let err = write_part(&mut sink, &FetchSize(1), PartAttributes::EMPTY, 0).unwrap_err();
    assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
}

#[test]
fn size_mismatch_is_an_encoding_error() {
    let mut wire = Vec::new();
    let err = write_part(&mut wire, &Liar, PartAttributes::EMPTY, 0).unwrap_err();
    assert!(matches!(err, Error::Encoding { kind, .. } if kind == PartKind::PARAMETERS));
}

#[test]
fn size_failure_writes_nothing() {
    let mut wire = Vec::new();
    let err = write_part(&mut wire, &Unsized, PartAttributes::EMPTY, 0).unwrap_err();
    assert!(matches!(err, Error::Encoding { .. }));
    assert!(wire.is_empty());
    assert_eq!(
        err.to_string(),
        "parameters: cannot encode payload: unsupported parameter type"
    );
}
