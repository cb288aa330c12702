//! Fixed-width integer primitives over any `Read`/`Write` stream.
//!
//! The protocol encodes every integer little-endian, two's complement.

use std::io::{self, Read, Write};

/// Fixed-width integer reads. A short read fails with
/// [`io::ErrorKind::UnexpectedEof`].
pub trait ReadExt: Read {
    /// Reads one unsigned byte.
    fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Reads one signed byte.
    fn read_i8(&mut self) -> io::Result<i8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(i8::from_le_bytes(buf))
    }

    /// Reads a little-endian `i16`.
    fn read_i16(&mut self) -> io::Result<i16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(i16::from_le_bytes(buf))
    }

    /// Reads a little-endian `i32`.
    fn read_i32(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }
}

impl<R: Read + ?Sized> ReadExt for R {}

/// Fixed-width integer writes, symmetric to [`ReadExt`].
pub trait WriteExt: Write {
    /// Writes one unsigned byte.
    fn write_u8(&mut self, v: u8) -> io::Result<()> {
        self.write_all(&[v])
    }

    /// Writes one signed byte.
    fn write_i8(&mut self, v: i8) -> io::Result<()> {
        self.write_all(&v.to_le_bytes())
    }

    /// Writes a little-endian `i16`.
    fn write_i16(&mut self, v: i16) -> io::Result<()> {
        self.write_all(&v.to_le_bytes())
    }

    /// Writes a little-endian `i32`.
    fn write_i32(&mut self, v: i32) -> io::Result<()> {
        self.write_all(&v.to_le_bytes())
    }
}

impl<W: Write + ?Sized> WriteExt for W {}
