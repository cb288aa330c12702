//! Part framing for the HANA SQL command network protocol.
//!
//! A part is the atomic unit of a message: a fixed 16-byte [`PartHeader`]
//! followed by a kind-specific payload. This crate covers the header codec,
//! the [`PartKind`] and [`PartAttributes`] metadata it carries, and the
//! [`RequestPart`] / [`ReplyPart`] contracts that payload types implement.
//!
//! # Example
//!
//! ```
//! use hdb_proto::{PartAttributes, PartHeader, PartKind};
//!
//! let header = PartHeader {
//!     part_kind: PartKind::COMMAND,
//!     part_attributes: PartAttributes::LAST_PACKET | PartAttributes::ROW_NOT_FOUND,
//!     ..PartHeader::default()
//! };
//!
//! let mut wire = Vec::new();
//! header.write(&mut wire).unwrap();
//! assert_eq!(wire.len(), PartHeader::SIZE);
//!
//! let decoded = PartHeader::read(&mut wire.as_slice()).unwrap();
//! assert!(decoded.part_attributes.no_rows());
//! ```

mod attributes;
mod error;
mod header;
mod kind;
mod part;
mod proptest;
pub mod wire;

pub use attributes::{PartAttributes, PartAttributesQuery};
pub use error::{Error, Result};
pub use header::{PART_HEADER_SIZE, PartHeader};
pub use kind::{ParsePartKindError, PartKind};
pub use part::{ReplyPart, RequestPart, read_part, write_part};
