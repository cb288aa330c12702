//! Part attribute flags.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Read-side view of a part's attribute flags.
///
/// Resultset consumers only need to know whether more rows may follow;
/// they can depend on this trait instead of the concrete bitmask.
pub trait PartAttributesQuery {
    /// The server closed the resultset after this part.
    fn resultset_closed(&self) -> bool;
    /// This is the last packet of the resultset.
    fn last_packet(&self) -> bool;
    /// The query matched no rows at all.
    fn no_rows(&self) -> bool;
}

/// Bitmask byte describing the transport state of a part.
///
/// Every byte value is accepted. Bits outside the five known flags are
/// carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartAttributes(u8);

impl PartAttributes {
    /// No flags set.
    pub const EMPTY: Self = Self(0);
    /// Last packet of a multi-packet reply.
    pub const LAST_PACKET: Self = Self(0x01);
    /// More packets follow.
    pub const NEXT_PACKET: Self = Self(0x02);
    /// First packet of a multi-packet reply.
    pub const FIRST_PACKET: Self = Self(0x04);
    /// No row matched.
    pub const ROW_NOT_FOUND: Self = Self(0x08);
    /// Resultset was closed by the server.
    pub const RESULTSET_CLOSED: Self = Self(0x10);
    /// Every named flag.
    pub const KNOWN: Self = Self(
        Self::LAST_PACKET.0
            | Self::NEXT_PACKET.0
            | Self::FIRST_PACKET.0
            | Self::ROW_NOT_FOUND.0
            | Self::RESULTSET_CLOSED.0,
    );

    /// Wraps a raw bitmask.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// The raw bitmask.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether every bit of `flag` is set.
    pub const fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// `LAST_PACKET` is set.
    pub const fn last_packet(self) -> bool {
        self.contains(Self::LAST_PACKET)
    }

    /// `NEXT_PACKET` is set.
    pub const fn next_packet(self) -> bool {
        self.contains(Self::NEXT_PACKET)
    }

    /// `FIRST_PACKET` is set.
    pub const fn first_packet(self) -> bool {
        self.contains(Self::FIRST_PACKET)
    }

    /// `ROW_NOT_FOUND` is set.
    pub const fn row_not_found(self) -> bool {
        self.contains(Self::ROW_NOT_FOUND)
    }

    /// `RESULTSET_CLOSED` is set.
    pub const fn resultset_closed(self) -> bool {
        self.contains(Self::RESULTSET_CLOSED)
    }

    /// Both `LAST_PACKET` and `ROW_NOT_FOUND` are set.
    pub const fn no_rows(self) -> bool {
        self.contains(Self(Self::LAST_PACKET.0 | Self::ROW_NOT_FOUND.0))
    }

    /// Set bits that belong to no named flag.
    pub const fn unknown_bits(self) -> u8 {
        self.0 & !Self::KNOWN.0
    }

    /// Names of the set flags, lowest bit first.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        FLAGS
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
    }
}

impl PartAttributesQuery for PartAttributes {
    fn resultset_closed(&self) -> bool {
        Self::resultset_closed(*self)
    }

    fn last_packet(&self) -> bool {
        Self::last_packet(*self)
    }

    fn no_rows(&self) -> bool {
        Self::no_rows(*self)
    }
}

impl BitOr for PartAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PartAttributes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<u8> for PartAttributes {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

impl From<PartAttributes> for u8 {
    fn from(attrs: PartAttributes) -> Self {
        attrs.0
    }
}

impl fmt::Display for PartAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(name)?;
        }
        f.write_str("]")
    }
}

/// Flag names in ascending bit order.
const FLAGS: &[(PartAttributes, &str)] = &[
    (PartAttributes::LAST_PACKET, "lastPacket"),
    (PartAttributes::NEXT_PACKET, "nextPacket"),
    (PartAttributes::FIRST_PACKET, "firstPacket"),
    (PartAttributes::ROW_NOT_FOUND, "rowNotFound"),
    (PartAttributes::RESULTSET_CLOSED, "resultsetClosed"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reports_nothing() {
        let attrs = PartAttributes::EMPTY;
        assert!(!attrs.resultset_closed());
        assert!(!attrs.last_packet());
        assert!(!attrs.no_rows());
        assert_eq!(attrs.to_string(), "[]");
    }

    #[test]
    fn no_rows_needs_both_bits() {
        let last = PartAttributes::LAST_PACKET;
        let not_found = PartAttributes::ROW_NOT_FOUND;
        assert!(!PartAttributes::EMPTY.no_rows());
        assert!(!last.no_rows());
        assert!(!not_found.no_rows());
        assert!((last | not_found).no_rows());
    }

    #[test]
    fn combine_with_or_assign() {
        let mut attrs = PartAttributes::FIRST_PACKET;
        attrs |= PartAttributes::RESULTSET_CLOSED;
        assert_eq!(attrs.bits(), 0x14);
        assert!(attrs.first_packet());
        assert!(attrs.resultset_closed());
        assert!(!attrs.next_packet());
    }

    #[test]
    fn display_lists_flags_in_bit_order() {
        let attrs = PartAttributes::from_bits(0x1f);
        assert_eq!(
            attrs.to_string(),
            "[lastPacket nextPacket firstPacket rowNotFound resultsetClosed]"
        );
        assert_eq!(PartAttributes::from_bits(0x09).to_string(), "[lastPacket rowNotFound]");
    }

    #[test]
    fn unknown_bits_are_kept_but_not_named() {
        let attrs = PartAttributes::from_bits(0xe0);
        assert_eq!(attrs.bits(), 0xe0);
        assert_eq!(attrs.names().count(), 0);
        assert_eq!(attrs.to_string(), "[]");
    }

    #[test]
    fn known_mask_covers_named_flags() {
        let named = FLAGS.iter().fold(PartAttributes::EMPTY, |acc, (f, _)| acc | *f);
        assert_eq!(named, PartAttributes::KNOWN);
        assert_eq!(PartAttributes::from_bits(0xe9).unknown_bits(), 0xe0);
        assert_eq!(PartAttributes::KNOWN.unknown_bits(), 0);
    }

    #[test]
    fn query_trait_matches_inherent() {
        fn closed(q: &dyn PartAttributesQuery) -> bool {
            q.resultset_closed()
        }
        assert!(closed(&PartAttributes::RESULTSET_CLOSED));
        assert!(!closed(&PartAttributes::LAST_PACKET));
    }
}
