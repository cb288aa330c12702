//! Property-based tests for the part header codec.
//!
//! - Header roundtrip for arbitrary field values
//! - Encoded size is always 16 bytes
//! - Attribute predicates are pure bit tests

#![cfg(test)]

use proptest::prelude::*;

use crate::{PART_HEADER_SIZE, PartAttributes, PartHeader, PartKind};

prop_compose! {
    fn arb_header()(
        kind in any::<i8>(),
        attrs in any::<u8>(),
        argument_count in any::<i16>(),
        big_argument_count in any::<i32>(),
        buffer_length in any::<i32>(),
        buffer_size in any::<i32>(),
    ) -> PartHeader {
        PartHeader {
            part_kind: PartKind::new(kind),
            part_attributes: PartAttributes::from_bits(attrs),
            argument_count,
            big_argument_count,
            buffer_length,
            buffer_size,
        }
    }
}

proptest! {
    #[test]
    fn header_roundtrip(header in arb_header()) {
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        prop_assert_eq!(buf.len(), PART_HEADER_SIZE);

        let decoded = PartHeader::read(&mut buf.as_slice()).unwrap();
        prop_assert_eq!(decoded, header);
    }

    #[test]
    fn decode_never_panics(bytes in any::<[u8; PART_HEADER_SIZE]>()) {
        let header = PartHeader::decode(&bytes);
        prop_assert_eq!(header.encode(), bytes);
    }

    #[test]
    fn short_input_always_fails(bytes in prop::collection::vec(any::<u8>(), 0..PART_HEADER_SIZE)) {
        prop_assert!(PartHeader::read(&mut bytes.as_slice()).is_err());
    }
}

#[test]
fn attribute_predicates_for_every_byte() {
    for bits in 0..=u8::MAX {
        let attrs = PartAttributes::from_bits(bits);
        assert_eq!(attrs.resultset_closed(), bits & 0x10 != 0, "{bits:#04x}");
        assert_eq!(attrs.last_packet(), bits & 0x01 != 0, "{bits:#04x}");
        assert_eq!(attrs.no_rows(), bits & 0x09 == 0x09, "{bits:#04x}");
    }
}
