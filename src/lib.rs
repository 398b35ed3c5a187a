//! # Packed Format
//!
//! A byte sequence of known length is packed into a list:
//!
//! ```text
//!  [ 1, 7, [0, 3], 1, 3, 15, 31 ]
//!    ▲  ▲    ▲     ▲
//!    │  │    │     └─ literal: one byte
//!    │  │    └─ run: [value, count], count >= 2
//!    │  └─ unpacked length in bytes
//!    └─ format version
//! ```
//!
//! Packing is a single pass with no lookahead. A byte equal to the one before it
//! extends the current run; anything else starts a new element. Isolated bytes stay
//! literals, so the format pays off on long stretches of identical bytes, i.e.
//! monochrome framebuffers.
//!
//! Unpacking first checks that the elements add up to the declared length, then
//! allocates a zeroed buffer of that length and skips writes for runs of zero.
//!
//! ```
//! let packed = framerle::pack(&[0, 0, 0, 1, 3, 15, 31]);
//! assert_eq!(packed.to_string(), "[1, 7, [0, 3], 1, 3, 15, 31]");
//! assert_eq!(framerle::unpack(&packed).unwrap(), [0, 0, 0, 1, 3, 15, 31]);
//! ```

#[macro_use]
extern crate log;

mod error;
mod pack;
mod packed;
mod unpack;

pub use error::{Error, Result};
pub use pack::{pack, Packer};
pub use packed::{Element, Packed};
pub use unpack::{unpack, Unpacker};

/// the only format version this crate reads and writes
pub const FORMAT_VERSION: u64 = 1;

#[cfg(test)]
mod tests {
    use crate::{pack, unpack, Element, Packed};
    use proptest::prelude::*;
    use std::sync::Once;

    /// 128x62 monochrome frame, 32 bytes per line.
    const FRAME: [&str; 31] = [
        "0000000000000000000000000000000000000000000000000000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "00000000000000000001030f1f7ffffef8f0c0800000000080c0f0fcfeff3f1f",
        "0703000000000000000000000000000000000000000000000000000000000000",
        "000000000000000000000000000000000000000001030f1f7ffffef8f0c08000",
        "00000080c0f0fcfeff3f1f070300000000000000000000000000000000000000",
        "000000000000000000000003071fbffffef8f8feff1f0f070100000000000000",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "0000000000000000000000000000000000000000000003071fbffffef8f8feff",
        "1f0f070100000000000000000000000000000000000000000000000000000000",
        "000000000080e0f0fcfe7f1f0f03071f7ffffef8f0c080000000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "0000000000000000000000000000000080e0f0fcfe7f1f0f03071f7ffffef8f0",
        "c08000000000000000000000000000000000000000000000000000000020383c",
        "3f3f3f0f03010000000000000000030f1f3f3f3e3c3020000000000000000000",
        "000000000000000000000070f8f8f8f8f8f8f870000000000000000000000000",
        "000000000000000020383c3f3f3f0f03010000000000000000030f1f3f3f3e3c",
        "3020000000000000000000000000000000000000000000000000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000018",
        "78f0c08000000000000103ff0301000000000080c0f078180000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000103",
        "07060e0c0c0c0c0f0c080c0c0606030301000000000000000000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000000",
    ];

    static INIT: Once = Once::new();

    fn setup() {
        INIT.call_once(|| {
            let _ = pretty_env_logger::try_init();
        });
    }

    fn frame() -> Vec<u8> {
        hex::decode(FRAME.concat()).unwrap()
    }

    #[test]
    fn test_frame_round_trip() {
        setup();
        let frame = frame();
        let packed = pack(&frame);
        assert_eq!(packed.len(), 992);
        assert_eq!(packed.elements().len(), 183);
        assert_eq!(packed.elements()[0], Element::Run(0, 137));
        assert!(packed
            .to_string()
            .starts_with("[1, 992, [0, 137], 1, 3, 15, 31, 127, 255, 254,"));
        assert_eq!(unpack(&packed).unwrap(), frame);
    }

    #[test]
    fn test_frame_text_round_trip() {
        setup();
        let frame = frame();
        let text = pack(&frame).to_string();
        let parsed: Packed = text.parse().unwrap();
        assert_eq!(unpack(&parsed).unwrap(), frame);
    }

    #[test]
    fn test_repack_changes_nothing() {
        setup();
        let frame = frame();
        let packed = pack(&frame);
        assert_eq!(pack(&unpack(&packed).unwrap()), packed);
    }

    proptest! {
        #[test]
        fn prop_round_trip(input in proptest::collection::vec(any::<u8>(), 0..512)) {
            let packed = pack(&input);
            prop_assert_eq!(unpack(&packed).unwrap(), input);
        }

        // few distinct values so runs actually form
        #[test]
        fn prop_runs_are_minimal(input in proptest::collection::vec(0u8..3, 0..512)) {
            let packed = pack(&input);
            prop_assert_eq!(packed.len(), input.len());
            prop_assert_eq!(packed.expanded_len(), input.len());
            for element in packed.elements() {
                if let Element::Run(_, count) = element {
                    prop_assert!(*count >= 2);
                }
            }
            // adjacent elements never share a value
            for pair in packed.elements().windows(2) {
                prop_assert_ne!(pair[0].value(), pair[1].value());
            }
        }

        #[test]
        fn prop_repack_decodes_the_same(input in proptest::collection::vec(0u8..4, 0..256)) {
            let packed = pack(&input);
            let repacked = pack(&unpack(&packed).unwrap());
            prop_assert_eq!(unpack(&repacked).unwrap(), input);
        }
    }
}
