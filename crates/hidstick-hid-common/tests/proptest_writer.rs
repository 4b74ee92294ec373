//! Property tests for the bounded report writer.

use hidstick_hid_common::{HidCommonError, ReportParser, ReportWriter};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// No sequence of writes can grow the buffer past its capacity, and a
    /// rejected write never changes what was already written.
    #[test]
    fn prop_writer_never_exceeds_capacity(
        capacity in 0usize..64,
        chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..10), 0..20),
    ) {
        let mut writer = ReportWriter::with_capacity(capacity);
        for chunk in &chunks {
            let before = writer.as_slice().to_vec();
            match writer.write_bytes(chunk) {
                Ok(_) => prop_assert_eq!(writer.len(), before.len() + chunk.len()),
                Err(HidCommonError::BufferOverflow { capacity: cap, requested }) => {
                    prop_assert_eq!(cap, capacity);
                    prop_assert!(requested > capacity);
                    prop_assert_eq!(writer.as_slice(), before.as_slice());
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
            prop_assert!(writer.len() <= capacity);
        }
    }

    /// Signed 16-bit values written little-endian are read back unchanged.
    #[test]
    fn prop_i16_le_is_stable(values in proptest::collection::vec(any::<i16>(), 1..16)) {
        let mut writer = ReportWriter::with_capacity(values.len() * 2);
        for value in &values {
            prop_assert!(writer.write_i16_le(*value).is_ok());
        }
        prop_assert_eq!(writer.remaining(), 0);

        let bytes = writer.into_inner();
        let mut parser = ReportParser::new(&bytes);
        for value in &values {
            prop_assert_eq!(parser.read_i16_le().ok(), Some(*value));
        }
        prop_assert_eq!(parser.remaining(), 0);
    }
}
