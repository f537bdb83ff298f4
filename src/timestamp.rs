//! Conversions between Unix time and UUID ticks
//!
//! A version 1 UUID carries a 60-bit count of 100-nanosecond intervals since the UUID epoch
//! (1582-10-15T00:00:00Z). The [`wide`] functions compute with native 64-bit integers while the
//! [`narrow`] functions reproduce the same results with the byte-string arithmetic in
//! [`bignum`](crate::bignum). The crate-level functions use the wide path unless the `narrow_int`
//! feature is enabled.

use std::time::Duration;

/// Number of 100-nanosecond intervals from the UUID epoch to the Unix epoch.
pub const UUID_EPOCH_OFFSET: u64 = 0x01b2_1dd2_1381_4000;

const TICKS_PER_SECOND: u64 = 10_000_000;
const TICKS_MASK: u64 = (1 << 60) - 1;

/// Converts a duration since the Unix epoch into UUID ticks.
pub fn ticks_from_unix(since_unix: Duration) -> u64 {
    if cfg!(feature = "narrow_int") {
        narrow::ticks_from_unix(since_unix)
    } else {
        wide::ticks_from_unix(since_unix)
    }
}

/// Converts UUID ticks into whole seconds since the Unix epoch.
pub fn unix_secs_from_ticks(ticks: u64) -> i64 {
    if cfg!(feature = "narrow_int") {
        narrow::unix_secs_from_ticks(ticks)
    } else {
        wide::unix_secs_from_ticks(ticks)
    }
}

/// Native 64-bit integer arithmetic.
pub mod wide {
    use super::{Duration, TICKS_MASK, TICKS_PER_SECOND, UUID_EPOCH_OFFSET};

    /// Converts a duration since the Unix epoch into UUID ticks.
    pub fn ticks_from_unix(since_unix: Duration) -> u64 {
        let unix_ticks = since_unix
            .as_secs()
            .wrapping_mul(TICKS_PER_SECOND)
            .wrapping_add(since_unix.subsec_nanos() as u64 / 100);
        unix_ticks.wrapping_add(UUID_EPOCH_OFFSET) & TICKS_MASK
    }

    /// Converts UUID ticks into whole seconds since the Unix epoch, truncating toward zero.
    pub fn unix_secs_from_ticks(ticks: u64) -> i64 {
        ((ticks & TICKS_MASK) as i64 - UUID_EPOCH_OFFSET as i64) / TICKS_PER_SECOND as i64
    }
}

/// Byte-string arithmetic that never needs an integer wider than 16 bits.
pub mod narrow {
    use super::{Duration, TICKS_MASK, UUID_EPOCH_OFFSET};
    use crate::bignum;

    const OFFSET_BYTES: [u8; 8] = UUID_EPOCH_OFFSET.to_be_bytes();
    const NEGATED_OFFSET_BYTES: [u8; 8] = UUID_EPOCH_OFFSET.wrapping_neg().to_be_bytes();

    /// Converts a duration since the Unix epoch into UUID ticks.
    pub fn ticks_from_unix(since_unix: Duration) -> u64 {
        let digits = format!(
            "{}{:07}",
            since_unix.as_secs(),
            since_unix.subsec_nanos() / 100
        );
        let bytes = bignum::from_digits(&digits).unwrap_or_default();

        // keep the low eight bytes as u64 wraparound would
        let mut unix_ticks = [0u8; 8];
        let n = bytes.len().min(8);
        unix_ticks[8 - n..].copy_from_slice(&bytes[bytes.len() - n..]);
        u64::from_be_bytes(bignum::add_bytes(&unix_ticks, &OFFSET_BYTES)) & TICKS_MASK
    }

    /// Converts UUID ticks into whole seconds since the Unix epoch.
    ///
    /// The offset is subtracted by adding its two's complement and masking off the sign bit, so
    /// ticks earlier than the Unix epoch do not yield negative results as [`super::wide`] does.
    pub fn unix_secs_from_ticks(ticks: u64) -> i64 {
        let ticks = (ticks & TICKS_MASK).to_be_bytes();
        let mut diff = bignum::add_bytes(&ticks, &NEGATED_OFFSET_BYTES);
        diff[0] &= 0x7f;

        // dividing by 10^7 is dropping the last seven digits
        let digits = bignum::to_digits(&diff);
        let n = digits.len().saturating_sub(7);
        digits[..n]
            .bytes()
            .fold(0, |acc, d| acc * 10 + (d - b'0') as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::{narrow, wide, Duration, UUID_EPOCH_OFFSET};
    use proptest::prelude::*;

    /// Converts prepared cases correctly
    #[test]
    fn converts_prepared_cases_correctly() {
        let cases = [
            (Duration::ZERO, UUID_EPOCH_OFFSET, 0),
            (
                Duration::from_secs(1_600_000_000),
                138_192_928_000_000_000,
                1_600_000_000,
            ),
            (
                Duration::new(1_600_000_000, 123_456_789),
                138_192_928_001_234_567,
                1_600_000_000,
            ),
            (Duration::new(9, 999_999_999), UUID_EPOCH_OFFSET + 99_999_999, 9),
        ];
        for (since_unix, ticks, secs) in cases {
            assert_eq!(wide::ticks_from_unix(since_unix), ticks);
            assert_eq!(narrow::ticks_from_unix(since_unix), ticks);
            assert_eq!(wide::unix_secs_from_ticks(ticks), secs);
            assert_eq!(narrow::unix_secs_from_ticks(ticks), secs);
        }
    }

    /// Returns zero for differences shorter than seven digits
    #[test]
    fn returns_zero_for_differences_shorter_than_seven_digits() {
        for diff in [0, 1, 999_999, 9_999_999] {
            assert_eq!(narrow::unix_secs_from_ticks(UUID_EPOCH_OFFSET + diff), 0);
            assert_eq!(wide::unix_secs_from_ticks(UUID_EPOCH_OFFSET + diff), 0);
        }
        assert_eq!(narrow::unix_secs_from_ticks(UUID_EPOCH_OFFSET + 10_000_000), 1);
    }

    /// Truncates pre-Unix-epoch times toward zero on the wide path
    #[test]
    fn truncates_pre_unix_epoch_times_toward_zero_on_the_wide_path() {
        assert_eq!(wide::unix_secs_from_ticks(UUID_EPOCH_OFFSET - 1), 0);
        assert_eq!(wide::unix_secs_from_ticks(UUID_EPOCH_OFFSET - 10_000_000), -1);
        assert_eq!(wide::unix_secs_from_ticks(0), -12_219_292_800);
    }

    /// Wraps ticks to 60 bits
    #[test]
    fn wraps_ticks_to_60_bits() {
        // (2^60 - UUID_EPOCH_OFFSET) ticks after the Unix epoch
        let since_unix = Duration::new(103_072_857_660, 684_697_600);
        assert_eq!(wide::ticks_from_unix(since_unix), 0);
        assert_eq!(narrow::ticks_from_unix(since_unix), 0);
    }

    proptest! {
        /// Narrow and wide paths agree on ticks
        #[test]
        fn narrow_and_wide_paths_agree_on_ticks(
            secs in 0u64..100_000_000_000,
            nanos in 0u32..1_000_000_000,
        ) {
            let since_unix = Duration::new(secs, nanos);
            prop_assert_eq!(
                narrow::ticks_from_unix(since_unix),
                wide::ticks_from_unix(since_unix)
            );
        }

        /// Narrow and wide paths agree on seconds after the Unix epoch
        #[test]
        fn narrow_and_wide_paths_agree_on_seconds_after_the_unix_epoch(
            ticks in UUID_EPOCH_OFFSET..(1u64 << 60),
        ) {
            prop_assert_eq!(
                narrow::unix_secs_from_ticks(ticks),
                wide::unix_secs_from_ticks(ticks)
            );
        }
    }
}
