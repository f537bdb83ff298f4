//! Random and time-based UUID generator and related types.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::{timestamp, NodeContext, Uuid};

pub mod with_rand08;

/// A trait that defines the minimum random number generator interface for [`Generator`].
///
/// Version 4 UUIDs are only as unpredictable as this source; use a cryptographically secure
/// generator.
pub trait RandSource {
    /// Returns the next random `u32`.
    fn next_u32(&mut self) -> u32;

    /// Fills `dest` with random data.
    fn fill_bytes(&mut self, dest: &mut [u8]);
}

/// Represents a generator of version 4 (random) and version 1 (time-based) UUIDs.
///
/// The node of time-based UUIDs comes from a [`NodeContext`] passed to each call, so that several
/// generators can share one node and the node can outlive any single generator.
///
/// The clock sequence of time-based UUIDs is a fresh 14-bit random number for every UUID; no
/// monotonic clock sequence is kept.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use uuid_compat::{Generator, NodeContext};
///
/// let ctx = NodeContext::new();
/// let mut g = Generator::with_rand08(OsRng);
/// println!("{}", g.generate_v4()); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// println!("{}", g.generate_v1(&ctx)); // e.g., "5fe94000-f5bc-11ea-a53c-0123456789ab"
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Generator<R> {
    /// The random number generator used by the generator.
    rng: R,
}

impl<R: RandSource> Generator<R> {
    /// Creates a generator instance.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generates a new UUIDv4 object from 16 random bytes.
    pub fn generate_v4(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        bytes[6] = 0x40 | (bytes[6] & 0x0f);
        bytes[8] = 0x80 | (bytes[8] & 0x3f);
        Uuid::from(bytes)
    }

    /// Generates a new UUIDv1 object from the current time.
    pub fn generate_v1(&mut self, ctx: &NodeContext) -> Uuid {
        let since_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        self.generate_v1_core(timestamp::ticks_from_unix(since_unix), ctx)
    }

    /// Generates a new UUIDv1 object from `ticks`, the count of 100-nanosecond intervals since
    /// the UUID epoch. Bits above the lower 60 are ignored.
    pub fn generate_v1_core(&mut self, ticks: u64, ctx: &NodeContext) -> Uuid {
        let node = ctx.node(&mut self.rng);
        let clock_seq = (self.rng.next_u32() & 0x3fff) as u16;
        Uuid::from_fields_v1(ticks, clock_seq, node)
    }
}

#[cfg(test)]
mod tests_v4 {
    use super::{with_rand08, Generator};
    use crate::Variant;

    type ThreadGen = Generator<with_rand08::Adapter<rand::rngs::ThreadRng>>;

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = {
        let mut g: ThreadGen = Default::default();
        (0..N_SAMPLES).map(|_| g.generate_v4().into()).collect()
    });

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Sets constant bits and random bits properly
    #[test]
    fn sets_constant_bits_and_random_bits_properly() {
        // count '1' of each bit
        let bins = SAMPLES.with(|samples| {
            let mut bins = [0u32; 128];
            for e in samples {
                let mut it = bins.iter_mut().rev();
                for c in e.chars().rev() {
                    if let Some(mut num) = c.to_digit(16) {
                        for _ in 0..4 {
                            *it.next().unwrap() += num & 1;
                            num >>= 1;
                        }
                    }
                }
            }
            bins
        });

        // test if constant bits are all set to 1 or 0
        let n = N_SAMPLES as u32;
        assert_eq!(bins[48], 0, "version bit 48");
        assert_eq!(bins[49], n, "version bit 49");
        assert_eq!(bins[50], 0, "version bit 50");
        assert_eq!(bins[51], 0, "version bit 51");
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        // test if random bits are set to 1 at ~50% probability
        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for i in (0..48).chain(52..64).chain(66..128) {
            let p = bins[i] as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {i}: {p}");
        }
    }

    /// Sets correct variant and version bits
    #[test]
    fn sets_correct_variant_and_version_bits() {
        let mut g: ThreadGen = Default::default();
        for _ in 0..1_000 {
            let e = g.generate_v4();
            assert_eq!(e.variant(), Variant::Dce);
            assert_eq!(e.version(), 4);
        }
    }
}
