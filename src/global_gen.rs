//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use rand::rngs::OsRng;

use crate::{generator::with_rand08::Adapter, NodeCache, NodeContext, Uuid};
use inner::GlobalGenInner;

/// Returns the lock handle of process-wide global generator, creating one if none exists.
fn lock_global_gen() -> sync::MutexGuard<'static, GlobalGenInner> {
    static G: sync::OnceLock<sync::Mutex<GlobalGenInner>> = sync::OnceLock::new();
    G.get_or_init(Default::default)
        .lock()
        .unwrap_or_else(sync::PoisonError::into_inner)
}

static NODE_CONTEXT: sync::OnceLock<NodeContext> = sync::OnceLock::new();

/// Returns the process-wide node context, creating one without a cache if none exists.
fn node_context() -> &'static NodeContext {
    NODE_CONTEXT.get_or_init(NodeContext::new)
}

/// Attaches `cache` to the process-wide node context used by [`uuid1()`].
///
/// This must be called before the first time-based UUID is generated; afterwards the node is
/// fixed and the cache is returned unused in the `Err` variant.
///
/// # Examples
///
/// ```rust
/// let dir = tempfile::tempdir()?;
/// if uuid_compat::set_node_cache(uuid_compat::FileCache::new(dir.path())).is_err() {
///     println!("node already initialized");
/// }
/// println!("{}", uuid_compat::uuid1());
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn set_node_cache<C: NodeCache + Send + Sync + 'static>(cache: C) -> Result<(), C> {
    let mut cache = Some(cache);
    NODE_CONTEXT.get_or_init(|| {
        cache
            .take()
            .map_or_else(NodeContext::new, NodeContext::with_cache)
    });
    match cache {
        Some(cache) => Err(cache),
        None => Ok(()),
    }
}

/// Generates a UUIDv1 object using the process-wide node.
///
/// # Examples
///
/// ```rust
/// let uuid = uuid_compat::uuid1();
/// println!("{}", uuid); // e.g., "5fe94000-f5bc-11ea-a53c-0123456789ab"
/// assert_eq!(uuid.node(), uuid_compat::uuid1().node());
/// ```
pub fn uuid1() -> Uuid {
    generate_v1_in(node_context())
}

/// Generates a UUIDv1 object with `ctx`, resolving its node before the global generator is locked
/// so that cache I/O does not block other callers.
fn generate_v1_in(ctx: &NodeContext) -> Uuid {
    ctx.node(&mut Adapter(OsRng));
    lock_global_gen().get_mut().generate_v1(ctx)
}

/// Generates a UUIDv4 object.
///
/// # Examples
///
/// ```rust
/// let uuid = uuid_compat::uuid4();
/// println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// ```
pub fn uuid4() -> Uuid {
    lock_global_gen().get_mut().generate_v4()
}

mod inner {
    use rand::{
        rngs::{adapter::ReseedingRng, OsRng},
        RngCore, SeedableRng,
    };
    use rand_chacha::ChaCha12Core;

    use crate::generator::{Generator, RandSource};

    /// The type alias for the random number generator of the global generator.
    ///
    /// The global generator currently employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper to
    /// emulate the strategy used by [`rand::rngs::ThreadRng`].
    #[derive(Debug)]
    pub struct GlobalGenRng(ReseedingRng<ChaCha12Core, OsRng>);

    impl RandSource for GlobalGenRng {
        fn next_u32(&mut self) -> u32 {
            self.0.next_u32()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.0.fill_bytes(dest)
        }
    }

    impl Default for GlobalGenRng {
        fn default() -> Self {
            let core = ChaCha12Core::from_rng(OsRng)
                .expect("uuid_compat: could not initialize global generator");
            Self(ReseedingRng::new(core, 1024 * 64, OsRng))
        }
    }

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        generator: Generator<GlobalGenRng>,
    }

    impl Default for GlobalGenInner {
        fn default() -> Self {
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: Generator::new(Default::default()),
            }
        }
    }

    impl GlobalGenInner {
        /// Returns a mutable reference to the inner [`Generator`] instance, reseting the
        /// generator state on Unix if the process ID has changed.
        pub fn get_mut(&mut self) -> &mut Generator<GlobalGenRng> {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                *self = Default::default();
            }
            &mut self.generator
        }
    }
}

#[cfg(test)]
mod tests_v4 {
    use super::uuid4;
    use crate::Variant;

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| uuid4().into()).collect());

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

    /// Sets correct variant and version bits
    #[test]
    fn sets_correct_variant_and_version_bits() {
        for _ in 0..1_000 {
            let e = uuid4();
            assert_eq!(e.variant(), Variant::Dce);
            assert_eq!(e.version(), 4);
        }
    }
}
