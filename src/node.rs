//! Node values for time-based UUIDs and their persistence
//!
//! Version 1 UUIDs carry a 48-bit node field. This crate never reads a hardware address; it
//! generates a random node with the multicast bit set so that it cannot collide with a real IEEE
//! 802 address. A [`NodeContext`] holds the node for the lifetime of the context and optionally
//! persists it through a [`NodeCache`] so that other contexts, or other processes sharing the same
//! cache, reuse it.

use std::{
    collections::HashMap,
    fmt, fs, io,
    path::{Path, PathBuf},
    str,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, OnceLock, PoisonError,
    },
};

use fstr::FStr;
use tracing::{debug, warn};

use crate::{generator::RandSource, id::decode_hex_digit, Error};

/// The key under which a [`NodeContext`] stores its node in a [`NodeCache`].
pub const NODE_CACHE_KEY: &str = "__uuid_node";

/// Represents the 48-bit node field of a version 1 UUID.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Node([u8; 6]);

impl Node {
    /// Creates a node from big-endian bytes.
    pub const fn from_bytes(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Returns the node as the lower 48 bits of a `u64`.
    pub const fn to_u64(&self) -> u64 {
        let b = &self.0;
        u64::from_be_bytes([0, 0, b[0], b[1], b[2], b[3], b[4], b[5]])
    }

    /// Generates a random node with the multicast bit set.
    pub fn random<R: RandSource + ?Sized>(rng: &mut R) -> Self {
        let [_, a, b, c] = ((rng.next_u32() & 0xff_ffff) | 0x01_0000).to_be_bytes();
        let [_, d, e, f] = (rng.next_u32() & 0xff_ffff).to_be_bytes();
        Self([a, b, c, d, e, f])
    }

    /// Returns true if the multicast bit (the least significant bit of the first octet) is set.
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// Returns the 12-digit lowercase hexadecimal representation.
    pub fn encode(&self) -> FStr<12> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 12];
        for (i, e) in self.0.iter().enumerate() {
            buffer[i * 2] = DIGITS[(e >> 4) as usize];
            buffer[i * 2 + 1] = DIGITS[(e & 15) as usize];
        }
        // SAFETY: the buffer consists of ASCII hex digits only
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    /// Parses exactly 12 hexadecimal digits in either case.
    pub fn parse_ascii(src: &[u8]) -> Result<Self, Error> {
        const ERR: Error = Error::Malformed;
        if src.len() != 12 {
            return Err(ERR);
        }

        let mut dst = [0u8; 6];
        for (e, pair) in dst.iter_mut().zip(src.chunks_exact(2)) {
            let hi = decode_hex_digit(pair[0]).ok_or(ERR)?;
            let lo = decode_hex_digit(pair[1]).ok_or(ERR)?;
            *e = (hi << 4) | lo;
        }
        Ok(Self(dst))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Node {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse_ascii(src.as_bytes())
    }
}

/// A key-value store that persists the node across [`NodeContext`] instances.
///
/// Implementations decide how far the value is shared: within a process ([`MemoryCache`]) or
/// across processes ([`FileCache`]). Storage failures are not errors for the caller; an
/// implementation reports them as diagnostics and behaves as if the value were absent.
pub trait NodeCache {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any existing value.
    fn set(&self, key: &str, value: &str);

    /// Stores `value` under `key` unless a value is already there, and returns the value held
    /// afterwards.
    ///
    /// The default implementation is not atomic; concurrent callers may each store their own
    /// value and the last writer wins.
    fn add(&self, key: &str, value: &str) -> String {
        if let Some(existing) = self.get(key) {
            existing
        } else {
            self.set(key, value);
            value.to_owned()
        }
    }
}

impl<T: NodeCache + ?Sized> NodeCache for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn add(&self, key: &str, value: &str) -> String {
        (**self).add(key, value)
    }
}

/// An in-process [`NodeCache`].
#[derive(Debug, Default)]
pub struct MemoryCache(Mutex<HashMap<String, String>>);

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Default::default()
    }
}

impl NodeCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut map = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        map.insert(key.to_owned(), value.to_owned());
    }

    fn add(&self, key: &str, value: &str) -> String {
        let mut map = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        map.entry(key.to_owned())
            .or_insert_with(|| value.to_owned())
            .clone()
    }
}

/// A [`NodeCache`] that keeps one file per key in a directory, shareable across processes.
///
/// Values are written to a temporary file first and then moved into place, so a reader never
/// observes a partially written value.
#[derive(Clone, Debug)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Creates a cache rooted at `dir`, which must exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes `value` to a fresh temporary file next to the entry for `key`.
    fn write_temp(&self, key: &str, value: &str) -> io::Result<PathBuf> {
        static SEQ: AtomicU64 = AtomicU64::new(0);
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .dir
            .join(format!(".{}.{}.{}.tmp", key, std::process::id(), seq));
        fs::write(&tmp, value)?;
        Ok(tmp)
    }

    fn remove_temp(tmp: &Path) {
        if let Err(err) = fs::remove_file(tmp) {
            warn!(path = %tmp.display(), %err, "could not remove temporary node cache file");
        }
    }

    /// Inserts `value` unless `key` exists, publishing the temporary file with `link`.
    ///
    /// `link` must fail with [`io::ErrorKind::AlreadyExists`] if the entry exists. If it fails
    /// otherwise (e.g., hard links are unsupported), the entry is moved into place instead and
    /// the last writer wins.
    fn add_with<F>(&self, key: &str, value: &str, link: F) -> String
    where
        F: FnOnce(&Path, &Path) -> io::Result<()>,
    {
        let path = self.dir.join(key);
        let tmp = match self.write_temp(key, value) {
            Ok(tmp) => tmp,
            Err(err) => {
                warn!(path = %path.display(), %err, "could not write node cache");
                return self.get(key).unwrap_or_else(|| value.to_owned());
            }
        };

        match link(&tmp, &path) {
            Ok(()) => {
                Self::remove_temp(&tmp);
                return value.to_owned();
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Self::remove_temp(&tmp),
            Err(err) => {
                debug!(path = %path.display(), %err, "could not link node cache, moving instead");
                if let Some(existing) = self.get(key) {
                    Self::remove_temp(&tmp);
                    return existing;
                }
                if let Err(err) = fs::rename(&tmp, &path) {
                    warn!(path = %path.display(), %err, "could not write node cache");
                    Self::remove_temp(&tmp);
                }
            }
        }
        self.get(key).unwrap_or_else(|| value.to_owned())
    }
}

impl NodeCache for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.dir.join(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value.trim().to_owned()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %path.display(), %err, "could not read node cache");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        let path = self.dir.join(key);
        let tmp = match self.write_temp(key, value) {
            Ok(tmp) => tmp,
            Err(err) => {
                warn!(path = %path.display(), %err, "could not write node cache");
                return;
            }
        };
        if let Err(err) = fs::rename(&tmp, &path) {
            warn!(path = %path.display(), %err, "could not write node cache");
            Self::remove_temp(&tmp);
        }
    }

    fn add(&self, key: &str, value: &str) -> String {
        self.add_with(key, value, |tmp, path| fs::hard_link(tmp, path))
    }
}

/// Holds the node used by time-based generation, created on first use.
///
/// The node is initialized at most once per context even under concurrent first use. When a
/// [`NodeCache`] is attached, the context first looks for a node stored under
/// [`NODE_CACHE_KEY`]; if there is none (or the stored value is not 12 hex digits), it generates a
/// random one and stores it back.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use uuid_compat::{Generator, MemoryCache, NodeContext};
///
/// let cache = Arc::new(MemoryCache::new());
/// let ctx_a = NodeContext::with_cache(Arc::clone(&cache));
/// let ctx_b = NodeContext::with_cache(Arc::clone(&cache));
///
/// let mut g = Generator::with_rand08(rand::rngs::OsRng);
/// let a = g.generate_v1(&ctx_a);
/// let b = g.generate_v1(&ctx_b);
/// assert_eq!(a.node(), b.node());
/// ```
pub struct NodeContext {
    node: OnceLock<Node>,
    cache: Option<Box<dyn NodeCache + Send + Sync>>,
}

impl NodeContext {
    /// Creates a context that keeps a random node in memory only.
    pub const fn new() -> Self {
        Self {
            node: OnceLock::new(),
            cache: None,
        }
    }

    /// Creates a context that persists its node through `cache`.
    pub fn with_cache<C: NodeCache + Send + Sync + 'static>(cache: C) -> Self {
        Self {
            node: OnceLock::new(),
            cache: Some(Box::new(cache)),
        }
    }

    /// Creates a context that always uses `node`.
    pub fn with_node(node: Node) -> Self {
        Self {
            node: OnceLock::from(node),
            cache: None,
        }
    }

    /// Returns the node of this context, loading or generating it with `rng` on first use.
    pub fn node<R: RandSource + ?Sized>(&self, rng: &mut R) -> Node {
        *self.node.get_or_init(|| self.load_or_create(rng))
    }

    /// Returns the node if it has been initialized.
    pub fn get(&self) -> Option<Node> {
        self.node.get().copied()
    }

    fn load_or_create<R: RandSource + ?Sized>(&self, rng: &mut R) -> Node {
        let Some(cache) = &self.cache else {
            let node = Node::random(rng);
            debug!(%node, "created node");
            return node;
        };

        if let Some(node) = cache.get(NODE_CACHE_KEY).and_then(|v| v.parse().ok()) {
            debug!(%node, "loaded node from cache");
            return node;
        }

        let fresh = Node::random(rng);
        match cache.add(NODE_CACHE_KEY, &fresh.encode()).parse() {
            Ok(node) => {
                debug!(%node, "stored node in cache");
                node
            }
            Err(_) => {
                warn!("replacing malformed node in cache");
                cache.set(NODE_CACHE_KEY, &fresh.encode());
                fresh
            }
        }
    }
}

impl Default for NodeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeContext")
            .field("node", &self.node.get())
            .field("cache", &self.cache.is_some())
            .finish()
    }
}
