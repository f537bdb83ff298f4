//! RFC 4122 UUID generation, parsing and introspection
//!
//! ```rust
//! use uuid_compat::{uuid1, uuid4, Uuid, NAMESPACE_DNS};
//!
//! let uuid = uuid4();
//! println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//!
//! let uuid = uuid1();
//! println!("{} created at {:?} by node {:?}", uuid, uuid.unix_time(), uuid.node());
//!
//! let uuid = Uuid::new_v5(&NAMESPACE_DNS, b"python.org");
//! assert_eq!(uuid.to_string(), "886313e1-3b8a-5372-9b90-0c9aee199e5d");
//! ```
//!
//! See [RFC 4122](https://www.rfc-editor.org/rfc/rfc4122).
//!
//! # Field and bit layout
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          time_low                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |       time_mid                |  ver  |       time_hi         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|        clock_seq          |             node              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             node                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! This library produces four versions:
//!
//! - Version 1 puts the 60-bit count of 100-nanosecond intervals since 1582-10-15 into
//!   `time_hi || time_mid || time_low`, a random 14-bit `clock_seq`, and a random `node` with the
//!   multicast bit set. The node is created once per [`NodeContext`] and can be persisted through
//!   a [`NodeCache`].
//! - Versions 3 and 5 take the first 16 bytes of the MD5 and SHA-1 hash, respectively, of a
//!   namespace UUID followed by a name.
//! - Version 4 fills everything with cryptographically strong random bits.
//!
//! In all of them the 4-bit `ver` field holds the version and the 2-bit `var` field is set at
//! `10`.
//!
//! # Crate features
//!
//! - `global_gen` (default): process-wide generator ([`uuid1()`], [`uuid4()`]) and the
//!   [`compat`] text API.
//! - `narrow_int`: compute timestamps with the byte-string arithmetic of [`bignum`].
//! - `serde`: `Serialize` and `Deserialize` for [`Uuid`].
//! - `uuid`: conversions from and to `uuid::Uuid`.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::Error;

mod id;
pub use id::{Fields, Kind, Uuid, Variant};

pub mod bignum;
pub mod timestamp;

mod name;
pub use name::{NAMESPACE_DNS, NAMESPACE_OID, NAMESPACE_URL, NAMESPACE_X500};

mod node;
pub use node::{FileCache, MemoryCache, Node, NodeCache, NodeContext, NODE_CACHE_KEY};

pub mod generator;
pub use generator::{Generator, RandSource};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{set_node_cache, uuid1, uuid4};

#[cfg(feature = "global_gen")]
pub mod compat;
