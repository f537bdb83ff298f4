//! Text API with the function names and integer constants of the PECL `uuid` extension
//!
//! Every function takes UUIDs as text (any byte sequence that is valid UTF-8) and returns the
//! canonical lowercase 8-4-4-4-12 form. Failures are returned as [`Error`] values:
//!
//! - [`Error::WrongInputType`] if the input is not UTF-8 text,
//! - [`Error::Malformed`] if the text is not a UUID,
//! - [`Error::NotApplicable`] if the UUID version does not carry the requested field.
//!
//! ```rust
//! use uuid_compat::compat::*;
//!
//! let ns = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";
//! let uuid = uuid_generate_md5(ns, "python.org")?;
//! assert_eq!(uuid, "6fa459ea-ee8a-3ca4-894e-db77e160355e");
//! assert_eq!(uuid_type(&uuid)?, UUID_TYPE_MD5);
//! assert_eq!(uuid_variant(&uuid)?, UUID_VARIANT_DCE);
//!
//! let uuid = uuid_create(UUID_TYPE_TIME);
//! assert!(uuid_is_valid(&uuid));
//! println!("created at {} by node {}", uuid_time(&uuid)?, uuid_mac(&uuid)?);
//! # Ok::<(), uuid_compat::Error>(())
//! ```

#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::str;

use tracing::warn;

use crate::{global_gen, Error, Kind, Uuid, Variant};

/// Variant reserved for NCS backward compatibility.
pub const UUID_VARIANT_NCS: i32 = 0;
/// The RFC 4122 variant.
pub const UUID_VARIANT_DCE: i32 = 1;
/// Variant reserved for Microsoft backward compatibility.
pub const UUID_VARIANT_MICROSOFT: i32 = 2;
/// Variant reserved for future definition.
pub const UUID_VARIANT_OTHER: i32 = 3;

/// Lets [`uuid_create()`] pick the type, currently random.
pub const UUID_TYPE_DEFAULT: i32 = 0;
/// Time-based UUID (version 1).
pub const UUID_TYPE_TIME: i32 = 1;
/// Alias of [`UUID_TYPE_TIME`].
pub const UUID_TYPE_NAME: i32 = 1;
/// Name-based UUID with MD5 (version 3).
pub const UUID_TYPE_MD5: i32 = 3;
/// Alias of [`UUID_TYPE_RANDOM`].
pub const UUID_TYPE_DCE: i32 = 4;
/// Random UUID (version 4).
pub const UUID_TYPE_RANDOM: i32 = 4;
/// Name-based UUID with SHA-1 (version 5).
pub const UUID_TYPE_SHA1: i32 = 5;
/// Reported for the Nil UUID.
pub const UUID_TYPE_NULL: i32 = -1;
/// Reserved for invalid UUIDs.
pub const UUID_TYPE_INVALID: i32 = -42;

const NULL_TEXT: &str = "00000000-0000-0000-0000-000000000000";

/// Interprets `input` as text, reporting a diagnostic if it is not.
fn as_text<'a>(input: &'a [u8], function: &str) -> Result<&'a str, Error> {
    str::from_utf8(input).map_err(|_| {
        warn!(function, "expects a string, bytes of another kind given");
        Error::WrongInputType
    })
}

fn parse(input: &[u8], function: &str) -> Result<Uuid, Error> {
    as_text(input, function)?.parse()
}

/// Generates a new UUID of the given type.
///
/// [`UUID_TYPE_TIME`] (or [`UUID_TYPE_NAME`]) creates a time-based UUID and [`UUID_TYPE_DEFAULT`]
/// (or [`UUID_TYPE_RANDOM`], [`UUID_TYPE_DCE`]) a random one. Any other type, including the
/// name-based ones that need a namespace, falls back to a random UUID with a diagnostic.
pub fn uuid_create(kind: i32) -> String {
    match kind {
        UUID_TYPE_TIME => global_gen::uuid1(),
        UUID_TYPE_DEFAULT | UUID_TYPE_RANDOM => global_gen::uuid4(),
        _ => {
            warn!(kind, "unknown/invalid UUID type requested, using default type instead");
            global_gen::uuid4()
        }
    }
    .into()
}

/// Generates a version 3 UUID from `uuid_ns` and `name`.
pub fn uuid_generate_md5(
    uuid_ns: impl AsRef<[u8]>,
    name: impl AsRef<[u8]>,
) -> Result<String, Error> {
    let ns = parse(uuid_ns.as_ref(), "uuid_generate_md5")?;
    Ok(Uuid::new_v3(&ns, name.as_ref()).into())
}

/// Generates a version 5 UUID from `uuid_ns` and `name`.
pub fn uuid_generate_sha1(
    uuid_ns: impl AsRef<[u8]>,
    name: impl AsRef<[u8]>,
) -> Result<String, Error> {
    let ns = parse(uuid_ns.as_ref(), "uuid_generate_sha1")?;
    Ok(Uuid::new_v5(&ns, name.as_ref()).into())
}

/// Returns true if `uuid` is a UUID in the 8-4-4-4-12 form, in either case.
pub fn uuid_is_valid(uuid: impl AsRef<[u8]>) -> bool {
    parse(uuid.as_ref(), "uuid_is_valid").is_ok()
}

/// Compares two UUIDs case-insensitively, returning -1, 0 or 1.
pub fn uuid_compare(uuid1: impl AsRef<[u8]>, uuid2: impl AsRef<[u8]>) -> Result<i32, Error> {
    let a = parse(uuid1.as_ref(), "uuid_compare")?;
    let b = parse(uuid2.as_ref(), "uuid_compare")?;
    Ok(a.cmp(&b) as i32)
}

/// Returns true if `uuid` is exactly the Nil UUID text.
pub fn uuid_is_null(uuid: impl AsRef<[u8]>) -> bool {
    as_text(uuid.as_ref(), "uuid_is_null").map_or(false, |text| text == NULL_TEXT)
}

/// Returns the version of `uuid`, or [`UUID_TYPE_NULL`] for the Nil UUID.
pub fn uuid_type(uuid: impl AsRef<[u8]>) -> Result<i32, Error> {
    Ok(match parse(uuid.as_ref(), "uuid_type")?.kind() {
        Kind::Null => UUID_TYPE_NULL,
        Kind::Version(version) => version.into(),
    })
}

/// Returns the `UUID_VARIANT_*` value of `uuid`, or [`UUID_TYPE_NULL`] for the Nil UUID.
pub fn uuid_variant(uuid: impl AsRef<[u8]>) -> Result<i32, Error> {
    Ok(match parse(uuid.as_ref(), "uuid_variant")?.variant() {
        Variant::Null => UUID_TYPE_NULL,
        Variant::Ncs => UUID_VARIANT_NCS,
        Variant::Dce => UUID_VARIANT_DCE,
        Variant::Microsoft => UUID_VARIANT_MICROSOFT,
        Variant::Other => UUID_VARIANT_OTHER,
    })
}

/// Returns the creation time of a time-based `uuid` in whole seconds since the Unix epoch.
pub fn uuid_time(uuid: impl AsRef<[u8]>) -> Result<i64, Error> {
    parse(uuid.as_ref(), "uuid_time")?.unix_time()
}

/// Returns the 12 hex digit node of a time-based `uuid`.
pub fn uuid_mac(uuid: impl AsRef<[u8]>) -> Result<String, Error> {
    Ok(parse(uuid.as_ref(), "uuid_mac")?.node()?.to_string())
}

/// Converts `uuid` into its 16-byte binary form.
pub fn uuid_parse(uuid: impl AsRef<[u8]>) -> Result<[u8; 16], Error> {
    parse(uuid.as_ref(), "uuid_parse").map(<[u8; 16]>::from)
}

/// Converts a 16-byte binary form into the canonical text.
pub fn uuid_unparse(bytes: impl AsRef<[u8]>) -> Result<String, Error> {
    let text = Uuid::try_from(bytes.as_ref())?.encode();
    Uuid::parse_ascii(text.as_bytes())?;
    Ok(text.to_string())
}
