use std::{fmt, str};

use fstr::FStr;

use crate::{timestamp, Error, Node};

/// Represents a Universally Unique IDentifier.
///
/// The derived ordering compares the big-endian bytes, which is the same as the case-insensitive
/// lexical ordering of the canonical string representation.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates a UUID from the five canonical fields.
    ///
    /// The version and variant bits are taken verbatim from `time_hi_and_version` and
    /// `clock_seq`; callers overlay them before calling this function. Only the lower 48 bits of
    /// `node` are used.
    pub const fn from_fields(
        time_low: u32,
        time_mid: u16,
        time_hi_and_version: u16,
        clock_seq: u16,
        node: u64,
    ) -> Self {
        Self([
            (time_low >> 24) as u8,
            (time_low >> 16) as u8,
            (time_low >> 8) as u8,
            time_low as u8,
            (time_mid >> 8) as u8,
            time_mid as u8,
            (time_hi_and_version >> 8) as u8,
            time_hi_and_version as u8,
            (clock_seq >> 8) as u8,
            clock_seq as u8,
            (node >> 40) as u8,
            (node >> 32) as u8,
            (node >> 24) as u8,
            (node >> 16) as u8,
            (node >> 8) as u8,
            node as u8,
        ])
    }

    /// Creates a time-based UUID from a 60-bit count of 100-nanosecond intervals since the UUID
    /// epoch, a 14-bit clock sequence, and a node value.
    pub const fn from_fields_v1(ticks: u64, clock_seq: u16, node: Node) -> Self {
        Self::from_fields(
            ticks as u32,
            (ticks >> 32) as u16,
            0x1000 | ((ticks >> 48) as u16 & 0x0fff),
            0x8000 | (clock_seq & 0x3fff),
            node.to_u64(),
        )
    }

    /// Parses the 8-4-4-4-12 hexadecimal representation given as ASCII bytes.
    ///
    /// Hexadecimal digits are accepted in either case. Any other length or layout is rejected
    /// with [`Error::Malformed`].
    pub fn parse_ascii(src: &[u8]) -> Result<Self, Error> {
        const ERR: Error = Error::Malformed;
        if src.len() != 36 {
            return Err(ERR);
        }

        let mut dst = [0u8; 16];
        let mut iter = src.iter().copied();
        for (i, e) in dst.iter_mut().enumerate() {
            if (i == 4 || i == 6 || i == 8 || i == 10) && iter.next() != Some(b'-') {
                return Err(ERR);
            }
            let hi = iter.next().and_then(decode_hex_digit).ok_or(ERR)?;
            let lo = iter.next().and_then(decode_hex_digit).ok_or(ERR)?;
            *e = (hi << 4) | lo;
        }
        Ok(Self(dst))
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid_compat::Uuid;
    ///
    /// let x = "6BA7B810-9DAD-11D1-80B4-00C04FD430C8".parse::<Uuid>()?;
    /// assert_eq!(x.encode().as_str(), "6ba7b810-9dad-11d1-80b4-00c04fd430c8");
    /// # Ok::<(), uuid_compat::Error>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut j = 0;
        for (i, e) in self.0.iter().enumerate() {
            if i == 4 || i == 6 || i == 8 || i == 10 {
                buffer[j] = b'-';
                j += 1;
            }
            buffer[j] = DIGITS[(e >> 4) as usize];
            buffer[j + 1] = DIGITS[(e & 15) as usize];
            j += 2;
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: the buffer consists of ASCII hex digits and hyphens only
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    /// Splits the UUID into its canonical fields.
    pub const fn fields(&self) -> Fields {
        let b = &self.0;
        Fields {
            time_low: u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
            time_mid: u16::from_be_bytes([b[4], b[5]]),
            version: b[6] >> 4,
            time_hi: u16::from_be_bytes([b[6] & 0x0f, b[7]]),
            clock_seq: u16::from_be_bytes([b[8], b[9]]),
            node: u64::from_be_bytes([0, 0, b[10], b[11], b[12], b[13], b[14], b[15]]),
        }
    }

    /// Returns true if this is the Nil UUID.
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Returns the raw version nibble, whatever scheme produced the UUID.
    pub const fn version(&self) -> u8 {
        self.0[6] >> 4
    }

    /// Returns the version, or [`Kind::Null`] for the Nil UUID.
    pub fn kind(&self) -> Kind {
        if self.is_nil() {
            Kind::Null
        } else {
            Kind::Version(self.version())
        }
    }

    /// Reports the variant field value of the UUID.
    pub fn variant(&self) -> Variant {
        if self.is_nil() {
            Variant::Null
        } else if self.0[8] & 0x80 == 0 {
            Variant::Ncs
        } else if self.0[8] & 0x40 == 0 {
            Variant::Dce
        } else if self.0[8] & 0x20 == 0 {
            Variant::Microsoft
        } else {
            Variant::Other
        }
    }

    /// Returns the 60-bit count of 100-nanosecond intervals since the UUID epoch embedded in a
    /// version 1 UUID.
    pub const fn timestamp(&self) -> Result<u64, Error> {
        if self.version() != 1 {
            return Err(Error::NotApplicable);
        }
        Ok(self.fields().time())
    }

    /// Returns the Unix time in whole seconds embedded in a version 1 UUID.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid_compat::{Error, Uuid};
    ///
    /// let x: Uuid = "5fe94000-f5bc-11ea-a53c-0123456789ab".parse()?;
    /// assert_eq!(x.unix_time(), Ok(1_600_000_000));
    ///
    /// let y: Uuid = "6fa459ea-ee8a-3ca4-894e-db77e160355e".parse()?;
    /// assert_eq!(y.unix_time(), Err(Error::NotApplicable));
    /// # Ok::<(), uuid_compat::Error>(())
    /// ```
    pub fn unix_time(&self) -> Result<i64, Error> {
        self.timestamp().map(timestamp::unix_secs_from_ticks)
    }

    /// Returns the node field of a version 1 UUID.
    pub const fn node(&self) -> Result<Node, Error> {
        if self.version() != 1 {
            return Err(Error::NotApplicable);
        }
        let b = &self.0;
        Ok(Node::from_bytes([b[10], b[11], b[12], b[13], b[14], b[15]]))
    }
}

/// Returns the value of an ASCII hexadecimal digit in either case.
pub(crate) const fn decode_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// The canonical fields of a UUID, with the version nibble split out of the third field.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Fields {
    /// First 32 bits; the low part of the timestamp for version 1.
    pub time_low: u32,

    /// Next 16 bits; the middle part of the timestamp for version 1.
    pub time_mid: u16,

    /// The 4-bit version nibble.
    pub version: u8,

    /// The 12 bits stored alongside `version`; the high part of the timestamp for version 1.
    pub time_hi: u16,

    /// The 16-bit clock sequence including the variant bits.
    pub clock_seq: u16,

    /// The 48-bit node.
    pub node: u64,
}

impl Fields {
    /// Reassembles the 60-bit timestamp as `time_hi || time_mid || time_low`.
    pub const fn time(&self) -> u64 {
        (self.time_hi as u64) << 48 | (self.time_mid as u64) << 32 | self.time_low as u64
    }
}

/// The version of a UUID as reported by [`Uuid::kind()`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Kind {
    /// The Nil UUID.
    Null,

    /// The raw version nibble of any other UUID.
    Version(u8),
}

/// The variant field of a UUID as reported by [`Uuid::variant()`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// The Nil UUID.
    Null,

    /// `0xxx`: reserved for NCS backward compatibility.
    Ncs,

    /// `10xx`: the RFC 4122 layout.
    Dce,

    /// `110x`: reserved for Microsoft backward compatibility.
    Microsoft,

    /// `111x`: reserved for future definition.
    Other,
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = Error;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse_ascii(src.as_bytes())
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl TryFrom<&[u8]> for Uuid {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        <[u8; 16]>::try_from(src)
            .map(Self)
            .map_err(|_| Error::Malformed)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = Error;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Self::Value::try_from(value).map_err(de::Error::custom)
        }
    }

}
