//! Name-based UUIDs (versions 3 and 5)

use digest::Digest;
use md5::Md5;
use sha1::Sha1;

use crate::Uuid;

/// Namespace for fully-qualified domain names (6ba7b810-9dad-11d1-80b4-00c04fd430c8)
pub const NAMESPACE_DNS: Uuid =
    Uuid::from_fields(0x6ba7b810, 0x9dad, 0x11d1, 0x80b4, 0x00c04fd430c8);

/// Namespace for URLs (6ba7b811-9dad-11d1-80b4-00c04fd430c8)
pub const NAMESPACE_URL: Uuid =
    Uuid::from_fields(0x6ba7b811, 0x9dad, 0x11d1, 0x80b4, 0x00c04fd430c8);

/// Namespace for ISO OIDs (6ba7b812-9dad-11d1-80b4-00c04fd430c8)
pub const NAMESPACE_OID: Uuid =
    Uuid::from_fields(0x6ba7b812, 0x9dad, 0x11d1, 0x80b4, 0x00c04fd430c8);

/// Namespace for X.500 DNs (6ba7b814-9dad-11d1-80b4-00c04fd430c8)
pub const NAMESPACE_X500: Uuid =
    Uuid::from_fields(0x6ba7b814, 0x9dad, 0x11d1, 0x80b4, 0x00c04fd430c8);

impl Uuid {
    /// Creates a version 3 UUID from the MD5 hash of `namespace` and `name`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid_compat::{Uuid, NAMESPACE_DNS};
    ///
    /// let uuid = Uuid::new_v3(&NAMESPACE_DNS, b"python.org");
    /// assert_eq!(uuid.to_string(), "6fa459ea-ee8a-3ca4-894e-db77e160355e");
    /// ```
    pub fn new_v3(namespace: &Uuid, name: &[u8]) -> Self {
        Self::from_name::<Md5>(namespace, name, 3)
    }

    /// Creates a version 5 UUID from the SHA-1 hash of `namespace` and `name`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid_compat::{Uuid, NAMESPACE_DNS};
    ///
    /// let uuid = Uuid::new_v5(&NAMESPACE_DNS, b"python.org");
    /// assert_eq!(uuid.to_string(), "886313e1-3b8a-5372-9b90-0c9aee199e5d");
    /// ```
    pub fn new_v5(namespace: &Uuid, name: &[u8]) -> Self {
        Self::from_name::<Sha1>(namespace, name, 5)
    }

    /// Creates a name-based UUID from the hash `D` of the 16 namespace bytes followed by `name`.
    ///
    /// The first 16 bytes of the digest become the UUID, after which the low four bits of
    /// `version` are written over the version nibble and `10` over the top two bits of
    /// `clock_seq`. A digest shorter than 16 bytes is padded with zeros.
    pub fn from_name<D: Digest>(namespace: &Uuid, name: &[u8], version: u8) -> Self {
        let mut hasher = D::new();
        hasher.update(namespace.as_bytes());
        hasher.update(name);
        let digest = hasher.finalize();

        let mut bytes = [0u8; 16];
        let n = digest.len().min(16);
        bytes[..n].copy_from_slice(&digest[..n]);
        bytes[6] = ((version & 0x0f) << 4) | (bytes[6] & 0x0f);
        bytes[8] = 0x80 | (bytes[8] & 0x3f);
        Self::from(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::{NAMESPACE_DNS, NAMESPACE_OID, NAMESPACE_URL, NAMESPACE_X500};
    use crate::{Uuid, Variant};

    /// Returns standard namespaces
    #[test]
    fn returns_standard_namespaces() {
        let cases = [
            (NAMESPACE_DNS, "6ba7b810-9dad-11d1-80b4-00c04fd430c8"),
            (NAMESPACE_URL, "6ba7b811-9dad-11d1-80b4-00c04fd430c8"),
            (NAMESPACE_OID, "6ba7b812-9dad-11d1-80b4-00c04fd430c8"),
            (NAMESPACE_X500, "6ba7b814-9dad-11d1-80b4-00c04fd430c8"),
        ];
        for (ns, text) in cases {
            assert_eq!(ns.encode().as_str(), text);
        }
    }

    /// Generates prepared cases correctly
    #[test]
    fn generates_prepared_cases_correctly() {
        let cases: &[(Uuid, &[u8], &str, &str)] = &[
            (
                NAMESPACE_DNS,
                b"python.org",
                "6fa459ea-ee8a-3ca4-894e-db77e160355e",
                "886313e1-3b8a-5372-9b90-0c9aee199e5d",
            ),
            (
                NAMESPACE_URL,
                b"https://example.com/",
                "b9dcdff8-af4a-365d-8043-0f8361942709",
                "dd2c1780-811a-5296-81c5-178a0ef488bc",
            ),
            (
                NAMESPACE_DNS,
                b"",
                "c87ee674-4ddc-3efe-a74e-dfe25da5d7b3",
                "4ebd0208-8328-5d69-8c44-ec50939c0967",
            ),
        ];
        for (ns, name, v3, v5) in cases {
            assert_eq!(Uuid::new_v3(ns, name).encode().as_str(), *v3);
            assert_eq!(Uuid::new_v5(ns, name).encode().as_str(), *v5);
        }
    }

    /// Is deterministic and sets version and variant
    #[test]
    fn is_deterministic_and_sets_version_and_variant() {
        for i in 0..1_000u32 {
            let ns = Uuid::from(rand::random::<u128>());
            let name = i.to_string();
            let v3 = Uuid::new_v3(&ns, name.as_bytes());
            let v5 = Uuid::new_v5(&ns, name.as_bytes());
            assert_eq!(v3, Uuid::new_v3(&ns, name.as_bytes()));
            assert_eq!(v5, Uuid::new_v5(&ns, name.as_bytes()));
            assert_ne!(v3, Uuid::new_v3(&ns, b"other"));
            assert_eq!(v3.version(), 3);
            assert_eq!(v5.version(), 5);
            assert_eq!(v3.variant(), Variant::Dce);
            assert_eq!(v5.variant(), Variant::Dce);
        }
    }

    /// Accepts any injected digest
    #[test]
    fn accepts_any_injected_digest() {
        let e = Uuid::from_name::<md5::Md5>(&NAMESPACE_DNS, b"python.org", 3);
        assert_eq!(e, Uuid::new_v3(&NAMESPACE_DNS, b"python.org"));

        let e = Uuid::from_name::<sha1::Sha1>(&NAMESPACE_DNS, b"python.org", 8);
        assert_eq!(e.version(), 8);
        assert_eq!(e.encode().as_str(), "886313e1-3b8a-8372-9b90-0c9aee199e5d");
    }
}
