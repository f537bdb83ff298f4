//! Byte-string arithmetic for time computations without native 64-bit integers
//!
//! Numbers are big-endian byte strings. Only the operations needed to convert between Unix time
//! and UUID ticks are provided: fixed-width addition, and conversion to and from decimal digits.

use crate::Error;

/// Adds two 8-byte big-endian numbers, discarding the final carry as `u64` wraparound does.
pub fn add_bytes(a: &[u8; 8], b: &[u8; 8]) -> [u8; 8] {
    let mut sum = [0u8; 8];
    let mut carry = 0u16;
    for i in (0..8).rev() {
        carry += a[i] as u16 + b[i] as u16;
        sum[i] = carry as u8;
        carry >>= 8;
    }
    sum
}

/// Converts a big-endian byte string into its decimal digit string.
///
/// The result has no leading zero except for the value zero itself, which is also what an empty
/// byte string converts to.
pub fn to_digits(bytes: &[u8]) -> String {
    let mut digits = Vec::new();
    let mut bytes = bytes.to_vec();
    while !bytes.is_empty() {
        // long division by 10, dropping leading zeros of the quotient
        let mut quotient = Vec::with_capacity(bytes.len());
        let mut remainder = 0u16;
        for &e in &bytes {
            let carry = e as u16 + (remainder << 8);
            let digit = carry / 10;
            remainder = carry % 10;
            if digit != 0 || !quotient.is_empty() {
                quotient.push(digit as u8);
            }
        }
        digits.push(b'0' + remainder as u8);
        bytes = quotient;
    }

    if digits.is_empty() {
        return "0".to_owned();
    }
    digits.iter().rev().map(|&d| char::from(d)).collect()
}

/// Converts a decimal digit string into the minimal big-endian byte string.
///
/// Returns [`Error::Malformed`] if the input is empty or contains anything other than ASCII
/// digits.
pub fn from_digits(digits: &str) -> Result<Vec<u8>, Error> {
    if digits.is_empty() {
        return Err(Error::Malformed);
    }
    let mut digits = digits
        .bytes()
        .map(|c| match c {
            b'0'..=b'9' => Ok(c - b'0'),
            _ => Err(Error::Malformed),
        })
        .collect::<Result<Vec<u8>, Error>>()?;

    let mut bytes = Vec::new();
    while !digits.is_empty() {
        // long division by 256, dropping leading zeros of the quotient
        let mut quotient = Vec::with_capacity(digits.len());
        let mut remainder = 0u16;
        for &d in &digits {
            let carry = d as u16 + remainder * 10;
            let digit = carry >> 8;
            remainder = carry & 0xff;
            if digit != 0 || !quotient.is_empty() {
                quotient.push(digit as u8);
            }
        }
        bytes.push(remainder as u8);
        digits = quotient;
    }
    bytes.reverse();
    Ok(bytes)
}
