//! Rolling-hash checksum for exported log bundles.
//!
//! This is a tamper-evidence signal, not an authentication mechanism: anyone
//! who edits an export can recompute it.

/// Computes the 32-bit rolling hash of `text`.
///
/// For each UTF-16 code unit `c`: `hash = ((hash << 5) - hash) + c`, wrapping
/// as a signed 32-bit integer at every step.
#[must_use]
pub fn rolling_hash(text: &str) -> i32 {
    text.encode_utf16().fold(0_i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// Returns the checksum of `text`: the absolute value of the rolling hash as
/// lowercase hex, zero-padded to eight digits.
#[must_use]
pub fn checksum(text: &str) -> String {
    format!("{:08x}", rolling_hash(text).unsigned_abs())
}
