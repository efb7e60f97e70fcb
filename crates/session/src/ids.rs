//! Share id generation.
//!
//! A share id is the save instant's millisecond timestamp in base 36, a
//! hyphen, and six random alphanumeric characters. Sortable by creation time
//! and unguessable enough for link sharing; not a security boundary.

use jiff::Timestamp;
use rand::{Rng, distributions::Alphanumeric};

const RANDOM_SUFFIX_LEN: usize = 6;

/// Generate a fresh share id for the current instant.
pub fn share_id() -> String {
    share_id_at(Timestamp::now())
}

/// Generate a share id for a given instant.
pub fn share_id_at(at: Timestamp) -> String {
    let millis = u64::try_from(at.as_millisecond()).unwrap_or_default();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(|byte| char::from(byte.to_ascii_lowercase()))
        .collect();

    format!("{}-{suffix}", to_base36(millis))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_owned();
    }

    let mut out = Vec::new();
    while value > 0 {
        let digit = usize::try_from(value % 36).unwrap_or_default();
        out.push(DIGITS[digit]);
        value /= 36;
    }
    out.reverse();

    String::from_utf8(out).unwrap_or_default()
}
