//! Opaque row identifiers.

use uuid::Uuid;

const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated ids.
pub const ID_LENGTH: usize = 7;

/// Generate a new short alphanumeric id.
///
/// The characters are drawn from the random bytes of a v4 UUID, skipping the
/// two bytes that carry the version and variant bits.
pub fn generate_id() -> String {
    Uuid::new_v4()
        .into_bytes()
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != 6 && *index != 8)
        .take(ID_LENGTH)
        .map(|(_, byte)| ALPHABET[usize::from(*byte) % ALPHABET.len()] as char)
        .collect()
}
