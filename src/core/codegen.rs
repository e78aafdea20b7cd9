//! Identifier generation - card codes, usernames, and passwords.
//!
//! All generators draw from a cryptographically secure RNG (`thread_rng`);
//! card codes act as bearer tokens for paid access, so a predictable source
//! would let codes be forged. None of the generators guarantees uniqueness -
//! the database unique constraint is the arbiter, and callers translate
//! duplicate-key failures instead of retrying.

use rand::Rng;

/// Prefix carried by every card code.
pub const CODE_PREFIX: &str = "MKT";

/// Number of `-`-separated groups after the prefix.
pub const CODE_GROUPS: usize = 4;

/// Characters per group.
pub const CODE_GROUP_LEN: usize = 4;

/// Alphabet for card codes: uppercase letters and digits, 36 symbols.
/// 16 random symbols give roughly 82.7 bits of entropy.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Alphabet for suggested usernames: lowercase letters and digits.
const USERNAME_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Alphabet for generated passwords. Visually ambiguous characters
/// (`0`/`O`, `1`/`I`/`l`) are excluded so passwords survive being read
/// aloud or copied off a printed card.
const PASSWORD_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789";

/// Length of a suggested username after the `user_` prefix.
const USERNAME_SUFFIX_LEN: usize = 6;

/// Length of a generated password.
const PASSWORD_LEN: usize = 8;

fn random_string(alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(alphabet[rng.gen_range(0..alphabet.len())]))
        .collect()
}

/// Generates a card code of the form `MKT-XXXX-XXXX-XXXX-XXXX` where each
/// `X` is drawn uniformly from `A-Z0-9`.
#[must_use]
pub fn generate_card_code() -> String {
    let mut parts = Vec::with_capacity(CODE_GROUPS + 1);
    parts.push(CODE_PREFIX.to_string());
    for _ in 0..CODE_GROUPS {
        parts.push(random_string(CODE_ALPHABET, CODE_GROUP_LEN));
    }
    parts.join("-")
}

/// Generates a username suggestion of the form `user_xxxxxx`.
///
/// This is only a suggestion shown to the administrator; uniqueness is
/// enforced by the subscribers table at insert time.
#[must_use]
pub fn generate_username() -> String {
    format!("user_{}", random_string(USERNAME_ALPHABET, USERNAME_SUFFIX_LEN))
}

/// Generates an 8-character password from the unambiguous alphabet.
#[must_use]
pub fn generate_password() -> String {
    random_string(PASSWORD_ALPHABET, PASSWORD_LEN)
}
