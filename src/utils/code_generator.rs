//! Short code generation.
//!
//! Codes are derived from the original URL plus a fresh random salt, hashed with
//! SHA-256, and the first 48 bits of the digest are base-62 encoded and cut to
//! [`CODE_LENGTH`] characters. The salt makes every call produce a new candidate,
//! so retrying after a collision is meaningful.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Length of every generated short code.
pub const CODE_LENGTH: usize = 6;

/// Number of random salt bytes mixed into each digest.
const SALT_BYTES: usize = 4;

/// Number of leading hex digits of the digest that are encoded (48 bits).
const DIGEST_PREFIX_HEX: usize = 12;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Produces short code candidates. Generation never fails; collisions are the
/// caller's problem.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self, original_url: &str) -> String;
}

/// The production generator: salted SHA-256 digest encoded in base 62.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaltedHashGenerator;

impl SaltedHashGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGenerator for SaltedHashGenerator {
    fn generate(&self, original_url: &str) -> String {
        let mut salt = [0u8; SALT_BYTES];
        rand::rng().fill_bytes(&mut salt);

        code_from_salted(original_url, &hex::encode(salt))
    }
}

/// Derives the code for a URL and an explicit salt.
fn code_from_salted(original_url: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(original_url.as_bytes());
    hasher.update(salt.as_bytes());
    let digest = hex::encode(hasher.finalize());

    // 12 hex digits always fit in a u64
    let prefix = u64::from_str_radix(&digest[..DIGEST_PREFIX_HEX], 16).unwrap_or_default();

    let mut code = encode_base62(prefix);
    code.truncate(CODE_LENGTH);
    while code.len() < CODE_LENGTH {
        code.insert(0, ALPHABET[0] as char);
    }
    code
}

/// Encodes `value` in base 62, most significant digit first.
pub fn encode_base62(mut value: u64) -> String {
    if value == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 62) as usize]);
        value /= 62;
    }
    digits.reverse();

    String::from_utf8(digits).unwrap_or_default()
}
