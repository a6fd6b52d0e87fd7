//! Cache key digests.
//!
//! Cache entries are content-addressed: the key is a SHA-256 digest over
//! the exact prompt bytes, so prompts that differ by a single byte address
//! different entries. The model identifier is not part of the digest; it
//! partitions the on-disk cache instead, which keeps one model's entries
//! independently wipeable.

use sha2::{Digest, Sha256};

/// Compute the hex-encoded SHA-256 digest of a prompt.
pub fn prompt_digest(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn digest_is_stable() {
        assert_eq!(prompt_digest("hello"), prompt_digest("hello"));
    }

    #[test]
    fn digest_is_64_hex_chars() {
        let digest = prompt_digest("anything");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn one_byte_difference_changes_the_key() {
        assert_ne!(prompt_digest("prompt"), prompt_digest("prompt "));
    }

    proptest! {
        #[test]
        fn distinct_prompts_get_distinct_digests(a in ".{0,64}", b in ".{0,64}") {
            prop_assume!(a != b);
            prop_assert_ne!(prompt_digest(&a), prompt_digest(&b));
        }
    }
}
