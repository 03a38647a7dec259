use core::fmt;

use sha2::{Digest, Sha512_256};

/// Selector length in bytes.
pub const SELECTOR_SIZE: usize = 4;

/// Prefix of a logged method return value: the selector of `"return"`.
pub const RETURN_PREFIX: [u8; SELECTOR_SIZE] = [0x15, 0x1f, 0x7c, 0x75];

/// First four bytes of the SHA-512/256 hash of a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector(pub [u8; SELECTOR_SIZE]);

impl Selector {
    pub fn of(signature: &str) -> Self {
        let digest = Sha512_256::digest(signature.as_bytes());
        let mut selector = [0u8; SELECTOR_SIZE];
        selector.copy_from_slice(&digest[..SELECTOR_SIZE]);
        Selector(selector)
    }

    /// The selector at the front of `bytes`, if there are enough of them.
    pub fn from_prefix(bytes: &[u8]) -> Option<Self> {
        let prefix: [u8; SELECTOR_SIZE] = bytes.get(..SELECTOR_SIZE)?.try_into().ok()?;
        Some(Selector(prefix))
    }

    pub fn as_bytes(&self) -> &[u8; SELECTOR_SIZE] {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_selectors() {
        assert_eq!(
            Selector::of("add(uint64,uint64)uint128").to_string(),
            "0x8aa3b61f"
        );
        assert_eq!(Selector::of("greet(string)string").to_string(), "0xd0a28200");
        assert_eq!(Selector::of("return").0, RETURN_PREFIX);
    }

    #[test]
    fn test_from_prefix() {
        assert_eq!(
            Selector::from_prefix(&[0x15, 0x1f, 0x7c, 0x75, 0xff]),
            Some(Selector(RETURN_PREFIX))
        );
        assert_eq!(Selector::from_prefix(&[1, 2, 3]), None);
    }
}
