use serde::{Deserialize, Serialize};
use std::fmt;

/// Deterministic dataset hash (content hash of a normalized dataset)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    pub fn from_hash(hash: &str) -> Self {
        Self(hash.to_string())
    }

    /// First 12 hex characters, enough to eyeball two runs in a terminal.
    pub fn short(&self) -> &str {
        let end = self.0.len().min(12);
        &self.0[..end]
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hash_truncates() {
        let h = DatasetHash::from_hash("0123456789abcdef");
        assert_eq!(h.short(), "0123456789ab");
        assert_eq!(h.to_string(), "0123456789abcdef");
    }

    #[test]
    fn short_hash_of_short_input() {
        assert_eq!(DatasetHash::from_hash("abc").short(), "abc");
    }
}
