use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Login name of a principal.
///
/// The unique lookup key of the identity store, and the principal reference
/// recorded on both sides of an audit entry. Compared exactly: no case folding
/// and no trimming happens here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets maps keyed by `UserName` be queried with a plain `&str`
impl Borrow<str> for UserName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for UserName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for UserName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_compares_exactly() {
        let name = UserName::from("alice");
        assert_eq!(name, "alice");
        assert_ne!(name, "Alice");
        assert_ne!(name, " alice");
    }

    #[test]
    fn test_map_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(UserName::new("bob"), 1);
        assert_eq!(map.get("bob"), Some(&1));
        assert_eq!(map.get("carol"), None);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let name = UserName::new("bob");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"bob\"");
        let back: UserName = serde_json::from_str("\"bob\"").unwrap();
        assert_eq!(back, name);
    }
}
