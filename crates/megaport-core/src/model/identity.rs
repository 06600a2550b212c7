use std::fmt;

use serde::{Deserialize, Serialize};

/// Vendor-assigned product identity.
///
/// Only exists after a successful purchase and never changes afterwards.
/// Every later read, update or cancel is keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductUid(String);

impl ProductUid {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProductUid {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductUid {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for ProductUid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
