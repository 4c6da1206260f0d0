use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque namespace identifier handed through to the backend untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    pub fn new<S: Into<String>>(name: S) -> Self { Self(name.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for Scope {
    fn from(s: &str) -> Self { Self(s.to_string()) }
}

impl From<String> for Scope {
    fn from(s: String) -> Self { Self(s) }
}

impl AsRef<str> for Scope {
    fn as_ref(&self) -> &str { &self.0 }
}
