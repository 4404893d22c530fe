//! Class, field and method signatures
//!
//! Signatures identify program entities structurally: two signatures are the
//! same entity iff they compare equal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the synthetic class holding top-level functions
pub const DEFAULT_CLASS: &str = "%dflt";

/// Class identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassSignature {
    pub name: String,
}

impl ClassSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Class holding free functions
    pub fn default_class() -> Self {
        Self::new(DEFAULT_CLASS)
    }

    pub fn is_default_class(&self) -> bool {
        self.name == DEFAULT_CLASS
    }
}

impl fmt::Display for ClassSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Field identity: declaring class plus field name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldSignature {
    pub class: ClassSignature,
    pub name: String,
}

impl FieldSignature {
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class: ClassSignature::new(class),
            name: name.into(),
        }
    }
}

impl fmt::Display for FieldSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class, self.name)
    }
}

/// Method identity: declaring class plus method name
///
/// Free functions live in [`DEFAULT_CLASS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodSignature {
    pub class: ClassSignature,
    pub name: String,
}

impl MethodSignature {
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class: ClassSignature::new(class),
            name: name.into(),
        }
    }

    /// Signature of a top-level function
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            class: ClassSignature::default_class(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.class.is_default_class() {
            write!(f, "{}()", self.name)
        } else {
            write!(f, "{}.{}()", self.class, self.name)
        }
    }
}
