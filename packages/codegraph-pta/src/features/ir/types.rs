//! Value types as annotated by type inference

use super::signature::{ClassSignature, MethodSignature};
use serde::{Deserialize, Serialize};

/// Static type of a local, parameter or field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    /// Instance of a class
    Class(ClassSignature),
    /// Array with the given element type
    Array(Box<Type>),
    /// Function value, with its target when statically known
    Function(Option<MethodSignature>),
    /// number, string, boolean, ...
    Primitive(String),
    #[default]
    Unknown,
}

impl Type {
    pub fn class(name: impl Into<String>) -> Self {
        Type::Class(ClassSignature::new(name))
    }

    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    /// Function type without a known target
    pub fn function() -> Self {
        Type::Function(None)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function(_))
    }

    /// Class of an instance type
    pub fn class_signature(&self) -> Option<&ClassSignature> {
        match self {
            Type::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Whether values of this type can reference heap objects
    pub fn is_reference(&self) -> bool {
        !matches!(self, Type::Primitive(_))
    }
}
