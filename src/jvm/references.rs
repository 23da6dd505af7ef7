//! References to JVM elements.
use std::fmt::Display;

/// A reference to a class.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct ClassRef {
    /// The binary name of the class.
    pub binary_name: String,
}

impl ClassRef {
    /// Creates a new [`ClassRef`] from a binary name.
    pub fn new<S: Into<String>>(binary_name: S) -> Self {
        ClassRef {
            binary_name: binary_name.into(),
        }
    }

    /// Creates a reference to `java/lang/Object`.
    #[must_use]
    pub fn java_lang_object() -> Self {
        ClassRef::new("java/lang/Object")
    }
}

impl Display for ClassRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.binary_name)
    }
}
