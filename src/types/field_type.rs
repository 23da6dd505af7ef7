//! Non-generic JVM field types.

use std::{fmt::Display, str::FromStr};

use itertools::Itertools;

use crate::{jvm::references::ClassRef, macros::see_jvm_spec};

use super::Descriptor;

/// A primitive type in Java.
#[doc = see_jvm_spec!(4, 3, 2)]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum PrimitiveType {
    /// The `boolean` type.
    Boolean,
    /// The `char` type.
    Char,
    /// The `float` type.
    Float,
    /// The `double` type.
    Double,
    /// The `byte` type.
    Byte,
    /// The `short` type.
    Short,
    /// The `int` type.
    Int,
    /// The `long` type.
    Long,
}

impl TryFrom<char> for PrimitiveType {
    type Error = InvalidDescriptor;

    fn try_from(descriptor: char) -> Result<Self, Self::Error> {
        match descriptor {
            'Z' => Ok(Self::Boolean),
            'C' => Ok(Self::Char),
            'F' => Ok(Self::Float),
            'D' => Ok(Self::Double),
            'B' => Ok(Self::Byte),
            'S' => Ok(Self::Short),
            'I' => Ok(Self::Int),
            'J' => Ok(Self::Long),
            _ => Err(InvalidDescriptor(descriptor.to_string())),
        }
    }
}

impl PrimitiveType {
    pub(crate) const fn descriptor_str(self) -> &'static str {
        match self {
            Self::Boolean => "Z",
            Self::Char => "C",
            Self::Float => "F",
            Self::Double => "D",
            Self::Byte => "B",
            Self::Short => "S",
            Self::Int => "I",
            Self::Long => "J",
        }
    }

    /// Returns the number of 32-bit slots a value of this type occupies on
    /// the operand stack.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Double | Self::Long => 2,
            _ => 1,
        }
    }
}

impl Descriptor for PrimitiveType {
    fn descriptor(&self) -> String {
        self.descriptor_str().to_owned()
    }
}

/// The type of a field.
#[doc = see_jvm_spec!(4, 3, 2)]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub enum FieldType {
    /// A primitive type.
    Base(PrimitiveType),
    /// A class or interface type.
    Object(ClassRef),
    /// An array type.
    Array(Box<FieldType>),
}

impl FieldType {
    /// Wraps this type into an array type.
    #[must_use]
    pub fn into_array_type(self) -> Self {
        Self::Array(Box::new(self))
    }

    /// Creates an array type over `element` with the given number of
    /// dimensions.
    #[must_use]
    pub fn array_of(element: Self, dimensions: u8) -> Self {
        (0..dimensions).fold(element, |it, _| it.into_array_type())
    }
}

impl FromStr for FieldType {
    type Err = InvalidDescriptor;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let mut chars = descriptor.chars();
        match chars.next() {
            Some('[') => FieldType::from_str(chars.as_str())
                .map(FieldType::into_array_type)
                .map_err(|_| InvalidDescriptor(descriptor.to_owned())),
            Some('L') => {
                let binary_name: String = chars.take_while_ref(|it| *it != ';').collect();
                match (chars.next(), chars.next()) {
                    (Some(';'), None) => Ok(FieldType::Object(ClassRef::new(binary_name))),
                    _ => Err(InvalidDescriptor(descriptor.to_owned())),
                }
            }
            Some(c) => match chars.next() {
                None => PrimitiveType::try_from(c)
                    .map(FieldType::Base)
                    .map_err(|_| InvalidDescriptor(descriptor.to_owned())),
                _ => Err(InvalidDescriptor(descriptor.to_owned())),
            },
            None => Err(InvalidDescriptor(descriptor.to_owned())),
        }
    }
}

impl Descriptor for FieldType {
    fn descriptor(&self) -> String {
        match self {
            FieldType::Base(it) => it.descriptor(),
            FieldType::Object(ClassRef { binary_name }) => format!("L{binary_name};"),
            FieldType::Array(inner) => format!("[{}", inner.descriptor()),
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.descriptor())
    }
}

/// An error indicating that the descriptor string is invalid.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid descriptor: {0}")]
pub struct InvalidDescriptor(pub String);
