//! Non-generic JVM method descriptors.

use itertools::Itertools;
use std::{
    fmt::Display,
    str::{Chars, FromStr},
};

use crate::{jvm::references::ClassRef, macros::see_jvm_spec};

use super::{
    Descriptor,
    field_type::{FieldType, InvalidDescriptor, PrimitiveType},
};

/// The descriptor of a method.
/// Consists of the parameters types and the return type.
#[doc = see_jvm_spec!(4, 3, 3)]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct MethodDescriptor {
    /// The type of the parameters.
    pub parameters_types: Vec<FieldType>,
    /// The return type.
    pub return_type: ReturnType,
}

/// Denotes the return type of a method.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub enum ReturnType {
    /// The method returns a specific type.
    Some(FieldType),
    /// The return type of the method is `void`.
    Void,
}

impl Descriptor for ReturnType {
    fn descriptor(&self) -> String {
        match self {
            ReturnType::Some(it) => it.descriptor(),
            ReturnType::Void => "V".to_owned(),
        }
    }
}

impl Display for ReturnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.descriptor())
    }
}

impl Display for MethodDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.descriptor())
    }
}

impl Descriptor for MethodDescriptor {
    fn descriptor(&self) -> String {
        format!(
            "({}){}",
            self.parameters_types.iter().map(FieldType::descriptor).join(""),
            self.return_type.descriptor()
        )
    }
}

impl MethodDescriptor {
    /// Parses a single parameter type from the descriptor and advances the
    /// iterator. For an input as follows.
    /// ```text
    ///   L      java/lang/String;IJB)V
    ///   ^      ^
    ///   prefix remaining
    /// ````
    /// It returns a [`FieldType::Object`] with `"java/lang/String"` and the
    /// `remaining` is as follows.
    /// ```text
    ///   ...;IJB)V
    ///       ^
    ///       remaining
    /// ````
    fn parse_single_param(
        prefix: char,
        remaining: &mut Chars<'_>,
    ) -> Result<FieldType, InvalidDescriptor> {
        if let Ok(p) = PrimitiveType::try_from(prefix) {
            Ok(FieldType::Base(p))
        } else {
            match prefix {
                'L' => {
                    let binary_name: String = remaining.take_while_ref(|c| *c != ';').collect();
                    match remaining.next() {
                        Some(';') => Ok(FieldType::Object(ClassRef::new(binary_name))),
                        _ => Err(InvalidDescriptor(binary_name)),
                    }
                }
                '[' => {
                    let next_prefix = remaining
                        .next()
                        .ok_or_else(|| InvalidDescriptor("[".to_owned()))?;
                    Self::parse_single_param(next_prefix, remaining).map(FieldType::into_array_type)
                }
                unexpected => Err(InvalidDescriptor(unexpected.to_string())),
            }
        }
    }
}

impl FromStr for MethodDescriptor {
    type Err = InvalidDescriptor;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let mut chars = descriptor.chars();
        if chars.next() != Some('(') {
            return Err(InvalidDescriptor(descriptor.to_owned()));
        }
        let mut parameters_types = Vec::new();
        let return_type = loop {
            match chars.next() {
                Some(')') => break ReturnType::from_str(chars.as_str())?,
                Some(c) => {
                    let param = Self::parse_single_param(c, &mut chars)
                        .map_err(|_| InvalidDescriptor(descriptor.to_owned()))?;
                    parameters_types.push(param);
                }
                None => Err(InvalidDescriptor(descriptor.to_owned()))?,
            }
        };
        Ok(Self {
            parameters_types,
            return_type,
        })
    }
}

impl FromStr for ReturnType {
    type Err = InvalidDescriptor;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        if descriptor == "V" {
            Ok(ReturnType::Void)
        } else {
            FieldType::from_str(descriptor).map(ReturnType::Some)
        }
    }
}
