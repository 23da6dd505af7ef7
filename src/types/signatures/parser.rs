//! Recursive-descent parsing of generic signature text.

use std::str::{Chars, FromStr};

use itertools::Itertools;

use crate::jvm::references::ClassRef;
use crate::types::field_type::PrimitiveType;

use super::{
    ArrayTypeSignature, ClassSignature, ClassTypeSignature, InnerTypeSignature, MethodSignature,
    ObjectTypeSignature, ParameterizedClass, ReturnTypeSignature, TypeArgument, TypeParameter,
    TypeSignature, Wildcard,
};

/// An error indicating that a signature string does not conform to the
/// grammar. Parsing fails as a whole; no partial signature is produced.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid signature at offset {offset}: {reason}")]
pub struct InvalidSignature {
    /// The byte offset into the signature string at which parsing failed.
    pub offset: usize,
    /// What the parser expected to find there.
    pub reason: &'static str,
}

impl ClassSignature {
    /// Parses the `Signature` attribute of a class, attaching it to `class`.
    /// The attribute text does not name the class it describes, hence the
    /// extra argument.
    ///
    /// # Errors
    /// [`InvalidSignature`] if the text does not conform to the grammar.
    pub fn parse(class: ClassRef, signature: &str) -> Result<Self, InvalidSignature> {
        let mut parser = SignatureParser::new(signature);
        let signature = parser.class_signature(class)?;
        parser.finish(signature)
    }
}

impl FromStr for MethodSignature {
    type Err = InvalidSignature;

    fn from_str(signature: &str) -> Result<Self, Self::Err> {
        let mut parser = SignatureParser::new(signature);
        let signature = parser.method_signature()?;
        parser.finish(signature)
    }
}

impl FromStr for TypeSignature {
    type Err = InvalidSignature;

    fn from_str(signature: &str) -> Result<Self, Self::Err> {
        let mut parser = SignatureParser::new(signature);
        let signature = parser.java_type()?;
        parser.finish(signature)
    }
}

/// A cursor over signature text with one character of lookahead. Nesting is
/// tracked by the call stack; every helper consumes exactly the characters
/// of the production it parses.
struct SignatureParser<'a> {
    source: &'a str,
    remaining: Chars<'a>,
}

impl<'a> SignatureParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            remaining: source.chars(),
        }
    }

    fn offset(&self) -> usize {
        self.source.len() - self.remaining.as_str().len()
    }

    fn error(&self, reason: &'static str) -> InvalidSignature {
        InvalidSignature {
            offset: self.offset(),
            reason,
        }
    }

    fn peek(&self) -> Option<char> {
        self.remaining.as_str().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        self.remaining.next()
    }

    /// Consumes the next character if it equals `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char, reason: &'static str) -> Result<(), InvalidSignature> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(reason))
        }
    }

    fn finish<T>(&mut self, parsed: T) -> Result<T, InvalidSignature> {
        if self.peek().is_none() {
            Ok(parsed)
        } else {
            Err(self.error("unexpected trailing characters"))
        }
    }

    /// Reads a non-empty identifier. Identifiers end at any character that
    /// has a meaning in the grammar.
    fn identifier(&mut self) -> Result<String, InvalidSignature> {
        let identifier: String = self
            .remaining
            .take_while_ref(|c| !is_delimiter(*c))
            .collect();
        if identifier.is_empty() {
            Err(self.error("expected an identifier"))
        } else {
            Ok(identifier)
        }
    }

    /// `ClassSignature := [TypeParams] SuperclassType {InterfaceType}`
    fn class_signature(&mut self, class: ClassRef) -> Result<ClassSignature, InvalidSignature> {
        let type_parameters = if self.peek() == Some('<') {
            self.type_parameters()?
        } else {
            Vec::new()
        };
        let superclass = self.class_type()?;
        let mut interfaces = Vec::new();
        while self.peek().is_some() {
            interfaces.push(self.class_type()?);
        }
        Ok(ClassSignature {
            declared: ParameterizedClass {
                class,
                type_parameters,
            },
            superclass,
            interfaces,
        })
    }

    /// `MethodSignature := [TypeParams] '(' {TypeSig} ')' ReturnType {'^' ThrowsType}`
    fn method_signature(&mut self) -> Result<MethodSignature, InvalidSignature> {
        let type_parameters = if self.peek() == Some('<') {
            self.type_parameters()?
        } else {
            Vec::new()
        };
        self.expect('(', "expected '('")?;
        let mut parameters = Vec::new();
        while !self.eat(')') {
            if self.peek().is_none() {
                return Err(self.error("unterminated parameter list"));
            }
            parameters.push(self.java_type()?);
        }
        let return_type = if self.eat('V') {
            ReturnTypeSignature::Void
        } else {
            ReturnTypeSignature::Some(self.java_type()?)
        };
        let mut exceptions = Vec::new();
        while self.eat('^') {
            exceptions.push(self.throws_type()?);
        }
        Ok(MethodSignature {
            type_parameters,
            parameters,
            return_type,
            exceptions,
        })
    }

    /// `TypeParams := '<' TypeParam+ '>'`
    fn type_parameters(&mut self) -> Result<Vec<TypeParameter>, InvalidSignature> {
        self.expect('<', "expected '<'")?;
        let mut type_parameters = vec![self.type_parameter()?];
        while !self.eat('>') {
            if self.peek().is_none() {
                return Err(self.error("unterminated type parameter list"));
            }
            type_parameters.push(self.type_parameter()?);
        }
        Ok(type_parameters)
    }

    /// `TypeParam := Ident ':' [RefType] {':' RefType}`
    ///
    /// The class-bound slot may be empty, but only when an interface bound
    /// follows; a bare `T:` is malformed.
    fn type_parameter(&mut self) -> Result<TypeParameter, InvalidSignature> {
        let name = self.identifier()?;
        self.expect(':', "expected ':' after type parameter name")?;
        let class_bound = if self.peek() == Some(':') {
            None
        } else {
            Some(self.reference_type()?)
        };
        let mut interface_bounds = Vec::new();
        while self.eat(':') {
            interface_bounds.push(self.reference_type()?);
        }
        Ok(TypeParameter {
            name,
            class_bound,
            interface_bounds,
        })
    }

    /// `TypeSig := BaseTypeChar | RefType`
    fn java_type(&mut self) -> Result<TypeSignature, InvalidSignature> {
        match self.peek() {
            Some(c) if !matches!(c, 'L' | 'T' | '[') => {
                if let Ok(base) = PrimitiveType::try_from(c) {
                    self.advance();
                    Ok(TypeSignature::Base(base))
                } else {
                    Err(self.error("expected a type"))
                }
            }
            _ => self.reference_type(),
        }
    }

    /// `RefType := ClassType | 'T' Ident ';' | ArrayType`
    fn reference_type(&mut self) -> Result<TypeSignature, InvalidSignature> {
        match self.peek() {
            Some('L') => self.class_type().map(TypeSignature::Object),
            Some('T') => {
                self.advance();
                let name = self.identifier()?;
                self.expect(';', "expected ';' after type variable name")?;
                Ok(TypeSignature::TypeVariable(name))
            }
            Some('[') => {
                self.advance();
                let component = self.java_type()?;
                Ok(TypeSignature::Array(ArrayTypeSignature::new(component)))
            }
            _ => Err(self.error("expected a reference type")),
        }
    }

    /// `ClassType := 'L' Ident {'/' Ident} [TypeArgs] {'.' Ident [TypeArgs]} ';'`
    fn class_type(&mut self) -> Result<ObjectTypeSignature, InvalidSignature> {
        self.expect('L', "expected 'L'")?;
        let mut binary_name = self.identifier()?;
        while self.eat('/') {
            binary_name.push('/');
            binary_name.push_str(&self.identifier()?);
        }
        let type_arguments = if self.peek() == Some('<') {
            self.type_arguments()?
        } else {
            Vec::new()
        };
        let mut object = ObjectTypeSignature::Class(ClassTypeSignature {
            class: ClassRef::new(binary_name),
            type_arguments,
        });
        while self.eat('.') {
            let name = self.identifier()?;
            let type_arguments = if self.peek() == Some('<') {
                self.type_arguments()?
            } else {
                Vec::new()
            };
            object = ObjectTypeSignature::Inner(InnerTypeSignature {
                outer: Box::new(object),
                name,
                type_arguments,
            });
        }
        self.expect(';', "expected ';' after class type")?;
        Ok(object)
    }

    /// `TypeArgs := '<' TypeArg+ '>'`
    fn type_arguments(&mut self) -> Result<Vec<TypeArgument>, InvalidSignature> {
        self.expect('<', "expected '<'")?;
        let mut type_arguments = vec![self.type_argument()?];
        while !self.eat('>') {
            if self.peek().is_none() {
                return Err(self.error("unterminated type argument list"));
            }
            type_arguments.push(self.type_argument()?);
        }
        Ok(type_arguments)
    }

    /// `TypeArg := '*' | ('+' | '-')? RefType`
    fn type_argument(&mut self) -> Result<TypeArgument, InvalidSignature> {
        match self.peek() {
            Some('*') => {
                self.advance();
                Ok(TypeArgument::Wildcard(Wildcard::Unbounded))
            }
            Some('+') => {
                self.advance();
                let bound = self.reference_type()?;
                Ok(TypeArgument::Wildcard(Wildcard::Extends(bound)))
            }
            Some('-') => {
                self.advance();
                let bound = self.reference_type()?;
                Ok(TypeArgument::Wildcard(Wildcard::Super(bound)))
            }
            _ => self.reference_type().map(TypeArgument::Concrete),
        }
    }

    /// `ThrowsType := ClassType | 'T' Ident ';'`
    ///
    /// Arrays cannot be thrown at the grammar level.
    fn throws_type(&mut self) -> Result<TypeSignature, InvalidSignature> {
        match self.peek() {
            Some('L') | Some('T') => self.reference_type(),
            _ => Err(self.error("expected a class type or type variable after '^'")),
        }
    }
}

const fn is_delimiter(c: char) -> bool {
    matches!(
        c,
        '.' | ';' | '[' | '/' | '<' | '>' | ':' | '*' | '+' | '-' | '(' | ')' | '^'
    )
}
