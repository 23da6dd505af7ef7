//! Fallback construction of signatures for elements that carry no
//! `Signature` attribute.
//!
//! Each builder is driven in two phases. The first call is always
//! [`submit_signature`](ClassSignatureBuilder::submit_signature): it decides
//! whether the builder parses a real signature (subsequent fill calls are
//! then ignored) or synthesizes a degenerate one from the raw descriptor and
//! name facts submitted afterwards. Either way the result has the same shape
//! the parser would produce, so callers never branch on whether a signature
//! was present.

use crate::jvm::references::ClassRef;
use crate::types::{
    field_type::{FieldType, InvalidDescriptor},
    method_descriptor::MethodDescriptor,
};

use super::{
    ClassSignature, InvalidSignature, MethodSignature, ObjectTypeSignature, TypeSignature,
};

/// An error raised while driving a signature builder.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    /// The submitted signature text is malformed.
    #[error(transparent)]
    InvalidSignature(#[from] InvalidSignature),
    /// The submitted descriptor is malformed.
    #[error(transparent)]
    InvalidDescriptor(#[from] InvalidDescriptor),
    /// A call arrived before `submit_signature` decided the construction
    /// path.
    #[error("`submit_signature` must be called before `{0}`")]
    SignatureNotSubmitted(&'static str),
    /// `submit_signature` was called a second time.
    #[error("`submit_signature` may only be called once")]
    SignatureResubmitted,
    /// More than one raw source was submitted for a standalone type.
    #[error("at most one of `submit_descriptor` and `submit_binary_name` may be called")]
    ConflictingSources,
}

/// The construction path a builder has committed to.
#[derive(Debug)]
enum State<T> {
    /// A real signature was submitted and parsed; fill calls are ignored.
    Resolved(T),
    /// No signature was submitted; fill calls accumulate raw facts.
    Raw(T),
}

impl<T> State<T> {
    fn into_inner(self) -> T {
        match self {
            State::Resolved(it) | State::Raw(it) => it,
        }
    }

    fn raw_mut(&mut self) -> Option<&mut T> {
        match self {
            State::Resolved(_) => None,
            State::Raw(it) => Some(it),
        }
    }
}

/// Builds a [`ClassSignature`] from a class's `Signature` attribute when
/// present, or from its raw superclass and interface names when not.
#[derive(Debug, Default)]
pub struct ClassSignatureBuilder {
    state: Option<State<ClassSignature>>,
}

impl ClassSignatureBuilder {
    /// Creates a builder awaiting its `submit_signature` call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Submits the `Signature` attribute of the class named `class`, or
    /// `None` if the class has none. Must be the first call on this builder.
    ///
    /// # Errors
    /// [`BuilderError::SignatureResubmitted`] on a repeated call;
    /// [`BuilderError::InvalidSignature`] if the submitted text is
    /// malformed.
    pub fn submit_signature(
        &mut self,
        class: ClassRef,
        signature: Option<&str>,
    ) -> Result<&mut Self, BuilderError> {
        if self.state.is_some() {
            return Err(BuilderError::SignatureResubmitted);
        }
        self.state = Some(match signature {
            Some(text) => State::Resolved(ClassSignature::parse(class, text)?),
            None => State::Raw(ClassSignature::non_generic(class)),
        });
        Ok(self)
    }

    /// Submits the raw superclass name, if any. Ignored when a real
    /// signature was submitted.
    ///
    /// # Errors
    /// [`BuilderError::SignatureNotSubmitted`] if called before
    /// [`submit_signature`](Self::submit_signature).
    pub fn submit_superclass(
        &mut self,
        superclass: Option<&str>,
    ) -> Result<&mut Self, BuilderError> {
        let state = self
            .state
            .as_mut()
            .ok_or(BuilderError::SignatureNotSubmitted("submit_superclass"))?;
        if let Some(signature) = state.raw_mut()
            && let Some(name) = superclass
        {
            signature.superclass = ClassRef::new(name).into();
        }
        Ok(self)
    }

    /// Submits the raw interface names. Ignored when a real signature was
    /// submitted; appends across calls otherwise.
    ///
    /// # Errors
    /// [`BuilderError::SignatureNotSubmitted`] if called before
    /// [`submit_signature`](Self::submit_signature).
    pub fn submit_interfaces<I, S>(&mut self, interfaces: I) -> Result<&mut Self, BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = self
            .state
            .as_mut()
            .ok_or(BuilderError::SignatureNotSubmitted("submit_interfaces"))?;
        if let Some(signature) = state.raw_mut() {
            signature.interfaces.extend(
                interfaces
                    .into_iter()
                    .map(|it| ObjectTypeSignature::from(ClassRef::new(it))),
            );
        }
        Ok(self)
    }

    /// Returns the finished signature.
    ///
    /// # Errors
    /// [`BuilderError::SignatureNotSubmitted`] if
    /// [`submit_signature`](Self::submit_signature) was never called.
    pub fn build(self) -> Result<ClassSignature, BuilderError> {
        self.state
            .map(State::into_inner)
            .ok_or(BuilderError::SignatureNotSubmitted("build"))
    }
}

/// Builds a [`MethodSignature`] from a method's `Signature` attribute when
/// present, or from its descriptor and exception names when not.
#[derive(Debug, Default)]
pub struct MethodSignatureBuilder {
    state: Option<State<MethodSignature>>,
}

impl MethodSignatureBuilder {
    /// Creates a builder awaiting its `submit_signature` call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Submits the `Signature` attribute of the method, or `None` if the
    /// method has none. Must be the first call on this builder.
    ///
    /// # Errors
    /// [`BuilderError::SignatureResubmitted`] on a repeated call;
    /// [`BuilderError::InvalidSignature`] if the submitted text is
    /// malformed.
    pub fn submit_signature(&mut self, signature: Option<&str>) -> Result<&mut Self, BuilderError> {
        if self.state.is_some() {
            return Err(BuilderError::SignatureResubmitted);
        }
        self.state = Some(match signature {
            Some(text) => State::Resolved(text.parse()?),
            None => State::Raw(MethodSignature::non_generic()),
        });
        Ok(self)
    }

    /// Submits the raw method descriptor, from which the parameter and
    /// return types are derived. Ignored when a real signature was
    /// submitted.
    ///
    /// # Errors
    /// [`BuilderError::SignatureNotSubmitted`] if called before
    /// [`submit_signature`](Self::submit_signature);
    /// [`BuilderError::InvalidDescriptor`] if the descriptor is malformed.
    pub fn submit_descriptor(&mut self, descriptor: &str) -> Result<&mut Self, BuilderError> {
        let state = self
            .state
            .as_mut()
            .ok_or(BuilderError::SignatureNotSubmitted("submit_descriptor"))?;
        if let Some(signature) = state.raw_mut() {
            let descriptor: MethodDescriptor = descriptor.parse()?;
            signature.parameters = descriptor
                .parameters_types
                .into_iter()
                .map(TypeSignature::from)
                .collect();
            signature.return_type = descriptor.return_type.into();
        }
        Ok(self)
    }

    /// Submits the raw exception names from the `Exceptions` attribute.
    /// Ignored when a real signature was submitted; appends across calls
    /// otherwise.
    ///
    /// # Errors
    /// [`BuilderError::SignatureNotSubmitted`] if called before
    /// [`submit_signature`](Self::submit_signature).
    pub fn submit_exceptions<I, S>(&mut self, exceptions: I) -> Result<&mut Self, BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = self
            .state
            .as_mut()
            .ok_or(BuilderError::SignatureNotSubmitted("submit_exceptions"))?;
        if let Some(signature) = state.raw_mut() {
            signature.exceptions.extend(
                exceptions
                    .into_iter()
                    .map(|it| TypeSignature::from(ClassRef::new(it))),
            );
        }
        Ok(self)
    }

    /// Returns the finished signature.
    ///
    /// # Errors
    /// [`BuilderError::SignatureNotSubmitted`] if
    /// [`submit_signature`](Self::submit_signature) was never called.
    pub fn build(self) -> Result<MethodSignature, BuilderError> {
        self.state
            .map(State::into_inner)
            .ok_or(BuilderError::SignatureNotSubmitted("build"))
    }
}

/// Builds a standalone [`TypeSignature`] from a field's or variable's
/// `Signature` attribute when present, or from its descriptor or binary
/// name when not.
#[derive(Debug, Default)]
pub struct TypeSignatureBuilder {
    state: Option<State<Option<TypeSignature>>>,
}

impl TypeSignatureBuilder {
    /// Creates a builder awaiting its `submit_signature` call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Submits the `Signature` attribute, or `None` if there is none. Must
    /// be the first call on this builder.
    ///
    /// # Errors
    /// [`BuilderError::SignatureResubmitted`] on a repeated call;
    /// [`BuilderError::InvalidSignature`] if the submitted text is
    /// malformed.
    pub fn submit_signature(&mut self, signature: Option<&str>) -> Result<&mut Self, BuilderError> {
        if self.state.is_some() {
            return Err(BuilderError::SignatureResubmitted);
        }
        self.state = Some(match signature {
            Some(text) => State::Resolved(Some(text.parse()?)),
            None => State::Raw(None),
        });
        Ok(self)
    }

    /// Submits the raw field descriptor. Ignored when a real signature was
    /// submitted; mutually exclusive with
    /// [`submit_binary_name`](Self::submit_binary_name).
    ///
    /// # Errors
    /// [`BuilderError::SignatureNotSubmitted`] if called before
    /// [`submit_signature`](Self::submit_signature);
    /// [`BuilderError::ConflictingSources`] if a raw source was already
    /// submitted; [`BuilderError::InvalidDescriptor`] if the descriptor is
    /// malformed.
    pub fn submit_descriptor(&mut self, descriptor: &str) -> Result<&mut Self, BuilderError> {
        match &mut self.state {
            None => return Err(BuilderError::SignatureNotSubmitted("submit_descriptor")),
            Some(State::Resolved(_)) => {}
            Some(State::Raw(slot)) => {
                if slot.is_some() {
                    return Err(BuilderError::ConflictingSources);
                }
                let field_type: FieldType = descriptor.parse()?;
                *slot = Some(field_type.into());
            }
        }
        Ok(self)
    }

    /// Submits the raw binary name of the class. Ignored when a real
    /// signature was submitted; mutually exclusive with
    /// [`submit_descriptor`](Self::submit_descriptor).
    ///
    /// # Errors
    /// [`BuilderError::SignatureNotSubmitted`] if called before
    /// [`submit_signature`](Self::submit_signature);
    /// [`BuilderError::ConflictingSources`] if a raw source was already
    /// submitted.
    pub fn submit_binary_name(&mut self, binary_name: &str) -> Result<&mut Self, BuilderError> {
        match &mut self.state {
            None => return Err(BuilderError::SignatureNotSubmitted("submit_binary_name")),
            Some(State::Resolved(_)) => {}
            Some(State::Raw(slot)) => {
                if slot.is_some() {
                    return Err(BuilderError::ConflictingSources);
                }
                *slot = Some(ClassRef::new(binary_name).into());
            }
        }
        Ok(self)
    }

    /// Returns the finished type. A raw builder that never received a
    /// descriptor or a binary name yields `java/lang/Object`.
    ///
    /// # Errors
    /// [`BuilderError::SignatureNotSubmitted`] if
    /// [`submit_signature`](Self::submit_signature) was never called.
    pub fn build(self) -> Result<TypeSignature, BuilderError> {
        match self.state {
            None => Err(BuilderError::SignatureNotSubmitted("build")),
            Some(state) => Ok(state
                .into_inner()
                .unwrap_or_else(|| ClassRef::java_lang_object().into())),
        }
    }
}
