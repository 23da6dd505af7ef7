//! Generic type signatures in the JVM.
//!
//! A `Signature` attribute records the generic type information that the
//! plain descriptors of a class, method, or field erase. This module models
//! the signature grammar as a tree of closed enum types, parses attribute
//! text into that tree, and serializes the tree back to the exact attribute
//! text.
//!
//! See the [JVM Specification §4.7.9.1](https://docs.oracle.com/javase/specs/jvms/se23/html/jvms-4.html#jvms-4.7.9.1) for more information.

use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::{jvm::references::ClassRef, macros::see_jvm_spec};

use super::{
    Signature,
    field_type::{FieldType, PrimitiveType},
    method_descriptor::ReturnType,
};

mod builder;
mod parser;

pub use builder::{
    BuilderError, ClassSignatureBuilder, MethodSignatureBuilder, TypeSignatureBuilder,
};
pub use parser::InvalidSignature;

/// A type appearing inside a signature, e.g. a method parameter or a type
/// argument.
#[doc = see_jvm_spec!(4, 7, 9, 1)]
#[derive(Debug, PartialEq, Eq, Hash, Clone, derive_more::From)]
pub enum TypeSignature {
    /// A primitive type.
    Base(PrimitiveType),
    /// A class or interface type, possibly parameterized and possibly
    /// nested.
    Object(ObjectTypeSignature),
    /// A reference to a type variable declared by an enclosing class or
    /// method, e.g. `TT;`.
    #[from(ignore)]
    TypeVariable(String),
    /// An array type.
    Array(ArrayTypeSignature),
}

impl TypeSignature {
    /// Rewrites every class reference in this type with `mapper`.
    #[must_use]
    pub fn map_classes(self, mapper: &impl Fn(ClassRef) -> ClassRef) -> Self {
        match self {
            Self::Base(_) | Self::TypeVariable(_) => self,
            Self::Object(object) => Self::Object(object.map_classes(mapper)),
            Self::Array(array) => Self::Array(array.map_classes(mapper)),
        }
    }
}

impl Display for TypeSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base(base) => f.write_str(base.descriptor_str()),
            Self::Object(object) => object.fmt(f),
            Self::TypeVariable(name) => write!(f, "T{name};"),
            Self::Array(array) => array.fmt(f),
        }
    }
}

impl From<ClassRef> for TypeSignature {
    fn from(class: ClassRef) -> Self {
        Self::Object(class.into())
    }
}

/// Converts a non-generic field type into the signature the compiler would
/// emit for it.
impl From<FieldType> for TypeSignature {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Base(base) => Self::Base(base),
            FieldType::Object(class) => class.into(),
            FieldType::Array(element) => {
                Self::Array(ArrayTypeSignature::new(Self::from(*element)))
            }
        }
    }
}

/// A class or interface type: either a top-level class or a chain of inner
/// classes qualified by their enclosing type.
#[derive(Debug, PartialEq, Eq, Hash, Clone, derive_more::From)]
pub enum ObjectTypeSignature {
    /// A top-level class or interface type.
    Class(ClassTypeSignature),
    /// An inner class type qualified by its enclosing type.
    Inner(InnerTypeSignature),
}

impl ObjectTypeSignature {
    /// Rewrites every class reference in this type with `mapper`.
    #[must_use]
    pub fn map_classes(self, mapper: &impl Fn(ClassRef) -> ClassRef) -> Self {
        match self {
            Self::Class(class) => Self::Class(class.map_classes(mapper)),
            Self::Inner(inner) => Self::Inner(inner.map_classes(mapper)),
        }
    }

    /// Writes the qualified-name part, without the leading `L` and the
    /// trailing `;`.
    fn fmt_qualified(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(class) => class.fmt_qualified(f),
            Self::Inner(inner) => inner.fmt_qualified(f),
        }
    }
}

impl Display for ObjectTypeSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "L")?;
        self.fmt_qualified(f)?;
        write!(f, ";")
    }
}

impl From<ClassRef> for ObjectTypeSignature {
    fn from(class: ClassRef) -> Self {
        Self::Class(ClassTypeSignature::plain(class))
    }
}

/// A possibly-parameterized use of a class or interface, e.g.
/// `Ljava/util/List<TT;>;`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ClassTypeSignature {
    /// The class being referenced.
    pub class: ClassRef,
    /// The type arguments filled in at the use site. Empty for a
    /// non-generic use.
    pub type_arguments: Vec<TypeArgument>,
}

impl ClassTypeSignature {
    /// Creates a use of `class` with no type arguments.
    #[must_use]
    pub fn plain(class: ClassRef) -> Self {
        Self {
            class,
            type_arguments: Vec::new(),
        }
    }

    /// Rewrites every class reference in this type with `mapper`.
    #[must_use]
    pub fn map_classes(self, mapper: &impl Fn(ClassRef) -> ClassRef) -> Self {
        Self {
            class: mapper(self.class),
            type_arguments: self
                .type_arguments
                .into_iter()
                .map(|it| it.map_classes(mapper))
                .collect(),
        }
    }

    fn fmt_qualified(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class)?;
        fmt_type_arguments(f, &self.type_arguments)
    }
}

impl Display for ClassTypeSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "L")?;
        self.fmt_qualified(f)?;
        write!(f, ";")
    }
}

/// A member class qualified by its enclosing type, e.g. the `Entry` in
/// `Ljava/util/Map<TK;TV;>.Entry;`.
///
/// Chains serialize left to right with a single leading `L` and a single
/// trailing `;`, the segments separated by `.`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct InnerTypeSignature {
    /// The enclosing type.
    pub outer: Box<ObjectTypeSignature>,
    /// The simple name of the member class.
    pub name: String,
    /// The type arguments of the member class itself.
    pub type_arguments: Vec<TypeArgument>,
}

impl InnerTypeSignature {
    /// Rewrites every class reference in this type with `mapper`.
    #[must_use]
    pub fn map_classes(self, mapper: &impl Fn(ClassRef) -> ClassRef) -> Self {
        Self {
            outer: Box::new(self.outer.map_classes(mapper)),
            name: self.name,
            type_arguments: self
                .type_arguments
                .into_iter()
                .map(|it| it.map_classes(mapper))
                .collect(),
        }
    }

    fn fmt_qualified(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.outer.fmt_qualified(f)?;
        write!(f, ".{}", self.name)?;
        fmt_type_arguments(f, &self.type_arguments)
    }
}

impl Display for InnerTypeSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "L")?;
        self.fmt_qualified(f)?;
        write!(f, ";")
    }
}

/// An array type in a signature.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ArrayTypeSignature {
    /// The component type, which may itself be an array.
    pub component: Box<TypeSignature>,
}

impl ArrayTypeSignature {
    /// Creates an array over the given component type.
    #[must_use]
    pub fn new(component: TypeSignature) -> Self {
        Self {
            component: Box::new(component),
        }
    }

    /// Creates an array over `element` with the given number of dimensions.
    /// At least one level of nesting is always applied.
    #[must_use]
    pub fn of(element: TypeSignature, dimensions: u8) -> Self {
        let array = Self::new(element);
        (1..dimensions).fold(array, |it, _| Self::new(TypeSignature::Array(it)))
    }

    /// The number of nested array levels.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self.component.as_ref() {
            TypeSignature::Array(inner) => 1 + inner.depth(),
            _ => 1,
        }
    }

    /// The innermost non-array type.
    #[must_use]
    pub fn element(&self) -> &TypeSignature {
        match self.component.as_ref() {
            TypeSignature::Array(inner) => inner.element(),
            _ => &self.component,
        }
    }

    /// Rewrites every class reference in this type with `mapper`.
    #[must_use]
    pub fn map_classes(self, mapper: &impl Fn(ClassRef) -> ClassRef) -> Self {
        Self::new(self.component.map_classes(mapper))
    }
}

impl Display for ArrayTypeSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.component)
    }
}

/// A type argument filling one slot of a parameterized type.
#[derive(Debug, PartialEq, Eq, Hash, Clone, derive_more::From)]
pub enum TypeArgument {
    /// A concrete argument. The type is stored directly, without a wildcard
    /// wrapper.
    Concrete(TypeSignature),
    /// A wildcard argument.
    Wildcard(Wildcard),
}

impl TypeArgument {
    /// Rewrites every class reference in this argument with `mapper`.
    #[must_use]
    pub fn map_classes(self, mapper: &impl Fn(ClassRef) -> ClassRef) -> Self {
        match self {
            Self::Concrete(it) => Self::Concrete(it.map_classes(mapper)),
            Self::Wildcard(it) => Self::Wildcard(it.map_classes(mapper)),
        }
    }
}

impl Display for TypeArgument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(it) => it.fmt(f),
            Self::Wildcard(it) => it.fmt(f),
        }
    }
}

/// A wildcard type argument. A bound is either absent (`*`), an upper bound
/// (`+`), or a lower bound (`-`); the two bounds are mutually exclusive by
/// construction.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Wildcard {
    /// The unbounded wildcard, `*`.
    Unbounded,
    /// An upper-bounded wildcard, e.g. `+Ljava/lang/Number;` for
    /// `? extends Number`.
    Extends(TypeSignature),
    /// A lower-bounded wildcard, e.g. `-Ljava/lang/Integer;` for
    /// `? super Integer`.
    Super(TypeSignature),
}

impl Wildcard {
    /// Rewrites every class reference in this wildcard with `mapper`.
    #[must_use]
    pub fn map_classes(self, mapper: &impl Fn(ClassRef) -> ClassRef) -> Self {
        match self {
            Self::Unbounded => Self::Unbounded,
            Self::Extends(it) => Self::Extends(it.map_classes(mapper)),
            Self::Super(it) => Self::Super(it.map_classes(mapper)),
        }
    }
}

impl Display for Wildcard {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "*"),
            Self::Extends(bound) => write!(f, "+{bound}"),
            Self::Super(bound) => write!(f, "-{bound}"),
        }
    }
}

/// A formal type parameter declared by a class or a method, e.g. the
/// `T:Ljava/lang/Object;` in `<T:Ljava/lang/Object;>`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct TypeParameter {
    /// The name of the type parameter.
    pub name: String,
    /// The class bound, if explicitly declared. `None` when the declaration
    /// leaves the class-bound slot empty (i.e. the parameter is bounded by
    /// interfaces only), in which case the bound is implicitly
    /// `java/lang/Object`.
    pub class_bound: Option<TypeSignature>,
    /// The interface bounds, in declaration order.
    pub interface_bounds: Vec<TypeSignature>,
}

impl TypeParameter {
    /// Creates a type parameter with no declared bounds.
    #[must_use]
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            class_bound: None,
            interface_bounds: Vec::new(),
        }
    }

    /// Returns the class bound, which is `java/lang/Object` unless the
    /// declaration states otherwise.
    #[must_use]
    pub fn effective_class_bound(&self) -> TypeSignature {
        self.class_bound
            .clone()
            .unwrap_or_else(|| ClassRef::java_lang_object().into())
    }

    /// Rewrites every class reference in this declaration with `mapper`.
    #[must_use]
    pub fn map_classes(self, mapper: &impl Fn(ClassRef) -> ClassRef) -> Self {
        Self {
            name: self.name,
            class_bound: self.class_bound.map(|it| it.map_classes(mapper)),
            interface_bounds: self
                .interface_bounds
                .into_iter()
                .map(|it| it.map_classes(mapper))
                .collect(),
        }
    }
}

impl Display for TypeParameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        if let Some(class_bound) = &self.class_bound {
            write!(f, "{class_bound}")?;
        }
        for bound in &self.interface_bounds {
            write!(f, ":{bound}")?;
        }
        Ok(())
    }
}

/// The declaring side of a generic class: the class itself together with
/// the formal type parameters it declares.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ParameterizedClass {
    /// The class being declared.
    pub class: ClassRef,
    /// The formal type parameters, in declaration order.
    pub type_parameters: Vec<TypeParameter>,
}

impl ParameterizedClass {
    /// Creates a declaration of `class` with no type parameters.
    #[must_use]
    pub fn plain(class: ClassRef) -> Self {
        Self {
            class,
            type_parameters: Vec::new(),
        }
    }

    /// Rewrites every class reference in this declaration with `mapper`.
    #[must_use]
    pub fn map_classes(self, mapper: &impl Fn(ClassRef) -> ClassRef) -> Self {
        Self {
            class: mapper(self.class),
            type_parameters: self
                .type_parameters
                .into_iter()
                .map(|it| it.map_classes(mapper))
                .collect(),
        }
    }
}

impl Display for ParameterizedClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.class)?;
        fmt_type_parameters(f, &self.type_parameters)?;
        write!(f, ";")
    }
}

/// The generic signature of a class.
#[doc = see_jvm_spec!(4, 7, 9, 1)]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ClassSignature {
    /// The class declaring this signature, with its formal type parameters.
    pub declared: ParameterizedClass,
    /// The generic superclass.
    pub superclass: ObjectTypeSignature,
    /// The generic superinterfaces, in declaration order.
    pub interfaces: Vec<ObjectTypeSignature>,
}

impl ClassSignature {
    /// Creates the signature of a non-generic class extending
    /// `java/lang/Object` with no interfaces.
    #[must_use]
    pub fn non_generic(class: ClassRef) -> Self {
        Self {
            declared: ParameterizedClass::plain(class),
            superclass: ClassRef::java_lang_object().into(),
            interfaces: Vec::new(),
        }
    }

    /// Rewrites every class reference in this signature with `mapper`.
    #[must_use]
    pub fn map_classes(self, mapper: &impl Fn(ClassRef) -> ClassRef) -> Self {
        Self {
            declared: self.declared.map_classes(mapper),
            superclass: self.superclass.map_classes(mapper),
            interfaces: self
                .interfaces
                .into_iter()
                .map(|it| it.map_classes(mapper))
                .collect(),
        }
    }
}

impl Display for ClassSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_type_parameters(f, &self.declared.type_parameters)?;
        write!(f, "{}", self.superclass)?;
        for interface in &self.interfaces {
            write!(f, "{interface}")?;
        }
        Ok(())
    }
}

/// The result part of a method signature.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum ReturnTypeSignature {
    /// The method returns a specific type.
    Some(TypeSignature),
    /// The return type of the method is `void`.
    Void,
}

impl ReturnTypeSignature {
    /// Rewrites every class reference in this return type with `mapper`.
    #[must_use]
    pub fn map_classes(self, mapper: &impl Fn(ClassRef) -> ClassRef) -> Self {
        match self {
            Self::Some(it) => Self::Some(it.map_classes(mapper)),
            Self::Void => Self::Void,
        }
    }
}

impl Display for ReturnTypeSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Some(it) => it.fmt(f),
            Self::Void => write!(f, "V"),
        }
    }
}

/// Converts a non-generic return type into the signature the compiler would
/// emit for it.
impl From<ReturnType> for ReturnTypeSignature {
    fn from(return_type: ReturnType) -> Self {
        match return_type {
            ReturnType::Some(it) => Self::Some(it.into()),
            ReturnType::Void => Self::Void,
        }
    }
}

/// The generic signature of a method.
#[doc = see_jvm_spec!(4, 7, 9, 1)]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct MethodSignature {
    /// The formal type parameters declared by the method, in declaration
    /// order.
    pub type_parameters: Vec<TypeParameter>,
    /// The generic parameter types, in declaration order.
    pub parameters: Vec<TypeSignature>,
    /// The generic return type.
    pub return_type: ReturnTypeSignature,
    /// The generic `throws` clause, in declaration order. Each entry is a
    /// class type or a type-variable reference.
    pub exceptions: Vec<TypeSignature>,
}

impl MethodSignature {
    /// Creates the signature of a method taking no parameters and returning
    /// `void`.
    #[must_use]
    pub fn non_generic() -> Self {
        Self {
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type: ReturnTypeSignature::Void,
            exceptions: Vec::new(),
        }
    }

    /// Rewrites every class reference in this signature with `mapper`.
    #[must_use]
    pub fn map_classes(self, mapper: &impl Fn(ClassRef) -> ClassRef) -> Self {
        Self {
            type_parameters: self
                .type_parameters
                .into_iter()
                .map(|it| it.map_classes(mapper))
                .collect(),
            parameters: self
                .parameters
                .into_iter()
                .map(|it| it.map_classes(mapper))
                .collect(),
            return_type: self.return_type.map_classes(mapper),
            exceptions: self
                .exceptions
                .into_iter()
                .map(|it| it.map_classes(mapper))
                .collect(),
        }
    }
}

impl Display for MethodSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_type_parameters(f, &self.type_parameters)?;
        write!(f, "({})", self.parameters.iter().format(""))?;
        write!(f, "{}", self.return_type)?;
        for exception in &self.exceptions {
            write!(f, "^{exception}")?;
        }
        Ok(())
    }
}

fn fmt_type_arguments(f: &mut Formatter<'_>, type_arguments: &[TypeArgument]) -> fmt::Result {
    if type_arguments.is_empty() {
        Ok(())
    } else {
        write!(f, "<{}>", type_arguments.iter().format(""))
    }
}

fn fmt_type_parameters(f: &mut Formatter<'_>, type_parameters: &[TypeParameter]) -> fmt::Result {
    if type_parameters.is_empty() {
        Ok(())
    } else {
        write!(f, "<{}>", type_parameters.iter().format(""))
    }
}

macro_rules! signature_via_display {
    ($($name:ty),+ $(,)?) => {$(
        impl Signature for $name {
            fn signature(&self) -> String {
                self.to_string()
            }
        }
    )+};
}

signature_via_display!(
    TypeSignature,
    ObjectTypeSignature,
    ClassTypeSignature,
    InnerTypeSignature,
    ArrayTypeSignature,
    TypeArgument,
    Wildcard,
    TypeParameter,
    ParameterizedClass,
    ClassSignature,
    ReturnTypeSignature,
    MethodSignature,
);
