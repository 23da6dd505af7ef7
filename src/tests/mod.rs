use proptest::prelude::*;

use crate::{
    jvm::references::ClassRef,
    types::{
        field_type::{FieldType, PrimitiveType},
        signatures::{
            ArrayTypeSignature, ClassSignature, ClassTypeSignature, InnerTypeSignature,
            MethodSignature, ObjectTypeSignature, ParameterizedClass, ReturnTypeSignature,
            TypeArgument, TypeParameter, TypeSignature, Wildcard,
        },
    },
};

pub(crate) fn arb_class_name() -> impl Strategy<Value = String> {
    let arb_ident = prop::string::string_regex(r"[a-zA-Z][\w\$_]*").expect("The regex is invalid");
    prop::collection::vec(arb_ident, 0..10).prop_map(|v| v.join("/"))
}

pub(crate) fn arb_non_array_field_type() -> impl Strategy<Value = FieldType> {
    prop_oneof![
        any::<PrimitiveType>().prop_map(FieldType::Base),
        arb_class_name()
            .prop_map(ClassRef::new)
            .prop_map(FieldType::Object),
    ]
}

prop_compose! {
    fn arb_array_field_type()(
        t in arb_non_array_field_type(),
        dim in 1..=u8::MAX
    ) -> FieldType {
        FieldType::array_of(t, dim)
    }
}

pub(crate) fn arb_field_type() -> impl Strategy<Value = FieldType> {
    prop_oneof![arb_non_array_field_type(), arb_array_field_type()]
}

/// Identifiers that are valid in signature text (no grammar delimiters).
pub(crate) fn arb_signature_ident() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[a-zA-Z][a-zA-Z0-9_\$]*").expect("The regex is invalid")
}

/// Non-empty slash-qualified class names, as the signature grammar requires.
pub(crate) fn arb_signature_class_name() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_signature_ident(), 1..4).prop_map(|v| v.join("/"))
}

/// Turns an arbitrary type into one that is valid where the grammar demands
/// a reference type: primitives get lifted into single-element arrays.
fn as_reference_type(it: TypeSignature) -> TypeSignature {
    match it {
        base @ TypeSignature::Base(_) => TypeSignature::Array(ArrayTypeSignature::new(base)),
        other => other,
    }
}

fn arb_type_argument(reference: BoxedStrategy<TypeSignature>) -> BoxedStrategy<TypeArgument> {
    prop_oneof![
        reference.clone().prop_map(TypeArgument::Concrete),
        Just(TypeArgument::Wildcard(Wildcard::Unbounded)),
        reference
            .clone()
            .prop_map(|it| TypeArgument::Wildcard(Wildcard::Extends(it))),
        reference.prop_map(|it| TypeArgument::Wildcard(Wildcard::Super(it))),
    ]
    .boxed()
}

fn arb_object_type(reference: BoxedStrategy<TypeSignature>) -> BoxedStrategy<ObjectTypeSignature> {
    let class_type = (
        arb_signature_class_name(),
        prop::collection::vec(arb_type_argument(reference.clone()), 0..3),
    )
        .prop_map(|(name, type_arguments)| ClassTypeSignature {
            class: ClassRef::new(name),
            type_arguments,
        });
    let inner_segments = prop::collection::vec(
        (
            arb_signature_ident(),
            prop::collection::vec(arb_type_argument(reference), 0..2),
        ),
        0..3,
    );
    (class_type, inner_segments)
        .prop_map(|(base, segments)| {
            segments.into_iter().fold(
                ObjectTypeSignature::Class(base),
                |outer, (name, type_arguments)| {
                    ObjectTypeSignature::Inner(InnerTypeSignature {
                        outer: Box::new(outer),
                        name,
                        type_arguments,
                    })
                },
            )
        })
        .boxed()
}

pub(crate) fn arb_type_signature() -> BoxedStrategy<TypeSignature> {
    let leaf = prop_oneof![
        any::<PrimitiveType>().prop_map(TypeSignature::Base),
        arb_signature_ident().prop_map(TypeSignature::TypeVariable),
        arb_signature_class_name().prop_map(|it| TypeSignature::from(ClassRef::new(it))),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        let reference = inner.clone().prop_map(as_reference_type).boxed();
        prop_oneof![
            inner.prop_map(|it| TypeSignature::Array(ArrayTypeSignature::new(it))),
            arb_object_type(reference).prop_map(TypeSignature::Object),
        ]
        .boxed()
    })
    .boxed()
}

pub(crate) fn arb_reference_type() -> BoxedStrategy<TypeSignature> {
    arb_type_signature().prop_map(as_reference_type).boxed()
}

pub(crate) fn arb_type_parameter() -> BoxedStrategy<TypeParameter> {
    (
        arb_signature_ident(),
        prop::option::of(arb_reference_type()),
        prop::collection::vec(arb_reference_type(), 0..3),
    )
        .prop_filter(
            "a type parameter declares a class bound or at least one interface bound",
            |(_, class_bound, interface_bounds)| {
                class_bound.is_some() || !interface_bounds.is_empty()
            },
        )
        .prop_map(|(name, class_bound, interface_bounds)| TypeParameter {
            name,
            class_bound,
            interface_bounds,
        })
        .boxed()
}

fn arb_throws_type() -> BoxedStrategy<TypeSignature> {
    prop_oneof![
        arb_signature_ident().prop_map(TypeSignature::TypeVariable),
        arb_signature_class_name().prop_map(|it| TypeSignature::from(ClassRef::new(it))),
    ]
    .boxed()
}

pub(crate) fn arb_method_signature() -> BoxedStrategy<MethodSignature> {
    (
        prop::collection::vec(arb_type_parameter(), 0..3),
        prop::collection::vec(arb_type_signature(), 0..4),
        prop_oneof![
            Just(ReturnTypeSignature::Void),
            arb_type_signature().prop_map(ReturnTypeSignature::Some),
        ],
        prop::collection::vec(arb_throws_type(), 0..3),
    )
        .prop_map(
            |(type_parameters, parameters, return_type, exceptions)| MethodSignature {
                type_parameters,
                parameters,
                return_type,
                exceptions,
            },
        )
        .boxed()
}

pub(crate) fn arb_class_signature() -> BoxedStrategy<ClassSignature> {
    let object = || arb_object_type(arb_reference_type());
    (
        arb_signature_class_name(),
        prop::collection::vec(arb_type_parameter(), 0..3),
        object(),
        prop::collection::vec(object(), 0..3),
    )
        .prop_map(
            |(name, type_parameters, superclass, interfaces)| ClassSignature {
                declared: ParameterizedClass {
                    class: ClassRef::new(name),
                    type_parameters,
                },
                superclass,
                interfaces,
            },
        )
        .boxed()
}
