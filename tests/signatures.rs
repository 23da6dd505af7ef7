//! End-to-end tests over a corpus of compiler-emitted signatures.

use std::str::FromStr;

use crema::jvm::references::ClassRef;
use crema::types::Signature;
use crema::types::signatures::{
    ClassSignature, ClassSignatureBuilder, MethodSignature, MethodSignatureBuilder,
    TypeSignature, TypeSignatureBuilder,
};

/// Signatures of this shape are emitted by `javac` for the JDK's own
/// classes.
const METHOD_SIGNATURES: &[&str] = &[
    "<T:Ljava/lang/Object;>([TT;)Ljava/util/List<TT;>;",
    "<T:Ljava/lang/Object;>(Ljava/util/Collection<+TT;>;)Ljava/util/List<TT;>;",
    "<K:Ljava/lang/Object;V:Ljava/lang/Object;>()Ljava/util/Map<TK;TV;>;",
    "(Ljava/util/function/Function<-TT;+TR;>;)Ljava/util/stream/Stream<TR;>;",
    "<U:Ljava/lang/Object;>(Ljava/util/function/BiFunction<-TT;-TU;+TR;>;Ljava/util/concurrent/CompletionStage<+TU;>;)Ljava/util/concurrent/CompletableFuture<TR;>;",
    "(Ljava/util/List<*>;)V",
    "<E:Ljava/lang/Throwable;>(TE;)V^TE;",
    "(Ljava/lang/Class<*>;)Ljava/lang/Object;^Ljava/lang/ClassNotFoundException;^Ljava/io/IOException;",
    "<T::Ljava/lang/Comparable<-TT;>;>(Ljava/util/List<TT;>;)V",
    "([[Ljava/lang/String;[I)[[[Z",
];

const CLASS_SIGNATURES: &[&str] = &[
    "<E:Ljava/lang/Object;>Ljava/util/AbstractList<TE;>;Ljava/util/List<TE;>;Ljava/util/RandomAccess;Ljava/lang/Cloneable;Ljava/io/Serializable;",
    "<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/util/AbstractMap<TK;TV;>;Ljava/util/Map<TK;TV;>;Ljava/lang/Cloneable;Ljava/io/Serializable;",
    "<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;Ljava/io/Serializable;",
    "Ljava/lang/Object;Ljava/util/Iterator<Ljava/lang/String;>;",
    "<T::Ljava/lang/Runnable;:Ljava/io/Serializable;>Ljava/lang/Object;",
];

const TYPE_SIGNATURES: &[&str] = &[
    "Ljava/util/Map<Ljava/lang/String;Ljava/util/List<Ljava/lang/Integer;>;>;",
    "Ljava/util/Map<TK;TV;>.Entry<TK;TV;>;",
    "[Ljava/util/List<*>;",
    "Ljava/util/List<+[Ljava/lang/Number;>;",
    "TT;",
];

#[test]
fn method_corpus_roundtrips() {
    for signature in METHOD_SIGNATURES {
        let parsed = MethodSignature::from_str(signature)
            .unwrap_or_else(|err| panic!("{signature}: {err}"));
        assert_eq!(*signature, parsed.signature());
    }
}

#[test]
fn class_corpus_roundtrips() {
    for signature in CLASS_SIGNATURES {
        let parsed = ClassSignature::parse(ClassRef::new("a/B"), signature)
            .unwrap_or_else(|err| panic!("{signature}: {err}"));
        assert_eq!(*signature, parsed.signature());
    }
}

#[test]
fn type_corpus_roundtrips() {
    for signature in TYPE_SIGNATURES {
        let parsed = TypeSignature::from_str(signature)
            .unwrap_or_else(|err| panic!("{signature}: {err}"));
        assert_eq!(*signature, parsed.signature());
    }
}

#[test]
fn parsing_the_written_form_is_idempotent() {
    for signature in METHOD_SIGNATURES {
        let once = MethodSignature::from_str(signature).unwrap().signature();
        let twice = MethodSignature::from_str(&once).unwrap().signature();
        assert_eq!(once, twice);
    }
}

/// A class with no `Signature` attribute goes through the same AST as a
/// parsed one.
#[test]
fn absent_signature_and_degenerate_signature_agree() {
    let mut builder = ClassSignatureBuilder::new();
    builder.submit_signature(ClassRef::new("a/B"), None).unwrap();
    builder.submit_superclass(Some("java/lang/Object")).unwrap();
    let fallback = builder.build().unwrap();

    let parsed = ClassSignature::parse(ClassRef::new("a/B"), "Ljava/lang/Object;").unwrap();
    assert_eq!(parsed, fallback);
}

#[test]
fn field_like_flow_without_signature() {
    let mut builder = TypeSignatureBuilder::new();
    builder.submit_signature(None).unwrap();
    builder.submit_descriptor("[Ljava/lang/String;").unwrap();
    let synthesized = builder.build().unwrap();
    assert_eq!("[Ljava/lang/String;", synthesized.signature());
}

#[test]
fn method_like_flow_without_signature() {
    let mut builder = MethodSignatureBuilder::new();
    builder.submit_signature(None).unwrap();
    builder
        .submit_descriptor("(Ljava/lang/String;I)Ljava/util/List;")
        .unwrap();
    builder
        .submit_exceptions(["java/io/IOException", "java/sql/SQLException"])
        .unwrap();
    let synthesized = builder.build().unwrap();
    assert_eq!(
        "(Ljava/lang/String;I)Ljava/util/List;^Ljava/io/IOException;^Ljava/sql/SQLException;",
        synthesized.signature()
    );
}

/// A malformed signature is a data error the caller sees; it is distinct
/// from an absent signature, which the builders handle themselves.
#[test]
fn malformed_signature_is_reported_not_defaulted() {
    let mut builder = MethodSignatureBuilder::new();
    let err = builder.submit_signature(Some("<T:>(TT;)V")).map(|_| ());
    assert!(err.is_err());

    let mut absent = MethodSignatureBuilder::new();
    absent.submit_signature(None).unwrap();
    assert_eq!("()V", absent.build().unwrap().signature());
}
