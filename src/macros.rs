macro_rules! see_jvm_spec {
    ($sec:expr $(, $sub_sec:expr)*) => {
        concat!(
            "See the [JVM Specification §",
            $sec $(, ".", $sub_sec)*,
            "](https://docs.oracle.com/javase/specs/jvms/se23/html/jvms-",
            $sec,
            ".html#jvms-",
            $sec $(, ".", $sub_sec)*,
            ") for more information."
        )
    };
}

pub(crate) use see_jvm_spec;
