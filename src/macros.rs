//! Authoring macros.

/// A heterogeneous child list.
///
/// Rust arrays are homogeneous, so `[span("a"), "text", 42]` cannot be a
/// literal; `children!` converts each entry through `Child::from` instead.
///
/// # Example
///
/// ```ignore
/// let page = div(children![
///     span("Fahrenheit: "),
///     input().prop("value", fahrenheit),
///     button("reset"),
/// ]);
/// ```
#[macro_export]
macro_rules! children {
    () => {
        $crate::Child::List(::std::vec::Vec::new())
    };
    ($($child:expr),+ $(,)?) => {
        $crate::Child::List(::std::vec![$($crate::Child::from($child)),+])
    };
}

/// An output record literal.
///
/// Expands to insertions with `?`, so it must be used where
/// [`Error`](crate::Error) can propagate; model and feedback bodies
/// already return `Result`.
///
/// # Example
///
/// ```ignore
/// Ok((
///     record! { "count" => count.clone() },
///     record! { "count" => count },
/// ))
/// ```
#[macro_export]
macro_rules! record {
    ($($key:literal => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut record = $crate::OutputRecord::new();
        $( record.insert($key, $value)?; )*
        record
    }};
}
