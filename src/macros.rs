
/// Create a [`TracedError`](crate::TracedError) from a format string.
///
/// The stack is captured at the macro's call site.
#[macro_export]
macro_rules! traced {
    ( $fmt:literal $(, $arg:expr )* $(,)? ) => {
        $crate::TracedError::new(::std::format!($fmt $(, $arg )*))
    };
}
