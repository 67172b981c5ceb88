use std::fmt;
use std::error::Error;


// Formatter that uses a closure
// Useful to avoid a lot of boilerplate when there are multiple ways to Display a struct

pub fn delegate_fmt<F>(fmt_func: F) -> impl fmt::Display where F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result {
    FnFormatter { fmt_func }
}

struct FnFormatter<F> where F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result {
    fmt_func: F,
}

impl<F> fmt::Display for FnFormatter<F> where F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.fmt_func)(fmt)
    }
}


/// Last element of a slash separated path.
///
/// Trailing separators are ignored. An empty path gives `"."` and a path made only of
/// separators gives `"/"`. Both `/` and `\` count as separators so that paths recorded
/// on Windows hosts shorten the same way.
pub fn base_name(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }

    let trimmed = path.trim_end_matches(is_separator);
    if trimmed.is_empty() {
        return "/";
    }

    match trimmed.rfind(is_separator) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}


// Formats an error that may have a message and/or a source error
pub fn format_error(fmt: &mut fmt::Formatter<'_>, message: Option<&str>, source: Option<&dyn Error>) -> fmt::Result {
    // empty messages are formatted the same as no message
    let message =
        if let Some("") = message { None }
        else { message };

    match (message, source) {
        (None, None) => fmt.write_str("error"),
        (None, Some(error)) => write!(fmt, "{}", error),
        (Some(message), None) => fmt.write_str(message),
        (Some(message), Some(error)) => write!(fmt, "{}: {}", message, error),
    }
}
