
/// Reduce a fully-qualified function name to the name of the function alone.
///
/// The import path is dropped first (everything up to the last `/`). What remains is
/// either a `::` separated path, where the last segment outside of any `<...>` is kept
/// once a trailing `::<...>` argument list is dropped, or a dotted
/// `package.Receiver.Function` name, where everything up to the last dot is dropped.
///
/// ```
/// use errstack::short_name;
///
/// assert_eq!(short_name("github.com/example/pkg.(*Type).Method"), "Method");
/// assert_eq!(short_name("<alloc::vec::Vec<T> as core::ops::drop::Drop>::drop"), "drop");
/// assert_eq!(short_name("core::mem::swap::<u8>"), "swap");
/// assert_eq!(short_name("main"), "main");
/// ```
///
/// Names with no separator left after the import path are returned as they are.
pub fn short_name(name: &str) -> &str {
    let name = match name.rfind('/') {
        Some(idx) => &name[idx + 1..],
        None => name,
    };

    let name = strip_generic_args(name);
    if let Some(idx) = last_path_separator(name) {
        return &name[idx + 2..];
    }

    match name.rfind('.') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

// drop a trailing "::<...>" group, as in "core::mem::swap::<u8>"
fn strip_generic_args(name: &str) -> &str {
    let bytes = name.as_bytes();
    if bytes.last() != Some(&b'>') {
        return name;
    }

    let mut depth = 0usize;
    let mut idx = bytes.len();
    while idx > 0 {
        idx -= 1;
        match bytes[idx] {
            b'>' if idx == 0 || bytes[idx - 1] != b'-' => depth += 1,
            b'<' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return match name[..idx].strip_suffix("::") {
                        Some(path) => path,
                        None => name,
                    };
                }
            },
            _ => { },
        }
    }
    name
}

// byte index of the last "::" that is not nested inside angle brackets
fn last_path_separator(name: &str) -> Option<usize> {
    let bytes = name.as_bytes();
    let mut depth = 0usize;

    let mut idx = bytes.len();
    while idx > 1 {
        idx -= 1;
        match bytes[idx] {
            // "->" in fn pointer types doesn't close anything
            b'>' if bytes[idx - 1] != b'-' => depth += 1,
            b'<' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes[idx - 1] == b':' => return Some(idx - 1),
            _ => { },
        }
    }
    None
}
