use core::fmt::{self, Write};
use static_assertions::const_assert_eq;
use crate::utils;
use crate::symbol::{self, Location, SymbolResolver, UNKNOWN};

mod tests;


// frames are stored by value in every captured stack
const_assert_eq!(core::mem::size_of::<Frame>(), core::mem::size_of::<usize>());


/// A program counter inside a stack frame.
///
/// For historical reasons the stored handle is the *return address* of the call, which
/// points just past the call instruction. [`Frame::pc`] gives the address of the call
/// itself, which is what gets resolved. Frames are plain values: two frames with the
/// same handle are equal and resolve identically.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frame(usize);

impl Frame {
    pub const fn new(handle: usize) -> Self { Frame(handle) }

    #[inline]
    pub const fn handle(self) -> usize { self.0 }

    /// The program counter for this frame. Multiple frames may share a pc.
    #[inline]
    pub const fn pc(self) -> usize { self.0.wrapping_sub(1) }

    /// Look up the source location of this frame.
    ///
    /// This is never cached by the frame. Addresses without metadata give
    /// [`Location::unknown()`].
    pub fn resolve<R>(self, resolver: &R) -> Location where R: SymbolResolver + ?Sized {
        if self.0 == 0 {
            return Location::unknown();
        }
        resolver.resolve(self.pc()).unwrap_or_else(Location::unknown)
    }

    /// Write this frame according to `verb`.
    ///
    /// | verb        | plain          | detailed                          |
    /// |-------------|----------------|-----------------------------------|
    /// | `File`      | file base name | function name, `\n\t`, full path  |
    /// | `Line`      | line number    | line number                       |
    /// | `Name`      | short name     | short name                        |
    /// | `Composite` | `File:Line`    | detailed `File`, then `:Line`     |
    pub fn write_to<W, R>(self, out: &mut W, resolver: &R, verb: Verb, detailed: bool) -> fmt::Result
    where W: Write + ?Sized, R: SymbolResolver + ?Sized {
        let location = self.resolve(resolver);
        write_location(out, &location, verb, detailed)
    }

    pub fn render<R>(self, resolver: &R, verb: Verb, detailed: bool) -> String where R: SymbolResolver + ?Sized {
        let mut buf = String::new();
        // writing to a String can't fail
        let _ = self.write_to(&mut buf, resolver, verb, detailed);
        buf
    }

    /// Render using a verb character (`s`, `d`, `n` or `v`).
    ///
    /// Unrecognised characters render as an empty string.
    pub fn render_verb<R>(self, resolver: &R, verb: char, detailed: bool) -> String where R: SymbolResolver + ?Sized {
        match Verb::from_char(verb) {
            Some(verb) => self.render(resolver, verb, detailed),
            None => String::new(),
        }
    }

    /// `Display` adapter using the default resolver. The `+` flag (`{:+}`) selects the
    /// detailed form.
    pub fn display(self, verb: Verb) -> impl fmt::Display {
        self.display_with(symbol::default_resolver(), verb)
    }

    pub fn display_with<'r, R>(self, resolver: &'r R, verb: Verb) -> impl fmt::Display + 'r where R: SymbolResolver + ?Sized {
        utils::delegate_fmt(move |fmt| {
            let detailed = fmt.sign_plus();
            self.write_to(fmt, resolver, verb, detailed)
        })
    }

    /// Same content as the detailed composite form, on a single line:
    /// `"<function> <file>:<line>"`, or just `"unknown"` if the function is unknown.
    pub fn marshal_text_with<R>(self, resolver: &R) -> String where R: SymbolResolver + ?Sized {
        let location = self.resolve(resolver);
        if location.function == UNKNOWN {
            return location.function;
        }
        location.to_string()
    }

    pub fn marshal_text(self) -> String {
        self.marshal_text_with(symbol::default_resolver())
    }
}

fn write_location<W>(out: &mut W, location: &Location, verb: Verb, detailed: bool) -> fmt::Result where W: Write + ?Sized {
    match verb {
        Verb::File if detailed => {
            out.write_str(&location.function)?;
            out.write_str("\n\t")?;
            out.write_str(&location.file)
        },
        Verb::File => out.write_str(location.file_name()),
        Verb::Line => write!(out, "{}", location.line),
        Verb::Name => out.write_str(location.short_name()),
        Verb::Composite => {
            write_location(out, location, Verb::File, detailed)?;
            out.write_char(':')?;
            write_location(out, location, Verb::Line, detailed)
        },
    }
}

/// Formats as `file:line`, or with `{:+}` as `function\n\tpath:line`, using the default resolver.
impl fmt::Display for Frame {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detailed = fmt.sign_plus();
        self.write_to(fmt, symbol::default_resolver(), Verb::Composite, detailed)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "Frame({:#x})", self.0)
    }
}

impl From<usize> for Frame {
    fn from(handle: usize) -> Self { Frame(handle) }
}


/// What part of a frame to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verb {
    /// source file (`s`)
    File,
    /// source line (`d`)
    Line,
    /// short function name (`n`)
    Name,
    /// `file:line` (`v`)
    #[default]
    Composite,
}

impl Verb {
    pub fn from_char(verb: char) -> Option<Self> {
        let verb = match verb {
            's' => Self::File,
            'd' => Self::Line,
            'n' => Self::Name,
            'v' => Self::Composite,
            _ => return None,
        };
        Some(verb)
    }

    pub fn as_char(self) -> char {
        match self {
            Self::File => 's',
            Self::Line => 'd',
            Self::Name => 'n',
            Self::Composite => 'v',
        }
    }
}
