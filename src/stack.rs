use core::fmt::{self, Write};
use core::iter;
use core::ops::Deref;
use core::slice;
use crate::utils;
use crate::frame::{Frame, Verb};
use crate::symbol::{self, SymbolResolver};



/// Maximum number of frames kept by a capture. Deeper stacks lose their outermost frames.
pub const MAX_DEPTH: usize = 32;

// best guess at the rendered length of one detailed frame, used to size the
// buffer up front; it doesn't need to be exact
pub const STACK_MIN_LEN: usize = 96;


/// Raw return addresses captured at one point in time, innermost call first.
///
/// Nothing is resolved at capture time. Convert to a [`StackTrace`] to inspect or
/// format individual frames.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Stack {
    pcs: Box<[usize]>,
}

impl Stack {
    /// Capture the call stack of the caller. The first frame is the call to `capture()`.
    #[inline(never)]
    pub fn capture() -> Self {
        callers(Self::capture as usize)
    }

    /// Build a stack from previously captured handles, keeping at most [`MAX_DEPTH`].
    pub fn from_handles(handles: impl IntoIterator<Item=usize>) -> Self {
        Self {
            pcs: handles.into_iter().take(MAX_DEPTH).collect(),
        }
    }

    pub fn len(&self) -> usize { self.pcs.len() }

    pub fn is_empty(&self) -> bool { self.pcs.is_empty() }

    pub fn handles(&self) -> &[usize] { &self.pcs }

    pub fn frames(&self) -> impl Iterator<Item=Frame> + '_ {
        self.pcs.iter().copied().map(Frame::new)
    }

    pub fn stack_trace(&self) -> StackTrace {
        self.frames().collect()
    }

    /// Write every frame on its own line in the detailed composite form.
    ///
    /// The text is assembled in one buffer and handed to `out` in a single write.
    pub fn write_detailed<W, R>(&self, out: &mut W, resolver: &R) -> fmt::Result
    where W: Write + ?Sized, R: SymbolResolver + ?Sized {
        let mut buf = String::with_capacity(self.len() * STACK_MIN_LEN);
        for frame in self.frames() {
            buf.push('\n');
            frame.write_to(&mut buf, resolver, Verb::Composite, true)?;
        }
        out.write_str(&buf)
    }
}

/// Only the detailed form (`{:+}`) produces output, see [`Stack::write_detailed`].
/// The plain form is empty so that one-line error messages don't pick up a trace.
impl fmt::Display for Stack {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        if fmt.sign_plus() {
            self.write_detailed(fmt, symbol::default_resolver())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_list().entries(self.frames()).finish()
    }
}


// walk the stack, dropping the unwinder's frames, this function, and the public
// entry point that called it
#[inline(never)]
pub(crate) fn callers(entry: usize) -> Stack {
    let mut filter = CaptureFilter::new(callers as usize, entry);
    backtrace::trace(|frame| {
        filter.push(frame.ip() as usize, frame.symbol_address() as usize)
    });
    filter.finish()
}

// Trims a raw frame walk down to the frames above the capture entry point.
//
// Frames are identified by the start address of their enclosing function. The entry
// point is only dropped when it sits directly above `own`; if it was tail-called away
// the next frame already belongs to the caller.
pub(crate) struct CaptureFilter {
    own: usize,
    entry: usize,
    anchored: bool,
    pcs: Vec<usize>,
}

impl CaptureFilter {
    pub(crate) fn new(own: usize, entry: usize) -> Self {
        Self {
            own,
            entry,
            anchored: false,
            pcs: Vec::with_capacity(MAX_DEPTH),
        }
    }

    /// Returns false once enough frames have been kept.
    pub(crate) fn push(&mut self, ip: usize, symbol: usize) -> bool {
        if !self.anchored && symbol == self.own {
            // everything collected so far belongs to the unwinder
            self.anchored = true;
            self.pcs.clear();
            return true;
        }

        if self.anchored && self.pcs.is_empty() && symbol == self.entry {
            return true;
        }

        self.pcs.push(ip);
        !self.anchored || self.pcs.len() < MAX_DEPTH
    }

    pub(crate) fn finish(mut self) -> Stack {
        if !self.anchored {
            log::debug!("capture frame not found, keeping {} unwinder frames", self.pcs.len());
        }

        self.pcs.truncate(MAX_DEPTH);

        log::trace!("captured {} frames", self.pcs.len());
        Stack { pcs: self.pcs.into_boxed_slice() }
    }
}


/// Stack of [`Frame`]s from innermost (newest) to outermost (oldest).
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct StackTrace {
    frames: Vec<Frame>,
}

impl StackTrace {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[Frame] { &self.frames }

    /// Write the trace according to `verb`.
    ///
    /// Frames are written as a bracketed, space separated list, each frame formatted with
    /// `verb` and `detailed`. The detailed composite form is a vertical listing instead:
    /// each frame on a new line, with no brackets.
    pub fn write_to<W, R>(&self, out: &mut W, resolver: &R, verb: Verb, detailed: bool) -> fmt::Result
    where W: Write + ?Sized, R: SymbolResolver + ?Sized {
        if detailed && verb == Verb::Composite {
            for frame in self.iter() {
                out.write_char('\n')?;
                frame.write_to(out, resolver, verb, detailed)?;
            }
            return Ok(());
        }

        out.write_char('[')?;
        for (idx, frame) in self.iter().enumerate() {
            if idx > 0 {
                out.write_char(' ')?;
            }
            frame.write_to(out, resolver, verb, detailed)?;
        }
        out.write_char(']')
    }

    pub fn render<R>(&self, resolver: &R, verb: Verb, detailed: bool) -> String where R: SymbolResolver + ?Sized {
        let mut buf = String::with_capacity(self.len() * STACK_MIN_LEN);
        // writing to a String can't fail
        let _ = self.write_to(&mut buf, resolver, verb, detailed);
        buf
    }

    /// `Display` adapter using the default resolver. The `+` flag (`{:+}`) selects the
    /// detailed form.
    pub fn display(&self, verb: Verb) -> impl fmt::Display + '_ {
        self.display_with(symbol::default_resolver(), verb)
    }

    pub fn display_with<'a, R>(&'a self, resolver: &'a R, verb: Verb) -> impl fmt::Display + 'a where R: SymbolResolver + ?Sized {
        utils::delegate_fmt(move |fmt| {
            let detailed = fmt.sign_plus();
            self.write_to(fmt, resolver, verb, detailed)
        })
    }
}

/// Formats as `[file:line file:line ...]`, or with `{:+}` as one detailed frame per line,
/// using the default resolver.
impl fmt::Display for StackTrace {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detailed = fmt.sign_plus();
        self.write_to(fmt, symbol::default_resolver(), Verb::Composite, detailed)
    }
}

impl fmt::Debug for StackTrace {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_list().entries(self.frames.iter()).finish()
    }
}

impl Deref for StackTrace {
    type Target = [Frame];
    fn deref(&self) -> &[Frame] { &self.frames }
}

impl From<Vec<Frame>> for StackTrace {
    fn from(frames: Vec<Frame>) -> Self { Self::new(frames) }
}

impl From<&Stack> for StackTrace {
    fn from(stack: &Stack) -> Self { stack.stack_trace() }
}

impl iter::FromIterator<Frame> for StackTrace {
    fn from_iter<T>(iter: T) -> Self where T: IntoIterator<Item=Frame> {
        Self { frames: iter.into_iter().collect() }
    }
}

impl IntoIterator for StackTrace {
    type Item = Frame;
    type IntoIter = std::vec::IntoIter<Frame>;
    fn into_iter(self) -> Self::IntoIter { self.frames.into_iter() }
}

impl<'a> IntoIterator for &'a StackTrace {
    type Item = &'a Frame;
    type IntoIter = slice::Iter<'a, Frame>;
    fn into_iter(self) -> Self::IntoIter { self.frames.iter() }
}
