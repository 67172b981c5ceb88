use std::fmt;
use std::error::Error;
use once_cell::sync::OnceCell;
use crate::utils;

pub mod resolver;
mod funcname;


pub use resolver::{BacktraceResolver, TableResolver, CachingResolver};
pub use funcname::short_name;


/// Placeholder for anything the resolver could not recover.
pub const UNKNOWN: &str = "unknown";


// Resolved Locations

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub function: String,
    pub file: String,
    pub line: u32,
}

impl Location {
    pub fn new(function: impl ToString, file: impl ToString, line: u32) -> Self {
        Location {
            function: function.to_string(),
            file: file.to_string(),
            line,
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN, 0)
    }

    pub fn is_unknown(&self) -> bool { self.function == UNKNOWN }

    /// base name of the source file
    pub fn file_name(&self) -> &str { utils::base_name(&self.file) }

    pub fn short_name(&self) -> &str { short_name(&self.function) }
}

impl fmt::Display for Location {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{} {}:{}", self.function, self.file, self.line)
    }
}


// Symbol Resolution

/// Maps an instruction address to the source location it was compiled from.
///
/// Implementations must be pure: resolving the same address twice yields the same result.
pub trait SymbolResolver {
    /// `pc` is the address of the instruction itself, not a return address.
    /// Returns `None` when there is no metadata for the address.
    fn resolve(&self, pc: usize) -> Option<Location>;
}

impl<R> SymbolResolver for &R where R: SymbolResolver + ?Sized {
    fn resolve(&self, pc: usize) -> Option<Location> {
        (**self).resolve(pc)
    }
}

impl<R> SymbolResolver for Box<R> where R: SymbolResolver + ?Sized {
    fn resolve(&self, pc: usize) -> Option<Location> {
        (**self).resolve(pc)
    }
}


// Default Resolver

pub type SharedResolver = dyn SymbolResolver + Send + Sync;

static DEFAULT_RESOLVER: OnceCell<Box<SharedResolver>> = OnceCell::new();

/// Set the resolver used by the `Display` implementations of frames, traces and errors.
///
/// This can only happen once, and only before anything has been formatted with the
/// default resolver. Later calls leave the existing resolver in place.
pub fn install_resolver<R>(resolver: R) -> Result<(), ResolverInstalled> where R: SymbolResolver + Send + Sync + 'static {
    DEFAULT_RESOLVER.set(Box::new(resolver))
        .map_err(|_| ResolverInstalled)?;

    log::debug!("installed default symbol resolver");
    Ok(())
}

/// The process-wide resolver, a [`BacktraceResolver`] unless another one was installed.
pub fn default_resolver() -> &'static SharedResolver {
    &**DEFAULT_RESOLVER.get_or_init(|| Box::new(BacktraceResolver) as Box<SharedResolver>)
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverInstalled;

impl Error for ResolverInstalled { }

impl fmt::Display for ResolverInstalled {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str("a default symbol resolver is already in use")
    }
}
