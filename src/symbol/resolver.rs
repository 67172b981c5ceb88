// Symbol Resolution

use core::iter;
use core::ffi::c_void;

use std::collections::HashMap;
use std::sync::{RwLock, PoisonError};

use ahash::RandomState;

use crate::symbol::{Location, SymbolResolver, UNKNOWN};


pub type AddressMap<V> = HashMap<usize, V, RandomState>;


/// Resolves addresses in the running process from its own debug information.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceResolver;

impl SymbolResolver for BacktraceResolver {
    fn resolve(&self, pc: usize) -> Option<Location> {
        if pc == 0 {
            return None;
        }

        // backtrace::resolve() takes a return address and steps back one byte on its own,
        // so hand it the address the frame was captured with
        let addr = pc.wrapping_add(1) as *mut c_void;

        let mut location = None;
        backtrace::resolve(addr, |symbol| {
            // inlined calls are reported innermost first, keep the innermost
            if location.is_some() {
                return;
            }

            // the alternate form leaves off the legacy "::h<hash>" suffix
            let function = symbol.name().map(|name| format!("{:#}", name));
            let file = symbol.filename().map(|path| path.display().to_string());
            if function.is_none() && file.is_none() {
                return;
            }

            location = Some(Location {
                function: function.unwrap_or_else(|| UNKNOWN.to_string()),
                file: file.unwrap_or_else(|| UNKNOWN.to_string()),
                line: symbol.lineno().unwrap_or(0),
            });
        });

        if location.is_none() {
            log::debug!("{:#X} no symbol information", pc);
        }
        location
    }
}

/// Resolves addresses from a fixed table.
///
/// Lookups are exact: only the addresses inserted into the table resolve. Useful for
/// replaying traces recorded elsewhere and for tests.
#[derive(Debug, Clone, Default)]
pub struct TableResolver {
    table: AddressMap<Location>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self { table: AddressMap::default() }
    }

    pub fn insert(&mut self, pc: usize, location: Location) {
        self.table.insert(pc, location);
    }

    pub fn with(mut self, pc: usize, location: Location) -> Self {
        self.insert(pc, location);
        self
    }

    pub fn len(&self) -> usize { self.table.len() }

    pub fn is_empty(&self) -> bool { self.table.is_empty() }
}

impl iter::FromIterator<(usize, Location)> for TableResolver {
    fn from_iter<T>(iter: T) -> Self where T: IntoIterator<Item=(usize, Location)> {
        Self {
            table: iter.into_iter().collect(),
        }
    }
}

impl SymbolResolver for TableResolver {
    fn resolve(&self, pc: usize) -> Option<Location> {
        self.table.get(&pc).cloned()
    }
}


/// Memoizes another resolver by address.
///
/// Misses are cached too, so an address without metadata is only looked up once.
/// The cache is unbounded and never evicts: that is fine for the addresses of one
/// running process, but replaying arbitrary handles grows it by one entry per
/// distinct address. Call [`CachingResolver::clear`] to release it.
#[derive(Debug, Default)]
pub struct CachingResolver<R> {
    inner: R,
    cache: RwLock<AddressMap<Option<Location>>>,
}

impl<R> CachingResolver<R> where R: SymbolResolver {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: RwLock::new(AddressMap::default()),
        }
    }

    pub fn inner(&self) -> &R { &self.inner }

    /// number of addresses cached so far, including misses
    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn clear(&self) {
        self.cache.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl<R> SymbolResolver for CachingResolver<R> where R: SymbolResolver {
    fn resolve(&self, pc: usize) -> Option<Location> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = cache.get(&pc) {
                return cached.clone();
            }
        }

        let location = self.inner.resolve(pc);
        log::trace!("{:#X} cached symbol lookup", pc);

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache.entry(pc).or_insert(location).clone()
    }
}
