//! Call stack capture for error values.
//!
//! A [`Stack`] is captured once, when an error is created, and holds nothing but raw
//! return addresses. Symbol names and source locations are only looked up when the
//! trace is formatted, through a [`SymbolResolver`].
//!
//! ```no_run
//! use errstack::{Stack, Verb, BacktraceResolver};
//!
//! let trace = Stack::capture().stack_trace();
//! println!("{}", trace);                 // [main.rs:4 ...]
//! println!("{:+}", trace);               // one frame per line, with function names
//! println!("{}", trace.render(&BacktraceResolver, Verb::Name, false));
//! ```

#[macro_use]
mod macros;

pub mod utils;

pub mod symbol;
pub mod frame;
pub mod stack;
pub mod errors;


pub use symbol::{
    Location, SymbolResolver, BacktraceResolver, TableResolver, CachingResolver,
    install_resolver, default_resolver, short_name, UNKNOWN,
};
pub use frame::{Frame, Verb};
pub use stack::{Stack, StackTrace, MAX_DEPTH};
pub use errors::TracedError;
