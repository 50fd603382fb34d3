//! Bundled grammars
//!
//!     Small grammars written against the public context API. They double as worked
//!     examples for grammar authors and back the `parsec eval` command.

pub mod arithmetic;
