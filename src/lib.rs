//! # parsec-engine
//!
//! A context-driven recursive-descent parsing engine: a regex tokenizer feeding a
//! stack of named, stateful contexts that share one token cursor.
//!
//! ```rust,ignore
//! use parsec_engine::parsec::grammars::arithmetic;
//!
//! assert_eq!(arithmetic::evaluate("6 * (2 / 3)")?, 4.0);
//! ```

pub mod parsec;
