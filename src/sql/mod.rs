//! SQL text emission.
//!
//! A single formatting boundary for every byte of SQL the crate produces:
//! statements are composed as [`token::TokenStream`]s and serialized once.

pub mod token;

pub use token::{Token, TokenStream};
