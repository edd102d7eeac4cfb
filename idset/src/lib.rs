//! Dense integer-set engine: a van-Emde-Boas-layered bit tree plus a
//! compressed textual codec, used throughout the broker runtime for
//! rank lists, host-range expansion, and event addressing.
//!
//! - [`BitTree`], the raw dense set of `u32` ids.
//! - [`Idset`], a [`BitTree`] plus its creation-time autogrow flag, the
//!   value type callers actually hold.
//! - [`decode`]/[`encode`]/[`format_first`], the textual grammar.
//! - [`format_map`], brace-expansion over embedded idset groups.
//!
//! This crate is pure algorithm: no I/O, no logging, no async. The
//! null-idset sentinels the historical C API exposes (`count(NULL) ==
//! 0`, etc.) live on `Option<&Idset>` via the `*_opt` free functions
//! and [`equal`], rather than on `Idset` itself, which is never null.

mod bittree;
mod bracemap;
mod codec;
mod error;
mod set;

pub use bittree::{BitTree, BitTreeIter, INVALID_ID};
pub use bracemap::format_map;
pub use codec::{decode, encode, format_first, format_first_into};
pub use error::{IdsetError, Result};
pub use set::{count_opt, equal, first_opt, last_opt, next_opt, Idset, IdsetFlags};
