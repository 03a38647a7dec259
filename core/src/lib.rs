#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

//! ARC-4 ABI codec: values, type-directed encoding and decoding, zero-copy
//! views, and method/event framing.

extern crate alloc;

// Re-export for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use alloc::{boxed::Box, format, string::String, string::ToString, vec, vec::Vec};

pub mod abi;
pub mod codec;
pub mod errors;
pub mod options;
pub mod values;
pub mod view;

pub use abi::{Arg, Event, Method, RETURN_PREFIX, SELECTOR_SIZE, Selector};
pub use codec::{Codec, Source, decode, encode, interpret};
pub use errors::{DecodeError, EncodeError, Error, IndexError, RangeError};
pub use options::CodecOptions;
pub use values::{Address, Native, UFixed, Uint, Value};
pub use view::View;
