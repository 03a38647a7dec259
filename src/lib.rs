//! ARC-4 - the Algorand ABI value codec
//!
//! # Overview
//!
//! ARC-4 is the binary format smart contracts on Algorand use for method
//! arguments, return values, events and structured storage. This crate
//! converts between typed values and that format. Common uses include:
//!
//! - Building and parsing application call arguments
//! - Reading method return values and events out of transaction logs
//! - Decoding box and global state that holds encoded structs
//!
//! # Quick Start
//!
//! ```
//! use arc4::{Bump, Codec, Source, TypeManager, Value};
//!
//! // Types live in an arena and are interned by the manager.
//! let arena = Bump::new();
//! let types = TypeManager::new(&arena);
//! let ty = types.parse("(uint64,string)").unwrap();
//!
//! let codec = Codec::default();
//! let value = Value::Tuple(vec![Value::uint(64, 7u32).unwrap(), Value::from("hi")]);
//! let bytes = codec.encode(&value, ty).unwrap();
//! assert_eq!(bytes, [0, 0, 0, 0, 0, 0, 0, 7, 0, 10, 0, 2, b'h', b'i']);
//!
//! // Eager decoding and zero-copy reads agree.
//! assert_eq!(codec.decode(&bytes, ty).unwrap(), value);
//! let view = codec.interpret(&bytes, ty, Source::Plain).unwrap();
//! assert_eq!(view.at(1).unwrap().as_str().unwrap(), "hi");
//! ```
//!
//! # API Tiers
//!
//! - [`TypeManager`] parses and interns type descriptors.
//! - [`Codec`] encodes [`Value`]s and decodes bytes, eagerly or as a [`View`].
//! - [`Method`] and [`Event`] add selectors and log prefixes on top.
//! - [`Native`] maps plain Rust types onto ARC-4 types.

pub use arc4_core::{
    Address, Arg, Codec, CodecOptions, DecodeError, EncodeError, Error, Event, IndexError,
    Method, Native, RETURN_PREFIX, RangeError, SELECTOR_SIZE, Selector, Source, UFixed, Uint,
    Value, View, decode, encode, interpret,
};
pub use arc4_types::{
    Field, MAX_PRECISION, Returns, Signature, Type, TypeError, TypeFlags, TypeKind, TypeManager,
    is_valid_bit_width,
};
pub use bumpalo::Bump;
