//! ARC-4 type descriptors.
//!
//! Types are interned in a [`bumpalo`] arena by a [`TypeManager`], which makes
//! type equality a pointer comparison and lets the codec query cached layout
//! facts (dynamic or static, encoded size, bool packing) without recursion.
//!
//! # Example
//!
//! ```
//! use arc4_types::TypeManager;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let mgr = TypeManager::new(&arena);
//!
//! let ty = mgr.parse("(uint64,string)[]").unwrap();
//! assert!(core::ptr::eq(ty, mgr.dynamic_array(mgr.tuple([mgr.uint64(), mgr.string()]).unwrap())));
//! assert_eq!(ty.to_string(), "(uint64,string)[]");
//! ```

mod error;
mod manager;
mod parser;
mod ty;

pub use error::TypeError;
pub use manager::{MAX_PRECISION, TypeManager, is_valid_bit_width};
pub use parser::{Returns, Signature};
pub use ty::{Field, Type, TypeFlags, TypeKind};
