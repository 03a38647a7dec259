//! Type-directed encoding and decoding.
//!
//! [`Codec`] is the entry point. It dispatches on the type descriptor and
//! recurses into composites:
//!
//! ```
//! use arc4_core::{Codec, Value};
//! use arc4_types::TypeManager;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let mgr = TypeManager::new(&arena);
//! let ty = mgr.parse("(uint8,string)").unwrap();
//!
//! let value = Value::Tuple(vec![Value::uint(8, 7u32).unwrap(), Value::from("hi")]);
//! let codec = Codec::default();
//! let bytes = codec.encode(&value, ty).unwrap();
//! assert_eq!(bytes, [7, 0, 3, 0, 2, b'h', b'i']);
//! assert_eq!(codec.decode(&bytes, ty).unwrap(), value);
//!
//! let view = codec.interpret(&bytes, ty, Default::default()).unwrap();
//! assert_eq!(view.at(1).unwrap().as_str().unwrap(), "hi");
//! ```

mod decode;
mod encode;
pub(crate) mod layout;
pub(crate) mod primitive;

use arc4_types::{Type, TypeManager};
use tracing::debug;

use crate::errors::{DecodeError, EncodeError, Error};
use crate::options::CodecOptions;
use crate::values::{Native, Value};
use crate::view::View;
use crate::{ToString, Vec};

use self::decode::Decoder;
use self::layout::Members;

/// Where bytes handed to the decoder came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    /// The bytes are the encoding itself.
    #[default]
    Plain,
    /// The bytes were emitted to a log and start with a selector or return
    /// prefix of [`CodecOptions::log_prefix_len`] bytes.
    Log,
}

/// Encoder/decoder configured with [`CodecOptions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    options: CodecOptions,
}

impl Codec {
    pub fn new(options: CodecOptions) -> Self {
        Codec { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn encode(&self, value: &Value, ty: &Type<'_>) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        encode::encode_into(&mut out, ty, value).inspect_err(|err| {
            debug!(ty = %ty, error = %err, "Encode failed");
        })?;
        debug!(ty = %ty, len = out.len(), "Encoded value");
        Ok(out)
    }

    /// Decode a complete encoding of `ty`.
    pub fn decode(&self, bytes: &[u8], ty: &Type<'_>) -> Result<Value, DecodeError> {
        self.decode_from(bytes, ty, Source::Plain)
    }

    pub fn decode_from(
        &self,
        bytes: &[u8],
        ty: &Type<'_>,
        source: Source,
    ) -> Result<Value, DecodeError> {
        let body = self.strip(bytes, source)?;
        debug!(ty = %ty, len = body.len(), ?source, "Decoding value");
        let (value, used) = Decoder::new(&self.options)
            .decode(body, ty)
            .inspect_err(|err| debug!(ty = %ty, error = %err, "Decode failed"))?;
        self.check_trailing(body, used, ty)?;
        Ok(value)
    }

    /// Wrap `bytes` in a lazy [`View`]. Only the top-level extent is checked
    /// up front; members are located and decoded when accessed.
    pub fn interpret<'b, 't>(
        &self,
        bytes: &'b [u8],
        ty: &'t Type<'t>,
        source: Source,
    ) -> Result<View<'b, 't>, DecodeError> {
        let body = self.strip(bytes, source)?;
        debug!(ty = %ty, len = body.len(), ?source, "Interpreting value");
        let used = layout::measure(body, ty)?;
        self.check_trailing(body, used, ty)?;
        Ok(View::new(ty, &body[..used], self.options))
    }

    /// Exact length of the `ty` encoding at the front of `bytes`.
    pub fn measure(&self, bytes: &[u8], ty: &Type<'_>) -> Result<usize, DecodeError> {
        layout::measure(bytes, ty)
    }

    /// Encode `values` as a tuple of `types` without interning a tuple type.
    pub fn encode_tuple(&self, types: &[&Type<'_>], values: &[Value]) -> Result<Vec<u8>, EncodeError> {
        if types.len() != values.len() {
            return Err(EncodeError::LengthMismatch {
                ty: "tuple".to_string(),
                expected: types.len(),
                found: values.len(),
            });
        }
        let mut out = Vec::new();
        encode::encode_members(&mut out, Members::List(types), values)?;
        debug!(members = types.len(), len = out.len(), "Encoded tuple");
        Ok(out)
    }

    pub fn decode_tuple(&self, bytes: &[u8], types: &[&Type<'_>]) -> Result<Vec<Value>, DecodeError> {
        let (values, used) = Decoder::new(&self.options)
            .decode_members(bytes, Members::List(types))
            .inspect_err(|err| debug!(error = %err, "Tuple decode failed"))?;
        self.check_trailing(bytes, used, "tuple")?;
        Ok(values)
    }

    /// Encode a Rust value through its [`Native`] type.
    pub fn encode_native<'a, T: Native>(
        &self,
        type_mgr: &'a TypeManager<'a>,
        value: T,
    ) -> Result<Vec<u8>, Error> {
        let ty = T::type_descr(type_mgr)?;
        Ok(self.encode(&value.into_value(), ty)?)
    }

    pub fn decode_native<'a, T: Native>(
        &self,
        type_mgr: &'a TypeManager<'a>,
        bytes: &[u8],
    ) -> Result<T, Error> {
        let ty = T::type_descr(type_mgr)?;
        Ok(T::from_value(self.decode(bytes, ty)?)?)
    }

    fn strip<'b>(&self, bytes: &'b [u8], source: Source) -> Result<&'b [u8], DecodeError> {
        match source {
            Source::Plain => Ok(bytes),
            Source::Log => {
                let prefix = self.options.log_prefix_len;
                primitive::ensure(bytes, prefix, "log prefix")?;
                Ok(&bytes[prefix..])
            }
        }
    }

    fn check_trailing(
        &self,
        bytes: &[u8],
        used: usize,
        ty: impl core::fmt::Display,
    ) -> Result<(), DecodeError> {
        if used < bytes.len() && !self.options.allow_trailing_bytes {
            return Err(DecodeError::TrailingBytes {
                ty: ty.to_string(),
                count: bytes.len() - used,
            });
        }
        Ok(())
    }
}

/// Decode the `ty` value at the front of `bytes`, ignoring anything after it.
pub(crate) fn decode_value(
    options: &CodecOptions,
    bytes: &[u8],
    ty: &Type<'_>,
) -> Result<Value, DecodeError> {
    Decoder::new(options)
        .decode(bytes, ty)
        .map(|(value, _)| value)
}

/// Encode with default options.
pub fn encode(value: &Value, ty: &Type<'_>) -> Result<Vec<u8>, EncodeError> {
    Codec::default().encode(value, ty)
}

/// Decode with default options.
pub fn decode(bytes: &[u8], ty: &Type<'_>) -> Result<Value, DecodeError> {
    Codec::default().decode(bytes, ty)
}

/// Interpret with default options.
pub fn interpret<'b, 't>(
    bytes: &'b [u8],
    ty: &'t Type<'t>,
    source: Source,
) -> Result<View<'b, 't>, DecodeError> {
    Codec::default().interpret(bytes, ty, source)
}

#[cfg(test)]
mod codec_test;
