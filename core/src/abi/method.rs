use arc4_types::{Returns, Type, TypeError, TypeManager};
use tracing::debug;

use crate::abi::selector::{RETURN_PREFIX, SELECTOR_SIZE, Selector};
use crate::codec::Codec;
use crate::errors::{DecodeError, EncodeError, Error};
use crate::values::Value;
use crate::{String, ToString, Vec, format};

/// Arguments that fit in application args before packing kicks in.
const MAX_UNPACKED_ARGS: usize = 15;

/// A method argument. Names are informational; they are not part of the
/// signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg<'t> {
    pub name: Option<String>,
    pub ty: &'t Type<'t>,
}

impl<'t> Arg<'t> {
    pub fn new(name: impl Into<String>, ty: &'t Type<'t>) -> Self {
        Arg {
            name: Some(name.into()),
            ty,
        }
    }

    pub fn unnamed(ty: &'t Type<'t>) -> Self {
        Arg { name: None, ty }
    }
}

/// An ABI method: name, ordered arguments, and an optional return type
/// (`None` is `void`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method<'t> {
    name: String,
    args: Vec<Arg<'t>>,
    returns: Option<&'t Type<'t>>,
}

impl<'t> Method<'t> {
    pub fn new(
        name: impl Into<String>,
        args: impl IntoIterator<Item = Arg<'t>>,
        returns: Option<&'t Type<'t>>,
    ) -> Self {
        Method {
            name: name.into(),
            args: args.into_iter().collect(),
            returns,
        }
    }

    /// Build a method from `name(T1,...)R`. The return clause is required.
    pub fn parse(type_mgr: &'t TypeManager<'t>, signature: &str) -> Result<Self, TypeError> {
        let parsed = type_mgr.parse_signature(signature)?;
        let returns = match parsed.returns {
            Returns::Type(ty) => Some(ty),
            Returns::Void => None,
            Returns::Absent => {
                return Err(TypeError::Syntax {
                    input: signature.to_string(),
                    position: signature.len(),
                    message: "expected a return type or `void`".to_string(),
                });
            }
        };
        Ok(Method::new(
            parsed.name,
            parsed.params.into_iter().map(Arg::unnamed),
            returns,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Arg<'t>] {
        &self.args
    }

    pub fn returns(&self) -> Option<&'t Type<'t>> {
        self.returns
    }

    /// Canonical signature, e.g. `greet(string)string`.
    pub fn signature(&self) -> String {
        let args: Vec<String> = self.args.iter().map(|arg| arg.ty.to_string()).collect();
        let returns = match self.returns {
            Some(ty) => ty.to_string(),
            None => "void".to_string(),
        };
        format!("{}({}){}", self.name, args.join(","), returns)
    }

    pub fn selector(&self) -> Selector {
        Selector::of(&self.signature())
    }

    /// Number of arguments passed as their own application arg.
    fn inline_count(&self) -> usize {
        if self.args.len() > MAX_UNPACKED_ARGS {
            MAX_UNPACKED_ARGS - 1
        } else {
            self.args.len()
        }
    }

    fn packed_types(&self) -> Vec<&'t Type<'t>> {
        self.args[self.inline_count()..]
            .iter()
            .map(|arg| arg.ty)
            .collect()
    }

    /// Application args for a call: the selector, then one encoded argument
    /// each. Past fifteen arguments, the fifteenth and later go into one
    /// trailing tuple.
    pub fn encode_args(&self, codec: &Codec, values: &[Value]) -> Result<Vec<Vec<u8>>, Error> {
        if values.len() != self.args.len() {
            return Err(EncodeError::LengthMismatch {
                ty: self.signature(),
                expected: self.args.len(),
                found: values.len(),
            }
            .into());
        }
        let inline = self.inline_count();
        let mut app_args = Vec::with_capacity(inline + 2);
        app_args.push(self.selector().0.to_vec());
        for (arg, value) in self.args[..inline].iter().zip(values) {
            app_args.push(codec.encode(value, arg.ty)?);
        }
        if inline < self.args.len() {
            app_args.push(codec.encode_tuple(&self.packed_types(), &values[inline..])?);
        }
        debug!(method = %self.name, app_args = app_args.len(), "Encoded method call");
        Ok(app_args)
    }

    /// Inverse of [`Method::encode_args`]. The selector must match.
    pub fn decode_args<B: AsRef<[u8]>>(&self, codec: &Codec, app_args: &[B]) -> Result<Vec<Value>, Error> {
        let inline = self.inline_count();
        let packed = inline < self.args.len();
        let expected = 1 + inline + usize::from(packed);
        if app_args.len() != expected {
            return Err(DecodeError::ArgCount {
                expected,
                found: app_args.len(),
            }
            .into());
        }

        let selector = self.selector();
        let found = app_args[0].as_ref();
        if found != selector.as_bytes() {
            return Err(DecodeError::PrefixMismatch {
                expected: selector.to_string(),
                found: format!("0x{}", hex::encode(found)),
            }
            .into());
        }

        let mut values = Vec::with_capacity(self.args.len());
        for (arg, bytes) in self.args[..inline].iter().zip(&app_args[1..]) {
            values.push(codec.decode(bytes.as_ref(), arg.ty)?);
        }
        if packed {
            let tail = app_args[1 + inline].as_ref();
            values.extend(codec.decode_tuple(tail, &self.packed_types())?);
        }
        Ok(values)
    }

    /// The log entry carrying a return value: [`RETURN_PREFIX`] and the
    /// encoding.
    pub fn encode_return(&self, codec: &Codec, value: &Value) -> Result<Vec<u8>, Error> {
        let Some(ty) = self.returns else {
            return Err(EncodeError::TypeMismatch {
                expected: "void".to_string(),
                found: value.kind_name().to_string(),
            }
            .into());
        };
        let mut log = RETURN_PREFIX.to_vec();
        log.extend(codec.encode(value, ty)?);
        Ok(log)
    }

    pub fn decode_return(&self, codec: &Codec, log: &[u8]) -> Result<Value, Error> {
        let Some(ty) = self.returns else {
            return Err(DecodeError::WrongType {
                expected: "a method with a return value".to_string(),
                found: self.signature(),
            }
            .into());
        };
        match Selector::from_prefix(log) {
            Some(Selector(prefix)) if prefix == RETURN_PREFIX => {}
            _ => {
                return Err(DecodeError::PrefixMismatch {
                    expected: format!("0x{}", hex::encode(RETURN_PREFIX)),
                    found: format!("0x{}", hex::encode(&log[..log.len().min(SELECTOR_SIZE)])),
                }
                .into());
            }
        }
        Ok(codec.decode(&log[SELECTOR_SIZE..], ty)?)
    }
}
