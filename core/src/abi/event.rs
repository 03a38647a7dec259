use arc4_types::{Returns, Type, TypeError, TypeManager};

use crate::abi::selector::{SELECTOR_SIZE, Selector};
use crate::codec::{Codec, Source};
use crate::errors::{DecodeError, EncodeError};
use crate::values::Value;
use crate::view::View;
use crate::{String, ToString, Vec, format};

/// A log event: a name and the struct (or tuple) it carries.
///
/// The log entry is the event selector followed by the tuple encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<'t> {
    name: String,
    ty: &'t Type<'t>,
}

impl<'t> Event<'t> {
    /// Event carrying `ty`. Returns `None` unless `ty` is a tuple or struct.
    pub fn new(name: impl Into<String>, ty: &'t Type<'t>) -> Option<Self> {
        ty.fields()?;
        Some(Event {
            name: name.into(),
            ty,
        })
    }

    /// Build an event from `Name(T1,...)`. A return clause is rejected.
    pub fn parse(type_mgr: &'t TypeManager<'t>, signature: &str) -> Result<Self, TypeError> {
        let parsed = type_mgr.parse_signature(signature)?;
        if parsed.returns != Returns::Absent {
            return Err(TypeError::Syntax {
                input: signature.to_string(),
                position: signature.len(),
                message: "events have no return type".to_string(),
            });
        }
        Ok(Event {
            name: parsed.name.to_string(),
            ty: type_mgr.tuple(parsed.params)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &'t Type<'t> {
        self.ty
    }

    /// Canonical signature, e.g. `Swapped(address,uint64)`.
    pub fn signature(&self) -> String {
        format!("{}{}", self.name, self.ty)
    }

    pub fn selector(&self) -> Selector {
        Selector::of(&self.signature())
    }

    /// The log entry for `value`.
    pub fn encode(&self, codec: &Codec, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let mut log = self.selector().0.to_vec();
        log.extend(codec.encode(value, self.ty)?);
        Ok(log)
    }

    /// Decode a log entry. The selector is always [`SELECTOR_SIZE`] bytes,
    /// whatever the codec's `log_prefix_len`.
    pub fn decode(&self, codec: &Codec, log: &[u8]) -> Result<Value, DecodeError> {
        self.check_selector(log)?;
        codec.decode_from(&log[SELECTOR_SIZE..], self.ty, Source::Plain)
    }

    /// Zero-copy view of a log entry's payload.
    pub fn interpret<'b>(&self, codec: &Codec, log: &'b [u8]) -> Result<View<'b, 't>, DecodeError> {
        self.check_selector(log)?;
        codec.interpret(&log[SELECTOR_SIZE..], self.ty, Source::Plain)
    }

    fn check_selector(&self, log: &[u8]) -> Result<(), DecodeError> {
        let expected = self.selector();
        if Selector::from_prefix(log) != Some(expected) {
            return Err(DecodeError::PrefixMismatch {
                expected: expected.to_string(),
                found: format!("0x{}", hex::encode(&log[..log.len().min(SELECTOR_SIZE)])),
            });
        }
        Ok(())
    }
}
