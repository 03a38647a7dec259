use bitflags::bitflags;
use core::fmt;
use core::hash::{Hash, Hasher};

bitflags! {
    /// Flags indicating various properties of a type.
    ///
    /// These flags are computed once when a type is interned and cached
    /// for efficient queries. The codec asks "is this dynamic?" for every
    /// member while building an offset table, so it must never recurse.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct TypeFlags: u8 {
        /// The encoding carries its own length (prefix or offset slot).
        const DYNAMIC = 1;
        /// The type is `bool` and bit-packs with adjacent bools in composites.
        const BOOL = 1 << 1;
    }
}

/// A member of a tuple. Struct fields carry a name, plain tuple members don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field<'a> {
    pub name: Option<&'a str>,
    pub ty: &'a Type<'a>,
}

/// Logical structure of an ABI type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind<'a> {
    /// `uint<bits>`: big-endian, `bits / 8` bytes.
    Uint { bits: u16 },

    /// `ufixed<bits>x<precision>`: same bytes as `uint<bits>`, value is raw / 10^precision.
    UFixed { bits: u16, precision: u8 },

    Bool,

    /// `byte`: an 8-bit unsigned integer with its own canonical name.
    Byte,

    /// 32 raw bytes.
    Address,

    /// `byte[]`: 2-byte length prefix followed by the bytes.
    Bytes,

    /// UTF-8 text, laid out like `byte[]`.
    String,

    /// `T[N]`: element count is part of the type.
    StaticArray { elem: &'a Type<'a>, len: usize },

    /// `T[]`: element count is carried in the encoding.
    DynamicArray(&'a Type<'a>),

    /// `(T1,T2,...)`. A struct is a tuple whose fields are all named.
    Tuple(&'a [Field<'a>]),
}

/// Flags and static size of `elem[len]`, or `None` if the head overflows.
pub(crate) fn array_layout(elem: &Type<'_>, len: usize) -> Option<(TypeFlags, usize)> {
    if elem.is_dynamic() {
        len.checked_mul(2)?;
        Some((TypeFlags::DYNAMIC, 0))
    } else if elem.is_bool() {
        Some((TypeFlags::empty(), len.div_ceil(8)))
    } else {
        Some((TypeFlags::empty(), len.checked_mul(elem.size)?))
    }
}

/// Flags and static size of a tuple, or `None` if the head overflows.
pub(crate) fn tuple_layout(fields: &[Field<'_>]) -> Option<(TypeFlags, usize)> {
    let mut flags = TypeFlags::empty();
    let mut head = 0usize;
    let mut bool_run = 0usize;
    for field in fields {
        if field.ty.is_bool() {
            if bool_run % 8 == 0 {
                head = head.checked_add(1)?;
            }
            bool_run += 1;
            continue;
        }
        bool_run = 0;
        if field.ty.is_dynamic() {
            flags |= TypeFlags::DYNAMIC;
            head = head.checked_add(2)?;
        } else {
            head = head.checked_add(field.ty.size)?;
        }
    }
    let size = if flags.contains(TypeFlags::DYNAMIC) { 0 } else { head };
    Some((flags, size))
}

/// An interned ABI type: kind + cached layout properties.
///
/// Types are only created through [`crate::TypeManager`], which guarantees
/// that structurally equal types share one allocation.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Type<'a> {
    kind: TypeKind<'a>,
    flags: TypeFlags,
    size: usize,
}

impl<'a> Type<'a> {
    pub(crate) fn new(kind: TypeKind<'a>, flags: TypeFlags, size: usize) -> Self {
        Type { kind, flags, size }
    }

    pub fn kind(&self) -> &TypeKind<'a> {
        &self.kind
    }

    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    pub fn is_dynamic(&self) -> bool {
        self.flags.contains(TypeFlags::DYNAMIC)
    }

    pub fn is_bool(&self) -> bool {
        self.flags.contains(TypeFlags::BOOL)
    }

    /// Encoded size in bytes, or `None` if the type is dynamic.
    pub fn static_size(&self) -> Option<usize> {
        if self.is_dynamic() {
            None
        } else {
            Some(self.size)
        }
    }

    /// Fields of a tuple or struct type.
    pub fn fields(&self) -> Option<&'a [Field<'a>]> {
        match self.kind {
            TypeKind::Tuple(fields) => Some(fields),
            _ => None,
        }
    }

    /// Position of the named field, for struct types.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields()?
            .iter()
            .position(|field| field.name == Some(name))
    }

    /// Element type of a static or dynamic array. `byte[]` reports `None`
    /// since its element type is implied.
    pub fn elem(&self) -> Option<&'a Type<'a>> {
        match self.kind {
            TypeKind::StaticArray { elem, .. } | TypeKind::DynamicArray(elem) => Some(elem),
            _ => None,
        }
    }
}

impl fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Uint { bits } => write!(f, "uint{}", bits),
            TypeKind::UFixed { bits, precision } => write!(f, "ufixed{}x{}", bits, precision),
            TypeKind::Bool => write!(f, "bool"),
            TypeKind::Byte => write!(f, "byte"),
            TypeKind::Address => write!(f, "address"),
            TypeKind::Bytes => write!(f, "byte[]"),
            TypeKind::String => write!(f, "string"),
            TypeKind::StaticArray { elem, len } => write!(f, "{}[{}]", elem, len),
            TypeKind::DynamicArray(elem) => write!(f, "{}[]", elem),
            TypeKind::Tuple(fields) => {
                write!(f, "(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", field.ty)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Interning key: compares children by address.
///
/// Children of a kind being interned are themselves interned, so pointer
/// identity is structural identity and lookups never recurse.
#[derive(Clone, Copy)]
pub(crate) struct ShallowKind<'a>(pub(crate) TypeKind<'a>);

impl PartialEq for ShallowKind<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (
                TypeKind::StaticArray { elem: e1, len: l1 },
                TypeKind::StaticArray { elem: e2, len: l2 },
            ) => core::ptr::eq(*e1, *e2) && l1 == l2,
            (TypeKind::DynamicArray(e1), TypeKind::DynamicArray(e2)) => core::ptr::eq(*e1, *e2),
            (TypeKind::Tuple(f1), TypeKind::Tuple(f2)) => {
                f1.len() == f2.len()
                    && f1
                        .iter()
                        .zip(f2.iter())
                        .all(|(a, b)| a.name == b.name && core::ptr::eq(a.ty, b.ty))
            }
            (a, b) => a == b,
        }
    }
}

impl Eq for ShallowKind<'_> {}

impl Hash for ShallowKind<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(&self.0).hash(state);
        match &self.0 {
            TypeKind::Uint { bits } => bits.hash(state),
            TypeKind::UFixed { bits, precision } => {
                bits.hash(state);
                precision.hash(state);
            }
            TypeKind::Bool
            | TypeKind::Byte
            | TypeKind::Address
            | TypeKind::Bytes
            | TypeKind::String => {}
            TypeKind::StaticArray { elem, len } => {
                core::ptr::hash(*elem, state);
                len.hash(state);
            }
            TypeKind::DynamicArray(elem) => core::ptr::hash(*elem, state),
            TypeKind::Tuple(fields) => {
                fields.len().hash(state);
                for field in fields.iter() {
                    field.name.hash(state);
                    core::ptr::hash(field.ty, state);
                }
            }
        }
    }
}
