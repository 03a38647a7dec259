use crate::error::TypeError;
use crate::ty::{Field, ShallowKind, Type, TypeFlags, TypeKind, array_layout, tuple_layout};
use bumpalo::Bump;
use core::cell::RefCell;
use hashbrown::{DefaultHashBuilder, HashMap};

/// Largest `M` accepted in `ufixed<N>x<M>`.
pub const MAX_PRECISION: u8 = 160;

/// Returns true if `bits` is a legal `uint<N>` / `ufixed<N>x<M>` width.
pub fn is_valid_bit_width(bits: u32) -> bool {
    (8..=512).contains(&bits) && bits % 8 == 0
}

/// Builds and interns ABI types in an arena.
///
/// Every constructor returns the unique arena allocation for its structure,
/// so two types built from the same manager are equal iff they are the same
/// pointer.
pub struct TypeManager<'a> {
    // Arena holding all types from this TypeManager.
    arena: &'a Bump,
    interned_strs: RefCell<HashMap<&'a str, &'a str, DefaultHashBuilder, &'a Bump>>,
    interned: RefCell<HashMap<ShallowKind<'a>, &'a Type<'a>, DefaultHashBuilder, &'a Bump>>,
}

impl<'a> TypeManager<'a> {
    pub fn new(arena: &'a Bump) -> &'a Self {
        arena.alloc(Self {
            arena,
            interned_strs: RefCell::new(HashMap::new_in(arena)),
            interned: RefCell::new(HashMap::new_in(arena)),
        })
    }

    pub(crate) fn intern_str(&self, s: &str) -> &'a str {
        if let Some(&interned_str) = self.interned_strs.borrow().get(s) {
            return interned_str;
        }
        let arena_str = self.arena.alloc_str(s);
        self.interned_strs.borrow_mut().insert(arena_str, arena_str);
        arena_str
    }

    fn intern(&self, kind: TypeKind<'a>, flags: TypeFlags, size: usize) -> &'a Type<'a> {
        if let Some(&interned_ty) = self.interned.borrow().get(&ShallowKind(kind)) {
            return interned_ty;
        }
        let arena_ty = self.arena.alloc(Type::new(kind, flags, size));
        self.interned
            .borrow_mut()
            .insert(ShallowKind(kind), arena_ty);
        arena_ty
    }

    fn intern_scalar(&self, kind: TypeKind<'a>, size: usize) -> &'a Type<'a> {
        self.intern(kind, TypeFlags::empty(), size)
    }

    // Factory methods for types.

    pub fn uint(&self, bits: u16) -> Result<&'a Type<'a>, TypeError> {
        if !is_valid_bit_width(bits as u32) {
            return Err(TypeError::InvalidBitWidth { bits: bits as u32 });
        }
        Ok(self.intern_scalar(TypeKind::Uint { bits }, bits as usize / 8))
    }

    pub fn uint8(&self) -> &'a Type<'a> {
        self.intern_scalar(TypeKind::Uint { bits: 8 }, 1)
    }
    pub fn uint16(&self) -> &'a Type<'a> {
        self.intern_scalar(TypeKind::Uint { bits: 16 }, 2)
    }
    pub fn uint32(&self) -> &'a Type<'a> {
        self.intern_scalar(TypeKind::Uint { bits: 32 }, 4)
    }
    pub fn uint64(&self) -> &'a Type<'a> {
        self.intern_scalar(TypeKind::Uint { bits: 64 }, 8)
    }
    pub fn uint128(&self) -> &'a Type<'a> {
        self.intern_scalar(TypeKind::Uint { bits: 128 }, 16)
    }
    pub fn uint256(&self) -> &'a Type<'a> {
        self.intern_scalar(TypeKind::Uint { bits: 256 }, 32)
    }
    pub fn uint512(&self) -> &'a Type<'a> {
        self.intern_scalar(TypeKind::Uint { bits: 512 }, 64)
    }

    pub fn ufixed(&self, bits: u16, precision: u8) -> Result<&'a Type<'a>, TypeError> {
        if !is_valid_bit_width(bits as u32) {
            return Err(TypeError::InvalidBitWidth { bits: bits as u32 });
        }
        if precision == 0 || precision > MAX_PRECISION {
            return Err(TypeError::InvalidPrecision {
                precision: precision as u32,
            });
        }
        Ok(self.intern_scalar(TypeKind::UFixed { bits, precision }, bits as usize / 8))
    }

    pub fn bool(&self) -> &'a Type<'a> {
        self.intern(TypeKind::Bool, TypeFlags::BOOL, 1)
    }

    pub fn byte(&self) -> &'a Type<'a> {
        self.intern_scalar(TypeKind::Byte, 1)
    }

    pub fn address(&self) -> &'a Type<'a> {
        self.intern_scalar(TypeKind::Address, 32)
    }

    /// `byte[]`.
    pub fn bytes(&self) -> &'a Type<'a> {
        self.intern(TypeKind::Bytes, TypeFlags::DYNAMIC, 0)
    }

    pub fn string(&self) -> &'a Type<'a> {
        self.intern(TypeKind::String, TypeFlags::DYNAMIC, 0)
    }

    /// `T[N]`. Fails if the encoded size of the array does not fit in `usize`.
    pub fn static_array(
        &self,
        elem: &'a Type<'a>,
        len: usize,
    ) -> Result<&'a Type<'a>, TypeError> {
        let (flags, size) = array_layout(elem, len).ok_or_else(|| TypeError::InvalidLength {
            text: len.to_string(),
        })?;
        Ok(self.intern(TypeKind::StaticArray { elem, len }, flags, size))
    }

    /// `T[]`. A dynamic array of `byte` is the same type as [`Self::bytes`].
    pub fn dynamic_array(&self, elem: &'a Type<'a>) -> &'a Type<'a> {
        if let TypeKind::Byte = elem.kind() {
            return self.bytes();
        }
        self.intern(TypeKind::DynamicArray(elem), TypeFlags::DYNAMIC, 0)
    }

    /// An anonymous tuple.
    pub fn tuple(
        &self,
        elems: impl IntoIterator<Item = &'a Type<'a>>,
    ) -> Result<&'a Type<'a>, TypeError> {
        let fields: Vec<Field<'a>> = elems
            .into_iter()
            .map(|ty| Field { name: None, ty })
            .collect();
        self.intern_fields(fields)
    }

    /// A struct: a tuple whose fields are named. Field order is preserved
    /// since it defines the encoding.
    pub fn record<S: AsRef<str>>(
        &self,
        fields: impl IntoIterator<Item = (S, &'a Type<'a>)>,
    ) -> Result<&'a Type<'a>, TypeError> {
        let mut interned: Vec<Field<'a>> = Vec::new();
        for (name, ty) in fields {
            let name = self.intern_str(name.as_ref());
            if interned.iter().any(|f| f.name == Some(name)) {
                return Err(TypeError::DuplicateField {
                    name: name.to_string(),
                });
            }
            interned.push(Field {
                name: Some(name),
                ty,
            });
        }
        self.intern_fields(interned)
    }

    fn intern_fields(&self, fields: Vec<Field<'a>>) -> Result<&'a Type<'a>, TypeError> {
        // Lookup using the Vec as a slice before copying it into the arena.
        if let Some(&interned_ty) = self
            .interned
            .borrow()
            .get(&ShallowKind(TypeKind::Tuple(&fields)))
        {
            return Ok(interned_ty);
        }
        let (flags, size) = tuple_layout(&fields).ok_or_else(|| TypeError::InvalidLength {
            text: render_fields(&fields),
        })?;
        let arena_fields = self.arena.alloc_slice_copy(&fields);
        Ok(self.intern(TypeKind::Tuple(arena_fields), flags, size))
    }
}

fn render_fields(fields: &[Field<'_>]) -> String {
    let types: Vec<String> = fields.iter().map(|f| f.ty.to_string()).collect();
    format!("({})", types.join(","))
}
