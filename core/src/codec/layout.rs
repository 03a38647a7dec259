//! Head/tail layout of composite encodings.
//!
//! A tuple, a static array, and the content of a dynamic array all share one
//! layout. Members are placed in a head in declaration order: static members
//! inline, consecutive bools packed eight to a byte (MSB first), and dynamic
//! members as 2-byte offsets. The offsets point into a tail that follows the
//! head, and are relative to the start of the head.

use core::ops::Range;

use arc4_types::{Field, Type, TypeKind};
use smallvec::SmallVec;
use tracing::trace;

use crate::codec::primitive::{ensure, read_u16};
use crate::errors::DecodeError;
use crate::options::CodecOptions;

/// Position of a member inside the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Static { offset: usize, size: usize },
    Bit { offset: usize, bit: u8 },
    /// Head position of the 2-byte tail offset.
    Dynamic { offset: usize },
}

/// Resolved location of a member within its region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Located {
    Range(Range<usize>),
    Bit { offset: usize, bit: u8 },
}

/// Member types of a composite.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Members<'t> {
    Fields(&'t [Field<'t>]),
    List(&'t [&'t Type<'t>]),
    /// `len` copies of `elem`: a static array or dynamic array content.
    Repeat { elem: &'t Type<'t>, len: usize },
}

impl<'t> Members<'t> {
    /// Members of a tuple or static array. Dynamic arrays need their count
    /// from the encoding, so they are built with [`Members::Repeat`] directly.
    pub(crate) fn of(ty: &'t Type<'t>) -> Option<Self> {
        match *ty.kind() {
            TypeKind::Tuple(fields) => Some(Members::Fields(fields)),
            TypeKind::StaticArray { elem, len } => Some(Members::Repeat { elem, len }),
            _ => None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Members::Fields(fields) => fields.len(),
            Members::List(types) => types.len(),
            Members::Repeat { len, .. } => *len,
        }
    }

    pub(crate) fn ty(&self, index: usize) -> Option<&'t Type<'t>> {
        match *self {
            Members::Fields(fields) => fields.get(index).map(|f| f.ty),
            Members::List(types) => types.get(index).copied(),
            Members::Repeat { elem, len } => (index < len).then_some(elem),
        }
    }

    pub(crate) fn types(self) -> impl Iterator<Item = &'t Type<'t>> {
        (0..self.len()).filter_map(move |i| self.ty(i))
    }

    /// Slots of all members and the head length.
    pub(crate) fn slots(&self) -> (SmallVec<[Slot; 8]>, usize) {
        let mut slots = SmallVec::with_capacity(self.len());
        let mut pos: usize = 0;
        // Bools already packed into the byte at `pos - 1`; 0 means none open.
        let mut run = 0u8;
        for ty in self.types() {
            if ty.is_bool() {
                if run == 0 || run == 8 {
                    pos = pos.saturating_add(1);
                    run = 0;
                }
                slots.push(Slot::Bit {
                    offset: pos - 1,
                    bit: run,
                });
                run += 1;
            } else {
                run = 0;
                if ty.is_dynamic() {
                    slots.push(Slot::Dynamic { offset: pos });
                    pos = pos.saturating_add(2);
                } else {
                    let size = ty.static_size().unwrap_or(0);
                    slots.push(Slot::Static { offset: pos, size });
                    pos = pos.saturating_add(size);
                }
            }
        }
        (slots, pos)
    }

    pub(crate) fn head_len(&self) -> usize {
        match *self {
            Members::Repeat { elem, len } => {
                if elem.is_bool() {
                    len.div_ceil(8)
                } else if elem.is_dynamic() {
                    len.saturating_mul(2)
                } else {
                    // Saturates so an impossible head fails the length check.
                    len.saturating_mul(elem.static_size().unwrap_or(0))
                }
            }
            _ => self.slots().1,
        }
    }

    pub(crate) fn slot(&self, index: usize) -> Option<Slot> {
        match *self {
            Members::Repeat { elem, len } => {
                if index >= len {
                    None
                } else if elem.is_bool() {
                    Some(Slot::Bit {
                        offset: index / 8,
                        bit: (index % 8) as u8,
                    })
                } else if elem.is_dynamic() {
                    Some(Slot::Dynamic { offset: 2 * index })
                } else {
                    let size = elem.static_size().unwrap_or(0);
                    Some(Slot::Static {
                        offset: index * size,
                        size,
                    })
                }
            }
            _ => self.slots().0.get(index).copied(),
        }
    }

    /// The first dynamic member after `index`, with its slot position.
    fn next_dynamic(&self, index: usize) -> Option<(usize, usize)> {
        (index + 1..self.len()).find_map(|i| match self.slot(i) {
            Some(Slot::Dynamic { offset }) => Some((i, offset)),
            _ => None,
        })
    }

    pub(crate) fn last_dynamic(&self) -> Option<usize> {
        match *self {
            Members::Repeat { elem, len } => (elem.is_dynamic() && len > 0).then(|| len - 1),
            _ => (0..self.len())
                .rev()
                .find(|&i| self.ty(i).is_some_and(Type::is_dynamic)),
        }
    }
}

/// Read the tail offset stored at `pos` and check it lands in the tail.
fn read_offset(
    region: &[u8],
    pos: usize,
    slot: usize,
    head_len: usize,
) -> Result<usize, DecodeError> {
    let offset = read_u16(region, pos, "offset")?;
    if offset < head_len {
        return Err(DecodeError::MalformedOffset {
            slot,
            offset,
            reason: "points into the head",
        });
    }
    if offset > region.len() {
        return Err(DecodeError::MalformedOffset {
            slot,
            offset,
            reason: "points past the end of the input",
        });
    }
    Ok(offset)
}

/// Locate member `index` inside `region` without touching other members'
/// data. Returns `None` if there is no such member.
///
/// A dynamic member spans from its offset to the next dynamic member's
/// offset, or to the end of the region for the last one.
pub(crate) fn locate(
    region: &[u8],
    members: Members<'_>,
    index: usize,
) -> Result<Option<Located>, DecodeError> {
    let head_len = members.head_len();
    ensure(region, head_len, "head")?;
    let Some(slot) = members.slot(index) else {
        return Ok(None);
    };
    let located = match slot {
        Slot::Static { offset, size } => Located::Range(offset..offset + size),
        Slot::Bit { offset, bit } => Located::Bit { offset, bit },
        Slot::Dynamic { offset: pos } => {
            let start = read_offset(region, pos, index, head_len)?;
            let end = match members.next_dynamic(index) {
                Some((next, next_pos)) => {
                    let end = read_offset(region, next_pos, next, head_len)?;
                    if end < start {
                        return Err(DecodeError::MalformedOffset {
                            slot: next,
                            offset: end,
                            reason: "offsets decrease",
                        });
                    }
                    end
                }
                None => region.len(),
            };
            trace!(index, start, end, "Located tail member");
            Located::Range(start..end)
        }
    };
    Ok(Some(located))
}

/// Locate every member and validate the whole offset table.
///
/// Returns the locations in member order and the head length.
pub(crate) fn resolve(
    region: &[u8],
    members: Members<'_>,
    options: &CodecOptions,
) -> Result<(SmallVec<[Located; 8]>, usize), DecodeError> {
    // Check the head fits before allocating one slot per member.
    let head_len = members.head_len();
    ensure(region, head_len, "head")?;
    let (slots, _) = members.slots();

    let mut located: SmallVec<[Located; 8]> = SmallVec::with_capacity(slots.len());
    // Indices into `located` of the dynamic members.
    let mut dynamic: SmallVec<[usize; 4]> = SmallVec::new();
    let mut prev = head_len;
    for (i, slot) in slots.iter().enumerate() {
        match *slot {
            Slot::Static { offset, size } => located.push(Located::Range(offset..offset + size)),
            Slot::Bit { offset, bit } => located.push(Located::Bit { offset, bit }),
            Slot::Dynamic { offset: pos } => {
                let start = read_offset(region, pos, i, head_len)?;
                if start < prev {
                    return Err(DecodeError::MalformedOffset {
                        slot: i,
                        offset: start,
                        reason: "offsets decrease",
                    });
                }
                if options.strict_offsets && dynamic.is_empty() && start != head_len {
                    return Err(DecodeError::MalformedOffset {
                        slot: i,
                        offset: start,
                        reason: "tail does not start right after the head",
                    });
                }
                prev = start;
                dynamic.push(located.len());
                located.push(Located::Range(start..region.len()));
            }
        }
    }

    // Each tail member ends where the next one starts.
    for pair in dynamic.windows(2) {
        let next_start = match &located[pair[1]] {
            Located::Range(range) => range.start,
            Located::Bit { .. } => continue,
        };
        if let Located::Range(range) = &mut located[pair[0]] {
            range.end = next_start;
        }
    }

    trace!(
        members = located.len(),
        head_len,
        dynamic = dynamic.len(),
        "Resolved offset table"
    );
    Ok((located, head_len))
}

/// Exact encoded length of a `ty` value at the front of `region`.
pub(crate) fn measure(region: &[u8], ty: &Type<'_>) -> Result<usize, DecodeError> {
    if let Some(size) = ty.static_size() {
        ensure(region, size, ty)?;
        return Ok(size);
    }
    match *ty.kind() {
        TypeKind::Bytes | TypeKind::String => {
            let len = read_u16(region, 0, ty)?;
            ensure(region, 2 + len, ty)?;
            Ok(2 + len)
        }
        TypeKind::DynamicArray(elem) => {
            let count = read_u16(region, 0, ty)?;
            let content = measure_members(&region[2..], Members::Repeat { elem, len: count })?;
            Ok(2 + content)
        }
        _ => match Members::of(ty) {
            Some(members) => measure_members(region, members),
            None => Ok(0),
        },
    }
}

/// Only the last dynamic member's extent matters: it ends the encoding.
pub(crate) fn measure_members(region: &[u8], members: Members<'_>) -> Result<usize, DecodeError> {
    let head_len = members.head_len();
    ensure(region, head_len, "head")?;
    let Some(last) = members.last_dynamic() else {
        return Ok(head_len);
    };
    match (locate(region, members, last)?, members.ty(last)) {
        (Some(Located::Range(range)), Some(ty)) => {
            Ok(range.start + measure(&region[range.clone()], ty)?)
        }
        _ => Ok(head_len),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arc4_types::TypeManager;
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bool_runs_share_bytes() {
        let bump = Bump::new();
        let mgr = TypeManager::new(&bump);
        let ty = mgr.tuple([mgr.bool(), mgr.bool(), mgr.uint16(), mgr.bool(), mgr.string()]).unwrap();

        let (slots, head_len) = Members::of(ty).unwrap().slots();
        assert_eq!(
            slots.as_slice(),
            &[
                Slot::Bit { offset: 0, bit: 0 },
                Slot::Bit { offset: 0, bit: 1 },
                Slot::Static { offset: 1, size: 2 },
                Slot::Bit { offset: 3, bit: 0 },
                Slot::Dynamic { offset: 4 },
            ]
        );
        assert_eq!(head_len, 6);
    }

    #[test]
    fn test_ninth_bool_opens_new_byte() {
        let bump = Bump::new();
        let mgr = TypeManager::new(&bump);
        let members = Members::Repeat {
            elem: mgr.bool(),
            len: 9,
        };
        let (slots, head_len) = members.slots();
        assert_eq!(slots[7], Slot::Bit { offset: 0, bit: 7 });
        assert_eq!(slots[8], Slot::Bit { offset: 1, bit: 0 });
        assert_eq!(head_len, 2);
        // The direct formula agrees with the scan.
        assert_eq!(members.head_len(), 2);
        assert_eq!(members.slot(8), Some(slots[8]));
    }

    #[test]
    fn test_locate_dynamic_member() {
        let bump = Bump::new();
        let mgr = TypeManager::new(&bump);
        let ty = mgr.tuple([mgr.string(), mgr.uint8(), mgr.string()]).unwrap();
        let members = Members::of(ty).unwrap();
        // head: off(5) 07 off(8); tail: "a" "bc"
        let bytes = [0, 5, 7, 0, 8, 0, 1, b'a', 0, 2, b'b', b'c'];

        assert_eq!(
            locate(&bytes, members, 0).unwrap(),
            Some(Located::Range(5..8))
        );
        assert_eq!(
            locate(&bytes, members, 1).unwrap(),
            Some(Located::Range(2..3))
        );
        assert_eq!(
            locate(&bytes, members, 2).unwrap(),
            Some(Located::Range(8..12))
        );
        assert_eq!(locate(&bytes, members, 3).unwrap(), None);
        assert_eq!(measure(&bytes, ty).unwrap(), 12);
    }

    #[test]
    fn test_resolve_rejects_bad_offsets() {
        let bump = Bump::new();
        let mgr = TypeManager::new(&bump);
        let members = Members::Repeat {
            elem: mgr.string(),
            len: 2,
        };
        let options = CodecOptions::default();

        // Second offset before the first.
        let bytes = [0, 7, 0, 4, 0, 0, 0, 0, 0];
        assert!(matches!(
            resolve(&bytes, members, &options),
            Err(DecodeError::MalformedOffset { slot: 1, .. })
        ));

        // Offset into the head.
        let bytes = [0, 1, 0, 4, 0, 0, 0, 0];
        assert!(matches!(
            resolve(&bytes, members, &options),
            Err(DecodeError::MalformedOffset {
                slot: 0,
                offset: 1,
                ..
            })
        ));

        // Offset past the end.
        let bytes = [0, 4, 0, 40, 0, 0];
        assert!(matches!(
            resolve(&bytes, members, &options),
            Err(DecodeError::MalformedOffset { slot: 1, .. })
        ));
    }

    #[test]
    fn test_strict_requires_tail_right_after_head() {
        let bump = Bump::new();
        let mgr = TypeManager::new(&bump);
        let members = Members::Repeat {
            elem: mgr.string(),
            len: 1,
        };
        // One garbage byte between head and tail.
        let bytes = [0, 3, 0xEE, 0, 0];

        let (located, _) = resolve(&bytes, members, &CodecOptions::default()).unwrap();
        assert_eq!(located[0], Located::Range(3..5));

        let strict = CodecOptions {
            strict_offsets: true,
            ..CodecOptions::default()
        };
        assert!(resolve(&bytes, members, &strict).is_err());
    }
}
