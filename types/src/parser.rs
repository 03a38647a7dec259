//! Parsing of ARC-4 type strings and method/event signatures.
//!
//! The grammar lives in `grammar.pest`. Parsed types are interned through the
//! [`TypeManager`], so `mgr.parse("uint64[]")` returns the same pointer as
//! `mgr.dynamic_array(mgr.uint64())`.

use crate::error::TypeError;
use crate::manager::TypeManager;
use crate::ty::Type;
use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct AbiParser;

/// Return clause of a parsed signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returns<'a> {
    /// No return clause at all, as in event signatures.
    Absent,
    Void,
    Type(&'a Type<'a>),
}

/// A parsed `name(T1,T2,...)R` signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature<'a> {
    pub name: &'a str,
    pub params: Vec<&'a Type<'a>>,
    pub returns: Returns<'a>,
}

impl<'a> TypeManager<'a> {
    /// Parse a canonical type string such as `(uint64,string)[]`.
    pub fn parse(&self, input: &str) -> Result<&'a Type<'a>, TypeError> {
        let mut pairs =
            AbiParser::parse(Rule::type_string, input).map_err(|e| syntax_error(input, e))?;
        let mut root = next_pair(&mut pairs, input)?.into_inner();
        self.build_type(next_pair(&mut root, input)?, input)
    }

    /// Parse a method (`greet(string)string`) or event (`Minted(uint64)`) signature.
    pub fn parse_signature(&self, input: &str) -> Result<Signature<'a>, TypeError> {
        let mut pairs =
            AbiParser::parse(Rule::signature, input).map_err(|e| syntax_error(input, e))?;
        let mut inner = next_pair(&mut pairs, input)?.into_inner();

        let name = self.intern_str(next_pair(&mut inner, input)?.as_str());
        let params = self.build_type_list(next_pair(&mut inner, input)?, input)?;

        let mut returns = Returns::Absent;
        for pair in inner {
            if pair.as_rule() != Rule::returns {
                continue;
            }
            let clause = next_pair(&mut pair.into_inner(), input)?;
            returns = match clause.as_rule() {
                Rule::void => Returns::Void,
                _ => Returns::Type(self.build_type(clause, input)?),
            };
        }

        Ok(Signature {
            name,
            params,
            returns,
        })
    }

    fn build_type_list(
        &self,
        pair: Pair<'_, Rule>,
        input: &str,
    ) -> Result<Vec<&'a Type<'a>>, TypeError> {
        pair.into_inner()
            .map(|elem| self.build_type(elem, input))
            .collect()
    }

    fn build_type(&self, pair: Pair<'_, Rule>, input: &str) -> Result<&'a Type<'a>, TypeError> {
        let mut inner = pair.into_inner();
        let base = next_pair(&mut inner, input)?;

        let mut ty = match base.as_rule() {
            Rule::uint => {
                let bits = parse_width(next_pair(&mut base.into_inner(), input)?)?;
                self.uint(bits)?
            }
            Rule::ufixed => {
                let mut parts = base.into_inner();
                let bits = parse_width(next_pair(&mut parts, input)?)?;
                let precision_pair = next_pair(&mut parts, input)?;
                let precision: u8 = precision_pair.as_str().parse().map_err(|_| {
                    TypeError::InvalidPrecision {
                        precision: precision_pair.as_str().parse().unwrap_or(u32::MAX),
                    }
                })?;
                self.ufixed(bits, precision)?
            }
            Rule::bool_type => self.bool(),
            Rule::byte_type => self.byte(),
            Rule::address_type => self.address(),
            Rule::string_type => self.string(),
            Rule::tuple => {
                let list = next_pair(&mut base.into_inner(), input)?;
                let elems = self.build_type_list(list, input)?;
                self.tuple(elems)?
            }
            rule => {
                return Err(TypeError::Syntax {
                    input: input.to_string(),
                    position: base.as_span().start(),
                    message: format!("unexpected {:?}", rule),
                });
            }
        };

        for suffix in inner {
            ty = match suffix.into_inner().next() {
                Some(len) => {
                    let n = len.as_str().parse().map_err(|_| TypeError::InvalidLength {
                        text: len.as_str().to_string(),
                    })?;
                    self.static_array(ty, n)?
                }
                None => self.dynamic_array(ty),
            };
        }
        Ok(ty)
    }
}

fn parse_width(pair: Pair<'_, Rule>) -> Result<u16, TypeError> {
    let bits: u32 = pair.as_str().parse().unwrap_or(u32::MAX);
    u16::try_from(bits).map_err(|_| TypeError::InvalidBitWidth { bits })
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, input: &str) -> Result<Pair<'i, Rule>, TypeError> {
    pairs.next().ok_or_else(|| TypeError::Syntax {
        input: input.to_string(),
        position: input.len(),
        message: "unexpected end of input".to_string(),
    })
}

fn syntax_error(input: &str, err: pest::error::Error<Rule>) -> TypeError {
    let position = match err.location {
        pest::error::InputLocation::Pos(pos) => pos,
        pest::error::InputLocation::Span((start, _)) => start,
    };
    TypeError::Syntax {
        input: input.to_string(),
        position,
        message: err.variant.message().into_owned(),
    }
}
