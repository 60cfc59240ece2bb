use crate::shared::TypeRef;
use crate::xstypes::{QName, Sequence};

/// A simple type definition: a restriction of another simple type, a
/// whitespace-separated list, or a union.
#[derive(Clone, Debug)]
pub enum SimpleType {
    Restriction(Restriction),
    List { item: Box<TypeRef> },
    Union { members: Sequence<TypeRef> },
}

/// Restriction of a base simple type. When `enumeration` is non-empty the
/// value space is the finite literal set and the type is emitted as an enum.
#[derive(Clone, Debug)]
pub struct Restriction {
    pub base: QName,
    /// Enumeration literals in declaration order.
    pub enumeration: Sequence<String>,
    /// Remaining constraining facets, preserved structurally for validation
    /// hints; generated code does not enforce them.
    pub facets: Sequence<Facet>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Facet {
    MinInclusive(String),
    MaxInclusive(String),
    MinExclusive(String),
    MaxExclusive(String),
    Pattern(String),
    Length(u64),
    MinLength(u64),
    MaxLength(u64),
    TotalDigits(u64),
    FractionDigits(u64),
    WhiteSpace(String),
}
