use std::fmt;
use thiserror::Error;

/// Line/column position inside the schema document, as reported by the XML
/// front end.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SourcePos {
    pub row: u32,
    pub col: u32,
}

impl SourcePos {
    pub fn of(node: roxmltree::Node) -> Self {
        let pos = node.document().text_pos_at(node.range().start);
        Self {
            row: pos.row,
            col: pos.col,
        }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.row, self.col)
    }
}

/// Errors raised while building the raw schema model from the XML tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{pos}: document root is <{found}>, expected <schema>")]
    NotASchema { found: String, pos: SourcePos },

    #[error("{pos}: failed to resolve prefix {prefix:?} to a namespace URI")]
    UnresolvedPrefix { prefix: String, pos: SourcePos },

    #[error("{pos}: unsupported tag <{tag}>")]
    UnsupportedTag { tag: String, pos: SourcePos },

    #[error("{pos}: unsupported construct: {construct}")]
    UnsupportedConstruct { construct: String, pos: SourcePos },

    #[error("{pos}: <{tag}> is missing required attribute {attribute:?}")]
    MissingAttribute {
        tag: &'static str,
        attribute: &'static str,
        pos: SourcePos,
    },

    #[error("{pos}: invalid occurrence bound {value:?}")]
    InvalidOccurs { value: String, pos: SourcePos },

    #[error("{pos}: duplicate definition of {tag} {name:?}")]
    Redefined {
        tag: &'static str,
        name: String,
        pos: SourcePos,
    },
}

/// Errors raised while resolving references and flattening the schema.
///
/// Resolution is fail-fast: the first error aborts the pass and no partial
/// schema is returned.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unresolved {kind} reference {name:?} (referenced from {context})")]
    UnresolvedReference {
        kind: RefKind,
        name: String,
        context: String,
    },

    #[error("cyclic inheritance chain: {}", cycle.join(" -> "))]
    CyclicInheritance { cycle: Vec<String> },

    #[error("cyclic group reference: {}", cycle.join(" -> "))]
    CyclicGroupReference { cycle: Vec<String> },

    #[error("invalid restriction in type {type_name:?}: element {element:?} does not narrow the base content model")]
    InvalidRestriction { type_name: String, element: String },

    #[error("{name:?} names a complex type where a simple type is required (referenced from {context})")]
    NotASimpleType { name: String, context: String },

    #[error("unknown built-in datatype {name:?} (referenced from {context})")]
    UnknownBuiltin { name: String, context: String },

    #[error("element {name:?} has neither a type nor a ref")]
    ElementWithoutType { name: String },
}

/// Either phase of schema loading can fail; callers that do not care which
/// phase use this.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// The kind of declaration a dangling reference was expected to name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RefKind {
    Type,
    Element,
    Attribute,
    Group,
    AttributeGroup,
    SubstitutionHead,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Type => "type",
            Self::Element => "element",
            Self::Attribute => "attribute",
            Self::Group => "group",
            Self::AttributeGroup => "attribute group",
            Self::SubstitutionHead => "substitution group head",
        };
        f.write_str(s)
    }
}
