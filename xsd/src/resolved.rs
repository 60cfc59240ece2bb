use indexmap::IndexMap;

use crate::builtins::Primitive;
use crate::particle::Occurs;
use crate::xstypes::Sequence;

/// The representation a simple type reduces to after resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimpleRepr {
    Primitive(Primitive),
    /// An enumerated type; the name keys into [`ResolvedSchema::types`].
    Enum(String),
    /// Whitespace-separated list of the item representation.
    List(Box<SimpleRepr>),
}

impl SimpleRepr {
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

/// Resolved reference to the type an element carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedTypeRef {
    Simple(SimpleRepr),
    /// An aggregate type; the name keys into [`ResolvedSchema::types`].
    Class(String),
}

/// A member of a substitution group, recorded on the head element.
#[derive(Clone, Debug)]
pub struct SubstitutionMember {
    pub tag: String,
    pub type_: ResolvedTypeRef,
}

/// A fully resolved element slot in a content model.
#[derive(Clone, Debug)]
pub struct ResolvedElement {
    pub tag: String,
    pub type_: ResolvedTypeRef,
    pub occurs: Occurs,
    pub nillable: bool,
    pub abstract_: bool,
    /// Non-empty iff this element heads a substitution group. The parser for
    /// this slot must branch on every member tag. A non-abstract head is its
    /// own first member.
    pub substitution: Sequence<SubstitutionMember>,
}

/// Content model entry after group expansion. No group references remain.
#[derive(Clone, Debug)]
pub enum ResolvedParticle {
    Element(ResolvedElement),
    Sequence { particles: Sequence<ResolvedParticle>, occurs: Occurs },
    Choice { particles: Sequence<ResolvedParticle>, occurs: Occurs },
    All { particles: Sequence<ResolvedParticle>, occurs: Occurs },
}

impl ResolvedParticle {
    pub fn occurs(&self) -> Occurs {
        match self {
            Self::Element(e) => e.occurs,
            Self::Sequence { occurs, .. }
            | Self::Choice { occurs, .. }
            | Self::All { occurs, .. } => *occurs,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedAttribute {
    pub xml_name: String,
    pub repr: SimpleRepr,
    pub required: bool,
    pub default: Option<String>,
}

/// An aggregate (class/struct) to be emitted.
///
/// `particles` and `attributes` hold only the type's own content; for
/// extension-derived types the inherited part lives in the base entry and is
/// recovered with [`ResolvedSchema::stacked`].
#[derive(Clone, Debug)]
pub struct ClassType {
    /// Extension base, keyed into [`ResolvedSchema::types`]. Restriction
    /// bases are not recorded: their content is fully re-declared.
    pub base: Option<String>,
    pub particles: Sequence<ResolvedParticle>,
    pub attributes: Sequence<ResolvedAttribute>,
    /// Simple-content text value, if this class carries one.
    pub value: Option<SimpleRepr>,
}

#[derive(Clone, Debug)]
pub struct EnumType {
    /// Enumeration literals in declaration order.
    pub variants: Sequence<String>,
}

#[derive(Clone, Debug)]
pub enum ResolvedType {
    Enum(EnumType),
    Class(ClassType),
}

/// The fully resolved schema. All references are expanded, all anonymous
/// types carry synthetic names, and no two keys of `types` collide. Tables
/// preserve declaration order for deterministic output.
#[derive(Clone, Debug, Default)]
pub struct ResolvedSchema {
    pub target_namespace: Option<String>,
    pub types: IndexMap<String, ResolvedType>,
    pub roots: IndexMap<String, ResolvedElement>,
}

impl ResolvedSchema {
    pub fn class(&self, name: &str) -> Option<&ClassType> {
        match self.types.get(name) {
            Some(ResolvedType::Class(c)) => Some(c),
            _ => None,
        }
    }

    pub fn enum_(&self, name: &str) -> Option<&EnumType> {
        match self.types.get(name) {
            Some(ResolvedType::Enum(e)) => Some(e),
            _ => None,
        }
    }

    /// Full effective content of a class: the extension chain's particles and
    /// attributes, base first, then the class's own. The resolver guarantees
    /// the chain is acyclic.
    pub fn stacked<'a>(
        &'a self,
        class: &'a ClassType,
    ) -> (Vec<&'a ResolvedParticle>, Vec<&'a ResolvedAttribute>) {
        let mut chain = vec![class];
        let mut current = class;
        while let Some(base) = current.base.as_deref().and_then(|b| self.class(b)) {
            chain.push(base);
            current = base;
        }
        let mut particles = Vec::new();
        let mut attributes = Vec::new();
        for class in chain.into_iter().rev() {
            particles.extend(class.particles.iter());
            attributes.extend(class.attributes.iter());
        }
        (particles, attributes)
    }

    /// The simple-content value of a class, looked up through the extension
    /// chain.
    pub fn value_of<'a>(&'a self, class: &'a ClassType) -> Option<&'a SimpleRepr> {
        let mut current = class;
        loop {
            if let Some(value) = current.value.as_ref() {
                return Some(value);
            }
            current = current.base.as_deref().and_then(|b| self.class(b))?;
        }
    }
}
