use crate::attribute::AttributeDecl;
use crate::particle::Particle;
use crate::xstypes::{NCName, QName, Sequence};

/// A named, reusable particle list referenced by `GroupRef` particles.
/// Inlined during resolution.
#[derive(Clone, Debug)]
pub struct GroupDef {
    pub name: NCName,
    pub particle: Particle,
}

/// A named, reusable attribute list. May itself reference further attribute
/// groups; the resolver expands the whole graph.
#[derive(Clone, Debug)]
pub struct AttributeGroupDef {
    pub name: NCName,
    pub attributes: Sequence<AttributeDecl>,
    pub attribute_groups: Sequence<QName>,
}
