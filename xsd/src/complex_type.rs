use crate::attribute::AttributeDecl;
use crate::particle::Particle;
use crate::xstypes::{QName, Sequence};

/// The two XSD inheritance modes for complex types.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DerivationMethod {
    /// Base fields inherited, new ones appended.
    Extension,
    /// Base fields re-declared; the derived content model must narrow.
    Restriction,
}

#[derive(Clone, Debug)]
pub struct Derivation {
    pub method: DerivationMethod,
    pub base: QName,
}

/// A complex type definition.
///
/// `simple_content` marks the `<simpleContent>` form: the base names a simple
/// type (or a simple-content complex type) providing the text value, and
/// `content` is absent.
#[derive(Clone, Debug)]
pub struct ComplexTypeDef {
    pub base: Option<Derivation>,
    /// Root compositor of the own (non-inherited) content model, if any.
    pub content: Option<Particle>,
    pub attributes: Sequence<AttributeDecl>,
    pub attribute_groups: Sequence<QName>,
    pub simple_content: bool,
}
