use crate::particle::Occurs;
use crate::shared::TypeRef;
use crate::xstypes::{NCName, QName};

/// An element declaration, either top-level or local to a content model.
///
/// Exactly one of `name`+`type_` or `ref_` is populated; a `ref_` element
/// stands for the top-level declaration it names.
#[derive(Clone, Debug)]
pub struct ElementDecl {
    pub name: Option<NCName>,
    pub ref_: Option<QName>,
    pub type_: Option<TypeRef>,
    pub occurs: Occurs,
    pub nillable: bool,
    pub abstract_: bool,
    /// Head element this declaration substitutes for, if any. Membership is
    /// collected onto the head during resolution.
    pub substitution_group: Option<QName>,
    pub default: Option<String>,
}

impl ElementDecl {
    /// The tag name instances of this element carry. For a `ref_` element
    /// this is the local part of the referenced name.
    pub fn tag_name(&self) -> &str {
        if let Some(name) = self.name.as_deref() {
            name
        } else if let Some(ref_) = self.ref_.as_ref() {
            &ref_.local_name
        } else {
            // the reader rejects elements with neither name nor ref
            unreachable!("element without name or ref")
        }
    }
}
