use crate::shared::TypeRef;
use crate::xstypes::{NCName, QName};

/// Use mode of an attribute within a complex type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttributeUse {
    Required,
    Optional,
    Prohibited,
}

/// An attribute declaration. The type is always simple.
#[derive(Clone, Debug)]
pub struct AttributeDecl {
    pub name: Option<NCName>,
    pub ref_: Option<QName>,
    pub type_: Option<TypeRef>,
    pub use_: AttributeUse,
    pub default: Option<String>,
    pub fixed: Option<String>,
}

impl AttributeDecl {
    pub fn xml_name(&self) -> &str {
        if let Some(name) = self.name.as_deref() {
            name
        } else if let Some(ref_) = self.ref_.as_ref() {
            &ref_.local_name
        } else {
            unreachable!("attribute without name or ref")
        }
    }

    /// The default or fixed literal applied when the instance omits the
    /// attribute, if any.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref().or(self.fixed.as_deref())
    }
}
