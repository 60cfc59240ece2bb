use indexmap::IndexMap;

use crate::attribute::AttributeDecl;
use crate::element::ElementDecl;
use crate::group::{AttributeGroupDef, GroupDef};
use crate::shared::Type;
use crate::xstypes::NCName;

/// The raw parsed schema: top-level declarations keyed by local name, in
/// declaration order. References between entries are still unresolved
/// qualified names. Immutable after construction.
#[derive(Clone, Debug, Default)]
pub struct RawSchema {
    pub target_namespace: Option<String>,
    pub types: IndexMap<NCName, Type>,
    pub elements: IndexMap<NCName, ElementDecl>,
    pub attributes: IndexMap<NCName, AttributeDecl>,
    pub groups: IndexMap<NCName, GroupDef>,
    pub attribute_groups: IndexMap<NCName, AttributeGroupDef>,
}
