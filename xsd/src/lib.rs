pub mod attribute;
pub mod complex_type;
pub mod element;
pub mod error;
pub mod group;
pub mod particle;
pub mod reader;
pub mod resolved;
pub mod resolver;
pub mod schema;
pub mod shared;
pub mod simple_type;
pub mod xstypes;

pub mod builtins;

pub use attribute::{AttributeDecl, AttributeUse};
pub use builtins::Primitive;
pub use complex_type::{ComplexTypeDef, Derivation, DerivationMethod};
pub use element::ElementDecl;
pub use error::{ParseError, RefKind, ResolveError, SchemaError, SourcePos};
pub use group::{AttributeGroupDef, GroupDef};
pub use particle::{MaxOccurs, Occurs, Particle};
pub use resolved::{
    ClassType, EnumType, ResolvedAttribute, ResolvedElement, ResolvedParticle, ResolvedSchema,
    ResolvedType, ResolvedTypeRef, SimpleRepr, SubstitutionMember,
};
pub use schema::RawSchema;
pub use shared::{Type, TypeRef};
pub use simple_type::{Facet, Restriction, SimpleType};
pub use xstypes::QName;

/// Reads and resolves a schema document in one step.
pub fn load_schema(doc: &roxmltree::Document) -> Result<ResolvedSchema, SchemaError> {
    let raw = reader::read_schema(doc)?;
    Ok(resolver::resolve(&raw)?)
}
