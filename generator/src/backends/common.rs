//! Backend-agnostic generation plan.
//!
//! Flattens the resolved schema into per-class field lists with final native
//! identifiers, so the language backends only decide spelling and statement
//! syntax. Extension chains are collapsed here: a derived class plan carries
//! the full stacked field list, base fields first.

use std::collections::HashMap;

use indexmap::IndexMap;
use xb_xsd::{ResolvedParticle, ResolvedSchema, ResolvedType, ResolvedTypeRef, SimpleRepr};

use crate::mapping::{self, IdentifierCollision, Scope};

/// Native reference to a field's type: a simple representation or the
/// (already sanitized) name of a generated class.
#[derive(Clone, Debug)]
pub(crate) enum NativeRef {
    Simple(SimpleRepr),
    Class(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FieldSource {
    Element,
    Attribute,
}

#[derive(Clone, Debug)]
pub(crate) struct Field {
    pub name: String,
    pub xml_name: String,
    pub source: FieldSource,
    pub type_: NativeRef,
    /// More than one occurrence allowed; spelled as a repeated container.
    pub multiple: bool,
    /// May be absent from a valid instance.
    pub optional: bool,
    pub default: Option<String>,
}

/// Field indices belonging to one choice compositor. When `required`, the
/// generated parser fails unless at least one member matched.
#[derive(Clone, Debug)]
pub(crate) struct ChoiceGroup {
    pub fields: Vec<usize>,
    pub required: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct ClassPlan {
    pub name: String,
    pub fields: Vec<Field>,
    pub choices: Vec<ChoiceGroup>,
    /// Simple-content text value, if the class carries one.
    pub value: Option<SimpleRepr>,
}

#[derive(Clone, Debug)]
pub(crate) struct EnumPlan {
    pub name: String,
    /// (XML literal, native variant identifier) in declaration order.
    pub variants: Vec<(String, String)>,
}

#[derive(Clone, Debug)]
pub(crate) struct RootPlan {
    pub tag: String,
    pub type_: NativeRef,
    pub abstract_: bool,
}

pub(crate) struct Plans {
    /// Schema type key -> native type name, for spelling enum references.
    pub type_names: IndexMap<String, String>,
    pub classes: Vec<ClassPlan>,
    pub enums: Vec<EnumPlan>,
    pub roots: Vec<RootPlan>,
}

impl Plans {
    pub fn native(&self, type_key: &str) -> &str {
        &self.type_names[type_key]
    }
}

pub(crate) fn build(
    schema: &ResolvedSchema,
    keywords: &'static [&'static str],
) -> Result<Plans, IdentifierCollision> {
    let mut type_scope = Scope::new(keywords);
    // the support class emitted alongside the bindings
    type_scope.reserve("XmlParser");
    let mut type_names = IndexMap::new();
    for key in schema.types.keys() {
        let native = type_scope.claim(key, mapping::class_case(key))?;
        type_names.insert(key.clone(), native);
    }

    let mut classes = Vec::new();
    let mut enums = Vec::new();
    for (key, type_) in &schema.types {
        match type_ {
            ResolvedType::Enum(enum_type) => {
                let mut variant_scope = Scope::new(keywords);
                variant_scope.reserve("UNKNOWN");
                let mut variants = Vec::new();
                for literal in &enum_type.variants {
                    let identifier =
                        variant_scope.claim(literal, mapping::enum_variant(literal))?;
                    variants.push((literal.clone(), identifier));
                }
                enums.push(EnumPlan {
                    name: type_names[key.as_str()].clone(),
                    variants,
                });
            }
            ResolvedType::Class(class) => {
                let (particles, attributes) = schema.stacked(class);
                let mut builder = FieldListBuilder {
                    type_names: &type_names,
                    scope: Scope::new(keywords),
                    seen_tags: HashMap::new(),
                    fields: Vec::new(),
                    choices: Vec::new(),
                };
                let value = schema.value_of(class).cloned();
                if value.is_some() {
                    // the text content accessor is spelled getValue
                    builder.scope.reserve("value");
                }
                for particle in particles {
                    builder.flatten(particle, false, false)?;
                }
                for attribute in attributes {
                    // "@" keeps an attribute distinct from an element of the
                    // same name in the scope's XML-name table
                    let name = builder.scope.claim(
                        &format!("@{}", attribute.xml_name),
                        mapping::variable_case(&attribute.xml_name),
                    )?;
                    builder.fields.push(Field {
                        name,
                        xml_name: attribute.xml_name.clone(),
                        source: FieldSource::Attribute,
                        type_: NativeRef::Simple(attribute.repr.clone()),
                        multiple: false,
                        optional: !attribute.required,
                        default: attribute.default.clone(),
                    });
                }
                classes.push(ClassPlan {
                    name: type_names[key.as_str()].clone(),
                    fields: builder.fields,
                    choices: builder.choices,
                    value,
                });
            }
        }
    }

    let mut roots = Vec::new();
    for (tag, element) in &schema.roots {
        roots.push(RootPlan {
            tag: tag.clone(),
            type_: native_ref(&element.type_, &type_names),
            abstract_: element.abstract_,
        });
    }

    Ok(Plans {
        type_names,
        classes,
        enums,
        roots,
    })
}

fn native_ref(type_: &ResolvedTypeRef, type_names: &IndexMap<String, String>) -> NativeRef {
    match type_ {
        ResolvedTypeRef::Simple(repr) => NativeRef::Simple(repr.clone()),
        ResolvedTypeRef::Class(key) => NativeRef::Class(type_names[key.as_str()].clone()),
    }
}

struct FieldListBuilder<'a> {
    type_names: &'a IndexMap<String, String>,
    scope: Scope,
    /// Tag -> field index; a tag reachable through several branches still
    /// gets exactly one field.
    seen_tags: HashMap<String, usize>,
    fields: Vec<Field>,
    choices: Vec<ChoiceGroup>,
}

impl FieldListBuilder<'_> {
    fn flatten(
        &mut self,
        particle: &ResolvedParticle,
        multiple: bool,
        optional: bool,
    ) -> Result<(), IdentifierCollision> {
        let occurs = particle.occurs();
        let multiple = multiple || occurs.is_multiple();
        let optional = optional || occurs.is_optional();
        match particle {
            ResolvedParticle::Element(element) => {
                if !element.substitution.is_empty() {
                    // one field per registered member; the parser branches
                    // over all of them
                    for member in &element.substitution {
                        self.add_field(&member.tag, &member.type_, multiple, true)?;
                    }
                } else if !element.abstract_ {
                    self.add_field(&element.tag, &element.type_, multiple, optional)?;
                }
            }
            ResolvedParticle::Sequence { particles, .. }
            | ResolvedParticle::All { particles, .. } => {
                for particle in particles {
                    self.flatten(particle, multiple, optional)?;
                }
            }
            ResolvedParticle::Choice { particles, .. } => {
                let start = self.fields.len();
                for particle in particles {
                    self.flatten(particle, multiple, true)?;
                }
                self.choices.push(ChoiceGroup {
                    fields: (start..self.fields.len()).collect(),
                    required: !optional,
                });
            }
        }
        Ok(())
    }

    fn add_field(
        &mut self,
        tag: &str,
        type_: &ResolvedTypeRef,
        multiple: bool,
        optional: bool,
    ) -> Result<(), IdentifierCollision> {
        if let Some(&index) = self.seen_tags.get(tag) {
            // widen instead of duplicating when the same tag is reachable
            // through several branches
            let field = &mut self.fields[index];
            field.multiple |= multiple;
            field.optional |= optional;
            return Ok(());
        }
        let name = self.scope.claim(tag, mapping::variable_case(tag))?;
        self.seen_tags.insert(tag.to_string(), self.fields.len());
        self.fields.push(Field {
            name,
            xml_name: tag.to_string(),
            source: FieldSource::Element,
            type_: native_ref(type_, self.type_names),
            multiple,
            optional,
            default: None,
        });
        Ok(())
    }
}
