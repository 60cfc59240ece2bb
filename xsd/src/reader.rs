//! Builds the raw schema model from a parsed XSD document.
//!
//! The XML front end (roxmltree) has already guaranteed well-formedness and
//! namespace resolution; this pass only maps tags onto the model and rejects
//! constructs outside the supported XSD subset.

use roxmltree::Node;

use crate::attribute::{AttributeDecl, AttributeUse};
use crate::complex_type::{ComplexTypeDef, Derivation, DerivationMethod};
use crate::element::ElementDecl;
use crate::error::{ParseError, SourcePos};
use crate::group::{AttributeGroupDef, GroupDef};
use crate::particle::{MaxOccurs, Occurs, Particle};
use crate::schema::RawSchema;
use crate::shared::{Type, TypeRef};
use crate::simple_type::{Facet, Restriction, SimpleType};
use crate::xstypes::QName;

/// Tags that carry no structural information for binding generation:
/// annotations are comments, identity constraints only matter for instance
/// validation.
const IGNORED_TAGS: &[&str] = &[
    "annotation",
    "documentation",
    "appinfo",
    "key",
    "keyref",
    "unique",
    "selector",
    "field",
    "notation",
];

pub fn read_schema(doc: &roxmltree::Document) -> Result<RawSchema, ParseError> {
    let root = doc.root_element();
    if root.tag_name().name() != "schema" {
        return Err(ParseError::NotASchema {
            found: root.tag_name().name().to_string(),
            pos: SourcePos::of(root),
        });
    }

    let mut schema = RawSchema {
        target_namespace: root.attribute("targetNamespace").map(str::to_string),
        ..RawSchema::default()
    };

    for child in root.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "element" => {
                if let Some(element) = read_element(child, true)? {
                    let name = required(child, "element", "name")?;
                    unique(schema.elements.contains_key(name), "element", name, child)?;
                    schema.elements.insert(name.to_string(), element);
                }
            }
            "attribute" => {
                if let Some(attribute) = read_attribute(child)? {
                    let name = required(child, "attribute", "name")?;
                    unique(schema.attributes.contains_key(name), "attribute", name, child)?;
                    schema.attributes.insert(name.to_string(), attribute);
                }
            }
            "complexType" => {
                let name = required(child, "complexType", "name")?;
                unique(schema.types.contains_key(name), "type", name, child)?;
                let type_ = read_complex_type(child)?;
                schema.types.insert(name.to_string(), Type::Complex(type_));
            }
            "simpleType" => {
                let name = required(child, "simpleType", "name")?;
                unique(schema.types.contains_key(name), "type", name, child)?;
                let type_ = read_simple_type(child)?;
                schema.types.insert(name.to_string(), Type::Simple(type_));
            }
            "group" => {
                let group = read_group(child)?;
                unique(schema.groups.contains_key(&group.name), "group", &group.name, child)?;
                schema.groups.insert(group.name.clone(), group);
            }
            "attributeGroup" => {
                let group = read_attribute_group(child)?;
                unique(
                    schema.attribute_groups.contains_key(&group.name),
                    "attribute group",
                    &group.name,
                    child,
                )?;
                schema.attribute_groups.insert(group.name.clone(), group);
            }
            "import" | "include" | "redefine" | "override" => {
                return Err(ParseError::UnsupportedConstruct {
                    construct: format!("<{}> of external schemas", child.tag_name().name()),
                    pos: SourcePos::of(child),
                })
            }
            tag if IGNORED_TAGS.contains(&tag) => {}
            tag => {
                return Err(ParseError::UnsupportedTag {
                    tag: tag.to_string(),
                    pos: SourcePos::of(child),
                })
            }
        }
    }
    Ok(schema)
}

fn required<'a>(
    node: Node<'a, '_>,
    tag: &'static str,
    attribute: &'static str,
) -> Result<&'a str, ParseError> {
    node.attribute(attribute)
        .ok_or_else(|| ParseError::MissingAttribute {
            tag,
            attribute,
            pos: SourcePos::of(node),
        })
}

/// Top-level names key the component tables; a redefinition would silently
/// shadow its predecessor.
fn unique(taken: bool, tag: &'static str, name: &str, node: Node) -> Result<(), ParseError> {
    if taken {
        return Err(ParseError::Redefined {
            tag,
            name: name.to_string(),
            pos: SourcePos::of(node),
        });
    }
    Ok(())
}

fn read_occurs(node: Node) -> Result<Occurs, ParseError> {
    let parse_bound = |value: &str| {
        value.parse::<u64>().map_err(|_| ParseError::InvalidOccurs {
            value: value.to_string(),
            pos: SourcePos::of(node),
        })
    };
    let min = match node.attribute("minOccurs") {
        Some(value) => parse_bound(value)?,
        None => 1,
    };
    let max = match node.attribute("maxOccurs") {
        Some("unbounded") => MaxOccurs::Unbounded,
        Some(value) => MaxOccurs::Bounded(parse_bound(value)?),
        None => MaxOccurs::Bounded(1),
    };
    Ok(Occurs { min, max })
}

fn qname_attribute(node: Node, attribute: &str) -> Result<Option<QName>, ParseError> {
    node.attribute(attribute)
        .map(|value| QName::parse(value, node))
        .transpose()
}

/// Maps an `<element>`. Returns `None` for elements excluded from the content
/// model (`maxOccurs="0"`).
fn read_element(node: Node, top_level: bool) -> Result<Option<ElementDecl>, ParseError> {
    let name = node.attribute("name").map(str::to_string);
    let ref_ = qname_attribute(node, "ref")?;
    let type_name = qname_attribute(node, "type")?;
    let substitution_group = qname_attribute(node, "substitutionGroup")?;
    let nillable = node.attribute("nillable") == Some("true");
    let abstract_ = node.attribute("abstract") == Some("true");
    let default = node.attribute("default").map(str::to_string);

    if name.is_none() && ref_.is_none() {
        return Err(ParseError::MissingAttribute {
            tag: "element",
            attribute: "name",
            pos: SourcePos::of(node),
        });
    }

    let occurs = if top_level {
        Occurs::ONCE
    } else {
        read_occurs(node)?
    };
    if occurs.is_void() {
        return Ok(None);
    }

    let mut type_ = type_name.map(TypeRef::Named);
    for child in node.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "complexType" => {
                type_ = Some(TypeRef::Inline(Box::new(Type::Complex(read_complex_type(
                    child,
                )?))));
            }
            "simpleType" => {
                type_ = Some(TypeRef::Inline(Box::new(Type::Simple(read_simple_type(
                    child,
                )?))));
            }
            tag if IGNORED_TAGS.contains(&tag) => {}
            tag => {
                return Err(ParseError::UnsupportedTag {
                    tag: tag.to_string(),
                    pos: SourcePos::of(child),
                })
            }
        }
    }

    Ok(Some(ElementDecl {
        name,
        ref_,
        type_,
        occurs,
        nillable,
        abstract_,
        substitution_group,
        default,
    }))
}

fn read_attribute(node: Node) -> Result<Option<AttributeDecl>, ParseError> {
    let name = node.attribute("name").map(str::to_string);
    let ref_ = qname_attribute(node, "ref")?;
    let type_name = qname_attribute(node, "type")?;
    let default = node.attribute("default").map(str::to_string);
    let fixed = node.attribute("fixed").map(str::to_string);

    if name.is_none() && ref_.is_none() {
        return Err(ParseError::MissingAttribute {
            tag: "attribute",
            attribute: "name",
            pos: SourcePos::of(node),
        });
    }

    let use_ = match node.attribute("use") {
        Some("required") => AttributeUse::Required,
        Some("prohibited") => AttributeUse::Prohibited,
        _ => AttributeUse::Optional,
    };

    let mut type_ = type_name.map(TypeRef::Named);
    for child in node.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "simpleType" => {
                type_ = Some(TypeRef::Inline(Box::new(Type::Simple(read_simple_type(
                    child,
                )?))));
            }
            tag if IGNORED_TAGS.contains(&tag) => {}
            tag => {
                return Err(ParseError::UnsupportedTag {
                    tag: tag.to_string(),
                    pos: SourcePos::of(child),
                })
            }
        }
    }

    Ok(Some(AttributeDecl {
        name,
        ref_,
        type_,
        use_,
        default,
        fixed,
    }))
}

fn read_compositor(node: Node) -> Result<Particle, ParseError> {
    let occurs = read_occurs(node)?;
    let mut particles = Vec::new();
    for child in node.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "element" => {
                if let Some(element) = read_element(child, false)? {
                    particles.push(Particle::Element(element));
                }
            }
            "group" => {
                let ref_ = qname_attribute(child, "ref")?.ok_or_else(|| {
                    ParseError::MissingAttribute {
                        tag: "group",
                        attribute: "ref",
                        pos: SourcePos::of(child),
                    }
                })?;
                let occurs = read_occurs(child)?;
                if !occurs.is_void() {
                    particles.push(Particle::GroupRef { ref_, occurs });
                }
            }
            "sequence" | "choice" | "all" => {
                let nested = read_compositor(child)?;
                if !nested.occurs().is_void() {
                    particles.push(nested);
                }
            }
            "any" => {
                return Err(ParseError::UnsupportedConstruct {
                    construct: "<any> wildcard".to_string(),
                    pos: SourcePos::of(child),
                })
            }
            tag if IGNORED_TAGS.contains(&tag) => {}
            tag => {
                return Err(ParseError::UnsupportedTag {
                    tag: tag.to_string(),
                    pos: SourcePos::of(child),
                })
            }
        }
    }

    Ok(match node.tag_name().name() {
        "sequence" => Particle::Sequence { particles, occurs },
        "choice" => Particle::Choice { particles, occurs },
        "all" => Particle::All { particles, occurs },
        _ => unreachable!("caller checked the compositor tag"),
    })
}

fn read_complex_type(node: Node) -> Result<ComplexTypeDef, ParseError> {
    if node.attribute("mixed") == Some("true") {
        return Err(ParseError::UnsupportedConstruct {
            construct: "mixed content".to_string(),
            pos: SourcePos::of(node),
        });
    }
    if node.attribute("abstract") == Some("true") {
        return Err(ParseError::UnsupportedConstruct {
            construct: "abstract complex type".to_string(),
            pos: SourcePos::of(node),
        });
    }

    let mut def = ComplexTypeDef {
        base: None,
        content: None,
        attributes: Vec::new(),
        attribute_groups: Vec::new(),
        simple_content: false,
    };

    for child in node.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "sequence" | "choice" | "all" => def.content = Some(read_compositor(child)?),
            "attribute" => {
                if let Some(attribute) = read_attribute(child)? {
                    def.attributes.push(attribute);
                }
            }
            "attributeGroup" => {
                let ref_ = qname_attribute(child, "ref")?.ok_or_else(|| {
                    ParseError::MissingAttribute {
                        tag: "attributeGroup",
                        attribute: "ref",
                        pos: SourcePos::of(child),
                    }
                })?;
                def.attribute_groups.push(ref_);
            }
            "complexContent" => read_complex_content(child, &mut def)?,
            "simpleContent" => read_simple_content(child, &mut def)?,
            "assert" | "openContent" => {
                return Err(ParseError::UnsupportedConstruct {
                    construct: format!("XSD 1.1 <{}>", child.tag_name().name()),
                    pos: SourcePos::of(child),
                })
            }
            tag if IGNORED_TAGS.contains(&tag) => {}
            tag => {
                return Err(ParseError::UnsupportedTag {
                    tag: tag.to_string(),
                    pos: SourcePos::of(child),
                })
            }
        }
    }
    Ok(def)
}

/// `<complexContent>` wraps an extension or restriction of another complex
/// type. Restricting `xs:anyType` is the degenerate spelling of a plain
/// content definition.
fn read_complex_content(node: Node, def: &mut ComplexTypeDef) -> Result<(), ParseError> {
    if node.attribute("mixed") == Some("true") {
        return Err(ParseError::UnsupportedConstruct {
            construct: "mixed content".to_string(),
            pos: SourcePos::of(node),
        });
    }
    for child in node.children().filter(|c| c.is_element()) {
        let method = match child.tag_name().name() {
            "extension" => DerivationMethod::Extension,
            "restriction" => DerivationMethod::Restriction,
            tag if IGNORED_TAGS.contains(&tag) => continue,
            tag => {
                return Err(ParseError::UnsupportedTag {
                    tag: tag.to_string(),
                    pos: SourcePos::of(child),
                })
            }
        };
        let base = QName::parse(required(child, "derivation", "base")?, child)?;
        read_derivation_body(child, def)?;
        if base.is_builtin() {
            // restriction of anyType adds no base; anything else from the
            // XSD namespace cannot appear under complexContent
            if method == DerivationMethod::Extension || base.local_name != "anyType" {
                return Err(ParseError::UnsupportedConstruct {
                    construct: format!("complex content derived from xs:{}", base.local_name),
                    pos: SourcePos::of(child),
                });
            }
        } else {
            def.base = Some(Derivation { method, base });
        }
    }
    Ok(())
}

fn read_simple_content(node: Node, def: &mut ComplexTypeDef) -> Result<(), ParseError> {
    def.simple_content = true;
    for child in node.children().filter(|c| c.is_element()) {
        let method = match child.tag_name().name() {
            "extension" => DerivationMethod::Extension,
            "restriction" => DerivationMethod::Restriction,
            tag if IGNORED_TAGS.contains(&tag) => continue,
            tag => {
                return Err(ParseError::UnsupportedTag {
                    tag: tag.to_string(),
                    pos: SourcePos::of(child),
                })
            }
        };
        let base = QName::parse(required(child, "derivation", "base")?, child)?;
        read_derivation_body(child, def)?;
        def.base = Some(Derivation { method, base });
    }
    Ok(())
}

/// Collects the compositor, attributes and attribute groups declared inside
/// an `<extension>` or `<restriction>` body.
fn read_derivation_body(node: Node, def: &mut ComplexTypeDef) -> Result<(), ParseError> {
    for child in node.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "sequence" | "choice" | "all" => def.content = Some(read_compositor(child)?),
            "attribute" => {
                if let Some(attribute) = read_attribute(child)? {
                    def.attributes.push(attribute);
                }
            }
            "attributeGroup" => {
                let ref_ = qname_attribute(child, "ref")?.ok_or_else(|| {
                    ParseError::MissingAttribute {
                        tag: "attributeGroup",
                        attribute: "ref",
                        pos: SourcePos::of(child),
                    }
                })?;
                def.attribute_groups.push(ref_);
            }
            // facet tags may appear under simpleContent restrictions
            tag if FACET_TAGS.contains(&tag) => {}
            tag if IGNORED_TAGS.contains(&tag) => {}
            tag => {
                return Err(ParseError::UnsupportedTag {
                    tag: tag.to_string(),
                    pos: SourcePos::of(child),
                })
            }
        }
    }
    Ok(())
}

const FACET_TAGS: &[&str] = &[
    "enumeration",
    "fractionDigits",
    "length",
    "maxExclusive",
    "maxInclusive",
    "maxLength",
    "minExclusive",
    "minInclusive",
    "minLength",
    "pattern",
    "totalDigits",
    "whiteSpace",
];

fn read_simple_type(node: Node) -> Result<SimpleType, ParseError> {
    for child in node.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "restriction" => return read_simple_restriction(child),
            "list" => {
                let mut item = qname_attribute(child, "itemType")?.map(TypeRef::Named);
                for inner in child.children().filter(|c| c.is_element()) {
                    if inner.tag_name().name() == "simpleType" {
                        item = Some(TypeRef::Inline(Box::new(Type::Simple(read_simple_type(
                            inner,
                        )?))));
                    }
                }
                let item = item.ok_or_else(|| ParseError::MissingAttribute {
                    tag: "list",
                    attribute: "itemType",
                    pos: SourcePos::of(child),
                })?;
                return Ok(SimpleType::List {
                    item: Box::new(item),
                });
            }
            "union" => {
                let mut members: Vec<TypeRef> = Vec::new();
                if let Some(names) = child.attribute("memberTypes") {
                    for name in names.split_whitespace() {
                        members.push(TypeRef::Named(QName::parse(name, child)?));
                    }
                }
                for inner in child.children().filter(|c| c.is_element()) {
                    if inner.tag_name().name() == "simpleType" {
                        members.push(TypeRef::Inline(Box::new(Type::Simple(read_simple_type(
                            inner,
                        )?))));
                    }
                }
                return Ok(SimpleType::Union { members });
            }
            tag if IGNORED_TAGS.contains(&tag) => {}
            tag => {
                return Err(ParseError::UnsupportedTag {
                    tag: tag.to_string(),
                    pos: SourcePos::of(child),
                })
            }
        }
    }
    Err(ParseError::UnsupportedConstruct {
        construct: "empty simple type".to_string(),
        pos: SourcePos::of(node),
    })
}

fn read_simple_restriction(node: Node) -> Result<SimpleType, ParseError> {
    let base = QName::parse(required(node, "restriction", "base")?, node)?;
    let mut enumeration = Vec::new();
    let mut facets = Vec::new();

    let numeric = |child: Node, value: &str| {
        value.parse::<u64>().map_err(|_| ParseError::InvalidOccurs {
            value: value.to_string(),
            pos: SourcePos::of(child),
        })
    };

    for child in node.children().filter(|c| c.is_element()) {
        let tag = child.tag_name().name();
        if IGNORED_TAGS.contains(&tag) {
            continue;
        }
        let value = required(child, "facet", "value")?;
        match tag {
            "enumeration" => enumeration.push(value.to_string()),
            "minInclusive" => facets.push(Facet::MinInclusive(value.to_string())),
            "maxInclusive" => facets.push(Facet::MaxInclusive(value.to_string())),
            "minExclusive" => facets.push(Facet::MinExclusive(value.to_string())),
            "maxExclusive" => facets.push(Facet::MaxExclusive(value.to_string())),
            "pattern" => facets.push(Facet::Pattern(value.to_string())),
            "length" => facets.push(Facet::Length(numeric(child, value)?)),
            "minLength" => facets.push(Facet::MinLength(numeric(child, value)?)),
            "maxLength" => facets.push(Facet::MaxLength(numeric(child, value)?)),
            "totalDigits" => facets.push(Facet::TotalDigits(numeric(child, value)?)),
            "fractionDigits" => facets.push(Facet::FractionDigits(numeric(child, value)?)),
            "whiteSpace" => facets.push(Facet::WhiteSpace(value.to_string())),
            tag => {
                return Err(ParseError::UnsupportedTag {
                    tag: tag.to_string(),
                    pos: SourcePos::of(child),
                })
            }
        }
    }

    Ok(SimpleType::Restriction(Restriction {
        base,
        enumeration,
        facets,
    }))
}

fn read_group(node: Node) -> Result<GroupDef, ParseError> {
    let name = required(node, "group", "name")?.to_string();
    for child in node.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "sequence" | "choice" | "all" => {
                return Ok(GroupDef {
                    name,
                    particle: read_compositor(child)?,
                })
            }
            tag if IGNORED_TAGS.contains(&tag) => {}
            tag => {
                return Err(ParseError::UnsupportedTag {
                    tag: tag.to_string(),
                    pos: SourcePos::of(child),
                })
            }
        }
    }
    Err(ParseError::UnsupportedConstruct {
        construct: format!("group {:?} without a compositor", name),
        pos: SourcePos::of(node),
    })
}

fn read_attribute_group(node: Node) -> Result<AttributeGroupDef, ParseError> {
    let name = required(node, "attributeGroup", "name")?.to_string();
    let mut attributes = Vec::new();
    let mut attribute_groups = Vec::new();
    for child in node.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "attribute" => {
                if let Some(attribute) = read_attribute(child)? {
                    attributes.push(attribute);
                }
            }
            "attributeGroup" => {
                let ref_ = qname_attribute(child, "ref")?.ok_or_else(|| {
                    ParseError::MissingAttribute {
                        tag: "attributeGroup",
                        attribute: "ref",
                        pos: SourcePos::of(child),
                    }
                })?;
                attribute_groups.push(ref_);
            }
            tag if IGNORED_TAGS.contains(&tag) => {}
            tag => {
                return Err(ParseError::UnsupportedTag {
                    tag: tag.to_string(),
                    pos: SourcePos::of(child),
                })
            }
        }
    }
    Ok(AttributeGroupDef {
        name,
        attributes,
        attribute_groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::MaxOccurs;

    fn parse(text: &str) -> RawSchema {
        let doc = roxmltree::Document::parse(text).unwrap();
        read_schema(&doc).unwrap()
    }

    #[test]
    fn minimal_schema_has_single_element() {
        let schema = parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="class" type="xs:string" />
               </xs:schema>"#,
        );
        let names: Vec<_> = schema.elements.keys().cloned().collect();
        assert_eq!(names, vec!["class"]);
    }

    #[test]
    fn complex_type_with_sequence() {
        let schema = parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="person">
                   <xs:sequence>
                     <xs:element name="name" type="xs:string"/>
                     <xs:element name="age" type="xs:int" minOccurs="0"/>
                     <xs:element name="alias" type="xs:string" maxOccurs="unbounded"/>
                   </xs:sequence>
                   <xs:attribute name="id" type="xs:string" use="required"/>
                 </xs:complexType>
               </xs:schema>"#,
        );
        let person = schema.types["person"].as_complex().unwrap();
        let Some(Particle::Sequence { particles, .. }) = &person.content else {
            panic!("expected a sequence");
        };
        assert_eq!(particles.len(), 3);
        let Particle::Element(age) = &particles[1] else {
            panic!("expected an element");
        };
        assert_eq!(age.occurs.min, 0);
        let Particle::Element(alias) = &particles[2] else {
            panic!("expected an element");
        };
        assert_eq!(alias.occurs.max, MaxOccurs::Unbounded);
        assert_eq!(person.attributes.len(), 1);
        assert_eq!(person.attributes[0].use_, AttributeUse::Required);
    }

    #[test]
    fn enumeration_collected_in_order() {
        let schema = parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:simpleType name="color">
                   <xs:restriction base="xs:string">
                     <xs:enumeration value="red"/>
                     <xs:enumeration value="green"/>
                     <xs:enumeration value="blue"/>
                   </xs:restriction>
                 </xs:simpleType>
               </xs:schema>"#,
        );
        let SimpleType::Restriction(r) = schema.types["color"].as_simple().unwrap() else {
            panic!("expected a restriction");
        };
        assert_eq!(r.enumeration, vec!["red", "green", "blue"]);
    }

    #[test]
    fn facets_preserved_structurally() {
        let schema = parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:simpleType name="percent">
                   <xs:restriction base="xs:int">
                     <xs:minInclusive value="0"/>
                     <xs:maxInclusive value="100"/>
                   </xs:restriction>
                 </xs:simpleType>
               </xs:schema>"#,
        );
        let SimpleType::Restriction(r) = schema.types["percent"].as_simple().unwrap() else {
            panic!("expected a restriction");
        };
        assert_eq!(
            r.facets,
            vec![
                Facet::MinInclusive("0".to_string()),
                Facet::MaxInclusive("100".to_string()),
            ]
        );
    }

    #[test]
    fn max_occurs_zero_drops_the_element() {
        let schema = parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="t">
                   <xs:sequence>
                     <xs:element name="gone" type="xs:string" maxOccurs="0"/>
                     <xs:element name="kept" type="xs:string"/>
                   </xs:sequence>
                 </xs:complexType>
               </xs:schema>"#,
        );
        let t = schema.types["t"].as_complex().unwrap();
        let Some(Particle::Sequence { particles, .. }) = &t.content else {
            panic!("expected a sequence");
        };
        assert_eq!(particles.len(), 1);
    }

    #[test]
    fn unsupported_tag_is_rejected() {
        let doc = roxmltree::Document::parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:sneaky name="x"/>
               </xs:schema>"#,
        )
        .unwrap();
        let err = read_schema(&doc).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedTag { ref tag, .. } if tag == "sneaky"));
    }

    #[test]
    fn import_is_unsupported() {
        let doc = roxmltree::Document::parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:import namespace="urn:other"/>
               </xs:schema>"#,
        )
        .unwrap();
        let err = read_schema(&doc).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedConstruct { .. }));
    }

    #[test]
    fn duplicate_toplevel_name_is_rejected() {
        let doc = roxmltree::Document::parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="config" type="xs:string"/>
                 <xs:element name="config" type="xs:int"/>
               </xs:schema>"#,
        )
        .unwrap();
        let err = read_schema(&doc).unwrap_err();
        assert!(matches!(err, ParseError::Redefined { ref name, .. } if name == "config"));
    }

    #[test]
    fn simple_type_cannot_shadow_complex_type() {
        let doc = roxmltree::Document::parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="entry">
                   <xs:sequence/>
                 </xs:complexType>
                 <xs:simpleType name="entry">
                   <xs:restriction base="xs:string"/>
                 </xs:simpleType>
               </xs:schema>"#,
        )
        .unwrap();
        let err = read_schema(&doc).unwrap_err();
        assert!(matches!(err, ParseError::Redefined { ref name, .. } if name == "entry"));
    }
}
