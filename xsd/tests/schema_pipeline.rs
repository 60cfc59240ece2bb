//! End-to-end pass over a schema that combines most supported constructs.

use xb_xsd::{
    MaxOccurs, Primitive, ResolvedParticle, ResolvedSchema, ResolvedTypeRef, SchemaError,
    SimpleRepr,
};

fn load(text: &str) -> Result<ResolvedSchema, SchemaError> {
    let doc = roxmltree::Document::parse(text).unwrap();
    xb_xsd::load_schema(&doc)
}

const SCHEMA: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:simpleType name="severity">
    <xs:restriction base="xs:string">
      <xs:enumeration value="info"/>
      <xs:enumeration value="warning"/>
      <xs:enumeration value="error"/>
    </xs:restriction>
  </xs:simpleType>

  <xs:attributeGroup name="identified">
    <xs:attribute name="id" type="xs:string" use="required"/>
  </xs:attributeGroup>

  <xs:complexType name="entry">
    <xs:sequence>
      <xs:element name="message" type="xs:string"/>
      <xs:element name="level" type="severity" minOccurs="0"/>
    </xs:sequence>
    <xs:attributeGroup ref="identified"/>
  </xs:complexType>

  <xs:complexType name="timedEntry">
    <xs:complexContent>
      <xs:extension base="entry">
        <xs:sequence>
          <xs:element name="timestamp" type="xs:long"/>
        </xs:sequence>
      </xs:extension>
    </xs:complexContent>
  </xs:complexType>

  <xs:element name="log">
    <xs:complexType>
      <xs:sequence>
        <xs:element name="entry" type="timedEntry" maxOccurs="unbounded"/>
      </xs:sequence>
      <xs:attribute name="version" type="xs:int" default="1"/>
    </xs:complexType>
  </xs:element>
</xs:schema>"#;

#[test]
fn full_pipeline_resolves_every_component() {
    let schema = load(SCHEMA).unwrap();

    let severity = schema.enum_("severity").unwrap();
    assert_eq!(severity.variants, vec!["info", "warning", "error"]);

    // extension chain stacks base content first
    let timed = schema.class("timedEntry").unwrap();
    let (particles, attributes) = schema.stacked(timed);
    let tags: Vec<_> = particles
        .iter()
        .map(|p| match p {
            ResolvedParticle::Element(e) => e.tag.as_str(),
            _ => panic!("expected plain elements"),
        })
        .collect();
    assert_eq!(tags, vec!["message", "level", "timestamp"]);
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes[0].xml_name, "id");
    assert!(attributes[0].required);

    // the root's inline type became a named class
    let root = &schema.roots["log"];
    assert_eq!(root.type_, ResolvedTypeRef::Class("log".into()));
    let log = schema.class("log").unwrap();
    let ResolvedParticle::Element(entries) = &log.particles[0] else {
        panic!("expected an element");
    };
    assert_eq!(entries.occurs.max, MaxOccurs::Unbounded);
    assert_eq!(
        entries.type_,
        ResolvedTypeRef::Class("timedEntry".into())
    );
    assert_eq!(log.attributes[0].default.as_deref(), Some("1"));
    assert_eq!(
        log.attributes[0].repr,
        SimpleRepr::Primitive(Primitive::Int)
    );
}

#[test]
fn errors_surface_through_the_combined_taxonomy() {
    let err = load(
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
             <xs:element name="log" type="missing"/>
           </xs:schema>"#,
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::Resolve(_)));

    let err = load(
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
             <xs:unknownTag name="x"/>
           </xs:schema>"#,
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::Parse(_)));
}
