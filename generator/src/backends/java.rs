//! Java backend.
//!
//! Emits one `.java` file per class and per enum under the package
//! directory, plus an `XmlParser` support class. Parsing is built on
//! `org.w3c.dom`; this backend has no writer. Generated classes are mutable
//! beans: the parser populates them through setters and list getters, and a
//! required choice that never matched throws.

use xb_xsd::{Primitive, ResolvedSchema, SimpleRepr};

use super::common::{self, ClassPlan, EnumPlan, Field, FieldSource, NativeRef, Plans};
use super::{GenerateError, Options};
use crate::mapping::{self, Scope, JAVA_KEYWORDS};
use crate::output::{CodeWriter, OutputSet};

pub(crate) fn generate(
    schema: &ResolvedSchema,
    options: &Options,
) -> Result<OutputSet, GenerateError> {
    let plans = common::build(schema, JAVA_KEYWORDS)?;
    let ctx = Context {
        plans: &plans,
        options,
        dir: options.package.replace('.', "/"),
    };

    let mut out = OutputSet::new();
    for e in &plans.enums {
        out.insert(format!("{}/{}.java", ctx.dir, e.name), ctx.enum_file(e));
    }
    for c in &plans.classes {
        out.insert(format!("{}/{}.java", ctx.dir, c.name), ctx.class_file(c));
    }
    if options.emit_parser {
        out.insert(format!("{}/XmlParser.java", ctx.dir), ctx.parser_file());
    }
    Ok(out)
}

fn esc(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Accessor suffix derived from the final field identifier, trailing
/// keyword escape included. Re-casing the XML name here would turn the
/// field `class_` into `getClass`, which collides with the final
/// `java.lang.Object.getClass()`.
fn accessor_suffix(field_name: &str) -> String {
    let mut chars = field_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Java spelling of a scalar. Optional scalars use the boxed form so that
/// absence is representable as null.
fn scalar_type(primitive: Primitive, boxed: bool) -> &'static str {
    match primitive {
        Primitive::String => "String",
        Primitive::Boolean => {
            if boxed {
                "Boolean"
            } else {
                "boolean"
            }
        }
        Primitive::Byte => {
            if boxed {
                "Byte"
            } else {
                "byte"
            }
        }
        // unsigned values are widened into the next signed size
        Primitive::Short | Primitive::UnsignedByte => {
            if boxed {
                "Short"
            } else {
                "short"
            }
        }
        Primitive::Int | Primitive::UnsignedShort => {
            if boxed {
                "Integer"
            } else {
                "int"
            }
        }
        Primitive::Long | Primitive::UnsignedInt => {
            if boxed {
                "Long"
            } else {
                "long"
            }
        }
        Primitive::UnsignedLong => "java.math.BigInteger",
        Primitive::Float => {
            if boxed {
                "Float"
            } else {
                "float"
            }
        }
        Primitive::Double => {
            if boxed {
                "Double"
            } else {
                "double"
            }
        }
        Primitive::Bytes => "byte[]",
    }
}

struct Context<'a> {
    plans: &'a Plans,
    options: &'a Options,
    dir: String,
}

impl Context<'_> {
    fn repr_type(&self, repr: &SimpleRepr, boxed: bool) -> String {
        match repr {
            SimpleRepr::Primitive(p) => scalar_type(*p, boxed).to_string(),
            SimpleRepr::Enum(key) => self.plans.native(key).to_string(),
            SimpleRepr::List(item) => {
                format!("java.util.List<{}>", self.repr_type(item, true))
            }
        }
    }

    fn base_type(&self, type_: &NativeRef, boxed: bool) -> String {
        match type_ {
            NativeRef::Simple(repr) => self.repr_type(repr, boxed),
            NativeRef::Class(name) => name.clone(),
        }
    }

    fn field_type(&self, field: &Field) -> String {
        if field.multiple {
            format!("java.util.List<{}>", self.base_type(&field.type_, true))
        } else {
            self.base_type(&field.type_, field.optional)
        }
    }

    fn is_plain_bool(&self, field: &Field) -> bool {
        !field.multiple
            && matches!(
                &field.type_,
                NativeRef::Simple(SimpleRepr::Primitive(Primitive::Boolean))
            )
    }

    fn getter_name(&self, field: &Field) -> String {
        let suffix = accessor_suffix(&field.name);
        if self.options.boolean_getter && self.is_plain_bool(field) {
            format!("is{}", suffix)
        } else {
            format!("get{}", suffix)
        }
    }

    fn from_string(&self, repr: &SimpleRepr, expr: &str) -> String {
        match repr {
            SimpleRepr::Primitive(Primitive::String) => expr.to_string(),
            SimpleRepr::Primitive(Primitive::Boolean) => {
                format!("Boolean.parseBoolean({})", expr)
            }
            SimpleRepr::Primitive(Primitive::Byte) => format!("Byte.parseByte({})", expr),
            SimpleRepr::Primitive(Primitive::Short | Primitive::UnsignedByte) => {
                format!("Short.parseShort({})", expr)
            }
            SimpleRepr::Primitive(Primitive::Int | Primitive::UnsignedShort) => {
                format!("Integer.parseInt({})", expr)
            }
            SimpleRepr::Primitive(Primitive::Long | Primitive::UnsignedInt) => {
                format!("Long.parseLong({})", expr)
            }
            SimpleRepr::Primitive(Primitive::UnsignedLong) => {
                format!("new java.math.BigInteger({})", expr)
            }
            SimpleRepr::Primitive(Primitive::Float) => format!("Float.parseFloat({})", expr),
            SimpleRepr::Primitive(Primitive::Double) => format!("Double.parseDouble({})", expr),
            SimpleRepr::Primitive(Primitive::Bytes) => format!("XmlParser.parseBytes({})", expr),
            SimpleRepr::Enum(key) => format!("{}.fromString({})", self.plans.native(key), expr),
            SimpleRepr::List(_) => unreachable!("lists are assembled token-wise"),
        }
    }

    fn package_header(&self, w: &mut CodeWriter) {
        w.println(&format!("package {};", self.options.package));
        w.blank();
    }

    fn enum_file(&self, e: &EnumPlan) -> String {
        let mut w = CodeWriter::new();
        self.package_header(&mut w);
        w.println(&format!("public enum {} {{", e.name));
        w.println("UNKNOWN(\"__unknown__\"),");
        for (i, (literal, ident)) in e.variants.iter().enumerate() {
            let separator = if i + 1 == e.variants.len() { ";" } else { "," };
            w.println(&format!("{}(\"{}\"){}", ident, esc(literal), separator));
        }
        if e.variants.is_empty() {
            // trailing separator belongs to the UNKNOWN constant then
            w.println(";");
        }
        w.blank();
        w.println("private final String rawName;");
        w.blank();
        w.println(&format!("{}(String rawName) {{", e.name));
        w.println("this.rawName = rawName;");
        w.println("}");
        w.blank();
        w.println("public String getRawName() {");
        w.println("return rawName;");
        w.println("}");
        w.blank();
        w.println(&format!("public static {} fromString(String _value) {{", e.name));
        w.println(&format!("for ({} _variant : values()) {{", e.name));
        w.println("if (_variant != UNKNOWN && _variant.getRawName().equals(_value)) {");
        w.println("return _variant;");
        w.println("}");
        w.println("}");
        w.println("return UNKNOWN;");
        w.println("}");
        w.println("}");
        w.finish()
    }

    fn class_file(&self, c: &ClassPlan) -> String {
        let mut w = CodeWriter::new();
        self.package_header(&mut w);
        w.println(&format!("public class {} {{", c.name));
        for f in &c.fields {
            w.println(&format!("private {} {};", self.field_type(f), f.name));
        }
        if let Some(value) = &c.value {
            w.println(&format!("private {} _value;", self.repr_type(value, true)));
        }
        w.blank();
        for f in &c.fields {
            self.accessors(&mut w, f);
        }
        if let Some(value) = &c.value {
            let type_ = self.repr_type(value, true);
            w.println(&format!("public {} getValue() {{", type_));
            w.println("return _value;");
            w.println("}");
            w.blank();
            w.println(&format!("public void setValue({} value) {{", type_));
            w.println("this._value = value;");
            w.println("}");
            w.blank();
        }
        if self.options.emit_parser {
            self.read_def(&mut w, c);
        }
        w.println("}");
        w.finish()
    }

    fn accessors(&self, w: &mut CodeWriter, f: &Field) {
        let type_ = self.field_type(f);
        let getter = self.getter_name(f);
        if f.multiple {
            // lazily initialized so the parser can append unconditionally
            w.println(&format!("public {} {}() {{", type_, getter));
            w.println(&format!("if ({} == null) {{", f.name));
            w.println(&format!("{} = new java.util.ArrayList<>();", f.name));
            w.println("}");
            w.println(&format!("return {};", f.name));
            w.println("}");
            w.blank();
            return;
        }
        w.println(&format!("public {} {}() {{", type_, getter));
        w.println(&format!("return {};", f.name));
        w.println("}");
        w.blank();
        w.println(&format!(
            "public void set{}({} {}) {{",
            accessor_suffix(&f.name),
            type_,
            f.name
        ));
        w.println(&format!("this.{0} = {0};", f.name));
        w.println("}");
        w.blank();
        if f.optional {
            w.println(&format!("public boolean has{}() {{", accessor_suffix(&f.name)));
            w.println(&format!("return {} != null;", f.name));
            w.println("}");
            w.blank();
        }
    }

    /// Emits the token-wise assembly of a whitespace-separated list into a
    /// fresh local named `_list`.
    fn emit_list_assembly(&self, w: &mut CodeWriter, item: &SimpleRepr, source: &str) {
        w.println(&format!(
            "java.util.List<{}> _list = new java.util.ArrayList<>();",
            self.repr_type(item, true)
        ));
        w.println(&format!("for (String _token : {}.trim().split(\"\\\\s+\")) {{", source));
        w.println("if (_token.isEmpty()) {");
        w.println("continue;");
        w.println("}");
        w.println(&format!("_list.add({});", self.from_string(item, "_token")));
        w.println("}");
    }

    fn read_def(&self, w: &mut CodeWriter, c: &ClassPlan) {
        w.println(&format!(
            "public static {} read(org.w3c.dom.Element _root) {{",
            c.name
        ));
        w.println(&format!("{0} _instance = new {0}();", c.name));

        let attributes: Vec<&Field> = c
            .fields
            .iter()
            .filter(|f| f.source == FieldSource::Attribute)
            .collect();
        let elements: Vec<&Field> = c
            .fields
            .iter()
            .filter(|f| f.source == FieldSource::Element)
            .collect();

        if !attributes.is_empty() {
            w.println("String _raw;");
        }
        for f in &attributes {
            let NativeRef::Simple(repr) = &f.type_ else {
                unreachable!("attributes are simple-typed");
            };
            w.println(&format!(
                "_raw = _root.getAttribute(\"{}\");",
                esc(&f.xml_name)
            ));
            if let Some(default) = &f.default {
                w.println("if (_raw.isEmpty()) {");
                w.println(&format!("_raw = \"{}\";", esc(default)));
                w.println("}");
            }
            w.println("if (!_raw.isEmpty()) {");
            let setter = format!("set{}", accessor_suffix(&f.name));
            match repr {
                SimpleRepr::List(item) => {
                    self.emit_list_assembly(w, item, "_raw");
                    w.println(&format!("_instance.{}(_list);", setter));
                }
                _ => w.println(&format!(
                    "_instance.{}({});",
                    setter,
                    self.from_string(repr, "_raw")
                )),
            }
            w.println("}");
        }

        if !elements.is_empty() {
            w.println("org.w3c.dom.NodeList _children = _root.getChildNodes();");
            w.println("for (int _i = 0; _i < _children.getLength(); _i++) {");
            w.println("org.w3c.dom.Node _node = _children.item(_i);");
            w.println("if (_node.getNodeType() != org.w3c.dom.Node.ELEMENT_NODE) {");
            w.println("continue;");
            w.println("}");
            w.println("org.w3c.dom.Element _child = (org.w3c.dom.Element) _node;");
            w.println("String _tag = _child.getTagName();");
            let mut first = true;
            for f in &elements {
                let keyword = if first { "if" } else { "} else if" };
                first = false;
                w.println(&format!("{} (_tag.equals(\"{}\")) {{", keyword, esc(&f.xml_name)));
                let expr = match &f.type_ {
                    NativeRef::Class(class) => format!("{}.read(_child)", class),
                    NativeRef::Simple(SimpleRepr::List(_)) => String::new(),
                    NativeRef::Simple(repr) => {
                        self.from_string(repr, "XmlParser.readText(_child)")
                    }
                };
                match &f.type_ {
                    NativeRef::Simple(SimpleRepr::List(item)) => {
                        self.emit_list_assembly(w, item, "XmlParser.readText(_child)");
                        if f.multiple {
                            w.println(&format!(
                                "_instance.{}().add(_list);",
                                self.getter_name(f)
                            ));
                        } else {
                            w.println(&format!(
                                "_instance.set{}(_list);",
                                accessor_suffix(&f.name)
                            ));
                        }
                    }
                    _ => {
                        if f.multiple {
                            w.println(&format!(
                                "_instance.{}().add({});",
                                self.getter_name(f),
                                expr
                            ));
                        } else {
                            w.println(&format!(
                                "_instance.set{}({});",
                                accessor_suffix(&f.name),
                                expr
                            ));
                        }
                    }
                }
            }
            w.println("}");
            w.println("}");
        }

        // a required choice with no matching child is malformed input
        for group in &c.choices {
            if !group.required || group.fields.is_empty() {
                continue;
            }
            let cond = group
                .fields
                .iter()
                .map(|&i| {
                    let f = &c.fields[i];
                    if f.multiple {
                        format!("_instance.{}().isEmpty()", self.getter_name(f))
                    } else {
                        format!("_instance.{}() == null", self.getter_name(f))
                    }
                })
                .collect::<Vec<_>>()
                .join(" && ");
            w.println(&format!("if ({}) {{", cond));
            w.println(&format!(
                "throw new IllegalArgumentException(\"{}: no element of a required choice was present\");",
                c.name
            ));
            w.println("}");
        }

        // missing non-optional aggregate children are malformed input too
        for f in &elements {
            if f.multiple || f.optional {
                continue;
            }
            if matches!(f.type_, NativeRef::Class(_)) {
                w.println(&format!(
                    "if (_instance.{}() == null) {{",
                    self.getter_name(f)
                ));
                w.println(&format!(
                    "throw new IllegalArgumentException(\"{}: missing required element {}\");",
                    c.name,
                    esc(&f.xml_name)
                ));
                w.println("}");
            }
        }

        if let Some(value) = &c.value {
            match value {
                SimpleRepr::List(item) => {
                    self.emit_list_assembly(w, item, "XmlParser.readText(_root)");
                    w.println("_instance.setValue(_list);");
                }
                _ => w.println(&format!(
                    "_instance.setValue({});",
                    self.from_string(value, "XmlParser.readText(_root)")
                )),
            }
        }
        w.println("return _instance;");
        w.println("}");
        w.blank();
    }

    fn parser_file(&self) -> String {
        let mut w = CodeWriter::new();
        self.package_header(&mut w);
        w.println("public class XmlParser {");
        w.println("public static String readText(org.w3c.dom.Element _element) {");
        w.println("String _text = _element.getTextContent();");
        w.println("return _text == null ? \"\" : _text;");
        w.println("}");
        w.blank();
        w.println("public static byte[] parseBytes(String _value) {");
        w.println("byte[] _bytes = new byte[_value.length() / 2];");
        w.println("for (int _i = 0; _i + 1 < _value.length(); _i += 2) {");
        w.println("_bytes[_i / 2] = (byte) Integer.parseInt(_value.substring(_i, _i + 2), 16);");
        w.println("}");
        w.println("return _bytes;");
        w.println("}");
        w.blank();
        w.println(
            "public static org.w3c.dom.Element readRoot(java.io.InputStream _in, String _name) throws Exception {",
        );
        w.println(
            "javax.xml.parsers.DocumentBuilderFactory _factory = javax.xml.parsers.DocumentBuilderFactory.newInstance();",
        );
        w.println("org.w3c.dom.Document _document = _factory.newDocumentBuilder().parse(_in);");
        w.println("org.w3c.dom.Element _root = _document.getDocumentElement();");
        w.println("if (_root == null || !_root.getTagName().equals(_name)) {");
        w.println(
            "throw new IllegalArgumentException(\"unexpected root element \" + (_root == null ? \"(none)\" : _root.getTagName()));",
        );
        w.println("}");
        w.println("return _root;");
        w.println("}");
        self.root_readers(&mut w);
        w.println("}");
        w.finish()
    }

    fn root_readers(&self, w: &mut CodeWriter) {
        let mut scope = Scope::new(JAVA_KEYWORDS);
        for root in self.plans.roots.iter().filter(|r| !r.abstract_) {
            let NativeRef::Class(class) = &root.type_ else {
                continue;
            };
            let suffix = scope
                .claim(&root.tag, mapping::class_case(&root.tag))
                .unwrap_or_else(|_| mapping::class_case(&root.tag));
            w.blank();
            w.println(&format!(
                "public static {} read{}(java.io.InputStream _in) throws Exception {{",
                class, suffix
            ));
            w.println(&format!(
                "return {}.read(readRoot(_in, \"{}\"));",
                class,
                esc(&root.tag)
            ));
            w.println("}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Backend, Options};
    use super::*;

    fn options(package: &str) -> Options {
        Options {
            package: package.to_string(),
            emit_parser: true,
            emit_writer: false,
            emit_enums: false,
            boolean_getter: false,
            alternate_xml_backend: false,
            backend: Backend::Java,
        }
    }

    fn schema(text: &str) -> ResolvedSchema {
        let doc = roxmltree::Document::parse(text).unwrap();
        xb_xsd::load_schema(&doc).unwrap()
    }

    #[test]
    fn one_file_per_class_and_enum_plus_support() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:simpleType name="color">
              <xs:restriction base="xs:string">
                <xs:enumeration value="red"/>
              </xs:restriction>
            </xs:simpleType>
            <xs:complexType name="config">
              <xs:sequence>
                <xs:element name="tint" type="color" minOccurs="0"/>
              </xs:sequence>
            </xs:complexType>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        let mut names: Vec<_> = out.file_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "com/abc/Color.java",
                "com/abc/Config.java",
                "com/abc/XmlParser.java",
            ]
        );
    }

    #[test]
    fn class_file_declares_package_and_bean_accessors() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:complexType name="config">
              <xs:sequence>
                <xs:element name="entry" type="xs:string" maxOccurs="unbounded"/>
              </xs:sequence>
              <xs:attribute name="version" type="xs:int" use="required"/>
            </xs:complexType>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        let file = out.get("com/abc/Config.java").unwrap();
        assert!(file.starts_with("package com.abc;"));
        assert!(file.contains("public java.util.List<String> getEntry() {"));
        assert!(file.contains("public int getVersion() {"));
        assert!(file.contains("public void setVersion(int version) {"));
    }

    #[test]
    fn optional_scalars_use_boxed_types() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:complexType name="config">
              <xs:sequence/>
              <xs:attribute name="count" type="xs:int"/>
            </xs:complexType>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        let file = out.get("com/abc/Config.java").unwrap();
        assert!(file.contains("private Integer count;"));
        assert!(file.contains("public boolean hasCount() {"));
    }

    #[test]
    fn keyword_field_accessors_keep_the_escape() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:complexType name="school">
              <xs:sequence>
                <xs:element name="class" type="xs:string"/>
              </xs:sequence>
            </xs:complexType>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        let file = out.get("com/abc/School.java").unwrap();
        assert!(file.contains("private String class_;"));
        // Object.getClass() is final, so the accessor keeps the underscore
        assert!(file.contains("public String getClass_() {"));
        assert!(file.contains("public void setClass_(String class_) {"));
        assert!(!file.contains("public String getClass() {"));
    }

    #[test]
    fn missing_required_class_element_throws() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:complexType name="inner">
              <xs:sequence>
                <xs:element name="entry" type="xs:string" maxOccurs="unbounded"/>
              </xs:sequence>
            </xs:complexType>
            <xs:complexType name="outer">
              <xs:sequence>
                <xs:element name="inner" type="inner"/>
              </xs:sequence>
            </xs:complexType>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        let file = out.get("com/abc/Outer.java").unwrap();
        assert!(file.contains("if (_instance.getInner() == null) {"));
        assert!(file
            .contains("throw new IllegalArgumentException(\"Outer: missing required element inner\");"));
    }

    #[test]
    fn required_choice_throws_when_unmatched() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:complexType name="either">
              <xs:choice>
                <xs:element name="left" type="xs:string"/>
                <xs:element name="right" type="xs:string"/>
              </xs:choice>
            </xs:complexType>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        let file = out.get("com/abc/Either.java").unwrap();
        assert!(file.contains("if (_instance.getLeft() == null && _instance.getRight() == null) {"));
        assert!(file.contains("throw new IllegalArgumentException"));
    }

    #[test]
    fn enum_fromstring_falls_back_to_unknown() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:simpleType name="color">
              <xs:restriction base="xs:string">
                <xs:enumeration value="red"/>
                <xs:enumeration value="not-set"/>
              </xs:restriction>
            </xs:simpleType>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        let file = out.get("com/abc/Color.java").unwrap();
        assert!(file.contains("red(\"red\"),"));
        assert!(file.contains("not_set(\"not-set\");"));
        assert!(file.contains("return UNKNOWN;"));
    }

    #[test]
    fn root_reader_emitted_on_support_class() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:element name="config">
              <xs:complexType>
                <xs:sequence>
                  <xs:element name="entry" type="xs:string" maxOccurs="unbounded"/>
                </xs:sequence>
              </xs:complexType>
            </xs:element>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        let file = out.get("com/abc/XmlParser.java").unwrap();
        assert!(file.contains(
            "public static Config readConfig(java.io.InputStream _in) throws Exception {"
        ));
        assert!(file.contains("return Config.read(readRoot(_in, \"config\"));"));
    }
}
