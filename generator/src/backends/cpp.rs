//! C++ backend.
//!
//! Emits one header/source pair named after the package, plus a second
//! `_enums` pair when enum splitting is requested. Generated classes hold
//! const fields behind getters; parsing builds instances through the
//! constructor and reports failure as `std::nullopt`.

use xb_xsd::{Primitive, ResolvedSchema, SimpleRepr};

use super::common::{self, ClassPlan, Field, FieldSource, NativeRef, Plans};
use super::{GenerateError, Options};
use crate::mapping::{self, Scope, CPP_KEYWORDS};
use crate::output::{CodeWriter, OutputSet};

/// Which XML tree library the emitted code calls into. Style-only: the
/// parse and write logic is identical.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum XmlApi {
    LibXml2,
    TinyXml2,
}

impl XmlApi {
    fn include(self) -> &'static str {
        match self {
            Self::LibXml2 => "#include <libxml/parser.h>",
            Self::TinyXml2 => "#include <tinyxml2.h>",
        }
    }

    fn node_type(self) -> &'static str {
        match self {
            Self::LibXml2 => "xmlNode*",
            Self::TinyXml2 => "const tinyxml2::XMLElement*",
        }
    }

    fn child_loop(self) -> &'static str {
        match self {
            Self::LibXml2 => {
                "auto* _child = _root->xmlChildrenNode; _child != nullptr; _child = _child->next"
            }
            Self::TinyXml2 => {
                "const auto* _child = _root->FirstChildElement(); _child != nullptr; _child = _child->NextSiblingElement()"
            }
        }
    }

    fn tag_match(self, tag: &str) -> String {
        match self {
            Self::LibXml2 => format!(
                "!xmlStrcmp(_child->name, reinterpret_cast<const xmlChar*>(\"{}\"))",
                esc(tag)
            ),
            Self::TinyXml2 => format!("std::strcmp(_child->Name(), \"{}\") == 0", esc(tag)),
        }
    }
}

pub(crate) fn generate(
    schema: &ResolvedSchema,
    options: &Options,
) -> Result<OutputSet, GenerateError> {
    let plans = common::build(schema, CPP_KEYWORDS)?;
    let ctx = Context {
        plans: &plans,
        options,
        api: if options.alternate_xml_backend {
            XmlApi::TinyXml2
        } else {
            XmlApi::LibXml2
        },
        pkg: options.package.replace('.', "_"),
    };

    // The file set is a function of the package and the enum-split flag
    // alone; content flags never change it.
    let mut out = OutputSet::new();
    if options.emit_enums {
        out.insert(format!("include/{}_enums.h", ctx.pkg), ctx.enums_header());
        out.insert(format!("{}_enums.cpp", ctx.pkg), ctx.enums_source());
    }
    out.insert(format!("include/{}.h", ctx.pkg), ctx.header());
    out.insert(format!("{}.cpp", ctx.pkg), ctx.source());
    Ok(out)
}

/// C++ string literal escaping for emitted XML names and default values.
fn esc(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn scalar_type(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::String => "std::string",
        Primitive::Boolean => "bool",
        Primitive::Byte => "int8_t",
        Primitive::Short => "int16_t",
        Primitive::Int => "int32_t",
        Primitive::Long => "int64_t",
        Primitive::UnsignedByte => "uint8_t",
        Primitive::UnsignedShort => "uint16_t",
        Primitive::UnsignedInt => "uint32_t",
        Primitive::UnsignedLong => "uint64_t",
        Primitive::Float => "float",
        Primitive::Double => "double",
        Primitive::Bytes => "std::vector<uint8_t>",
    }
}

struct Context<'a> {
    plans: &'a Plans,
    options: &'a Options,
    api: XmlApi,
    pkg: String,
}

impl Context<'_> {
    fn repr_type(&self, repr: &SimpleRepr) -> String {
        match repr {
            SimpleRepr::Primitive(p) => scalar_type(*p).to_string(),
            SimpleRepr::Enum(key) => self.plans.native(key).to_string(),
            SimpleRepr::List(item) => format!("std::vector<{}>", self.repr_type(item)),
        }
    }

    fn base_type(&self, type_: &NativeRef) -> String {
        match type_ {
            NativeRef::Simple(repr) => self.repr_type(repr),
            NativeRef::Class(name) => name.clone(),
        }
    }

    fn member_type(&self, field: &Field) -> String {
        let base = self.base_type(&field.type_);
        if field.multiple {
            format!("std::vector<{}>", base)
        } else if field.optional {
            format!("std::optional<{}>", base)
        } else {
            base
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
        let suffix = mapping::class_case(&field.name);
        if self.options.boolean_getter && self.is_plain_bool(field) {
            format!("is{}", suffix)
        } else {
            format!("get{}", suffix)
        }
    }

    /// Lexical form -> native value expression. Lists are assembled at the
    /// call site, token by token.
    fn from_string(&self, repr: &SimpleRepr, expr: &str) -> String {
        match repr {
            SimpleRepr::Primitive(Primitive::String) => expr.to_string(),
            SimpleRepr::Primitive(Primitive::Boolean) => {
                format!("({0} == \"true\" || {0} == \"1\")", expr)
            }
            SimpleRepr::Primitive(Primitive::Byte) => {
                format!("static_cast<int8_t>(std::strtol({}.c_str(), nullptr, 10))", expr)
            }
            SimpleRepr::Primitive(Primitive::Short) => {
                format!("static_cast<int16_t>(std::strtol({}.c_str(), nullptr, 10))", expr)
            }
            SimpleRepr::Primitive(Primitive::Int) => {
                format!("static_cast<int32_t>(std::strtol({}.c_str(), nullptr, 10))", expr)
            }
            SimpleRepr::Primitive(Primitive::Long) => {
                format!("std::strtoll({}.c_str(), nullptr, 10)", expr)
            }
            SimpleRepr::Primitive(Primitive::UnsignedByte) => {
                format!("static_cast<uint8_t>(std::strtoul({}.c_str(), nullptr, 10))", expr)
            }
            SimpleRepr::Primitive(Primitive::UnsignedShort) => {
                format!("static_cast<uint16_t>(std::strtoul({}.c_str(), nullptr, 10))", expr)
            }
            SimpleRepr::Primitive(Primitive::UnsignedInt) => {
                format!("static_cast<uint32_t>(std::strtoul({}.c_str(), nullptr, 10))", expr)
            }
            SimpleRepr::Primitive(Primitive::UnsignedLong) => {
                format!("std::strtoull({}.c_str(), nullptr, 10)", expr)
            }
            SimpleRepr::Primitive(Primitive::Float) => {
                format!("std::strtof({}.c_str(), nullptr)", expr)
            }
            SimpleRepr::Primitive(Primitive::Double) => {
                format!("std::strtod({}.c_str(), nullptr)", expr)
            }
            SimpleRepr::Primitive(Primitive::Bytes) => format!("parseBytes({})", expr),
            SimpleRepr::Enum(key) => format!("stringTo{}({})", self.plans.native(key), expr),
            SimpleRepr::List(_) => unreachable!("lists are assembled token-wise"),
        }
    }

    fn to_string(&self, repr: &SimpleRepr, expr: &str) -> String {
        match repr {
            SimpleRepr::Primitive(Primitive::String) => expr.to_string(),
            SimpleRepr::Primitive(Primitive::Boolean) => {
                format!("({} ? \"true\" : \"false\")", expr)
            }
            SimpleRepr::Primitive(Primitive::Bytes) => format!("toHexString({})", expr),
            SimpleRepr::Primitive(_) => format!("std::to_string({})", expr),
            SimpleRepr::Enum(_) => format!("toString({})", expr),
            SimpleRepr::List(_) => unreachable!("lists are written token-wise"),
        }
    }

    fn uses_bytes(&self) -> bool {
        fn repr_has_bytes(repr: &SimpleRepr) -> bool {
            match repr {
                SimpleRepr::Primitive(p) => *p == Primitive::Bytes,
                SimpleRepr::Enum(_) => false,
                SimpleRepr::List(item) => repr_has_bytes(item),
            }
        }
        fn native_has_bytes(type_: &NativeRef) -> bool {
            match type_ {
                NativeRef::Simple(repr) => repr_has_bytes(repr),
                NativeRef::Class(_) => false,
            }
        }
        self.plans.classes.iter().any(|c| {
            c.fields.iter().any(|f| native_has_bytes(&f.type_))
                || c.value.as_ref().is_some_and(repr_has_bytes)
        }) || self.plans.roots.iter().any(|r| native_has_bytes(&r.type_))
    }

    /// Class plans ordered so that every class precedes the classes holding
    /// it by value. `std::optional` members need a complete type, so forward
    /// declarations are not enough; repeated fields are vectors and stay out
    /// of the ordering. A recursive schema falls back to declaration order
    /// for the affected classes.
    fn ordered_classes(&self) -> Vec<&ClassPlan> {
        fn visit<'a>(
            class: &'a ClassPlan,
            by_name: &std::collections::HashMap<&str, &'a ClassPlan>,
            done: &mut std::collections::HashSet<&'a str>,
            path: &mut Vec<&'a str>,
            out: &mut Vec<&'a ClassPlan>,
        ) {
            if done.contains(class.name.as_str()) || path.contains(&class.name.as_str()) {
                return;
            }
            path.push(&class.name);
            for f in &class.fields {
                if f.multiple {
                    continue;
                }
                if let NativeRef::Class(dep) = &f.type_ {
                    if let Some(dep) = by_name.get(dep.as_str()) {
                        visit(dep, by_name, done, path, out);
                    }
                }
            }
            path.pop();
            done.insert(&class.name);
            out.push(class);
        }

        let by_name: std::collections::HashMap<&str, &ClassPlan> = self
            .plans
            .classes
            .iter()
            .map(|c| (c.name.as_str(), c))
            .collect();
        let mut done = std::collections::HashSet::new();
        let mut out = Vec::new();
        for class in &self.plans.classes {
            visit(class, &by_name, &mut done, &mut Vec::new(), &mut out);
        }
        out
    }

    fn namespaces(&self) -> Vec<&str> {
        self.options.package.split('.').collect()
    }

    fn open_namespaces(&self, w: &mut CodeWriter) {
        for ns in self.namespaces() {
            w.println(&format!("namespace {} {{", ns));
        }
        w.blank();
    }

    fn close_namespaces(&self, w: &mut CodeWriter) {
        for ns in self.namespaces().into_iter().rev() {
            w.println(&format!("}} // namespace {}", ns));
        }
    }

    // --- enums ------------------------------------------------------------

    fn enum_decls(&self, w: &mut CodeWriter) {
        for e in &self.plans.enums {
            w.println(&format!("enum class {} {{", e.name));
            w.println("UNKNOWN = -1,");
            for (i, (_, ident)) in e.variants.iter().enumerate() {
                w.println(&format!("{} = {},", ident, i));
            }
            w.println("};");
            w.blank();
            w.println(&format!(
                "{0} stringTo{0}(const std::string& _value);",
                e.name
            ));
            w.println(&format!("std::string toString({} _value);", e.name));
            w.blank();
        }
    }

    fn enum_defs(&self, w: &mut CodeWriter) {
        for e in &self.plans.enums {
            w.println(&format!(
                "{0} stringTo{0}(const std::string& _value) {{",
                e.name
            ));
            for (literal, ident) in &e.variants {
                w.println(&format!("if (_value == \"{}\") {{", esc(literal)));
                w.println(&format!("return {}::{};", e.name, ident));
                w.println("}");
            }
            w.println(&format!("return {}::UNKNOWN;", e.name));
            w.println("}");
            w.blank();
            w.println(&format!("std::string toString({} _value) {{", e.name));
            w.println("switch (_value) {");
            for (literal, ident) in &e.variants {
                w.println(&format!(
                    "case {}::{}: return \"{}\";",
                    e.name,
                    ident,
                    esc(literal)
                ));
            }
            w.println("default: return \"\";");
            w.println("}");
            w.println("}");
            w.blank();
        }
    }

    fn enums_header(&self) -> String {
        let mut w = CodeWriter::new();
        let guard = format!("{}_ENUMS_H", self.pkg.to_uppercase());
        w.println(&format!("#ifndef {}", guard));
        w.println(&format!("#define {}", guard));
        w.blank();
        w.println("#include <string>");
        w.blank();
        self.open_namespaces(&mut w);
        self.enum_decls(&mut w);
        self.close_namespaces(&mut w);
        w.blank();
        w.println(&format!("#endif // {}", guard));
        w.finish()
    }

    fn enums_source(&self) -> String {
        let mut w = CodeWriter::new();
        w.println(&format!("#include \"{}_enums.h\"", self.pkg));
        w.blank();
        self.open_namespaces(&mut w);
        self.enum_defs(&mut w);
        self.close_namespaces(&mut w);
        w.finish()
    }

    // --- main header ------------------------------------------------------

    fn header(&self) -> String {
        let mut w = CodeWriter::new();
        let guard = format!("{}_H", self.pkg.to_uppercase());
        w.println(&format!("#ifndef {}", guard));
        w.println(&format!("#define {}", guard));
        w.blank();
        w.println("#include <cstdint>");
        w.println("#include <iostream>");
        w.println("#include <optional>");
        w.println("#include <string>");
        w.println("#include <vector>");
        w.blank();
        w.println(self.api.include());
        w.blank();
        if self.options.emit_enums {
            w.println(&format!("#include \"{}_enums.h\"", self.pkg));
            w.blank();
        }
        self.open_namespaces(&mut w);
        if !self.options.emit_enums {
            self.enum_decls(&mut w);
        }
        for c in &self.plans.classes {
            w.println(&format!("class {};", c.name));
        }
        if !self.plans.classes.is_empty() {
            w.blank();
        }
        self.root_decls(&mut w);
        for c in self.ordered_classes() {
            self.class_decl(&mut w, c);
            w.blank();
        }
        self.close_namespaces(&mut w);
        w.blank();
        w.println(&format!("#endif // {}", guard));
        w.finish()
    }

    fn class_roots(&self) -> impl Iterator<Item = (&common::RootPlan, &str, String)> {
        // (plan, class name, function suffix); abstract heads have no
        // concrete document form
        let mut scope = Scope::new(CPP_KEYWORDS);
        self.plans
            .roots
            .iter()
            .filter(|r| !r.abstract_)
            .filter_map(move |r| match &r.type_ {
                NativeRef::Class(name) => {
                    let suffix = scope
                        .claim(&r.tag, mapping::class_case(&r.tag))
                        .unwrap_or_else(|_| mapping::class_case(&r.tag));
                    Some((r, name.as_str(), suffix))
                }
                NativeRef::Simple(_) => None,
            })
    }

    fn root_decls(&self, w: &mut CodeWriter) {
        let mut any = false;
        for (_, class, suffix) in self.class_roots() {
            if self.options.emit_parser {
                w.println(&format!(
                    "std::optional<{}> read{}(const char* _filename);",
                    class, suffix
                ));
                any = true;
            }
            if self.options.emit_writer {
                w.println(&format!(
                    "void write{}(std::ostream& _out, const {}& _value);",
                    suffix, class
                ));
                any = true;
            }
        }
        if any {
            w.blank();
        }
    }

    fn class_decl(&self, w: &mut CodeWriter, c: &ClassPlan) {
        w.println(&format!("class {} {{", c.name));
        w.println("private:");
        for f in &c.fields {
            w.println(&format!("const {} {}_;", self.member_type(f), f.name));
        }
        if let Some(value) = &c.value {
            w.println(&format!("const {} _value_;", self.repr_type(value)));
        }
        w.println("public:");
        w.println(&format!("{}({});", c.name, self.ctor_params(c)));
        for f in &c.fields {
            for line in self.getter_decls(f) {
                w.println(&line);
            }
        }
        if let Some(value) = &c.value {
            w.println(&format!(
                "const {}& getValue() const;",
                self.repr_type(value)
            ));
        }
        if self.options.emit_parser {
            w.println(&format!(
                "static std::optional<{}> read({} _root);",
                c.name,
                self.api.node_type()
            ));
        }
        if self.options.emit_writer {
            w.println("void write(std::ostream& _out, const std::string& _name) const;");
        }
        w.println("};");
    }

    fn ctor_params(&self, c: &ClassPlan) -> String {
        let mut params: Vec<String> = c
            .fields
            .iter()
            .map(|f| format!("{} {}", self.member_type(f), f.name))
            .collect();
        if let Some(value) = &c.value {
            params.push(format!("{} _value", self.repr_type(value)));
        }
        params.join(", ")
    }

    fn getter_decls(&self, f: &Field) -> Vec<String> {
        let base = self.base_type(&f.type_);
        let getter = self.getter_name(f);
        let mut decls = Vec::new();
        if f.multiple {
            decls.push(format!("const std::vector<{}>& {}() const;", base, getter));
        } else if self.is_plain_bool(f) {
            decls.push(format!("bool {}() const;", getter));
        } else {
            decls.push(format!("const {}& {}() const;", base, getter));
        }
        if f.optional && !f.multiple {
            decls.push(format!("bool has{}() const;", mapping::class_case(&f.name)));
        }
        decls
    }

    // --- main source ------------------------------------------------------

    fn source(&self) -> String {
        let mut w = CodeWriter::new();
        w.println(&format!("#include \"{}.h\"", self.pkg));
        w.blank();
        w.println("#include <cstdlib>");
        w.println("#include <cstring>");
        w.println("#include <iomanip>");
        w.println("#include <sstream>");
        w.blank();
        self.open_namespaces(&mut w);
        if !self.options.emit_enums {
            self.enum_defs(&mut w);
        }
        if self.options.emit_parser {
            self.parse_helpers(&mut w);
        }
        if self.options.emit_writer && self.uses_bytes() {
            self.write_helpers(&mut w);
        }
        for c in self.ordered_classes() {
            self.class_defs(&mut w, c);
        }
        self.root_defs(&mut w);
        self.close_namespaces(&mut w);
        w.finish()
    }

    fn parse_helpers(&self, w: &mut CodeWriter) {
        let node = self.api.node_type();
        match self.api {
            XmlApi::LibXml2 => {
                w.println(&format!(
                    "static std::string getXmlAttribute({} _node, const char* _name) {{",
                    node
                ));
                w.println("xmlChar* _prop = xmlGetProp(_node, reinterpret_cast<const xmlChar*>(_name));");
                w.println("if (_prop == nullptr) {");
                w.println("return \"\";");
                w.println("}");
                w.println("std::string _result(reinterpret_cast<const char*>(_prop));");
                w.println("xmlFree(_prop);");
                w.println("return _result;");
                w.println("}");
                w.blank();
                w.println(&format!("static std::string getXmlText({} _node) {{", node));
                w.println("xmlChar* _text = xmlNodeListGetString(_node->doc, _node->xmlChildrenNode, 1);");
                w.println("if (_text == nullptr) {");
                w.println("return \"\";");
                w.println("}");
                w.println("std::string _result(reinterpret_cast<const char*>(_text));");
                w.println("xmlFree(_text);");
                w.println("return _result;");
                w.println("}");
                w.blank();
            }
            XmlApi::TinyXml2 => {
                w.println(&format!(
                    "static std::string getXmlAttribute({} _node, const char* _name) {{",
                    node
                ));
                w.println("const char* _value = _node->Attribute(_name);");
                w.println("return _value == nullptr ? \"\" : _value;");
                w.println("}");
                w.blank();
                w.println(&format!("static std::string getXmlText({} _node) {{", node));
                w.println("const char* _value = _node->GetText();");
                w.println("return _value == nullptr ? \"\" : _value;");
                w.println("}");
                w.blank();
            }
        }
        if self.uses_bytes() {
            w.println("static std::vector<uint8_t> parseBytes(const std::string& _value) {");
            w.println("std::vector<uint8_t> _bytes;");
            w.println("for (size_t _i = 0; _i + 1 < _value.size(); _i += 2) {");
            w.println(
                "_bytes.push_back(static_cast<uint8_t>(std::strtoul(_value.substr(_i, 2).c_str(), nullptr, 16)));",
            );
            w.println("}");
            w.println("return _bytes;");
            w.println("}");
            w.blank();
        }
    }

    fn write_helpers(&self, w: &mut CodeWriter) {
        w.println("static std::string toHexString(const std::vector<uint8_t>& _bytes) {");
        w.println("std::ostringstream _out;");
        w.println("for (uint8_t _byte : _bytes) {");
        w.println(
            "_out << std::hex << std::setw(2) << std::setfill('0') << static_cast<int>(_byte);",
        );
        w.println("}");
        w.println("return _out.str();");
        w.println("}");
        w.blank();
    }

    fn class_defs(&self, w: &mut CodeWriter, c: &ClassPlan) {
        self.ctor_def(w, c);
        self.getter_defs(w, c);
        if self.options.emit_parser {
            self.read_def(w, c);
        }
        if self.options.emit_writer {
            self.write_def(w, c);
        }
    }

    fn ctor_def(&self, w: &mut CodeWriter, c: &ClassPlan) {
        let mut inits: Vec<String> = c
            .fields
            .iter()
            .map(|f| format!("{0}_(std::move({0}))", f.name))
            .collect();
        if c.value.is_some() {
            inits.push("_value_(std::move(_value))".to_string());
        }
        if inits.is_empty() {
            w.println(&format!("{0}::{0}() {{", c.name));
        } else {
            w.println(&format!(
                "{0}::{0}({1}) : {2} {{",
                c.name,
                self.ctor_params(c),
                inits.join(", ")
            ));
        }
        w.println("}");
        w.blank();
    }

    fn getter_defs(&self, w: &mut CodeWriter, c: &ClassPlan) {
        for f in &c.fields {
            let base = self.base_type(&f.type_);
            let getter = self.getter_name(f);
            if f.multiple {
                w.println(&format!(
                    "const std::vector<{}>& {}::{}() const {{",
                    base, c.name, getter
                ));
                w.println(&format!("return {}_;", f.name));
                w.println("}");
            } else if self.is_plain_bool(f) {
                w.println(&format!("bool {}::{}() const {{", c.name, getter));
                if f.optional {
                    w.println(&format!("return {}_.value();", f.name));
                } else {
                    w.println(&format!("return {}_;", f.name));
                }
                w.println("}");
            } else {
                w.println(&format!(
                    "const {}& {}::{}() const {{",
                    base, c.name, getter
                ));
                if f.optional {
                    w.println(&format!("return {}_.value();", f.name));
                } else {
                    w.println(&format!("return {}_;", f.name));
                }
                w.println("}");
            }
            w.blank();
            if f.optional && !f.multiple {
                w.println(&format!(
                    "bool {}::has{}() const {{",
                    c.name,
                    mapping::class_case(&f.name)
                ));
                w.println(&format!("return {}_.has_value();", f.name));
                w.println("}");
                w.blank();
            }
        }
        if let Some(value) = &c.value {
            w.println(&format!(
                "const {}& {}::getValue() const {{",
                self.repr_type(value),
                c.name
            ));
            w.println("return _value_;");
            w.println("}");
            w.blank();
        }
    }

    /// Emits the token-wise assembly of a whitespace-separated list value
    /// into a fresh local named `_list`.
    fn emit_list_assembly(&self, w: &mut CodeWriter, item: &SimpleRepr, source: &str) {
        w.println(&format!(
            "std::vector<{}> _list;",
            self.repr_type(item)
        ));
        w.println(&format!("std::istringstream _stream({});", source));
        w.println("for (std::string _token; _stream >> _token;) {");
        w.println(&format!(
            "_list.push_back({});",
            self.from_string(item, "_token")
        ));
        w.println("}");
    }

    fn read_def(&self, w: &mut CodeWriter, c: &ClassPlan) {
        w.println(&format!(
            "std::optional<{0}> {0}::read({1} _root) {{",
            c.name,
            self.api.node_type()
        ));

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
            w.println("std::string _raw;");
        }
        for f in &attributes {
            let NativeRef::Simple(repr) = &f.type_ else {
                unreachable!("attributes are simple-typed");
            };
            w.println(&format!(
                "_raw = getXmlAttribute(_root, \"{}\");",
                esc(&f.xml_name)
            ));
            if let Some(default) = &f.default {
                w.println("if (_raw == \"\") {");
                w.println(&format!("_raw = \"{}\";", esc(default)));
                w.println("}");
            }
            if f.optional {
                w.println(&format!("std::optional<{}> {};", self.repr_type(repr), f.name));
                w.println("if (_raw != \"\") {");
                match repr {
                    SimpleRepr::List(item) => {
                        self.emit_list_assembly(w, item, "_raw");
                        w.println(&format!("{} = std::move(_list);", f.name));
                    }
                    _ => w.println(&format!(
                        "{} = {};",
                        f.name,
                        self.from_string(repr, "_raw")
                    )),
                }
                w.println("}");
            } else {
                match repr {
                    SimpleRepr::List(item) => {
                        w.println(&format!("{} {};", self.repr_type(repr), f.name));
                        w.println("{");
                        self.emit_list_assembly(w, item, "_raw");
                        w.println(&format!("{} = std::move(_list);", f.name));
                        w.println("}");
                    }
                    _ => w.println(&format!(
                        "{} {} = {};",
                        self.repr_type(repr),
                        f.name,
                        self.from_string(repr, "_raw")
                    )),
                }
            }
        }

        for f in &elements {
            let base = self.base_type(&f.type_);
            if f.multiple {
                w.println(&format!("std::vector<{}> {};", base, f.name));
            } else {
                w.println(&format!("std::optional<{}> {};", base, f.name));
            }
        }

        if !elements.is_empty() {
            w.println(&format!("for ({}) {{", self.api.child_loop()));
            let mut first = true;
            for f in &elements {
                let keyword = if first { "if" } else { "} else if" };
                first = false;
                w.println(&format!(
                    "{} ({}) {{",
                    keyword,
                    self.api.tag_match(&f.xml_name)
                ));
                match &f.type_ {
                    NativeRef::Class(class) => {
                        w.println(&format!("auto _parsed = {}::read(_child);", class));
                        w.println("if (!_parsed) {");
                        w.println("return std::nullopt;");
                        w.println("}");
                        if f.multiple {
                            w.println(&format!("{}.push_back(std::move(*_parsed));", f.name));
                        } else {
                            // generated classes hold const fields and are not
                            // assignable, so construct in place
                            w.println(&format!("{}.emplace(std::move(*_parsed));", f.name));
                        }
                    }
                    NativeRef::Simple(repr) => {
                        w.println("std::string _text = getXmlText(_child);");
                        match repr {
                            SimpleRepr::List(item) => {
                                self.emit_list_assembly(w, item, "_text");
                                if f.multiple {
                                    w.println(&format!(
                                        "{}.push_back(std::move(_list));",
                                        f.name
                                    ));
                                } else {
                                    w.println(&format!("{} = std::move(_list);", f.name));
                                }
                            }
                            _ => {
                                let value = self.from_string(repr, "_text");
                                if f.multiple {
                                    w.println(&format!("{}.push_back({});", f.name, value));
                                } else {
                                    w.println(&format!("{} = {};", f.name, value));
                                }
                            }
                        }
                    }
                }
            }
            w.println("}");
            w.println("}");
        }

        // a required choice with no matching child is a parse failure
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
                        format!("{}.empty()", f.name)
                    } else {
                        format!("!{}", f.name)
                    }
                })
                .collect::<Vec<_>>()
                .join(" && ");
            w.println(&format!("if ({}) {{", cond));
            w.println("return std::nullopt;");
            w.println("}");
        }

        // missing non-optional aggregate children are parse failures too
        for f in &elements {
            if f.multiple || f.optional {
                continue;
            }
            if matches!(f.type_, NativeRef::Class(_)) {
                w.println(&format!("if (!{}) {{", f.name));
                w.println("return std::nullopt;");
                w.println("}");
            }
        }

        let mut args: Vec<String> = Vec::new();
        for f in &c.fields {
            let arg = match f.source {
                FieldSource::Attribute => format!("std::move({})", f.name),
                FieldSource::Element => {
                    if f.multiple || f.optional {
                        format!("std::move({})", f.name)
                    } else {
                        match &f.type_ {
                            NativeRef::Class(_) => format!("std::move(*{})", f.name),
                            NativeRef::Simple(repr) => format!(
                                "{}.value_or({})",
                                f.name,
                                self.scalar_default(repr)
                            ),
                        }
                    }
                }
            };
            args.push(arg);
        }
        if let Some(value) = &c.value {
            w.println("std::string _content = getXmlText(_root);");
            match value {
                SimpleRepr::List(item) => {
                    self.emit_list_assembly(w, item, "_content");
                    args.push("std::move(_list)".to_string());
                }
                _ => args.push(self.from_string(value, "_content")),
            }
        }
        w.println(&format!("return {}({});", c.name, args.join(", ")));
        w.println("}");
        w.blank();
    }

    /// The value a missing required scalar falls back to.
    fn scalar_default(&self, repr: &SimpleRepr) -> String {
        match repr {
            SimpleRepr::Enum(key) => format!("{}::UNKNOWN", self.plans.native(key)),
            _ => format!("{}()", self.repr_type(repr)),
        }
    }

    fn write_def(&self, w: &mut CodeWriter, c: &ClassPlan) {
        w.println(&format!(
            "void {}::write(std::ostream& _out, const std::string& _name) const {{",
            c.name
        ));
        w.println("_out << \"<\" << _name;");
        for f in c.fields.iter().filter(|f| f.source == FieldSource::Attribute) {
            let NativeRef::Simple(repr) = &f.type_ else {
                unreachable!("attributes are simple-typed");
            };
            if f.optional {
                w.println(&format!("if ({}_) {{", f.name));
                self.emit_attribute_write(w, f, repr, &format!("{}_.value()", f.name));
                w.println("}");
            } else {
                self.emit_attribute_write(w, f, repr, &format!("{}_", f.name));
            }
        }
        if let Some(value) = &c.value {
            w.println("_out << \">\";");
            match value {
                SimpleRepr::List(item) => {
                    self.emit_list_write(w, item, "_value_", "_out");
                }
                _ => w.println(&format!(
                    "_out << {};",
                    self.to_string(value, "_value_")
                )),
            }
            w.println("_out << \"</\" << _name << \">\" << std::endl;");
            w.println("}");
            w.blank();
            return;
        }
        w.println("_out << \">\" << std::endl;");
        for f in c.fields.iter().filter(|f| f.source == FieldSource::Element) {
            if f.multiple {
                w.println(&format!("for (const auto& _item : {}_) {{", f.name));
                self.emit_element_write(w, f, "_item");
                w.println("}");
            } else if f.optional {
                w.println(&format!("if ({}_) {{", f.name));
                self.emit_element_write(w, f, &format!("{}_.value()", f.name));
                w.println("}");
            } else {
                self.emit_element_write(w, f, &format!("{}_", f.name));
            }
        }
        w.println("_out << \"</\" << _name << \">\" << std::endl;");
        w.println("}");
        w.blank();
    }

    fn emit_attribute_write(&self, w: &mut CodeWriter, f: &Field, repr: &SimpleRepr, expr: &str) {
        match repr {
            SimpleRepr::List(item) => {
                w.println("{");
                w.println("std::ostringstream _tokens;");
                w.println("bool _first = true;");
                w.println(&format!("for (const auto& _item : {}) {{", expr));
                w.println("if (!_first) {");
                w.println("_tokens << \" \";");
                w.println("}");
                w.println("_first = false;");
                w.println(&format!("_tokens << {};", self.to_string(item, "_item")));
                w.println("}");
                w.println(&format!(
                    "_out << \" {}=\\\"\" << _tokens.str() << \"\\\"\";",
                    esc(&f.xml_name)
                ));
                w.println("}");
            }
            _ => w.println(&format!(
                "_out << \" {}=\\\"\" << {} << \"\\\"\";",
                esc(&f.xml_name),
                self.to_string(repr, expr)
            )),
        }
    }

    fn emit_list_write(&self, w: &mut CodeWriter, item: &SimpleRepr, expr: &str, out: &str) {
        w.println("{");
        w.println("bool _first = true;");
        w.println(&format!("for (const auto& _token : {}) {{", expr));
        w.println("if (!_first) {");
        w.println(&format!("{} << \" \";", out));
        w.println("}");
        w.println("_first = false;");
        w.println(&format!("{} << {};", out, self.to_string(item, "_token")));
        w.println("}");
        w.println("}");
    }

    fn emit_element_write(&self, w: &mut CodeWriter, f: &Field, expr: &str) {
        match &f.type_ {
            NativeRef::Class(_) => {
                w.println(&format!("{}.write(_out, \"{}\");", expr, esc(&f.xml_name)));
            }
            NativeRef::Simple(SimpleRepr::List(item)) => {
                w.println(&format!("_out << \"<{}>\";", esc(&f.xml_name)));
                self.emit_list_write(w, item, expr, "_out");
                w.println(&format!(
                    "_out << \"</{}>\" << std::endl;",
                    esc(&f.xml_name)
                ));
            }
            NativeRef::Simple(repr) => {
                w.println(&format!(
                    "_out << \"<{0}>\" << {1} << \"</{0}>\" << std::endl;",
                    esc(&f.xml_name),
                    self.to_string(repr, expr)
                ));
            }
        }
    }

    fn root_defs(&self, w: &mut CodeWriter) {
        for (root, class, suffix) in self.class_roots() {
            if self.options.emit_parser {
                w.println(&format!(
                    "std::optional<{}> read{}(const char* _filename) {{",
                    class, suffix
                ));
                match self.api {
                    XmlApi::LibXml2 => {
                        w.println("xmlDoc* _doc = xmlParseFile(_filename);");
                        w.println("if (_doc == nullptr) {");
                        w.println("return std::nullopt;");
                        w.println("}");
                        w.println("xmlNode* _root = xmlDocGetRootElement(_doc);");
                        w.println(&format!(
                            "if (_root == nullptr || xmlStrcmp(_root->name, reinterpret_cast<const xmlChar*>(\"{}\"))) {{",
                            esc(&root.tag)
                        ));
                        w.println("xmlFreeDoc(_doc);");
                        w.println("return std::nullopt;");
                        w.println("}");
                        w.println(&format!(
                            "std::optional<{}> _value = {}::read(_root);",
                            class, class
                        ));
                        w.println("xmlFreeDoc(_doc);");
                        w.println("return _value;");
                    }
                    XmlApi::TinyXml2 => {
                        w.println("tinyxml2::XMLDocument _doc;");
                        w.println(
                            "if (_doc.LoadFile(_filename) != tinyxml2::XML_SUCCESS) {",
                        );
                        w.println("return std::nullopt;");
                        w.println("}");
                        w.println("const tinyxml2::XMLElement* _root = _doc.RootElement();");
                        w.println(&format!(
                            "if (_root == nullptr || std::strcmp(_root->Name(), \"{}\") != 0) {{",
                            esc(&root.tag)
                        ));
                        w.println("return std::nullopt;");
                        w.println("}");
                        w.println(&format!("return {}::read(_root);", class));
                    }
                }
                w.println("}");
                w.blank();
            }
            if self.options.emit_writer {
                w.println(&format!(
                    "void write{}(std::ostream& _out, const {}& _value) {{",
                    suffix, class
                ));
                w.println(
                    "_out << \"<?xml version=\\\"1.0\\\" encoding=\\\"utf-8\\\"?>\" << std::endl;",
                );
                w.println(&format!("_value.write(_out, \"{}\");", esc(&root.tag)));
                w.println("}");
                w.blank();
            }
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
            emit_writer: true,
            emit_enums: false,
            boolean_getter: false,
            alternate_xml_backend: false,
            backend: Backend::Cpp,
        }
    }

    fn schema(text: &str) -> ResolvedSchema {
        let doc = roxmltree::Document::parse(text).unwrap();
        xb_xsd::load_schema(&doc).unwrap()
    }

    const MINIMAL: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
        <xs:element name="class" type="xs:string"/>
    </xs:schema>"#;

    #[test]
    fn minimal_schema_file_set() {
        let out = generate(&schema(MINIMAL), &options("com.abc")).unwrap();
        let names: Vec<_> = out.file_names().collect();
        assert_eq!(names, vec!["include/com_abc.h", "com_abc.cpp"]);
    }

    #[test]
    fn enum_flag_adds_exactly_the_enum_pair_even_without_enums() {
        let mut opts = options("com.abc");
        opts.emit_enums = true;
        let out = generate(&schema(MINIMAL), &opts).unwrap();
        let mut names: Vec<_> = out.file_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "com_abc.cpp",
                "com_abc_enums.cpp",
                "include/com_abc.h",
                "include/com_abc_enums.h",
            ]
        );
    }

    #[test]
    fn file_set_ignores_parser_and_writer_flags() {
        let with_both = generate(&schema(MINIMAL), &options("com.abc")).unwrap();
        let mut opts = options("com.abc");
        opts.emit_parser = false;
        opts.emit_writer = false;
        let with_neither = generate(&schema(MINIMAL), &opts).unwrap();
        let a: Vec<_> = with_both.file_names().collect();
        let b: Vec<_> = with_neither.file_names().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn generation_is_deterministic() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:simpleType name="color">
              <xs:restriction base="xs:string">
                <xs:enumeration value="red"/>
                <xs:enumeration value="green"/>
              </xs:restriction>
            </xs:simpleType>
            <xs:element name="config">
              <xs:complexType>
                <xs:sequence>
                  <xs:element name="entry" type="xs:string" maxOccurs="unbounded"/>
                  <xs:element name="tint" type="color" minOccurs="0"/>
                </xs:sequence>
                <xs:attribute name="version" type="xs:int" use="required"/>
              </xs:complexType>
            </xs:element>
        </xs:schema>"#;
        let first = generate(&schema(text), &options("com.abc")).unwrap();
        let second = generate(&schema(text), &options("com.abc")).unwrap();
        for (name, content) in first.iter() {
            assert_eq!(Some(content), second.get(name));
        }
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn enum_declaration_has_all_variants_and_unknown_fallback() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:simpleType name="color">
              <xs:restriction base="xs:string">
                <xs:enumeration value="red"/>
                <xs:enumeration value="green"/>
                <xs:enumeration value="not-set"/>
              </xs:restriction>
            </xs:simpleType>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        let header = out.get("include/com_abc.h").unwrap();
        assert!(header.contains("enum class Color {"));
        assert!(header.contains("UNKNOWN = -1,"));
        assert!(header.contains("red = 0,"));
        assert!(header.contains("green = 1,"));
        assert!(header.contains("not_set = 2,"));
        let source = out.get("com_abc.cpp").unwrap();
        assert!(source.contains("return Color::UNKNOWN;"));
        assert!(source.contains("case Color::not_set: return \"not-set\";"));
    }

    #[test]
    fn colliding_type_names_stay_distinct() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:complexType name="audio-policy">
              <xs:sequence/>
            </xs:complexType>
            <xs:complexType name="audioPolicy">
              <xs:sequence/>
            </xs:complexType>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        let header = out.get("include/com_abc.h").unwrap();
        assert!(header.contains("class AudioPolicy;"));
        assert!(header.contains("class AudioPolicy2;"));
    }

    #[test]
    fn boolean_getter_style() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:complexType name="flagged">
              <xs:sequence/>
              <xs:attribute name="enabled" type="xs:boolean" use="required"/>
            </xs:complexType>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        assert!(out
            .get("include/com_abc.h")
            .unwrap()
            .contains("bool getEnabled() const;"));
        let mut opts = options("com.abc");
        opts.boolean_getter = true;
        let out = generate(&schema(text), &opts).unwrap();
        assert!(out
            .get("include/com_abc.h")
            .unwrap()
            .contains("bool isEnabled() const;"));
    }

    #[test]
    fn writer_emits_fields_in_declared_order() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:complexType name="pair">
              <xs:all>
                <xs:element name="second" type="xs:string"/>
                <xs:element name="first" type="xs:string"/>
              </xs:all>
            </xs:complexType>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        let source = out.get("com_abc.cpp").unwrap();
        let write_body = &source[source.find("void Pair::write").unwrap()..];
        let second = write_body.find("<second>").unwrap();
        let first = write_body.find("<first>").unwrap();
        assert!(second < first);
    }

    #[test]
    fn required_choice_fails_parse_when_unmatched() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:complexType name="either">
              <xs:choice>
                <xs:element name="left" type="xs:string"/>
                <xs:element name="right" type="xs:string"/>
              </xs:choice>
            </xs:complexType>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        let source = out.get("com_abc.cpp").unwrap();
        assert!(source.contains("if (!left && !right) {"));
    }

    #[test]
    fn substitution_members_become_parser_branches() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:element name="shape" type="xs:string" abstract="true"/>
            <xs:element name="circle" type="xs:string" substitutionGroup="shape"/>
            <xs:element name="square" type="xs:string" substitutionGroup="shape"/>
            <xs:complexType name="canvas">
              <xs:sequence>
                <xs:element ref="shape"/>
              </xs:sequence>
            </xs:complexType>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        let header = out.get("include/com_abc.h").unwrap();
        assert!(header.contains("getCircle() const;"));
        assert!(header.contains("getSquare() const;"));
        // the abstract head never becomes a field of its own
        assert!(!header.contains("getShape() const;"));
        let source = out.get("com_abc.cpp").unwrap();
        assert!(source.contains("reinterpret_cast<const xmlChar*>(\"circle\")"));
        assert!(source.contains("reinterpret_cast<const xmlChar*>(\"square\")"));
    }

    #[test]
    fn alternate_backend_switches_call_syntax() {
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
        assert!(out.get("com_abc.cpp").unwrap().contains("xmlStrcmp"));
        let mut opts = options("com.abc");
        opts.alternate_xml_backend = true;
        let out = generate(&schema(text), &opts).unwrap();
        let source = out.get("com_abc.cpp").unwrap();
        assert!(source.contains("FirstChildElement"));
        assert!(!source.contains("xmlStrcmp"));
    }

    #[test]
    fn enums_inline_when_split_disabled() {
        let text = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:simpleType name="color">
              <xs:restriction base="xs:string">
                <xs:enumeration value="red"/>
              </xs:restriction>
            </xs:simpleType>
        </xs:schema>"#;
        let out = generate(&schema(text), &options("com.abc")).unwrap();
        assert!(out.get("include/com_abc.h").unwrap().contains("enum class Color"));
        let mut opts = options("com.abc");
        opts.emit_enums = true;
        let out = generate(&schema(text), &opts).unwrap();
        assert!(!out.get("include/com_abc.h").unwrap().contains("enum class Color"));
        assert!(out
            .get("include/com_abc_enums.h")
            .unwrap()
            .contains("enum class Color"));
    }
}
