//! XML name to native identifier mapping.
//!
//! Sanitization must be injective within one generation run: two distinct
//! XML names never produce the same identifier. A [`Scope`] tracks the
//! identifiers already handed out (case-insensitively, since file systems
//! and some conventions are not case-sensitive) and disambiguates with a
//! discovery-order suffix.

use std::collections::HashMap;

use heck::{ToLowerCamelCase, ToUpperCamelCase};
use thiserror::Error;

pub const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char16_t", "char32_t", "class", "compl", "const", "const_cast",
    "constexpr", "continue", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "return", "short", "signed", "sizeof", "static", "static_assert",
    "static_cast", "struct", "switch", "template", "this", "thread_local", "throw", "true",
    "try", "typedef", "typeid", "typename", "union", "unsigned", "using", "virtual", "void",
    "volatile", "wchar_t", "while", "xor", "xor_eq",
];

pub const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

#[derive(Debug, Error)]
#[error("identifier {identifier:?} is generated for both {first:?} and {second:?}")]
pub struct IdentifierCollision {
    pub identifier: String,
    pub first: String,
    pub second: String,
}

/// Leading digits are legal in XML names (after a prefix) but not in
/// identifiers.
fn guard_start(name: String) -> String {
    match name.chars().next() {
        None => "Empty".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{}", name),
        _ => name,
    }
}

pub fn class_case(xml_name: &str) -> String {
    guard_start(xml_name.to_upper_camel_case())
}

pub fn variable_case(xml_name: &str) -> String {
    guard_start(xml_name.to_lower_camel_case())
}

/// Enumeration literals keep their spelling as far as possible; anything
/// that cannot appear in an identifier becomes an underscore.
pub fn enum_variant(literal: &str) -> String {
    if literal.is_empty() {
        return "EMPTY".to_string();
    }
    let mut name: String = literal
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

fn escape_keyword(name: String, keywords: &[&str]) -> String {
    if keywords.contains(&name.as_str()) {
        format!("{}_", name)
    } else {
        name
    }
}

/// One identifier namespace (all type names, or the fields of one class).
pub struct Scope {
    keywords: &'static [&'static str],
    /// lowercased identifier -> the XML name it was assigned for
    taken: HashMap<String, String>,
    /// XML name -> assigned identifier, so repeated queries are stable
    assigned: HashMap<String, String>,
}

impl Scope {
    pub fn new(keywords: &'static [&'static str]) -> Self {
        Self {
            keywords,
            taken: HashMap::new(),
            assigned: HashMap::new(),
        }
    }

    /// Marks an identifier as unavailable without tying it to an XML name.
    pub fn reserve(&mut self, identifier: &str) {
        self.taken
            .insert(identifier.to_lowercase(), identifier.to_string());
    }

    /// Assigns a unique identifier for `xml_name`, starting from `candidate`
    /// and appending a numeric suffix on collision.
    pub fn claim(
        &mut self,
        xml_name: &str,
        candidate: String,
    ) -> Result<String, IdentifierCollision> {
        if let Some(existing) = self.assigned.get(xml_name) {
            return Ok(existing.clone());
        }
        let candidate = escape_keyword(candidate, self.keywords);
        let mut attempt = candidate.clone();
        let mut suffix = 2u32;
        loop {
            let key = attempt.to_lowercase();
            if !self.taken.contains_key(&key) {
                self.taken.insert(key, xml_name.to_string());
                self.assigned
                    .insert(xml_name.to_string(), attempt.clone());
                return Ok(attempt);
            }
            if suffix > 1000 {
                return Err(IdentifierCollision {
                    identifier: candidate.clone(),
                    first: self.taken[&candidate.to_lowercase()].clone(),
                    second: xml_name.to_string(),
                });
            }
            attempt = format!("{}{}", candidate, suffix);
            suffix += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casing() {
        assert_eq!(class_case("audio-policy"), "AudioPolicy");
        assert_eq!(variable_case("first-name"), "firstName");
        assert_eq!(class_case("3d-model"), "_3dModel");
    }

    #[test]
    fn enum_variant_spelling() {
        assert_eq!(enum_variant("red"), "red");
        assert_eq!(enum_variant("not-set"), "not_set");
        assert_eq!(enum_variant("1080p"), "_1080p");
        assert_eq!(enum_variant(""), "EMPTY");
    }

    #[test]
    fn keywords_escaped() {
        let mut scope = Scope::new(CPP_KEYWORDS);
        assert_eq!(scope.claim("default", "default".to_string()).unwrap(), "default_");
    }

    #[test]
    fn case_insensitive_collisions_get_suffixes() {
        let mut scope = Scope::new(CPP_KEYWORDS);
        assert_eq!(scope.claim("class", "Class".to_string()).unwrap(), "Class");
        assert_eq!(scope.claim("CLASS", "Class".to_string()).unwrap(), "Class2");
        assert_eq!(scope.claim("Class", "Class".to_string()).unwrap(), "Class3");
        // repeated queries for the same XML name stay stable
        assert_eq!(scope.claim("CLASS", "Class".to_string()).unwrap(), "Class2");
    }

    #[test]
    fn reserved_names_are_avoided() {
        let mut scope = Scope::new(CPP_KEYWORDS);
        scope.reserve("XmlParser");
        assert_eq!(
            scope.claim("xml-parser", "XmlParser".to_string()).unwrap(),
            "XmlParser2"
        );
    }
}
