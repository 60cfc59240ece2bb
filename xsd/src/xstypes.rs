use crate::error::ParseError;
use std::fmt;

pub type NCName = String;
pub type AnyURI = String;

/// Namespace name of the XML Schema definition language itself. Type
/// references into this namespace denote built-in datatypes.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace_name: Option<AnyURI>,
    pub local_name: NCName,
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace_name) = self.namespace_name.as_ref() {
            write!(f, "{{{}}}{}", namespace_name, self.local_name)
        } else {
            write!(f, "{}", self.local_name)
        }
    }
}

impl QName {
    pub fn with_namespace(
        namespace_name: impl Into<String>,
        local_name: impl Into<String>,
    ) -> Self {
        Self::with_optional_namespace(Some(namespace_name), local_name)
    }

    pub fn with_optional_namespace(
        namespace_name: Option<impl Into<String>>,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace_name: namespace_name.map(Into::into),
            local_name: local_name.into(),
        }
    }

    pub fn unprefixed(local_name: impl Into<String>) -> Self {
        Self {
            namespace_name: None,
            local_name: local_name.into(),
        }
    }

    /// Whether this name refers to a built-in XSD datatype.
    pub fn is_builtin(&self) -> bool {
        self.namespace_name.as_deref() == Some(XSD_NAMESPACE)
    }

    /// Resolves a lexical QName (`prefix:local` or `local`) against the
    /// namespace declarations in scope at `context`.
    pub fn parse(source: &str, context: roxmltree::Node) -> Result<Self, ParseError> {
        if let Some((prefix, local)) = source.rsplit_once(':') {
            let resolved_prefix = if prefix == "xml" {
                // The prefix xml is by definition bound to
                // http://www.w3.org/XML/1998/namespace.
                "http://www.w3.org/XML/1998/namespace"
            } else {
                context
                    .lookup_namespace_uri(Some(prefix))
                    .ok_or_else(|| ParseError::UnresolvedPrefix {
                        prefix: prefix.into(),
                        pos: crate::error::SourcePos::of(context),
                    })?
            };
            Ok(Self::with_namespace(resolved_prefix, local))
        } else {
            // Unprefixed names take the default namespace, if declared.
            let namespace_name = context.lookup_namespace_uri(None);
            Ok(Self::with_optional_namespace(namespace_name, source))
        }
    }
}

pub type Sequence<T> = Vec<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qname_display() {
        let q = QName::with_namespace("urn:a", "foo");
        assert_eq!(q.to_string(), "{urn:a}foo");
        let q = QName::unprefixed("foo");
        assert_eq!(q.to_string(), "foo");
    }

    #[test]
    fn builtin_detection() {
        assert!(QName::with_namespace(XSD_NAMESPACE, "string").is_builtin());
        assert!(!QName::unprefixed("string").is_builtin());
    }
}
