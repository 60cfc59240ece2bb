use lazy_static::lazy_static;
use std::collections::HashMap;

/// Scalar kind a built-in simple type reduces to. Backends map each kind to
/// a native type; the resolver never deals in native spellings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    UnsignedByte,
    UnsignedShort,
    UnsignedInt,
    UnsignedLong,
    Float,
    Double,
    Bytes,
}

lazy_static! {
    /// Built-in XSD datatype name -> (scalar kind, whitespace-separated list).
    /// Dates, durations, URIs and name tokens deliberately collapse to
    /// strings; binding code treats them as opaque lexical values.
    static ref BUILTIN_TABLE: HashMap<&'static str, (Primitive, bool)> = {
        use Primitive::*;
        let mut m = HashMap::new();
        for name in [
            "string", "token", "normalizedString", "language", "ENTITY", "ID",
            "Name", "NCName", "NMTOKEN", "anyURI", "anyType", "anySimpleType",
            "QName", "NOTATION", "IDREF", "date", "dateTime", "time", "gDay",
            "gMonth", "gYear", "gMonthDay", "gYearMonth", "duration",
        ] {
            m.insert(name, (String, false));
        }
        for name in ["ENTITIES", "NMTOKENS", "IDREFS"] {
            m.insert(name, (String, true));
        }
        m.insert("boolean", (Boolean, false));
        m.insert("byte", (Byte, false));
        m.insert("short", (Short, false));
        m.insert("int", (Int, false));
        m.insert("long", (Long, false));
        m.insert("unsignedByte", (UnsignedByte, false));
        m.insert("unsignedShort", (UnsignedShort, false));
        m.insert("unsignedInt", (UnsignedInt, false));
        m.insert("unsignedLong", (UnsignedLong, false));
        m.insert("float", (Float, false));
        m.insert("double", (Double, false));
        m.insert("decimal", (Double, false));
        for name in [
            "integer", "negativeInteger", "nonNegativeInteger",
            "positiveInteger", "nonPositiveInteger",
        ] {
            m.insert(name, (Long, false));
        }
        m.insert("hexBinary", (Bytes, false));
        m.insert("base64Binary", (Bytes, false));
        m
    };
}

/// Looks up a built-in datatype by local name. Returns the scalar kind and
/// whether the type is a whitespace-separated list.
pub fn lookup(local_name: &str) -> Option<(Primitive, bool)> {
    BUILTIN_TABLE.get(local_name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_kinds() {
        assert_eq!(lookup("string"), Some((Primitive::String, false)));
        assert_eq!(lookup("boolean"), Some((Primitive::Boolean, false)));
        assert_eq!(lookup("nonNegativeInteger"), Some((Primitive::Long, false)));
        assert_eq!(lookup("IDREFS"), Some((Primitive::String, true)));
        assert_eq!(lookup("noSuchType"), None);
    }
}
