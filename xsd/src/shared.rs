use crate::complex_type::ComplexTypeDef;
use crate::simple_type::SimpleType;
use crate::xstypes::QName;

/// A reference to a type: either by qualified name, or an inline (anonymous)
/// definition declared directly inside an element or attribute.
#[derive(Clone, Debug)]
pub enum TypeRef {
    Named(QName),
    Inline(Box<Type>),
}

/// Supertype of simple and complex type definitions. Closed: every consumer
/// matches exhaustively.
#[derive(Clone, Debug)]
pub enum Type {
    Simple(SimpleType),
    Complex(ComplexTypeDef),
}

impl Type {
    pub fn as_simple(&self) -> Option<&SimpleType> {
        match self {
            Self::Simple(s) => Some(s),
            Self::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&ComplexTypeDef> {
        match self {
            Self::Complex(c) => Some(c),
            Self::Simple(_) => None,
        }
    }
}
