mod common;

#[cfg(feature = "backend-cpp")]
mod cpp;
#[cfg(feature = "backend-java")]
mod java;

#[cfg(not(any(feature = "backend-cpp", feature = "backend-java")))]
compile_error!("at least one backend feature must be enabled");

use thiserror::Error;
use xb_xsd::ResolvedSchema;

use crate::mapping::IdentifierCollision;
use crate::output::OutputSet;

/// Target language for the generated bindings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    #[cfg(feature = "backend-cpp")]
    Cpp,
    #[cfg(feature = "backend-java")]
    Java,
}

/// Everything the backends need to know beyond the schema itself.
#[derive(Clone, Debug)]
pub struct Options {
    /// Package name, e.g. `com.abc`; drives file names, include guards and
    /// namespace/package declarations.
    pub package: String,
    pub emit_parser: bool,
    pub emit_writer: bool,
    /// Split enums into their own header/source pair. When off, enums are
    /// declared inline next to the classes.
    pub emit_enums: bool,
    /// Spell boolean getters `isFoo` instead of `getFoo`.
    pub boolean_getter: bool,
    /// Call into tinyxml2 instead of libxml2 (C++ only).
    pub alternate_xml_backend: bool,
    pub backend: Backend,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    IdentifierCollision(#[from] IdentifierCollision),
}

pub fn generate(schema: &ResolvedSchema, options: &Options) -> Result<OutputSet, GenerateError> {
    match options.backend {
        #[cfg(feature = "backend-cpp")]
        Backend::Cpp => cpp::generate(schema, options),
        #[cfg(feature = "backend-java")]
        Backend::Java => java::generate(schema, options),
    }
}
