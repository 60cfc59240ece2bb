use std::path::PathBuf;

use clap::Parser;

use crate::backends::Backend;

#[cfg(feature = "backend-cpp")]
const DEFAULT_BACKEND: &str = "cpp";
#[cfg(not(feature = "backend-cpp"))]
const DEFAULT_BACKEND: &str = "java";

/// Generates XML binding code from an XSD schema file.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Schema file to compile
    pub input: PathBuf,

    /// Package name for the generated code, e.g. com.abc
    pub package: String,

    /// Target language
    #[arg(long, value_enum, default_value = DEFAULT_BACKEND)]
    pub backend: Backend,

    /// Emit parsing code
    #[arg(long)]
    pub parser: bool,

    /// Emit writing code
    #[arg(long)]
    pub writer: bool,

    /// Split enums into a separate header/source pair
    #[arg(long)]
    pub enums: bool,

    /// Spell boolean getters isFoo instead of getFoo
    #[arg(long)]
    pub boolean_getter: bool,

    /// Generate tinyxml2 calls instead of libxml2 (C++ only)
    #[arg(long)]
    pub tinyxml: bool,

    /// Directory the generated files are written into
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Allow schema documents that carry a DTD
    #[arg(long)]
    pub allow_dtd: bool,
}
