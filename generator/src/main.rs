mod backends;
mod cli;
mod mapping;
mod output;

use std::process::ExitCode;

use clap::Parser;

use backends::Options;
use cli::Cli;

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&cli.input)?;
    let doc = roxmltree::Document::parse_with_options(
        &text,
        roxmltree::ParsingOptions {
            allow_dtd: cli.allow_dtd,
            ..Default::default()
        },
    )?;
    let schema = xb_xsd::load_schema(&doc)?;
    let options = Options {
        package: cli.package.clone(),
        emit_parser: cli.parser,
        emit_writer: cli.writer,
        emit_enums: cli.enums,
        boolean_getter: cli.boolean_getter,
        alternate_xml_backend: cli.tinyxml,
        backend: cli.backend,
    };
    let generated = backends::generate(&schema, &options)?;
    generated.write_to(&cli.out_dir)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        }
    }
}
