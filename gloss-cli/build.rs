use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the built-in formats from gloss-babel's FormatRegistry::with_defaults
// We need to duplicate this here since build scripts can't depend on the library
const AVAILABLE_FORMATS: &[&str] = &["acronym", "bibtex", "glossary", "json"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let format_arg = |name: &'static str| {
        Arg::new(name)
            .long(name)
            .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_FORMATS))
            .value_hint(ValueHint::Other)
    };

    let mut cmd = Command::new("bib2glossary")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between BibTeX and LaTeX glossaries definitions")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a bib2glossary.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between formats")
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(format_arg("from").help("Source format"))
                .arg(format_arg("to").help("Target format"))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("entry-type")
                        .long("entry-type")
                        .help("Entry type to assign or keep")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("param2field")
                        .long("param2field")
                        .help("JSON parameter to field mapping")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Fail on the first diagnostic")
                        .action(ArgAction::SetTrue),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "bib2glossary", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "bib2glossary", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "bib2glossary", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
