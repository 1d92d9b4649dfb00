// Command-line interface for bib2glossary
//
// This binary converts glossary terms between a BibTeX database and LaTeX glossaries
// definitions (\newacronym, \newglossaryentry). All the conversion work lives in the
// gloss-babel crate; this layer reads files, layers configuration and decides what a
// diagnostic means.
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected from the file
// extension, except for .tex which both the acronym and glossary formats claim.
// Usage:
//  bib2glossary <input> --to <format> [--from <format>] [--output <file>]  - Convert (default)
//  bib2glossary convert <input> --to <format> ...                           - Same as above (explicit)
//  bib2glossary --list-formats                                             - List available formats
//
// Diagnostics (duplicate keys, unknown parameters, records missing a field) are logged as
// warnings and the conversion carries on, unless --strict or `convert.strict = true` in the
// configuration turns the first one into an error.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use gloss_babel::formats::{GlossariesFormat, MarkupOptions};
use gloss_babel::{
    DiagnosticHandler, FieldMapping, Format, FormatError, FormatRegistry, LogWarnings, MacroKind,
    Strict,
};
use gloss_config::{read_param2field, GlossConfig, Loader, LOCAL_CONFIG_FILE};
use std::collections::BTreeMap;
use std::fs;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn build_cli() -> Command {
    Command::new("bib2glossary")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between BibTeX and LaTeX glossaries definitions")
        .long_about(
            "bib2glossary keeps glossary terms in a BibTeX database and generates\n\
            \\newacronym or \\newglossaryentry definitions from it, or the other way round.\n\n\
            Formats:\n  \
            - bibtex:   BibTeX database (.bib)\n  \
            - acronym:  \\newacronym definitions (.tex)\n  \
            - glossary: \\newglossaryentry definitions (.tex)\n  \
            - json:     records as a JSON array (.json)\n\n\
            Examples:\n  \
            bib2glossary terms.bib --to acronym -o acronyms.tex\n  \
            bib2glossary acronyms.tex --from acronym --to bibtex\n  \
            bib2glossary convert terms.bib --to glossary --param2field map.json",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a bib2glossary.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between formats (default command)")
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .long_help(
                            "Source format to convert from.\n\n\
                            If not specified, the format is auto-detected from the file extension.\n\
                            .tex files are shared by 'acronym' and 'glossary' and always need --from.",
                        )
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("entry-type")
                        .long("entry-type")
                        .value_name("TYPE")
                        .help("Entry type given to records read from markup, or the entry type kept when writing markup")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("param2field")
                        .long("param2field")
                        .value_name("JSON")
                        .help("JSON object mapping parameter names to BibTeX fields")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Fail on the first diagnostic instead of logging it")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    init_tracing();

    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();
    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            if should_inject_convert(&args) {
                let mut new_args = vec![args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let request = ConvertRequest::from_matches(sub_matches).unwrap_or_else(|e| fail(e));
            handle_convert_command(&request, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Log to stderr, `warn` and above unless RUST_LOG says otherwise.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .without_time()
                .with_target(false),
        )
        .init();
}

/// Whether the first argument looks like an input file rather than a subcommand or flag.
fn should_inject_convert(args: &[String]) -> bool {
    args.len() > 1
        && !args[1].starts_with('-')
        && args[1] != "convert"
        && args[1] != "help"
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Everything `convert` was asked to do, with `--from` resolved.
#[derive(Debug, Clone, PartialEq)]
struct ConvertRequest {
    input: String,
    from: String,
    to: String,
    output: Option<String>,
    entry_type: Option<String>,
    param2field: Option<String>,
    strict: bool,
}

impl ConvertRequest {
    fn from_matches(matches: &ArgMatches) -> Result<Self, String> {
        let input = matches
            .get_one::<String>("input")
            .cloned()
            .ok_or("missing input file")?;
        let to = matches
            .get_one::<String>("to")
            .cloned()
            .ok_or("missing --to format")?;

        // Auto-detect --from if not provided
        let from = match matches.get_one::<String>("from") {
            Some(from) => from.clone(),
            None => detect_source_format(&input)?,
        };

        Ok(Self {
            input,
            from,
            to,
            output: matches.get_one::<String>("output").cloned(),
            entry_type: matches.get_one::<String>("entry-type").cloned(),
            param2field: matches.get_one::<String>("param2field").cloned(),
            strict: matches.get_flag("strict"),
        })
    }
}

fn detect_source_format(input: &str) -> Result<String, String> {
    let registry = FormatRegistry::default();
    if let Some(detected) = registry.detect_format_from_filename(input) {
        return Ok(detected);
    }
    let candidates = registry.formats_for_filename(input);
    if candidates.is_empty() {
        Err(format!(
            "could not detect format from filename '{input}', please specify --from explicitly"
        ))
    } else {
        Err(format!(
            "'{input}' could be any of {}, please specify --from explicitly",
            candidates.join(", ")
        ))
    }
}

/// Handle the convert command
fn handle_convert_command(request: &ConvertRequest, config: &GlossConfig) {
    let markup = markup_formats(request, config).unwrap_or_else(|e| fail(e));
    let registry = build_registry(&markup);

    // Validate formats exist
    if let Err(e) = registry.get(&request.from) {
        fail(e);
    }
    if let Err(e) = registry.get(&request.to) {
        fail(e);
    }

    // Read input file
    let source = fs::read_to_string(&request.input)
        .unwrap_or_else(|e| fail(format!("cannot read '{}': {e}", request.input)));

    let mut handler: Box<dyn DiagnosticHandler> = if request.strict || config.convert.strict {
        Box::new(Strict)
    } else {
        Box::new(LogWarnings)
    };

    let output = convert(&registry, &markup, &source, request, handler.as_mut())
        .unwrap_or_else(|e| fail(e));

    match &request.output {
        Some(path) => {
            fs::write(path, output)
                .unwrap_or_else(|e| fail(format!("cannot write '{path}': {e}")));
        }
        None => print!("{output}"),
    }
}

/// Parse, serialize, and warn when nothing was written.
///
/// Markup targets count the definitions written, so a filter that keeps no record warns too.
fn convert(
    registry: &FormatRegistry,
    markup: &[GlossariesFormat],
    source: &str,
    request: &ConvertRequest,
    handler: &mut dyn DiagnosticHandler,
) -> Result<String, FormatError> {
    let db = registry.parse(source, &request.from)?.resolve(&mut *handler)?;

    let (output, written) = match markup.iter().find(|format| format.name() == request.to) {
        Some(format) => {
            let definitions = format.definitions(&db)?.resolve(&mut *handler)?;
            (format.render(&definitions), definitions.len())
        }
        None => (
            registry.serialize(&db, &request.to)?.resolve(&mut *handler)?,
            db.len(),
        ),
    };
    if written == 0 {
        tracing::warn!("{}", nothing_found_message(&request.from));
    }
    Ok(output)
}

fn nothing_found_message(from: &str) -> String {
    match MacroKind::from_name(from) {
        Some(kind) => format!("No '\\{}' definitions found", kind.macro_name()),
        None if from == "bibtex" => "No bib entries found".to_string(),
        None => "No records found".to_string(),
    }
}

/// The markup formats the conversion touches, with configured mapping and options.
///
/// Only those kinds resolve their mapping, so an override for the other kind cannot fail an
/// unrelated run.
fn markup_formats(
    request: &ConvertRequest,
    config: &GlossConfig,
) -> Result<Vec<GlossariesFormat>, FormatError> {
    let param2field = match &request.param2field {
        Some(path) => read_param2field(path).map_err(|e| FormatError::ConfigError(e.to_string()))?,
        None => BTreeMap::new(),
    };

    MacroKind::ALL
        .into_iter()
        .filter(|kind| request.from == kind.name() || request.to == kind.name())
        .map(|kind| -> Result<GlossariesFormat, FormatError> {
            let overrides = config
                .mapping
                .overrides(kind)
                .iter()
                .chain(param2field.iter())
                .map(|(logical, field)| (logical.clone(), field.clone()));
            let mapping = FieldMapping::resolve(kind, overrides)?;
            Ok(GlossariesFormat::with_mapping(mapping)
                .with_options(markup_options(request, config)))
        })
        .collect()
}

/// The default registry with the markup formats replaced by configured ones.
fn build_registry(markup: &[GlossariesFormat]) -> FormatRegistry {
    let mut registry = FormatRegistry::with_defaults();
    for format in markup {
        registry.register(format.clone());
    }
    registry
}

/// `--entry-type` names the type records get when markup is read, and the type kept when
/// markup is written.
fn markup_options(request: &ConvertRequest, config: &GlossConfig) -> MarkupOptions {
    let mut options = MarkupOptions::from(&config.convert);
    if MacroKind::from_name(&request.from).is_some() {
        if let Some(entry_type) = &request.entry_type {
            options.entry_type = entry_type.clone();
        }
    } else {
        options.filter = request.entry_type.clone();
    }
    options
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::default();
    println!("Available formats:\n");
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            let extensions = format
                .file_extensions()
                .iter()
                .map(|ext| format!(".{ext}"))
                .collect::<Vec<_>>()
                .join(", ");
            println!("  {name:<10} {:<50} {extensions}", format.description());
        }
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> GlossConfig {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader
        .build()
        .unwrap_or_else(|err| fail(format!("failed to load configuration: {err}")))
}
