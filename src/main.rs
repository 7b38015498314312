// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for apibook.
//!
//! This binary provides the `apibook` command for converting API collection
//! exports into wiki storage-format documents or page-creation payloads.

use apibook::{document, parser, publish, renderer};
use lexopt::prelude::*;
use log::{debug, info};
use snafu::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const PARENT_ID_VAR: &str = "APIBOOK_PARENT_ID";
const SPACE_KEY_VAR: &str = "APIBOOK_SPACE_KEY";

/// Where to write the rendered output.
#[derive(Clone)]
enum OutputTarget {
    /// Write each file to the specified directory.
    Directory(PathBuf),
    /// Write to stdout.
    Stdout,
}

#[allow(clippy::struct_excessive_bools)]
struct Cli {
    input: Vec<PathBuf>,
    output: OutputTarget,
    template: Option<PathBuf>,
    escape_html: bool,
    page_payload: bool,
    title: Option<String>,
    parent_id: Option<String>,
    space_key: Option<String>,
    quiet: bool,
    dry_run: bool,
    force: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("at least one input file or directory is required"))]
    NoInputFiles,

    #[snafu(display("no .json files found in the given inputs"))]
    NoJsonFiles,

    #[snafu(display("cannot output multiple files to stdout"))]
    MultipleFilesToStdout,

    #[snafu(display("--page-payload needs a space key (--space-key or {SPACE_KEY_VAR})"))]
    MissingSpaceKey,

    #[snafu(display("failed to read template {}: {source}", path.display()))]
    ReadTemplate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to create output directory: {source}"))]
    CreateOutputDir { source: std::io::Error },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to parse {}: {source}", path.display()))]
    ParseFile {
        path: PathBuf,
        source: parser::ParseError,
    },

    #[snafu(display("failed to serialize page payload: {source}"))]
    SerializePayload { source: serde_json::Error },

    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert API collection exports to wiki-ready documentation

Usage: {name} [OPTIONS] -o <OUTPUT> <INPUT>...

Arguments:
  <INPUT>...  Input collection JSON files or directories containing exports

Options:
  -o, --output <OUTPUT>     Output directory (or - for stdout)
  -t, --template <FILE>     Template file (default: built-in storage-format template)
      --no-escape           Bind values into the template without escaping markup

Wiki page payload:
      --page-payload        Write the page-creation JSON payload instead of the document
      --title <TITLE>       Page title (default: collection name)
      --parent-id <ID>      Parent page id (default: ${PARENT_ID_VAR})
      --space-key <KEY>     Target space key (default: ${SPACE_KEY_VAR})

Other options:
  -q, --quiet               Suppress progress messages
  -n, --dry-run             Show what would be processed without writing
  -f, --force               Overwrite existing output files
  -h, --help                Print help
  -V, --version             Print version

Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostic logging.",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut input = Vec::new();
    let mut output: Option<OutputTarget> = None;
    let mut template = None;
    let mut escape_html = true;
    let mut page_payload = false;
    let mut title = None;
    let mut parent_id = None;
    let mut space_key = None;
    let mut quiet = false;
    let mut dry_run = false;
    let mut force = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => {
                let val: PathBuf = parser.value()?.parse()?;
                output = Some(if val == Path::new("-") {
                    OutputTarget::Stdout
                } else {
                    OutputTarget::Directory(val)
                });
            }
            Short('t') | Long("template") => template = Some(parser.value()?.parse()?),
            Long("no-escape") => escape_html = false,
            Long("page-payload") => page_payload = true,
            Long("title") => title = Some(parser.value()?.string()?),
            Long("parent-id") => parent_id = Some(parser.value()?.string()?),
            Long("space-key") => space_key = Some(parser.value()?.string()?),
            Short('q') | Long("quiet") => quiet = true,
            Short('n') | Long("dry-run") => dry_run = true,
            Short('f') | Long("force") => force = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) => input.push(val.parse()?),
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        input,
        output: output.ok_or("missing required option: --output")?,
        template,
        escape_html,
        page_payload,
        title,
        parent_id: parent_id.or_else(|| std::env::var(PARENT_ID_VAR).ok()),
        space_key: space_key.or_else(|| std::env::var(SPACE_KEY_VAR).ok()),
        quiet,
        dry_run,
        force,
    })
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = parse_args().context(ParseArgsSnafu)?;

    ensure!(!cli.input.is_empty(), NoInputFilesSnafu);
    ensure!(
        !cli.page_payload || cli.space_key.is_some(),
        MissingSpaceKeySnafu
    );

    let template = load_template(cli.template.as_deref())?;

    // Collect all input files first
    let files = collect_input_files(&cli.input);
    debug!("collected {} input file(s)", files.len());
    ensure!(!files.is_empty(), NoJsonFilesSnafu);

    match &cli.output {
        OutputTarget::Stdout => {
            ensure!(files.len() == 1, MultipleFilesToStdoutSnafu);
            process_to_stdout(&files[0], &template, &cli)?;
        }
        OutputTarget::Directory(dir) => {
            if !cli.dry_run {
                std::fs::create_dir_all(dir).context(CreateOutputDirSnafu)?;
            }
            let mut written = HashSet::new();
            for file in &files {
                process_file(file, dir, &template, &cli, &mut written)?;
            }
        }
    }

    Ok(())
}

/// Loads the template source, falling back to the built-in template.
///
/// Line breaks are stripped from template files so the rendered storage
/// markup stays on a single line.
fn load_template(path: Option<&Path>) -> Result<String, Error> {
    let Some(path) = path else {
        return Ok(renderer::DEFAULT_TEMPLATE.to_owned());
    };

    let source = std::fs::read_to_string(path).context(ReadTemplateSnafu { path })?;
    info!("loaded template {}", path.display());
    Ok(source.replace(['\r', '\n'], ""))
}

/// Collects all JSON files from the given inputs (files and directories).
fn collect_input_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            {
                files.push(entry.path().to_path_buf());
            }
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// A converted input, ready to be written.
struct Converted {
    stem: String,
    extension: &'static str,
    contents: String,
}

/// Picks an output path that no earlier input of this run has claimed.
///
/// Collections sharing a name get `-2`, `-3`, ... appended to the stem.
fn claim_output_path(
    out_dir: &Path,
    converted: &Converted,
    written: &mut HashSet<PathBuf>,
) -> PathBuf {
    let Converted { stem, extension, .. } = converted;
    let mut path = out_dir.join(format!("{stem}.{extension}"));
    let mut n = 2;
    while written.contains(&path) {
        path = out_dir.join(format!("{stem}-{n}.{extension}"));
        n += 1;
    }
    written.insert(path.clone());
    path
}

/// Reads, parses, and renders one collection file.
fn convert_file(input: &Path, template: &str, cli: &Cli) -> Result<Converted, Error> {
    let bytes = std::fs::read(input).context(ReadFileSnafu { path: input })?;
    let collection = parser::parse_collection(&bytes).context(ParseFileSnafu { path: input })?;
    let document = document::build_document(&collection);

    let opts = renderer::RenderOptions {
        escape_html: cli.escape_html,
    };
    let rendered = renderer::render_document(&document, template, &opts);
    let stem = document.file_stem();

    if !cli.page_payload {
        return Ok(Converted {
            stem,
            extension: "html",
            contents: rendered,
        });
    }

    let target = publish::PageTarget {
        title: cli
            .title
            .clone()
            .unwrap_or_else(|| document.collection_name.clone()),
        parent_id: cli.parent_id.clone(),
        space_key: cli.space_key.clone().unwrap_or_default(),
    };
    let payload = publish::page_payload(&target, &rendered);
    let contents = serde_json::to_string_pretty(&payload).context(SerializePayloadSnafu)?;

    Ok(Converted {
        stem,
        extension: "json",
        contents,
    })
}

/// Processes a single file and outputs to stdout.
fn process_to_stdout(input: &Path, template: &str, cli: &Cli) -> Result<(), Error> {
    if cli.dry_run {
        eprintln!("Would output {}", input.display());
        return Ok(());
    }

    let converted = convert_file(input, template, cli)?;
    println!("{}", converted.contents);
    Ok(())
}

/// Processes a single file and writes to the output directory.
///
/// `written` holds the paths already claimed by earlier inputs of this run.
fn process_file(
    input: &Path,
    out_dir: &Path,
    template: &str,
    cli: &Cli,
    written: &mut HashSet<PathBuf>,
) -> Result<(), Error> {
    let converted = convert_file(input, template, cli)?;
    let out_path = claim_output_path(out_dir, &converted, written);

    // Handle dry-run mode
    if cli.dry_run {
        eprintln!("Would write {} from {}", out_path.display(), input.display());
        return Ok(());
    }

    // Check if output exists and handle overwrite
    if out_path.exists() && !cli.force {
        eprintln!(
            "Skipping {} (already exists, use --force to overwrite)",
            out_path.display()
        );
        return Ok(());
    }

    std::fs::write(&out_path, &converted.contents).context(WriteFileSnafu { path: &out_path })?;

    if !cli.quiet {
        eprintln!("Wrote {}", out_path.display());
    }
    Ok(())
}
