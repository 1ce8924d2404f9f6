//! Command-line interface for docsmith.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::config::Config;
use crate::docs::{self, FunctionDocRecord};
use crate::documenter::{self, OpenAiDocumenter};
use crate::endpoints::{ApiFinder, ApiSummary};
use crate::grammar::{Grammar, GrammarRegistry};
use crate::report::{self, JsonFunctionsReport};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Doc-comment and API documentation tooling.
///
/// Locates functions and the doc comments above them, splices updated
/// comments back into source, and slices Express APIs into self-contained
/// endpoint excerpts for documentation.
#[derive(Parser)]
#[command(name = "docsmith")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List functions and their doc comments
    Functions(FunctionsArgs),
    /// Apply updated doc comments to a file
    Rewrite(RewriteArgs),
    /// Find Express APIs and their endpoint excerpts
    Apis(ApisArgs),
    /// Generate Markdown documentation for every API under a directory
    Document(DocumentArgs),
    /// Write fresh doc comments for every function in a file
    Annotate(AnnotateArgs),
}

/// Arguments for the functions command.
#[derive(Parser)]
pub struct FunctionsArgs {
    /// Source file to scan
    pub path: PathBuf,

    /// Language name, overriding detection from the file extension
    #[arg(short, long)]
    pub language: Option<String>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the rewrite command.
#[derive(Parser)]
pub struct RewriteArgs {
    /// Source file the records were located in
    pub path: PathBuf,

    /// JSON records with `updated_comment` filled in ("-" reads stdin)
    #[arg(short, long)]
    pub records: PathBuf,

    /// Overwrite the source file instead of printing the result
    #[arg(short, long)]
    pub write: bool,
}

/// Arguments for the apis command.
#[derive(Parser)]
pub struct ApisArgs {
    /// Directory to search
    pub root: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the document command.
#[derive(Parser)]
pub struct DocumentArgs {
    /// Directory to search
    pub root: PathBuf,

    /// Directory for one Markdown file per API (default: print to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the annotate command.
#[derive(Parser)]
pub struct AnnotateArgs {
    /// Source file to document
    pub path: PathBuf,

    /// Language name, overriding detection from the file extension
    #[arg(short, long)]
    pub language: Option<String>,

    /// Overwrite the source file instead of printing the result
    #[arg(short, long)]
    pub write: bool,
}

fn check_format(format: &str) -> bool {
    if format != "pretty" && format != "json" {
        eprintln!("Error: invalid format {:?}, must be 'pretty' or 'json'", format);
        return false;
    }
    true
}

fn load_config(explicit: Option<&Path>) -> Option<Config> {
    match Config::load(explicit) {
        Ok((config, path)) => {
            match path {
                Some(p) => debug!("using config {}", p.display()),
                None => debug!("no config file found, using defaults"),
            }
            Some(config)
        }
        Err(e) => {
            eprintln!("Error: invalid config: {:#}", e);
            None
        }
    }
}

fn resolve_grammar<'r>(
    registry: &'r GrammarRegistry,
    path: &Path,
    language: Option<&str>,
) -> crate::Result<&'r Grammar> {
    match language {
        Some(language) => {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            registry.resolve(language, ext)
        }
        None => registry.for_path(path),
    }
}

/// Run the functions command.
pub fn run_functions(args: &FunctionsArgs) -> anyhow::Result<i32> {
    if !check_format(&args.format) {
        return Ok(EXIT_ERROR);
    }

    let registry = GrammarRegistry::new();
    let grammar = match resolve_grammar(&registry, &args.path, args.language.as_deref()) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let text = fs::read_to_string(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;
    let records = docs::locate_in(grammar, &text)?;

    let path_str = args.path.to_string_lossy().to_string();
    let language = grammar.id.name();
    match args.format.as_str() {
        "json" => report::write_functions_json(&path_str, language, &records)?,
        _ => report::write_functions_pretty(&path_str, language, &records),
    }
    Ok(EXIT_SUCCESS)
}

/// Run the rewrite command.
pub fn run_rewrite(args: &RewriteArgs) -> anyhow::Result<i32> {
    let raw = if args.records == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.records)
            .with_context(|| format!("reading {}", args.records.display()))?
    };
    let records = match parse_records(&raw) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: invalid records: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let text = fs::read_to_string(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;
    let rewritten = match docs::rewrite(&text, &records) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run 'docsmith functions --format json' again on the current file");
            return Ok(EXIT_FAILED);
        }
    };

    if args.write {
        fs::write(&args.path, rewritten)
            .with_context(|| format!("writing {}", args.path.display()))?;
        let changed = records.iter().filter(|r| r.updated_comment.is_some()).count();
        info!("updated {} comment(s) in {}", changed, args.path.display());
    } else {
        print!("{}", rewritten);
    }
    Ok(EXIT_SUCCESS)
}

/// Accepts either a bare record list or a `functions --format json` report.
pub fn parse_records(raw: &str) -> serde_json::Result<Vec<FunctionDocRecord>> {
    serde_json::from_str::<Vec<FunctionDocRecord>>(raw)
        .or_else(|_| serde_json::from_str::<JsonFunctionsReport>(raw).map(|r| r.functions))
}

fn find_apis(config: &Config, root: &Path) -> anyhow::Result<Vec<ApiSummary>> {
    let registry = GrammarRegistry::new();
    let finder = ApiFinder::new(&registry, &config.framework, &config.walk)?;
    Ok(finder.find_apis(root))
}

/// Run the apis command.
pub fn run_apis(args: &ApisArgs, config_path: Option<&Path>) -> anyhow::Result<i32> {
    if !check_format(&args.format) {
        return Ok(EXIT_ERROR);
    }
    let Some(config) = load_config(config_path) else {
        return Ok(EXIT_ERROR);
    };
    if !args.root.is_dir() {
        eprintln!("Error: not a directory: {}", args.root.display());
        return Ok(EXIT_ERROR);
    }

    let apis = find_apis(&config, &args.root)?;
    let root_str = args.root.to_string_lossy().to_string();
    match args.format.as_str() {
        "json" => report::write_apis_json(&root_str, &apis)?,
        _ => report::write_apis_pretty(&root_str, &apis),
    }
    Ok(EXIT_SUCCESS)
}

/// Run the document command.
pub fn run_document(args: &DocumentArgs, config_path: Option<&Path>) -> anyhow::Result<i32> {
    let Some(config) = load_config(config_path) else {
        return Ok(EXIT_ERROR);
    };
    if !args.root.is_dir() {
        eprintln!("Error: not a directory: {}", args.root.display());
        return Ok(EXIT_ERROR);
    }
    let client = match OpenAiDocumenter::from_config(&config.documenter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if let Some(dir) = &args.output {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let apis = find_apis(&config, &args.root)?;
    if apis.is_empty() {
        eprintln!("Warning: no APIs found under {}", args.root.display());
        return Ok(EXIT_SUCCESS);
    }

    let progress = ProgressBar::new(apis.len() as u64);
    progress.set_style(ProgressStyle::with_template(
        "  {spinner} [{bar:30}] {pos}/{len} {msg}",
    )?);

    let runtime = tokio::runtime::Runtime::new()?;
    let mut documented = Vec::new();
    for api in &apis {
        progress.set_message(api.name.clone());
        let doc = runtime.block_on(documenter::document_api(&client, api));
        progress.inc(1);
        documented.push(doc);
    }
    progress.finish_and_clear();

    let mut any = false;
    for (api, doc) in apis.iter().zip(documented) {
        let Some(doc) = doc else {
            report::write_document_status(api, None);
            continue;
        };
        any = true;
        match &args.output {
            Some(dir) => {
                let target = dir.join(format!("{}.md", file_stem(&api.name)));
                fs::write(&target, &doc).with_context(|| format!("writing {}", target.display()))?;
                report::write_document_status(api, Some(&target.display().to_string()));
            }
            None => println!("{}\n", doc),
        }
    }

    if any {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the annotate command.
pub fn run_annotate(args: &AnnotateArgs, config_path: Option<&Path>) -> anyhow::Result<i32> {
    let Some(config) = load_config(config_path) else {
        return Ok(EXIT_ERROR);
    };
    let registry = GrammarRegistry::new();
    let grammar = match resolve_grammar(&registry, &args.path, args.language.as_deref()) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    let client = match OpenAiDocumenter::from_config(&config.documenter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let text = fs::read_to_string(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;
    let runtime = tokio::runtime::Runtime::new()?;
    let updated = runtime.block_on(docs::update_documentation(&client, grammar, &text))?;
    let Some(updated) = updated else {
        eprintln!("Warning: no functions found in {}", args.path.display());
        return Ok(EXIT_FAILED);
    };

    if args.write {
        fs::write(&args.path, &updated)
            .with_context(|| format!("writing {}", args.path.display()))?;
        info!("documented functions in {}", args.path.display());
    } else {
        print!("{}", updated);
    }
    Ok(EXIT_SUCCESS)
}

/// `Billing Service API` -> `billing-service-api`.
fn file_stem(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Billing Service API"), "billing-service-api");
        assert_eq!(file_stem("API"), "api");
    }

    #[test]
    fn test_parse_records_accepts_list_and_report() {
        let records = docs::locate("function f() {}\n", "js", "javascript").unwrap();
        let list = serde_json::to_string(&records).unwrap();
        assert_eq!(parse_records(&list).unwrap(), records);

        let report = serde_json::to_string(&report::functions_report("f.js", "javascript", &records)).unwrap();
        assert_eq!(parse_records(&report).unwrap(), records);

        assert!(parse_records("{\"nope\": 1}").is_err());
    }

    #[test]
    fn test_cli_parses_annotate() {
        let cli =
            Cli::try_parse_from(["docsmith", "annotate", "src/app.ts", "--write", "-l", "typescript"])
                .unwrap();
        match cli.command {
            Commands::Annotate(args) => {
                assert_eq!(args.path, PathBuf::from("src/app.ts"));
                assert_eq!(args.language.as_deref(), Some("typescript"));
                assert!(args.write);
            }
            _ => panic!("expected annotate"),
        }
    }

    #[test]
    fn test_resolve_grammar_prefers_language_flag() {
        let registry = GrammarRegistry::new();
        let path = Path::new("lib/widget.js");
        assert_eq!(
            resolve_grammar(&registry, path, None).unwrap().id,
            crate::LanguageId::JavaScript
        );
        assert_eq!(
            resolve_grammar(&registry, path, Some("typescript")).unwrap().id,
            crate::LanguageId::TypeScript
        );
        assert!(resolve_grammar(&registry, Path::new("notes.txt"), None).is_err());
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from(["docsmith", "apis", "repo", "--format", "json", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Apis(args) => {
                assert_eq!(args.root, PathBuf::from("repo"));
                assert_eq!(args.format, "json");
            }
            _ => panic!("expected apis"),
        }
    }
}
