//! Output formatting for docsmith results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::docs::FunctionDocRecord;
use crate::endpoints::ApiSummary;

// =============================================================================
// JSON Format
// =============================================================================

/// Report for the `functions` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonFunctionsReport {
    pub version: String,
    pub path: String,
    pub language: String,
    pub documented: usize,
    pub functions: Vec<FunctionDocRecord>,
}

/// Report for the `apis` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonApisReport {
    pub version: String,
    pub root: String,
    pub apis: Vec<ApiSummary>,
}

pub fn functions_report(path: &str, language: &str, records: &[FunctionDocRecord]) -> JsonFunctionsReport {
    JsonFunctionsReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        language: language.to_string(),
        documented: records.iter().filter(|r| r.has_existing_comment()).count(),
        functions: records.to_vec(),
    }
}

pub fn apis_report(root: &str, apis: &[ApiSummary]) -> JsonApisReport {
    JsonApisReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        root: root.to_string(),
        apis: apis.to_vec(),
    }
}

/// Write located functions as JSON.
pub fn write_functions_json(path: &str, language: &str, records: &[FunctionDocRecord]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&functions_report(path, language, records))?;
    println!("{}", json);
    Ok(())
}

/// Write discovered APIs as JSON.
pub fn write_apis_json(root: &str, apis: &[ApiSummary]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&apis_report(root, apis))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

fn write_header(label: &str, value: &str) {
    println!();
    print!("  ");
    print!("{}", "docsmith".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();
    print!("  {}", format!("{label:<10}").dimmed());
    println!("{}", value);
    println!();
}

pub fn write_functions_pretty(path: &str, language: &str, records: &[FunctionDocRecord]) {
    write_header("Scanning:", path);

    if records.is_empty() {
        println!("  {}", format!("No {language} functions found").dimmed());
        println!();
        return;
    }

    for record in records {
        let name = if record.name.is_empty() {
            "<anonymous>".italic().to_string()
        } else {
            record.name.bold().to_string()
        };
        let status = if record.has_existing_comment() {
            "documented".green()
        } else {
            "undocumented".yellow()
        };
        println!(
            "  {:>8}  {}  {}",
            record.function_span.to_string().dimmed(),
            name,
            status
        );
    }

    let documented = records.iter().filter(|r| r.has_existing_comment()).count();
    println!();
    println!(
        "  {} function(s), {} documented",
        records.len(),
        documented
    );
    println!();
}

pub fn write_apis_pretty(root: &str, apis: &[ApiSummary]) {
    write_header("Root:", root);

    if apis.is_empty() {
        println!("  {}", "No APIs found".dimmed());
        println!();
        return;
    }

    for api in apis {
        println!("  {}", api.name.bold());
        println!("    {}", api.root_file.display().to_string().dimmed());
        for excerpt in &api.endpoints {
            println!("    {} {}", "→".cyan(), registration_line(excerpt));
        }
        println!();
    }

    let endpoints: usize = apis.iter().map(|a| a.endpoints.len()).sum();
    println!("  {} API(s), {} endpoint(s)", apis.len(), endpoints);
    println!();
}

/// Status line for one API in the `document` command.
pub fn write_document_status(api: &ApiSummary, written: Option<&str>) {
    match written {
        Some(target) => println!("  {} {} → {}", "✓".green(), api.name, target),
        None => println!(
            "  {} {} {}",
            "-".dimmed(),
            api.name,
            "(nothing documented)".dimmed()
        ),
    }
}

/// First line of the registration call in an endpoint excerpt.
///
/// The call follows the first blank line of the excerpt.
pub fn registration_line(excerpt: &str) -> &str {
    excerpt
        .split_once("\n\n")
        .map(|(_, rest)| rest)
        .and_then(|rest| rest.lines().next())
        .unwrap_or("")
}
