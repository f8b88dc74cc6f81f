//! Lookup commands: one-shot queries, stats, and the interactive shell

use colored::*;
use icd_lookup::{CodeLookupService, Config, LookupError, normalize};
use std::io::{self, BufRead, Write};

/// Read a single code from stdin, without the line terminator
pub fn read_code(input: &mut impl BufRead) -> Result<String, String> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| format!("Failed to read code from stdin: {}", e))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Result of a one-shot lookup, ready to print
#[derive(Debug, PartialEq, Eq)]
pub enum Rendered {
    /// Pretty JSON array of matched codes, for stdout
    Matches(String),
    /// Diagnostic naming the raw and normalized code, for stderr
    Missing(String),
}

pub fn render_lookup(service: &CodeLookupService, raw: &str) -> Result<Rendered, String> {
    match service.find(raw) {
        Ok(codes) => serde_json::to_string_pretty(&codes)
            .map(Rendered::Matches)
            .map_err(|e| format!("Failed to encode result: {}", e)),
        Err(e @ LookupError::CodeNotFound { .. }) => Ok(Rendered::Missing(format!("{}.", e))),
        Err(e) => Err(e.to_string()),
    }
}

/// Print the matches for `raw` as JSON on stdout. A miss goes to stderr and
/// is not an error.
pub fn lookup_code(service: &CodeLookupService, raw: &str) -> Result<(), String> {
    match render_lookup(service, raw)? {
        Rendered::Matches(json) => println!("{}", json),
        Rendered::Missing(message) => eprintln!("{} {}", "[ERROR]".red(), message),
    }
    Ok(())
}

/// Build the service, then look up `code` or the first line of `input`.
/// Source failures surface before anything is read.
pub fn run_lookup(
    config: &Config,
    code: Option<String>,
    input: &mut impl BufRead,
) -> Result<(), String> {
    let service = CodeLookupService::connect(config).map_err(|e| e.to_string())?;
    let code = match code {
        Some(code) => code,
        None => read_code(input)?,
    };
    lookup_code(&service, &code)
}

pub fn show_normalized(raw: &str) -> Result<(), String> {
    println!("{}", normalize(raw));
    Ok(())
}

pub fn show_stats(service: &CodeLookupService) -> Result<(), String> {
    let stats = service.stats();
    let years: Vec<String> = service.years().iter().map(|y| y.to_string()).collect();

    println!("{} Code index:\n", "📊".cyan());
    println!("  {} years:              {}", "•".blue(), years.join(", ").yellow());
    println!("  {} documents scanned:  {}", "•".blue(), stats.scanned);
    println!(
        "  {} codes indexed:      {}",
        "•".blue(),
        service.index().len().to_string().bold().green()
    );
    println!("  {} included documents: {}", "•".blue(), stats.included);
    println!("  {} replaced entries:   {}", "•".blue(), stats.replaced);
    println!("  {} superseded by year: {}", "•".blue(), stats.superseded);

    if stats.skipped() > 0 {
        println!("\n{} Skipped {} document(s):", "ℹ️".blue(), stats.skipped());
        println!("  {} malformed id:      {}", "•".yellow(), stats.malformed_id);
        println!("  {} unparsable year:   {}", "•".yellow(), stats.unparsable_year);
        println!("  {} year not selected: {}", "•".yellow(), stats.year_not_selected);
    }

    Ok(())
}

/// Interactive mode: one code per line until `quit` or EOF
pub fn interactive_lookup(service: &CodeLookupService) -> Result<(), String> {
    println!("{}", "╔═══════════════════════════════════════════╗".cyan());
    println!("{}", "║   ICD Specific Code Lookup                ║".cyan());
    println!("{}", "╚═══════════════════════════════════════════╝".cyan());
    println!();
    println!(
        "{} codes indexed. Enter a code, or {} to exit.",
        service.index().len().to_string().bold(),
        "quit".green()
    );
    println!();

    shell_loop(service, &mut io::stdin().lock(), &mut io::stdout())
}

fn shell_loop(
    service: &CodeLookupService,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<(), String> {
    let io_err = |e: io::Error| e.to_string();

    loop {
        write!(out, "{} ", "icd>".blue().bold()).map_err(io_err)?;
        out.flush().map_err(io_err)?;

        let mut line = String::new();
        let read = input.read_line(&mut line).map_err(io_err)?;
        if read == 0 {
            writeln!(out).map_err(io_err)?;
            break;
        }

        let code = line.trim();
        match code {
            "" => continue,
            "quit" | "exit" | "q" => {
                writeln!(out, "Goodbye! 👋").map_err(io_err)?;
                break;
            }
            _ => {
                let normalized = normalize(code);
                let Ok(matches) = service.find(code) else {
                    writeln!(out, "  {} {} not found", "✗".red(), normalized.yellow())
                        .map_err(io_err)?;
                    continue;
                };

                writeln!(
                    out,
                    "  {} {} -> {} specific code(s)",
                    "✓".green(),
                    normalized.green().bold(),
                    matches.len()
                )
                .map_err(io_err)?;
                for specific in &matches {
                    writeln!(out, "    {} {}", "•".cyan(), specific).map_err(io_err)?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use icd_lookup::{CodeDocument, SpecificCode};
    use std::collections::BTreeSet;
    use std::io::Cursor;

    fn service() -> CodeLookupService {
        let docs = vec![CodeDocument::new(
            "2024_A03",
            vec![
                SpecificCode::Plain("X2".to_string()),
                SpecificCode::Object {
                    code: Some("X1".to_string()),
                },
            ],
        )];
        CodeLookupService::from_source(&docs, BTreeSet::from([2024])).unwrap()
    }

    #[test]
    fn test_read_code_strips_line_ending() {
        let mut input = Cursor::new("e08 00\r\nnext line\n");
        assert_eq!(read_code(&mut input).unwrap(), "e08 00");
    }

    #[test]
    fn test_read_code_empty_input() {
        let mut input = Cursor::new("");
        assert_eq!(read_code(&mut input).unwrap(), "");
    }

    #[test]
    fn test_source_failure_before_reading_input() {
        let config = Config {
            snapshot: Some("/nonexistent/icd-snapshot.json".into()),
            ..Config::default()
        };
        let mut input = Cursor::new("A03\n");

        let err = run_lookup(&config, None, &mut input).unwrap_err();
        assert!(err.contains("Failed to read snapshot"), "got {}", err);
        assert_eq!(input.position(), 0, "input consumed before connecting");
    }

    #[test]
    fn test_shell_reports_each_miss_once() {
        let mut input = Cursor::new("b99 9\na03\nquit\nA03\n");
        let mut out = Vec::new();

        shell_loop(&service(), &mut input, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("not found").count(), 1, "got {}", text);
        assert!(text.contains("B99.9"));
        assert!(text.contains("2 specific code(s)"));
        assert!(text.contains("Goodbye"));
        assert_eq!(text.matches("specific code(s)").count(), 1, "stopped at quit");
    }

    #[test]
    fn test_render_hit_is_sorted_json_array() {
        let Rendered::Matches(json) = render_lookup(&service(), "a03").unwrap() else {
            panic!("expected matches for A03");
        };
        let parsed: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec!["X1", "X2"]);
        assert!(json.contains('\n'), "output should be indented");
    }

    #[test]
    fn test_render_miss_names_both_forms() {
        assert_eq!(
            render_lookup(&service(), "b99 9").unwrap(),
            Rendered::Missing(
                "ICD code 'b99 9' (normalized: 'B99.9') not found in the database.".to_string()
            )
        );
    }
}
