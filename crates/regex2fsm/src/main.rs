//! Command-line entry point: compile one pattern and write the three
//! automata as JSON files.

use anyhow::Context;
use regex2fsm::builder::NfaBuilder;
use regex2fsm::minimize::minimize;
use regex2fsm::subset_construction::subset_construction;
use regex2fsm::{lexer, parser};
use std::env;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (pattern, output_dir) = match args.as_slice() {
        [pattern] => (pattern.as_str(), Path::new(".")),
        [pattern, output_dir] => (pattern.as_str(), Path::new(output_dir.as_str())),
        _ => {
            eprintln!("usage: regex2fsm \"<pattern>\" [output-dir]");
            eprintln!("example: regex2fsm \"(a|b)*abb\" out");
            return ExitCode::FAILURE;
        }
    };

    match run(pattern, output_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run the five stages with progress output, then write the JSON files.
fn run(pattern: &str, output_dir: &Path) -> anyhow::Result<()> {
    println!("Processing regex: {pattern}");

    println!("Step 1: Tokenizing regex...");
    let tokens = lexer::tokenize(pattern)?;

    println!("Step 2: Parsing tokens into a syntax tree...");
    let ast = parser::parse(&tokens)?;

    println!("Step 3: Building NFA...");
    let nfa = NfaBuilder::new().build(&ast);

    println!("Step 4: Converting NFA to DFA...");
    let dfa = subset_construction(&nfa);

    println!("Step 5: Minimizing DFA...");
    let min_dfa = minimize(&dfa)?;

    println!("Step 6: Saving JSON files...");
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let nfa_path = output_dir.join("nfa.json");
    fs::write(&nfa_path, nfa.to_json()?)
        .with_context(|| format!("writing {}", nfa_path.display()))?;

    let dfa_path = output_dir.join("dfa.json");
    fs::write(&dfa_path, dfa.to_json()?)
        .with_context(|| format!("writing {}", dfa_path.display()))?;

    let min_dfa_path = output_dir.join("min_dfa.json");
    fs::write(&min_dfa_path, min_dfa.to_json()?)
        .with_context(|| format!("writing {}", min_dfa_path.display()))?;

    println!("\nConversion completed successfully!");
    println!("NFA saved to: {}", nfa_path.display());
    println!("DFA saved to: {}", dfa_path.display());
    println!("Minimized DFA saved to: {}", min_dfa_path.display());

    println!("\nStatistics:");
    println!("NFA states: {}", nfa.num_states());
    println!("DFA states: {}", dfa.num_states());
    println!("Minimized DFA states: {}", min_dfa.num_states());

    Ok(())
}
