use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use multidb::{simplify, Expr, LexError, Lexer, SymbolTable};

const SYMBOLS_FILE: &str = "symbols.json";

/// Loads `symbols.json` from the working directory, falling back to the
/// built-in table.
fn load_symbol_table() -> SymbolTable {
    match SymbolTable::from_json_file(SYMBOLS_FILE) {
        Ok(table) => table,
        Err(e) => {
            log::info!("{}, using the default symbol table", e);
            SymbolTable::default()
        }
    }
}

fn lex_line(line: &str, table: &SymbolTable) {
    let mut lexer = Lexer::with_sink(line, table, Vec::<LexError>::new());
    for lexeme in lexer.by_ref() {
        let marker = if lexeme.is_ambiguous() { "?" } else { " " };
        println!("{} {:<12} {}", marker, lexeme.span.text(line), lexeme);
    }
    for error in lexer.into_sink() {
        println!("! {}", error);
    }
}

fn fold_line(json: &str) {
    let value: serde_json::Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            println!("! invalid JSON: {}", e);
            return;
        }
    };
    match Expr::from_json(&value) {
        Ok(expr) => {
            println!("  input:      {}", expr);
            println!("  simplified: {}", simplify(expr));
        }
        Err(e) => println!("! {}", e),
    }
}

fn main() -> Result<()> {
    let level = if std::env::var_os("MULTIDB_DEBUG").is_some() { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let table = load_symbol_table();
    println!("--- multidb expression front end ---");
    println!("Type an expression to tokenize it, ':fold <json>' to simplify a tree, ':quit' to exit.");

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("multidb> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line)?;

                if line == ":quit" {
                    break;
                } else if let Some(json) = line.strip_prefix(":fold ") {
                    fold_line(json);
                } else {
                    lex_line(line, &table);
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
