//! Per-family asset compilers
//!
//! A compiler's contract is `compile(source, ctx) -> compiled text`,
//! failing with a source-located message on malformed input. Compilation
//! has no filesystem side effects and is deterministic: the same source
//! and context always produce the same output.
//!
//! Plain CSS and JS sources compile to themselves; the value of the pass
//! is syntax validation, so broken sources fail here with a line number
//! instead of surfacing as corrupt output later in the pipeline. The
//! `asset_path(...)` helper syntax is validated at the same time.

use std::collections::BTreeSet;

use crate::error::{MasonError, MasonResult};
use crate::models::AssetFamily;
use crate::resolve;

/// Read-only compilation context
///
/// Carries the set of logical names discovered in this run, available to
/// preprocessor-style compilers for reference checks.
pub struct CompileContext<'a> {
    pub known_names: &'a BTreeSet<String>,
}

/// Compiler interface, one implementation per asset family
pub trait AssetCompiler {
    fn family(&self) -> AssetFamily;

    /// Compile source text, or fail with a syntax error message.
    fn compile(&self, name: &str, source: &str, ctx: &CompileContext) -> MasonResult<String>;
}

/// Stylesheet compiler
pub struct StyleCompiler;

/// Script compiler
pub struct ScriptCompiler;

/// Look up the compiler for a family
pub fn compiler_for(family: AssetFamily) -> &'static dyn AssetCompiler {
    match family {
        AssetFamily::Style => &StyleCompiler,
        AssetFamily::Script => &ScriptCompiler,
    }
}

impl AssetCompiler for StyleCompiler {
    fn family(&self) -> AssetFamily {
        AssetFamily::Style
    }

    fn compile(&self, name: &str, source: &str, _ctx: &CompileContext) -> MasonResult<String> {
        check_style_syntax(source).map_err(|message| compile_error(self.family(), name, message))?;
        resolve::find_references(source)
            .map_err(|message| compile_error(self.family(), name, message))?;
        Ok(source.to_string())
    }
}

impl AssetCompiler for ScriptCompiler {
    fn family(&self) -> AssetFamily {
        AssetFamily::Script
    }

    fn compile(&self, name: &str, source: &str, _ctx: &CompileContext) -> MasonResult<String> {
        check_script_syntax(source).map_err(|message| compile_error(self.family(), name, message))?;
        resolve::find_references(source)
            .map_err(|message| compile_error(self.family(), name, message))?;
        Ok(source.to_string())
    }
}

fn compile_error(family: AssetFamily, name: &str, message: String) -> MasonError {
    MasonError::Compile {
        family,
        name: name.to_string(),
        message,
    }
}

/// Validate CSS block structure: balanced braces, terminated comments and
/// strings.
fn check_style_syntax(source: &str) -> Result<(), String> {
    let mut chars = source.chars().peekable();
    let mut line = 1usize;
    let mut depth = 0usize;
    let mut in_comment = false;
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
            continue;
        }
        if in_comment {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_comment = false;
            }
            continue;
        }
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_comment = true;
            }
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    return Err(format!("unmatched '}}' at line {line}"));
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    if in_comment {
        return Err("unterminated comment".to_string());
    }
    if quote.is_some() {
        return Err("unterminated string".to_string());
    }
    if depth > 0 {
        return Err(format!("unclosed '{{' ({depth} open at end of file)"));
    }
    Ok(())
}

/// Validate script delimiter structure: balanced `()[]{}`, terminated
/// comments, strings, and template literals.
///
/// This is a delimiter scanner, not a JS parser; regex literals containing
/// bracket characters are not understood.
fn check_script_syntax(source: &str) -> Result<(), String> {
    let mut chars = source.chars().peekable();
    let mut line = 1usize;
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut in_block_comment = false;
    let mut in_line_comment = false;
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
            in_line_comment = false;
            if quote == Some('"') || quote == Some('\'') {
                return Err(format!("unterminated string at line {}", line - 1));
            }
            continue;
        }
        if in_line_comment {
            continue;
        }
        if in_block_comment {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_block_comment = false;
            }
            continue;
        }
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '/' if chars.peek() == Some(&'/') => {
                chars.next();
                in_line_comment = true;
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_block_comment = true;
            }
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '[' | '{' => stack.push((c, line)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, open_line)) => {
                        return Err(format!(
                            "mismatched '{c}' at line {line} (opened with '{open}' at line {open_line})"
                        ));
                    }
                    None => return Err(format!("unmatched '{c}' at line {line}")),
                }
            }
            _ => {}
        }
    }

    if in_block_comment {
        return Err("unterminated comment".to_string());
    }
    if quote.is_some() {
        return Err("unterminated string".to_string());
    }
    if let Some((open, open_line)) = stack.pop() {
        return Err(format!("unclosed '{open}' from line {open_line}"));
    }
    Ok(())
}
