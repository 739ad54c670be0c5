//! Per-family minification
//!
//! Minification runs after reference resolution and before fingerprinting,
//! so the fingerprint covers the exact bytes served. A failure inside the
//! compactor fails the run rather than silently emitting unminified
//! output.
//!
//! Both compactors are conservative by construction:
//!
//! - CSS: comments stripped, whitespace collapsed, separators tightened,
//!   and the trailing semicolon of each block dropped. String contents
//!   are preserved verbatim.
//! - Script: comments and indentation stripped. Whitespace between two
//!   tokens collapses to a single space, and any run containing a
//!   newline keeps one newline so automatic semicolon insertion is
//!   unaffected — an immediately-invoked function stays immediately
//!   invoked.

use crate::error::{MasonError, MasonResult};
use crate::models::AssetFamily;

/// Minify finalized text for the given family.
pub fn minify(family: AssetFamily, name: &str, text: &str) -> MasonResult<String> {
    let result = match family {
        AssetFamily::Style => minify_css(text),
        AssetFamily::Script => minify_js(text),
    };
    result.map_err(|message| MasonError::Minify {
        family,
        name: name.to_string(),
        message,
    })
}

/// Characters that never need surrounding whitespace in CSS
fn css_boundary(c: Option<char>) -> bool {
    matches!(c, None | Some('{' | '}' | ';' | ':' | ',' | '>'))
}

fn minify_css(text: &str) -> Result<String, String> {
    let stripped = strip_css_comments(text)?;
    let mut out = String::with_capacity(stripped.len());
    let mut chars = stripped.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            c if c.is_whitespace() => {
                while chars.peek().is_some_and(|p| p.is_whitespace()) {
                    chars.next();
                }
                let prev = out.chars().next_back();
                let next = chars.peek().copied();
                if !(css_boundary(prev) || css_boundary(next)) {
                    out.push(' ');
                }
            }
            '}' => {
                if out.ends_with(';') {
                    out.pop();
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }

    if quote.is_some() {
        return Err("unterminated string".to_string());
    }
    Ok(out)
}

fn strip_css_comments(text: &str) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut terminated = false;
                while let Some(inner) = chars.next() {
                    if inner == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        terminated = true;
                        break;
                    }
                }
                if !terminated {
                    return Err("unterminated comment".to_string());
                }
                // A comment is a token separator.
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Punctuation around which a pure-space run can be dropped safely
fn js_tight(c: Option<char>) -> bool {
    matches!(
        c,
        Some('(' | ')' | '{' | '}' | '[' | ']' | ';' | ',' | ':' | '?')
    )
}

/// Identifier-ish character, used to keep comment-separated tokens apart
fn js_identish(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn minify_js(text: &str) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                chars.next();
                while chars.peek().is_some_and(|p| *p != '\n') {
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut terminated = false;
                while let Some(inner) = chars.next() {
                    if inner == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        terminated = true;
                        break;
                    }
                }
                if !terminated {
                    return Err("unterminated comment".to_string());
                }
                // An inline comment is a token separator.
                if js_identish(out.chars().next_back()) && js_identish(chars.peek().copied()) {
                    out.push(' ');
                }
            }
            c if c.is_whitespace() => {
                let mut had_newline = c == '\n';
                while let Some(p) = chars.peek().copied() {
                    if !p.is_whitespace() {
                        break;
                    }
                    had_newline |= p == '\n';
                    chars.next();
                }
                let prev = out.chars().next_back();
                let next = chars.peek().copied();
                if prev.is_none() || next.is_none() {
                    continue;
                }
                // An already-emitted newline separates the tokens; whatever
                // follows it is indentation.
                if prev == Some('\n') {
                    continue;
                }
                if had_newline {
                    // Newlines are semantically significant (ASI); keep one.
                    out.push('\n');
                } else if !(js_tight(prev) || js_tight(next)) {
                    out.push(' ');
                }
            }
            _ => out.push(c),
        }
    }

    if quote.is_some() {
        return Err("unterminated string".to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn css(text: &str) -> String {
        minify(AssetFamily::Style, "t.css", text).unwrap()
    }

    fn js(text: &str) -> String {
        minify(AssetFamily::Script, "t.js", text).unwrap()
    }

    #[test]
    fn css_collapses_rule_blocks() {
        let src = "body {\n  background-color: #000;\n  color: #fff;\n}\n\na {\n  display: none;\n}\n";
        assert_eq!(
            css(src),
            "body{background-color:#000;color:#fff}a{display:none}"
        );
    }

    #[test]
    fn css_keeps_space_before_string() {
        assert_eq!(
            css("@import \"/assets/asset-abc.css\";\n"),
            "@import \"/assets/asset-abc.css\";"
        );
    }

    #[test]
    fn css_strips_comments() {
        assert_eq!(css("/* header */ body { color: red; }"), "body{color:red}");
    }

    #[test]
    fn css_preserves_string_contents() {
        assert_eq!(
            css("a::before { content: \"  } spaced  \"; }"),
            "a::before{content:\"  } spaced  \"}"
        );
    }

    #[test]
    fn css_selector_descendant_space_survives() {
        assert_eq!(css("ul li { margin: 0; }"), "ul li{margin:0}");
    }

    #[test]
    fn css_unterminated_comment_fails_closed() {
        let err = minify(AssetFamily::Style, "t.css", "body {} /* oops").unwrap_err();
        assert!(matches!(err, MasonError::Minify { .. }), "{err}");
    }

    #[test]
    fn js_strips_comments_and_indentation() {
        let src = "// banner\nvar a = 1; // trailing\n/* block */\nvar b = 2;\n";
        assert_eq!(js(src), "var a = 1;\nvar b = 2;");
    }

    #[test]
    fn js_iife_stays_immediately_invoked() {
        let src = "(function () {\n  var aString = \"A string\";\n\n  anObject.aLongKeyName();\n})();\n";
        let out = js(src);
        assert!(out.starts_with("(function(){"), "{out}");
        assert!(out.ends_with("})();"), "{out}");
        assert!(out.contains("anObject.aLongKeyName();"), "{out}");
    }

    #[test]
    fn js_newline_kept_for_asi() {
        // Dropping this newline would change `return\nx` into `return x`.
        let src = "function f() {\n  return\n  x;\n}\n";
        let out = js(src);
        assert!(out.contains("return\nx;"), "{out}");
    }

    #[test]
    fn js_space_between_operators_kept() {
        assert_eq!(js("var y = a + +b;"), "var y = a + +b;");
    }

    #[test]
    fn js_string_contents_untouched() {
        assert_eq!(js("var s = \"  //not a comment  \";"), "var s = \"  //not a comment  \";");
    }

    #[test]
    fn js_inline_comment_still_separates_tokens() {
        assert_eq!(js("var/* */x = 1;"), "var x = 1;");
    }

    #[test]
    fn js_empty_input() {
        assert_eq!(js(""), "");
    }

    #[test]
    fn js_deterministic() {
        let src = "(function () { var n = 1; })();\n";
        assert_eq!(js(src), js(src));
    }
}
