//! Name and text normalization shared by the parser and the renderer.

use crate::table;

/// `true` for `data-*` and `aria-*` keys, which keep their kebab case.
pub fn is_data_or_aria(key: &str) -> bool {
    let b = key.as_bytes();
    b.len() > 5 && b[4] == b'-' && (b.starts_with(b"data") || b.starts_with(b"aria"))
}

/// `foo-bar-baz` -> `fooBarBaz`. Repeated and trailing hyphens are dropped.
pub fn kebab_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '-' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Normalize a raw attribute key as written in the template.
pub fn attr_key(raw: &str) -> String {
    if is_data_or_aria(raw) {
        return raw.to_string();
    }
    if let Some(svg) = table::svg_attr_case(raw) {
        return svg.to_string();
    }
    kebab_to_camel(raw)
}

/// Collapse runs of spaces, tabs, carriage returns and newlines to one space.
///
/// Returns `None` when the input is empty or whitespace only.
pub fn collapse_whitespace(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    let mut any = false;
    for c in s.chars() {
        if matches!(c, ' ' | '\t' | '\r' | '\n') {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(c);
            in_space = false;
            any = true;
        }
    }
    any.then_some(out)
}

pub fn escape_comment(s: &str) -> String {
    s.replace("*/", "*\\/")
}

/// Escape characters that JSX would otherwise read as markup or expressions.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// PascalCase identifier for a component stem: `user-card` -> `UserCard`.
pub fn component_ident(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut upper_next = true;
    for c in stem.chars() {
        if c == '-' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Make one path segment usable as a JS property name.
///
/// Characters outside `[A-Za-z0-9_$]` become `_`; a leading digit or an
/// empty segment gets a `_` prefix.
pub fn sanitize_ident(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 1);
    if segment.is_empty() || segment.starts_with(|c: char| c.is_ascii_digit()) {
        out.push('_');
    }
    for c in segment.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    out
}

/// Join a scope identifier and a dotted name into a member expression.
pub fn member_expr(scope: &str, dotted: &str) -> String {
    let mut out = String::from(scope);
    for part in dotted.split('.').map(str::trim).filter(|p| !p.is_empty()) {
        out.push('.');
        out.push_str(&sanitize_ident(part));
    }
    out
}
