//! Plain-text route summary.

use std::fmt::Write;

use crate::decoding::Route;

/// One `Courier {n}: ['stop', ...]` line per route, numbered from 1.
pub fn format_routes(routes: &[Route]) -> String {
    let mut out = String::new();
    for (i, route) in routes.iter().enumerate() {
        let _ = writeln!(out, "Courier {}: {}", i + 1, render_list(&route.addresses));
    }
    out
}

/// Render addresses as a bracketed, quoted list: `['A', 'B']`.
pub fn render_list(addresses: &[String]) -> String {
    let items: Vec<String> = addresses.iter().map(|address| quote(address)).collect();
    format!("[{}]", items.join(", "))
}

/// Single-quote a string, switching to double quotes when that avoids
/// escaping an apostrophe.
fn quote(text: &str) -> String {
    let delimiter = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(delimiter);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            // Control characters are all below U+00A0, so two hex digits suffice.
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}
