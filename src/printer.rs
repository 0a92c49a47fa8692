//! Rendering values back to text. Two modes: readable output escapes strings
//! so the result can be read back in (`pr-str`, the REPL), display output
//! emits raw text for human consumption (`str`, `println`). Rendering is
//! total - every well-formed value has a rendering in both modes.

use crate::value::Value;

/// Render a value to text. `readably` selects the mode: `true` for output
/// intended to be re-read, `false` for user-facing display.
pub fn pr_str(value: &Value, readably: bool) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Int(n) => n.to_string(),
        // Rust's float Display is the canonical shortest round-trippable form
        Value::Float(n) => n.to_string(),
        Value::String(text) => {
            if readably {
                escape(text)
            } else {
                text.to_string()
            }
        }
        // Keywords already carry their sigil in the stored text
        Value::Symbol(text) | Value::Keyword(text) => text.to_string(),
        Value::List(elements) => pr_seq(elements, readably, "(", ")"),
        Value::Vector(elements) => pr_seq(elements, readably, "[", "]"),
        Value::Map(entries) => {
            // Alternating key/value renderings, iterated in the map's own
            // key order
            let flat: Vec<String> = entries
                .iter()
                .flat_map(|(key, value)| [pr_str(key, readably), pr_str(value, readably)])
                .collect();
            format!("{{{}}}", flat.join(" "))
        }
        // Closures are not distinguished from natives at display time
        Value::Native(_) | Value::Closure(_) => "#<function>".to_string(),
        Value::Atom(cell) => format!("(atom {})", pr_str(&cell.load(), readably)),
    }
}

fn pr_seq(elements: &[Value], readably: bool, open: &str, close: &str) -> String {
    let rendered: Vec<String> = elements
        .iter()
        .map(|element| pr_str(element, readably))
        .collect();
    format!("{open}{}{close}", rendered.join(" "))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
