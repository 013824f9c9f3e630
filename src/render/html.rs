//! Node-to-HTML rendering with slot resolution.
//!
//! A `Slot` renders the entry registered under its id, with that entry's
//! `Children` placeholder replaced by the slot's own children. Missing
//! entries render the slot's children directly.

use serde_json::Value;

use crate::render::entries::EntriesMap;
use crate::render::node::Node;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Render `node` to markup, resolving slots against `entries`.
pub fn render_to_string(node: &Node, entries: &EntriesMap) -> String {
    let mut out = String::new();
    write_node(node, entries, None, &mut out);
    out
}

fn write_node(node: &Node, entries: &EntriesMap, children: Option<&Node>, out: &mut String) {
    match node {
        Node::Element { tag, props, children: kids } => {
            out.push('<');
            out.push_str(tag);
            for (key, value) in props {
                write_attr(key, value, out);
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag.as_str()) {
                return;
            }
            for kid in kids {
                write_node(kid, entries, children, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        Node::Text { value } => escape_into(value, out),
        Node::Fragment { children: kids } => {
            for kid in kids {
                write_node(kid, entries, children, out);
            }
        }
        Node::Children => {
            if let Some(child) = children {
                write_node(child, entries, None, out);
            }
        }
        Node::Slot { id, children: slot_children } => match entries.get(id.as_str()) {
            Some(entry) => write_node(entry, entries, slot_children.as_deref(), out),
            None => {
                if let Some(inner) = slot_children {
                    write_node(inner, entries, None, out);
                }
            }
        },
        Node::Null => {}
    }
}

fn write_attr(key: &str, value: &Value, out: &mut String) {
    match value {
        Value::Null | Value::Bool(false) => {}
        Value::Bool(true) => {
            out.push(' ');
            out.push_str(key);
        }
        Value::String(s) => push_attr(key, s, out),
        Value::Number(n) => push_attr(key, &n.to_string(), out),
        other => push_attr(key, &other.to_string(), out),
    }
}

fn push_attr(key: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    escape_into(value, out);
    out.push('"');
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}
