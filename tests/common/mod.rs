// Helpers shared by the integration tests

#![allow(dead_code)]

use cfmt::parser::ast::{Node, NodeKind};
use serde_json::Value;

/// The tree as JSON with every `span` removed, for comparing shapes.
pub fn shape(node: &Node) -> Value {
    let mut value = serde_json::to_value(node).expect("tree serialises");
    strip_spans(&mut value);
    value
}

fn strip_spans(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("span");
            map.values_mut().for_each(strip_spans);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_spans),
        _ => {}
    }
}

pub fn decls(source: &str) -> Vec<Node> {
    let parsed = cfmt::parse(source).unwrap_or_else(|e| panic!("{}\n{}", source, e));
    match parsed.ast.kind {
        NodeKind::Root { decls } => decls,
        other => panic!("expected root, got {:?}", other),
    }
}

/// Block items of `int main() { <body> }`.
pub fn body(body: &str) -> Vec<Node> {
    let mut decls = decls(&format!("int main() {{ {} }}", body));
    match decls.remove(0).kind {
        NodeKind::Func { body, .. } => match body.kind {
            NodeKind::Compound { items } => items.unwrap_or_default(),
            other => panic!("expected compound, got {:?}", other),
        },
        other => panic!("expected func, got {:?}", other),
    }
}

/// The expression of the statement `<expr>;` inside `main`.
pub fn expr(expr: &str) -> Node {
    match body(&format!("{};", expr)).remove(0).kind {
        NodeKind::Stmt { expr: Some(expr) } => *expr,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

/// Wrap `code` in `main` the way the formatter prints it.
pub fn in_main(code: &str) -> String {
    let indented: Vec<String> = code
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("  {}", line)
            }
        })
        .collect();
    format!("int main() {{\n{}\n}}\n", indented.join("\n"))
}
