// Integration tests for the parse pipeline: tree shapes, spans, errors

mod common;

use cfmt::config::FormatOptions;
use cfmt::error::{Error, SyntaxError};
use cfmt::parser::ast::{NodeKind, SourceLocation};
use cfmt::parser::lexer::CommentKind;
use cfmt::parser::parse::{ParseError, MAX_NESTING_DEPTH};
use common::{body, decls, expr, shape};
use serde_json::{json, Value};

fn ident(name: &str) -> Value {
    json!({ "type": "ident", "value": name })
}

fn keyword(name: &str) -> Value {
    json!({ "type": "keyword", "keyword": name })
}

fn syntax_errors(source: &str) -> Vec<SyntaxError> {
    match cfmt::parse(source) {
        Err(Error::Syntax(errors)) => errors,
        other => panic!("expected syntax errors for {:?}, got {:?}", source, other),
    }
}

#[test]
fn test_subtraction_is_left_associative() {
    assert_eq!(
        shape(&expr("a - b - c")),
        json!({
            "type": "binary",
            "lhs": { "type": "binary", "lhs": ident("a"), "oper": "-", "rhs": ident("b") },
            "oper": "-",
            "rhs": ident("c"),
        })
    );
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(
        shape(&expr("a = b = c")),
        json!({
            "type": "assign",
            "lhs": ident("a"),
            "oper": "=",
            "rhs": { "type": "assign", "lhs": ident("b"), "oper": "=", "rhs": ident("c") },
        })
    );
}

#[test]
fn test_dangling_else_binds_innermost() {
    let items = body("if (a) if (b) s1(); else s2();");
    let NodeKind::If {
        stmt, consequent, ..
    } = &items[0].kind
    else {
        panic!("expected if, got {:?}", items[0]);
    };
    assert!(consequent.is_none());

    let NodeKind::If {
        expr, consequent, ..
    } = &stmt.kind
    else {
        panic!("expected nested if, got {:?}", stmt);
    };
    assert_eq!(shape(expr), ident("b"));
    let consequent = consequent.as_ref().expect("inner if carries the else");
    assert_eq!(
        shape(consequent),
        json!({
            "type": "stmt",
            "expr": { "type": "call", "recv": ident("s2"), "args": null },
        })
    );
}

#[test]
fn test_cast_versus_call() {
    assert_eq!(
        shape(&expr("(int)x")),
        json!({ "type": "cast", "value": keyword("int"), "expr": ident("x") })
    );
    assert_eq!(
        shape(&expr("(f)(x)")),
        json!({
            "type": "call",
            "recv": { "type": "parens", "expr": ident("f") },
            "args": [ident("x")],
        })
    );
    // a lone identifier in parentheses is a cast only before an operand
    assert_eq!(
        shape(&expr("(T)x")),
        json!({ "type": "cast", "value": ident("T"), "expr": ident("x") })
    );
    assert_eq!(
        shape(&expr("(x) - 1")),
        json!({
            "type": "binary",
            "lhs": { "type": "parens", "expr": ident("x") },
            "oper": "-",
            "rhs": { "type": "const", "value": "1" },
        })
    );
}

#[test]
fn test_variadic_parameters() {
    let params = |source: &str| -> Value {
        let decl = shape(&decls(source)[0]);
        decl["initDecls"][0]["decl"]["params"].clone()
    };

    let variadic = params("int f(int a, ...);");
    assert_eq!(
        variadic,
        json!([
            { "type": "param", "declSpecs": keyword("int"), "decl": ident("a") },
            { "type": "ellipsis" },
        ])
    );

    let fixed = params("int f(int a);");
    assert_eq!(
        fixed,
        json!([{ "type": "param", "declSpecs": keyword("int"), "decl": ident("a") }])
    );
    assert_eq!(params("int f();"), Value::Null);
}

#[test]
fn test_literals_keep_their_spelling() {
    for literal in ["0x1AuL", "3.14f", "1e-9", "017", "'\\n'", "L'x'", "\"a\\\"b\""] {
        assert_eq!(
            shape(&expr(literal)),
            json!({ "type": "const", "value": literal }),
            "literal {}",
            literal
        );
    }
    assert_eq!(
        shape(&expr("\"ab\" \"cd\"")),
        json!({ "type": "const", "value": "\"ab\" \"cd\"" })
    );
}

#[test]
fn test_error_locality() {
    let errors = syntax_errors("int x = ;");
    assert_eq!(errors.len(), 1, "{:?}", errors);
    assert_eq!(errors[0].location(), SourceLocation::new(1, 9));
    assert!(matches!(&errors[0], SyntaxError::Parse(ParseError::Unexpected { .. })));
    assert_eq!(errors[0].found(), Some("';'"));
    assert!(!errors[0].expected().is_empty());
}

#[test]
fn test_lex_errors_are_all_reported() {
    let errors = syntax_errors("int a = 1 @ 2;\nint b = $;");
    let locations: Vec<SourceLocation> = errors.iter().map(|e| e.location()).collect();
    assert_eq!(
        locations,
        vec![SourceLocation::new(1, 11), SourceLocation::new(2, 9)]
    );
    assert!(errors.iter().all(|e| matches!(e, SyntaxError::Lex(_))));
    assert!(errors.iter().all(|e| e.found().is_none()));
}

#[test]
fn test_error_message_names_position_and_tokens() {
    let err = cfmt::parse("int main() {\n  return 0\n}").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("line 3, column 1"), "{}", message);
    assert!(message.contains("';'"), "{}", message);
    assert!(message.ends_with("found '}'"), "{}", message);
}

#[test]
fn test_nesting_limit_from_options() {
    let options = FormatOptions {
        max_nesting_depth: 8,
        ..FormatOptions::default()
    };
    let source = "int x = ((((((((((1))))))))));";
    assert!(cfmt::parse(source).is_ok());

    let err = cfmt::parse_with(source, &options).unwrap_err();
    let errors = err.syntax_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        SyntaxError::Parse(ParseError::TooDeep { limit: 8, .. })
    ));
}

#[test]
fn test_deep_nesting_fails_cleanly() {
    let depth = 500;
    let source = format!("int x = {}1{};", "(".repeat(depth), ")".repeat(depth));
    let err = cfmt::parse(&source).unwrap_err();
    assert!(matches!(
        err.syntax_errors(),
        [SyntaxError::Parse(ParseError::TooDeep { limit: 64, .. })]
    ));

    let depth = 200;
    let source = format!(
        "int main() {{ {} }}",
        "{".repeat(depth) + &"}".repeat(depth)
    );
    assert!(matches!(
        cfmt::parse(&source).unwrap_err().syntax_errors(),
        [SyntaxError::Parse(ParseError::TooDeep { .. })]
    ));
}

#[test]
fn test_nesting_below_the_limit_formats_on_a_default_stack() {
    // Runs on a freshly spawned thread with the platform's default stack.
    let handle = std::thread::spawn(|| {
        let depth = 50;
        let source = format!("int x = {}1{};", "(".repeat(depth), ")".repeat(depth));
        let out = cfmt::format(&source, &FormatOptions::default()).unwrap();
        assert_eq!(
            out,
            format!("int x = {}1{};\n", "(".repeat(depth), ")".repeat(depth))
        );

        let blocks = format!(
            "int main() {{ {}x++;{} }}",
            "{".repeat(depth),
            "}".repeat(depth)
        );
        let out = cfmt::format(&blocks, &FormatOptions::default()).unwrap();
        assert!(out.contains(&format!("{}x++;\n", " ".repeat(2 * (depth + 1)))));
    });
    handle.join().unwrap();
}

#[test]
fn test_highest_configurable_depth_formats_on_a_default_stack() {
    let options = FormatOptions {
        max_nesting_depth: MAX_NESTING_DEPTH,
        ..FormatOptions::default()
    };
    let handle = std::thread::spawn(move || {
        let depth = MAX_NESTING_DEPTH - 10;
        let source = format!("int x = {}1{};", "(".repeat(depth), ")".repeat(depth));
        assert!(cfmt::format(&source, &options).is_ok());

        let source = format!("int x = {}1{};", "(".repeat(400), ")".repeat(400));
        assert!(matches!(
            cfmt::parse_with(&source, &options).unwrap_err().syntax_errors(),
            [SyntaxError::Parse(ParseError::TooDeep { .. })]
        ));
    });
    handle.join().unwrap();
}

#[test]
fn test_long_else_if_ladder() {
    let mut source = String::from("if (x == 0) y = 0;");
    for i in 1..200 {
        source.push_str(&format!(" else if (x == {}) y = {};", i, i));
    }
    source.push_str(" else y = -1;");

    let items = body(&source);
    let mut arms = 0;
    let mut node = &items[0];
    while let NodeKind::If { consequent, .. } = &node.kind {
        arms += 1;
        match consequent {
            Some(next) => node = next,
            None => break,
        }
    }
    assert_eq!(arms, 200);
    assert!(matches!(node.kind, NodeKind::Stmt { .. }));

    let out = cfmt::format(&format!("int main() {{ {} }}", source), &FormatOptions::default())
        .unwrap();
    assert!(cfmt::parse(&out).is_ok());
}

#[test]
fn test_spans() {
    let parsed = cfmt::parse("int main() {\n  return 1;\n}").unwrap();
    assert_eq!(parsed.ast.span.start, SourceLocation::new(1, 1));
    assert_eq!(parsed.ast.span.end, SourceLocation::new(3, 1));

    let items = body("x = y;\n  return x + 1;");
    assert_eq!(items[0].span.start, SourceLocation::new(1, 14));
    assert_eq!(items[0].span.end, SourceLocation::new(1, 19));
    assert_eq!(items[1].span.start, SourceLocation::new(2, 3));
    assert_eq!(items[1].span.end, SourceLocation::new(2, 15));
}

#[test]
fn test_comments_go_to_side_channel() {
    let source = "// header\n#include <stdio.h>\nint x; /* trailing */\n";
    let parsed = cfmt::parse(source).unwrap();
    let kinds: Vec<CommentKind> = parsed.comments.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![CommentKind::Line, CommentKind::Directive, CommentKind::Block]
    );
    assert_eq!(parsed.comments[1].text, "#include <stdio.h>");
    assert_eq!(decls(source).len(), 1);
}

#[test]
fn test_identifier_type_specifiers() {
    assert_eq!(
        shape(&decls("T x;")[0]),
        json!({
            "type": "decl",
            "declSpecs": ident("T"),
            "initDecls": [{ "type": "initDecl", "decl": ident("x"), "init": null }],
        })
    );
    // without a symbol table, `a * b;` reads as a declaration
    let items = body("a * b;");
    assert_eq!(items[0].kind.name(), "decl");
    let items = body("a = b * c;");
    assert_eq!(items[0].kind.name(), "stmt");
}

#[test]
fn test_declarations() {
    assert_eq!(
        shape(&decls("static const unsigned long n = 4;")[0])["declSpecs"],
        json!({
            "type": "declSpecs",
            "specs": [keyword("static"), keyword("const"), keyword("unsigned"), keyword("long")],
        })
    );

    let point = shape(&decls("struct point { int x, y; unsigned : 2; } origin;")[0]);
    assert_eq!(point["declSpecs"]["type"], "struct");
    assert_eq!(point["declSpecs"]["name"], "point");
    assert_eq!(
        point["declSpecs"]["members"][1],
        json!({
            "type": "member",
            "specQuals": keyword("unsigned"),
            "decls": [{
                "type": "bitfield",
                "decl": null,
                "width": { "type": "const", "value": "2" },
            }],
        })
    );

    let color = shape(&decls("enum color { RED, GREEN = 2, };")[0]);
    assert_eq!(
        color["declSpecs"]["enumerators"],
        json!([
            { "type": "enumerator", "name": "RED", "value": null },
            { "type": "enumerator", "name": "GREEN", "value": { "type": "const", "value": "2" } },
        ])
    );

    assert_eq!(
        shape(&decls("_Static_assert(sizeof(int) == 4, \"int\");")[0])["msg"],
        json!("\"int\"")
    );
    assert_eq!(
        shape(&decls("_Atomic(long) counter;")[0])["declSpecs"],
        json!({ "type": "atomic", "name": keyword("long") })
    );
}

#[test]
fn test_function_definitions() {
    let knr = shape(&decls("int add(a, b) int a; int b; { return a + b; }")[0]);
    assert_eq!(knr["type"], "func");
    assert_eq!(knr["params"], json!([ident("a"), ident("b")]));
    assert_eq!(knr["decls"].as_array().map(Vec::len), Some(2));

    let implicit = shape(&decls("main() { return 0; }")[0]);
    assert_eq!(implicit["declSpecs"], Value::Null);
    assert_eq!(implicit["name"], ident("main"));

    let pointer = shape(&decls("char *name(void) { return 0; }")[0]);
    assert_eq!(
        pointer["name"],
        json!({ "type": "pointer", "quals": [], "decl": ident("name") })
    );
    assert_eq!(
        pointer["params"],
        json!([{ "type": "param", "declSpecs": keyword("void"), "decl": null }])
    );
}

#[test]
fn test_statements() {
    let items = body(
        "switch (c) { case 1: break; default: goto out; }\n\
         out: for (int i = 0; i < 3; i++) continue;\n\
         do { } while (0);\n\
         while (1) ;\n\
         return;",
    );
    let names: Vec<&str> = items.iter().map(|n| n.kind.name()).collect();
    assert_eq!(names, vec!["switch", "label", "do", "while", "return"]);

    let NodeKind::Label { stmt, .. } = &items[1].kind else {
        panic!("expected label");
    };
    let NodeKind::For { init, pred, incr, .. } = &stmt.kind else {
        panic!("expected for, got {:?}", stmt);
    };
    assert_eq!(init.kind.name(), "decl");
    assert_eq!(pred.kind.name(), "stmt");
    assert_eq!(
        incr.as_deref().map(shape),
        Some(json!({ "type": "postUnary", "expr": ident("i"), "oper": "++" }))
    );

    assert_eq!(
        shape(&body("{}")[0]),
        json!({ "type": "compound", "items": null })
    );
}

#[test]
fn test_sizeof_and_prefixes() {
    assert_eq!(
        shape(&expr("sizeof(int *)")),
        json!({
            "type": "unary",
            "oper": "sizeof",
            "expr": {
                "type": "typeName",
                "specQuals": keyword("int"),
                "decl": { "type": "pointer", "quals": [], "decl": null },
            },
            "parens": true,
        })
    );
    assert_eq!(
        shape(&expr("-*p")),
        json!({
            "type": "unary",
            "oper": "-",
            "expr": { "type": "unary", "oper": "*", "expr": ident("p"), "parens": false },
            "parens": false,
        })
    );
}
