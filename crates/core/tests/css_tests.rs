use cssrebase_core::css::{parse, serialize, Declaration, Node, Pos};

fn decl(node: &Node) -> &Declaration {
    match node {
        Node::Declaration(d) => d,
        other => panic!("expected declaration, got {other:?}"),
    }
}

#[test]
fn parses_rules_and_declarations_with_positions() {
    let sheet = parse(".logo {\n  background: url('a.png');\n  color: red;\n}\n").unwrap();
    assert_eq!(sheet.nodes.len(), 1);
    let Node::Rule { selector, body, pos } = &sheet.nodes[0] else {
        panic!("expected rule");
    };
    assert_eq!(selector, ".logo");
    assert_eq!(*pos, Pos { line: 0, column: 0 });
    assert_eq!(body.len(), 2);

    let background = decl(&body[0]);
    assert_eq!(background.property, "background");
    assert_eq!(background.value, "url('a.png')");
    assert_eq!(background.pos, Pos { line: 1, column: 2 });

    let color = decl(&body[1]);
    assert_eq!(color.property, "color");
    assert_eq!(color.value, "red");
    assert_eq!(color.pos, Pos { line: 2, column: 2 });
}

#[test]
fn recurses_into_media_blocks() {
    let sheet = parse("@media (min-width: 100px) {\n  .a { color: red; }\n}\n").unwrap();
    let Node::AtRule { name, params, body, .. } = &sheet.nodes[0] else {
        panic!("expected at-rule");
    };
    assert_eq!(name, "media");
    assert_eq!(params, "(min-width: 100px)");
    let body = body.as_ref().unwrap();
    let Node::Rule { selector, body: rule_body, .. } = &body[0] else {
        panic!("expected nested rule");
    };
    assert_eq!(selector, ".a");
    assert_eq!(decl(&rule_body[0]).value, "red");
}

#[test]
fn bodyless_at_rules_and_comments() {
    let sheet = parse("@charset \"utf-8\";\n/* note */\n@import url('x.css');\n").unwrap();
    assert!(matches!(&sheet.nodes[0], Node::AtRule { name, body: None, .. } if name == "charset"));
    assert!(matches!(&sheet.nodes[1], Node::Comment { text, .. } if text == " note "));
    let Node::AtRule { name, params, body: None, .. } = &sheet.nodes[2] else {
        panic!("expected @import");
    };
    assert_eq!(name, "import");
    assert_eq!(params, "url('x.css')");
}

#[test]
fn semicolons_inside_parens_do_not_end_a_declaration() {
    let sheet = parse(".a { background: url(data:image/png;base64,AAAA); }").unwrap();
    let Node::Rule { body, .. } = &sheet.nodes[0] else { panic!() };
    assert_eq!(decl(&body[0]).value, "url(data:image/png;base64,AAAA)");
}

#[test]
fn braces_inside_strings_are_opaque() {
    let sheet = parse(".a { content: \"{ not a block }\"; }").unwrap();
    let Node::Rule { body, .. } = &sheet.nodes[0] else { panic!() };
    assert_eq!(decl(&body[0]).value, "\"{ not a block }\"");
}

#[test]
fn columns_count_utf16_code_units() {
    // The 🙂 is one char but two UTF-16 units; map consumers count units.
    let sheet = parse(".a { content: \"🙂\"; color: red; }").unwrap();
    let Node::Rule { body, .. } = &sheet.nodes[0] else { panic!() };
    let color = decl(&body[1]);
    assert_eq!(color.property, "color");
    assert_eq!(color.pos, Pos { line: 0, column: 20 });
}

#[test]
fn unclosed_block_is_a_syntax_error() {
    let err = parse(".a { color: red;").unwrap_err();
    assert!(err.to_string().contains("unclosed block"), "{err}");
}

#[test]
fn declaration_without_colon_is_a_syntax_error() {
    let err = parse(".a { oops }").unwrap_err();
    assert!(err.to_string().contains("missing ':'"), "{err}");
}

#[test]
fn serializer_reports_node_output_positions() {
    let sheet = parse(".logo{background:url('a.png');}").unwrap();
    let out = serialize(&sheet);
    assert_eq!(out.code, ".logo {\n  background: url('a.png');\n}\n");

    // rule start, then declaration start
    assert_eq!(out.spans.len(), 2);
    assert_eq!(out.spans[0].out, Pos { line: 0, column: 0 });
    assert_eq!(out.spans[0].input, Pos { line: 0, column: 0 });
    assert_eq!(out.spans[1].out, Pos { line: 1, column: 2 });
    assert_eq!(out.spans[1].input, Pos { line: 0, column: 6 });
}

#[test]
fn serializer_round_trips_nested_structure() {
    let src = "@media screen {\n  .a {\n    color: red;\n  }\n}\n";
    let sheet = parse(src).unwrap();
    assert_eq!(serialize(&sheet).code, src);
}
