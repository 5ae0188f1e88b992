use cssrebase_core::annotation::{find_annotation, strip_annotation, with_annotation};

#[test]
fn finds_trailing_annotation() {
    let css = ".a { color: red; }\n/*# sourceMappingURL=bundle.css.map */\n";
    assert_eq!(find_annotation(css).as_deref(), Some("bundle.css.map"));
}

#[test]
fn no_annotation_yields_none() {
    assert_eq!(find_annotation(".a { color: red; }\n"), None);
    // An ordinary comment is not an annotation.
    assert_eq!(find_annotation("/* sourceMappingURL mention */\n.a{}"), None);
}

#[test]
fn strip_removes_the_comment() {
    let css = ".a { color: red; }\n/*# sourceMappingURL=bundle.css.map */\n";
    assert_eq!(strip_annotation(css), ".a { color: red; }\n");
}

#[test]
fn with_annotation_replaces_a_stale_one() {
    let css = ".a { color: red; }\n/*# sourceMappingURL=old.map */\n";
    let out = with_annotation(css, "new.map");
    assert!(out.ends_with("/*# sourceMappingURL=new.map */\n"), "{out}");
    assert!(!out.contains("old.map"));
}

#[test]
fn with_annotation_appends_a_newline_when_missing() {
    let out = with_annotation(".a{}", "x.map");
    assert_eq!(out, ".a{}\n/*# sourceMappingURL=x.map */\n");
}
