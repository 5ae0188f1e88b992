use cssrebase_core::url_split::{split, Quote, Segment, UrlToken};

fn reassemble(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| match s {
            Segment::Literal(text) => text.clone(),
            Segment::Url(token) => token.original_text(),
        })
        .collect()
}

#[test]
fn single_quoted_url() {
    let segments = split("url('a.png')");
    assert_eq!(
        segments,
        vec![
            Segment::Literal("url('".to_string()),
            Segment::Url(UrlToken {
                path: "a.png".to_string(),
                quote: Quote::Single,
                suffix: None,
            }),
            Segment::Literal("')".to_string()),
        ]
    );
}

#[test]
fn double_quoted_and_unquoted() {
    let segments = split(r#"url("a.png") url( b.png )"#);
    let urls: Vec<&UrlToken> = segments
        .iter()
        .filter_map(|s| match s {
            Segment::Url(t) => Some(t),
            _ => None,
        })
        .collect();
    assert_eq!(urls.len(), 2);
    assert_eq!(urls[0].path, "a.png");
    assert_eq!(urls[0].quote, Quote::Double);
    assert_eq!(urls[1].path, "b.png");
    assert_eq!(urls[1].quote, Quote::None);
}

#[test]
fn query_and_fragment_suffixes_are_split_off() {
    let segments = split("url('x.png?v=2') url(y.svg#icon)");
    let urls: Vec<&UrlToken> = segments
        .iter()
        .filter_map(|s| match s {
            Segment::Url(t) => Some(t),
            _ => None,
        })
        .collect();
    assert_eq!(urls[0].path, "x.png");
    assert_eq!(urls[0].suffix.as_deref(), Some("?v=2"));
    assert_eq!(urls[1].path, "y.svg");
    assert_eq!(urls[1].suffix.as_deref(), Some("#icon"));
}

#[test]
fn reassembly_is_byte_identical() {
    let cases = [
        "url('a.png')",
        r#"url("a.png?x=1#frag")"#,
        "url( spaced.png ) no-repeat",
        "linear-gradient(red, blue), url(bg.jpg) center / cover",
        "url('one.png') 0 0, url(\"two.png\") 10px 10px",
        "no urls here at all",
        "url()",
    ];
    for case in cases {
        assert_eq!(reassemble(&split(case)), case, "case: {case}");
    }
}

#[test]
fn text_without_url_is_one_literal() {
    let segments = split("1px solid red");
    assert_eq!(segments, vec![Segment::Literal("1px solid red".to_string())]);
}

#[test]
fn separator_text_between_two_urls_is_preserved() {
    let segments = split("url('one.png') no-repeat, url('two.png')");
    match &segments[2] {
        Segment::Literal(text) => assert_eq!(text, "') no-repeat, url('"),
        other => panic!("expected literal separator, got {other:?}"),
    }
}
