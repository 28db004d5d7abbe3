use mailgram::{BodyKind, normalize_text, reduce_markup};

#[test]
fn test_plain_text_is_identity() {
    let text = "Just a plain message.\nWith <b>literal</b> angle brackets left alone.";

    assert_eq!(reduce_markup(BodyKind::Plain, text), text);
}

#[test]
fn test_allowed_tags_survive() {
    let html = "<b>bold</b> and <i>italic</i> and <code>mono</code>";

    assert_eq!(reduce_markup(BodyKind::Html, html), html);
}

#[test]
fn test_disallowed_tags_become_spaces() {
    let html = "a<span>b</span>c";

    assert_eq!(reduce_markup(BodyKind::Html, html), "a b c");
}

#[test]
fn test_script_block_removed_with_content() {
    let html = "<p>Hello <b>world</b></p><script>evil()</script>";
    let text = normalize_text(&reduce_markup(BodyKind::Html, html));

    assert_eq!(text, "Hello <b>world</b>");
}

#[test]
fn test_style_block_removed_with_content() {
    let html = "<style>p { color: red; }</style>Visible";
    let text = normalize_text(&reduce_markup(BodyKind::Html, html));

    assert_eq!(text, "Visible");
}

#[test]
fn test_list_items_become_bullets() {
    let html = "<ul><li>one</li><li>two</li></ul>";
    let text = normalize_text(&reduce_markup(BodyKind::Html, html));

    assert_eq!(text, "- one\n- two");
}

#[test]
fn test_image_replaced_by_alt_text() {
    let text = normalize_text(&reduce_markup(BodyKind::Html, r#"<img alt="cat photo">"#));

    assert_eq!(text, "cat photo");
}

#[test]
fn test_image_without_alt_disappears() {
    let text = normalize_text(&reduce_markup(BodyKind::Html, r#"before <img src="x.png"> after"#));

    assert_eq!(text, "before after");
}

#[test]
fn test_href_survives_attribute_stripping() {
    let html = r#"<a href="https://example.com/x" style="color: red" target="_blank">link</a>"#;

    assert_eq!(
        reduce_markup(BodyKind::Html, html),
        r#"<a href="https://example.com/x">link</a>"#
    );
}

#[test]
fn test_bare_link_unwrapped_to_text() {
    let text = reduce_markup(BodyKind::Html, "<a>just text</a>");

    assert_eq!(text.trim(), "just text");
}

#[test]
fn test_textless_link_dropped() {
    let html = r#"before<a href="https://tracker.example/p"></a>after"#;
    let text = normalize_text(&reduce_markup(BodyKind::Html, html));

    assert_eq!(text, "before after");
}

#[test]
fn test_empty_element_dropped() {
    let text = normalize_text(&reduce_markup(BodyKind::Html, "x<code></code>y"));

    assert_eq!(text, "x y");
}

#[test]
fn test_block_elements_break_lines() {
    let html = "<div>First.</div><div>Second.</div>";
    let text = normalize_text(&reduce_markup(BodyKind::Html, html));

    assert_eq!(text, "First.\nSecond.");
}

#[test]
fn test_table_markup_reduced_to_text() {
    let html = "<table><tr><td>Left.</td></tr><tr><td>Right.</td></tr></table>";
    let text = normalize_text(&reduce_markup(BodyKind::Html, html));

    assert!(!text.contains('<'));
    assert!(text.contains("Left."));
    assert!(text.contains("Right."));
}

#[test]
fn test_tag_case_is_ignored() {
    let html = "<B>shout</B> <SCRIPT>x()</SCRIPT>quiet";
    let text = normalize_text(&reduce_markup(BodyKind::Html, html));

    assert_eq!(text, "<B>shout</B> quiet");
}

#[test]
fn test_whitespace_runs_collapse_browser_style() {
    let html = "  Hello\n\t  there  ";

    assert_eq!(reduce_markup(BodyKind::Html, html), "Hello there");
}
