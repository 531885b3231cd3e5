use super::*;

#[test]
fn parses_nested_markup_and_text() -> Result<()> {
    let page = Page::from_html(
        r#"<body><div id="outer"><p>Hello <strong>world</strong></p></div></body>"#,
    )?;
    page.assert_text("#outer", "Hello world")?;
    page.assert_text("#outer strong", "world")?;
    Ok(())
}

#[test]
fn decodes_character_references_in_text_and_attributes() -> Result<()> {
    let page = Page::from_html(
        r#"<body><p id="msg" title="a &amp; b">Fish &amp; Chips &#169; &lt;sea&gt;</p></body>"#,
    )?;
    page.assert_text("#msg", "Fish & Chips \u{a9} <sea>")?;
    let node = selector::select_one(&page.env.dom, "#msg")?;
    assert_eq!(page.env.dom.attr(node, "title").as_deref(), Some("a & b"));
    Ok(())
}

#[test]
fn list_items_close_implicitly() -> Result<()> {
    let page = Page::from_html("<body><ul><li>One<li>Two<li>Three</ul></body>")?;
    let items = selector::select_all(&page.env.dom, "ul li")?;
    assert_eq!(items.len(), 3);
    assert_eq!(page.env.dom.text_content(items[1]), "Two");
    Ok(())
}

#[test]
fn comments_and_void_elements_are_handled() -> Result<()> {
    let page = Page::from_html(
        r#"<body><!-- skip me --><p id="p">before<br>after</p><img src="x.png"></body>"#,
    )?;
    page.assert_text("#p", "beforeafter")?;
    page.assert_exists("img[src=\"x.png\"]")?;
    Ok(())
}

#[test]
fn script_content_is_raw_text() -> Result<()> {
    let page = Page::from_html(
        r#"<body><script>if (a < b) { render("<div>"); }</script><p id="p">real</p></body>"#,
    )?;
    page.assert_exists("#p")?;
    assert!(selector::select_all(&page.env.dom, "div")?.is_empty());
    Ok(())
}

#[test]
fn malformed_markup_reports_a_parse_error() {
    let result = Page::from_html("<body><div id='x'");
    assert!(matches!(result, Err(Error::HtmlParse(_))));
}

#[test]
fn textarea_and_select_pick_up_default_values() -> Result<()> {
    let page = Page::from_html(
        r#"<body>
          <textarea id="ta">preset text</textarea>
          <select id="with-selected">
            <option value="a">A</option>
            <option value="b" selected>B</option>
          </select>
          <select id="first-wins">
            <option value="x">X</option>
            <option value="y">Y</option>
          </select>
          <select id="text-fallback">
            <option>Plain</option>
          </select>
        </body>"#,
    )?;
    page.assert_value("#ta", "preset text")?;
    page.assert_value("#with-selected", "b")?;
    page.assert_value("#first-wins", "x")?;
    page.assert_value("#text-fallback", "Plain")?;
    Ok(())
}

#[test]
fn attribute_selectors_match_exact_and_prefix() -> Result<()> {
    let page = Page::from_html(
        r##"<body>
          <a id="in-page" href="#section">in</a>
          <a id="external" href="https://example.com">out</a>
          <input id="req" type="text" required>
        </body>"##,
    )?;
    let hash_links = selector::select_all(&page.env.dom, "a[href^=\"#\"]")?;
    assert_eq!(hash_links.len(), 1);
    assert_eq!(page.env.dom.attr(hash_links[0], "id").as_deref(), Some("in-page"));

    page.assert_exists("input[required]")?;
    page.assert_exists("a[href=\"https://example.com\"]")?;
    Ok(())
}

#[test]
fn child_combinator_requires_a_direct_parent() -> Result<()> {
    let page = Page::from_html(
        r#"<body><div id="top"><span id="direct"><b><span id="deep"></span></b></span></div></body>"#,
    )?;
    let direct = selector::select_all(&page.env.dom, "div > span")?;
    assert_eq!(direct.len(), 1);
    assert_eq!(page.env.dom.attr(direct[0], "id").as_deref(), Some("direct"));

    let descendants = selector::select_all(&page.env.dom, "div span")?;
    assert_eq!(descendants.len(), 2);
    Ok(())
}

#[test]
fn selector_groups_union_their_matches() -> Result<()> {
    let page = Page::from_html(
        r#"<body><div class="stat-card"></div><div class="news-card"></div><p></p></body>"#,
    )?;
    let cards = selector::select_all(&page.env.dom, ".stat-card, .news-card")?;
    assert_eq!(cards.len(), 2);
    Ok(())
}

#[test]
fn compound_class_selector_requires_every_class() -> Result<()> {
    let page = Page::from_html(
        r#"<body>
          <div id="both" class="product-card featured"></div>
          <div id="plain" class="product-card"></div>
        </body>"#,
    )?;
    let featured = selector::select_all(&page.env.dom, "div.product-card.featured")?;
    assert_eq!(featured.len(), 1);
    assert_eq!(page.env.dom.attr(featured[0], "id").as_deref(), Some("both"));
    Ok(())
}

#[test]
fn unsupported_selector_is_rejected() {
    let page = Page::from_html("<body><p></p></body>").unwrap();
    assert!(matches!(
        selector::select_all(&page.env.dom, "p:hover"),
        Err(Error::UnsupportedSelector(_))
    ));
}

#[test]
fn missing_selector_reports_not_found() {
    let page = Page::from_html("<body><p></p></body>").unwrap();
    assert!(matches!(
        page.text("#missing"),
        Err(Error::SelectorNotFound(_))
    ));
}

#[test]
fn assertion_failure_carries_the_element_snippet() -> Result<()> {
    let page = Page::from_html(r#"<body><p id="msg">actual</p></body>"#)?;
    match page.assert_text("#msg", "expected") {
        Err(Error::AssertionFailed {
            actual, dom_snippet, ..
        }) => {
            assert_eq!(actual, "actual");
            assert!(dom_snippet.contains("<p"));
        }
        other => panic!("expected assertion failure, got {other:?}"),
    }
    Ok(())
}

#[test]
fn type_text_rejects_non_input_elements() {
    let mut page = Page::from_html(r#"<body><p id="msg"></p></body>"#).unwrap();
    assert!(matches!(
        page.type_text("#msg", "hi"),
        Err(Error::TypeMismatch { .. })
    ));
}
