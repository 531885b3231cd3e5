use super::*;

const CARDS_HTML: &str = r#"
<body>
  <section>
    <div class="stat-card" id="card-a"></div>
    <div class="news-card" id="card-b"></div>
    <div class="choose-card" id="card-c"></div>
  </section>
</body>
"#;

#[test]
fn targets_start_hidden_and_offset() -> Result<()> {
    let page = Page::from_html(CARDS_HTML)?;
    assert_eq!(page.style("#card-a", "opacity")?.as_deref(), Some("0"));
    assert_eq!(
        page.style("#card-a", "transform")?.as_deref(),
        Some("translateY(30px)")
    );
    assert_eq!(
        page.style("#card-b", "transition")?.as_deref(),
        Some("opacity 0.6s ease-out, transform 0.6s ease-out")
    );
    Ok(())
}

#[test]
fn card_reveals_when_scrolled_into_view() -> Result<()> {
    let mut page = Page::from_html(CARDS_HTML)?;
    page.set_metrics("#card-a", 900, 200)?;

    page.scroll_to(100)?;
    assert_eq!(page.style("#card-a", "opacity")?.as_deref(), Some("0"));

    // Band is [300, 1050]; overlap 150 of 200 clears the 10% threshold.
    page.scroll_to(300)?;
    assert_eq!(page.style("#card-a", "opacity")?.as_deref(), Some("1"));
    assert_eq!(
        page.style("#card-a", "transform")?.as_deref(),
        Some("translateY(0)")
    );
    Ok(())
}

#[test]
fn reveal_is_one_shot() -> Result<()> {
    let mut page = Page::from_html(CARDS_HTML)?;
    page.set_metrics("#card-a", 900, 200)?;
    page.scroll_to(300)?;
    assert_eq!(page.style("#card-a", "opacity")?.as_deref(), Some("1"));
    // The revealed card is no longer observed.
    assert_eq!(page.reveal.as_ref().unwrap().observed_count(), 2);

    page.scroll_to(0)?;
    assert_eq!(page.style("#card-a", "opacity")?.as_deref(), Some("1"));
    Ok(())
}

#[test]
fn sliver_below_threshold_stays_hidden() -> Result<()> {
    let mut page = Page::from_html(CARDS_HTML)?;
    // Band is [0, 750]; only 10px of the 200px card pokes in.
    page.set_metrics("#card-a", 740, 200)?;
    page.scroll_to(1)?;
    page.scroll_to(0)?;
    assert_eq!(page.style("#card-a", "opacity")?.as_deref(), Some("0"));

    page.set_metrics("#card-a", 730, 200)?;
    page.scroll_to(1)?;
    page.scroll_to(0)?;
    assert_eq!(page.style("#card-a", "opacity")?.as_deref(), Some("1"));
    Ok(())
}

#[test]
fn zero_height_element_reveals_when_its_top_enters_the_band() -> Result<()> {
    let mut page = Page::from_html(CARDS_HTML)?;
    page.set_metrics("#card-b", 700, 0)?;
    page.scroll_to(10)?;
    assert_eq!(page.style("#card-b", "opacity")?.as_deref(), Some("1"));
    Ok(())
}

#[test]
fn each_card_reveals_independently() -> Result<()> {
    let mut page = Page::from_html(CARDS_HTML)?;
    page.set_metrics("#card-a", 100, 200)?;
    page.set_metrics("#card-b", 2000, 200)?;

    page.scroll_to(1)?;
    page.scroll_to(0)?;
    assert_eq!(page.style("#card-a", "opacity")?.as_deref(), Some("1"));
    assert_eq!(page.style("#card-b", "opacity")?.as_deref(), Some("0"));

    page.scroll_to(1500)?;
    assert_eq!(page.style("#card-b", "opacity")?.as_deref(), Some("1"));
    Ok(())
}
