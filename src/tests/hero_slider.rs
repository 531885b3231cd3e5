use super::*;

const SLIDER_HTML: &str = r#"
<body>
  <section class="hero">
    <div class="hero-slide" id="slide-0"></div>
    <div class="hero-slide" id="slide-1"></div>
    <div class="hero-slide" id="slide-2"></div>
    <button class="indicator" id="ind-0"></button>
    <button class="indicator" id="ind-1"></button>
    <button class="indicator" id="ind-2"></button>
  </section>
  <p id="outside"></p>
</body>
"#;

fn active_slide(page: &Page) -> Result<usize> {
    for index in 0..3 {
        if page.has_class(&format!("#slide-{index}"), "active")? {
            return Ok(index);
        }
    }
    panic!("no active slide");
}

#[test]
fn first_slide_and_indicator_active_on_load() -> Result<()> {
    let page = Page::from_html(SLIDER_HTML)?;
    assert!(page.has_class("#slide-0", "active")?);
    assert!(page.has_class("#ind-0", "active")?);
    assert!(!page.has_class("#slide-1", "active")?);

    let timers = page.pending_timers();
    assert_eq!(timers.len(), 1);
    assert_eq!(timers[0].interval_ms, Some(5000));
    Ok(())
}

#[test]
fn auto_advance_cycles_and_wraps() -> Result<()> {
    let mut page = Page::from_html(SLIDER_HTML)?;

    page.advance_time(4999)?;
    assert_eq!(active_slide(&page)?, 0);
    page.advance_time(1)?;
    assert_eq!(active_slide(&page)?, 1);
    assert!(page.has_class("#ind-1", "active")?);

    page.advance_time(10_000)?;
    assert_eq!(active_slide(&page)?, 0);
    Ok(())
}

#[test]
fn indicator_click_selects_and_restarts_interval() -> Result<()> {
    let mut page = Page::from_html(SLIDER_HTML)?;
    page.advance_time(4000)?;

    page.click("#ind-2")?;
    assert_eq!(active_slide(&page)?, 2);

    // The auto-advance interval restarts, so the next step is a full
    // period after the manual selection.
    page.advance_time(4999)?;
    assert_eq!(active_slide(&page)?, 2);
    page.advance_time(1)?;
    assert_eq!(active_slide(&page)?, 0);
    Ok(())
}

#[test]
fn exactly_one_slide_active_after_any_change() -> Result<()> {
    let mut page = Page::from_html(SLIDER_HTML)?;
    page.click("#ind-1")?;
    let mut active = 0;
    for index in 0..3 {
        if page.has_class(&format!("#slide-{index}"), "active")? {
            active += 1;
        }
        assert_eq!(
            page.has_class(&format!("#slide-{index}"), "active")?,
            page.has_class(&format!("#ind-{index}"), "active")?
        );
    }
    assert_eq!(active, 1);
    Ok(())
}

#[test]
fn hover_pauses_and_unhover_resumes() -> Result<()> {
    let mut page = Page::from_html(SLIDER_HTML)?;

    page.hover(".hero")?;
    assert!(!page.slider.as_ref().unwrap().is_running());
    assert!(page.pending_timers().is_empty());
    page.advance_time(20_000)?;
    assert_eq!(active_slide(&page)?, 0);

    page.unhover(".hero")?;
    assert!(page.slider.as_ref().unwrap().is_running());
    page.advance_time(5000)?;
    assert_eq!(active_slide(&page)?, 1);
    assert_eq!(page.slider.as_ref().unwrap().active_index(), 1);
    Ok(())
}

#[test]
fn hover_outside_hero_does_not_pause() -> Result<()> {
    let mut page = Page::from_html(SLIDER_HTML)?;
    page.hover("#outside")?;
    page.advance_time(5000)?;
    assert_eq!(active_slide(&page)?, 1);
    Ok(())
}

#[test]
fn page_without_slides_has_no_slider_timer() -> Result<()> {
    let page = Page::from_html("<body><p>plain</p></body>")?;
    assert!(page.pending_timers().is_empty());
    Ok(())
}
