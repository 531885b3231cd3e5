use sitesim::{Page, Result, ScrollRequest};

const FULL_PAGE_HTML: &str = r##"
<body>
  <header class="header">
    <button id="mobileMenuBtn"><span></span></button>
    <nav id="nav">
      <a class="nav-link" href="#home">Home</a>
      <a class="nav-link" href="#products">Products</a>
      <a class="nav-link" href="#contact">Contact</a>
    </nav>
    <form class="search-form">
      <input class="search-input" type="search" name="q">
      <button type="submit">Go</button>
    </form>
  </header>

  <section id="home" class="hero">
    <div class="hero-slide" id="slide-0"></div>
    <div class="hero-slide" id="slide-1"></div>
    <div class="hero-slide" id="slide-2"></div>
    <button class="indicator" id="ind-0"></button>
    <button class="indicator" id="ind-1"></button>
    <button class="indicator" id="ind-2"></button>
  </section>

  <section id="products">
    <select id="category-filter">
      <option value="all" selected>All</option>
      <option value="spirits">Spirits</option>
      <option value="wine">Wine</option>
    </select>
    <div id="productsGrid">
      <div class="product-card" id="p1" data-category="spirits" data-year="2020"></div>
      <div class="product-card" id="p2" data-category="wine" data-year="2021"></div>
      <div class="product-card" id="p3" data-category="spirits" data-year="2019"></div>
    </div>
    <div class="stat-card" id="stat-1"></div>
  </section>

  <section id="contact">
    <form id="contactForm">
      <input id="name" name="name" required>
      <textarea id="message" name="message" required></textarea>
      <button id="send" type="submit">Send Message</button>
    </form>
  </section>
</body>
"##;

#[test]
fn load_wires_every_controller_without_interference() -> Result<()> {
    let page = Page::from_html(FULL_PAGE_HTML)?;

    assert!(page.has_class("#slide-0", "active")?);
    assert_eq!(page.style("#stat-1", "opacity")?.as_deref(), Some("0"));
    assert!(page.is_displayed("#p1")?);
    assert!(page.submissions().is_empty());

    // The slider interval is the only pending timer right after load.
    let timers = page.pending_timers();
    assert_eq!(timers.len(), 1);
    assert_eq!(timers[0].interval_ms, Some(5000));
    Ok(())
}

#[test]
fn mobile_menu_journey_toggle_navigate_and_settle() -> Result<()> {
    let mut page = Page::from_html(FULL_PAGE_HTML)?;
    page.set_viewport(375, 700);
    page.set_metrics(".header", 0, 64)?;
    page.set_metrics("#contact", 1800, 500)?;

    page.click("#mobileMenuBtn")?;
    assert!(page.body_scroll_locked());

    page.click("a[href=\"#contact\"]")?;
    assert!(!page.has_class("#nav", "active")?);
    assert!(!page.body_scroll_locked());
    assert_eq!(
        page.scroll_requests(),
        [ScrollRequest {
            top: 1736,
            smooth: true
        }]
    );
    // Landing inside the contact section marks its link active.
    assert!(page.has_class("a[href=\"#contact\"]", "active")?);
    assert!(page.has_class(".header", "scrolled")?);

    page.click("#mobileMenuBtn")?;
    page.resize_to(1200)?;
    page.advance_time(250)?;
    assert!(!page.has_class("#nav", "active")?);
    Ok(())
}

#[test]
fn slider_hover_pause_survives_other_activity() -> Result<()> {
    let mut page = Page::from_html(FULL_PAGE_HTML)?;

    page.hover(".hero")?;
    page.select_value("#category-filter", "wine")?;
    page.advance_time(30_000)?;
    assert!(page.has_class("#slide-0", "active")?);

    page.unhover(".hero")?;
    page.advance_time(5000)?;
    assert!(page.has_class("#slide-1", "active")?);
    Ok(())
}

#[test]
fn contact_form_journey_with_a_retry() -> Result<()> {
    let mut page = Page::from_html(FULL_PAGE_HTML)?;

    page.click("#send")?;
    assert!(page.submissions().is_empty());
    assert_eq!(page.style("#name", "border-color")?.as_deref(), Some("#ef4444"));

    page.type_text("#name", "Ada")?;
    page.type_text("#message", "Hello")?;
    page.click("#send")?;
    assert_eq!(page.submissions().len(), 1);
    page.assert_text("#send", "Sending...")?;

    page.advance_time(1500)?;
    page.assert_text("#send", "\u{2713} Sent Successfully!")?;
    page.advance_time(3000)?;
    page.assert_text("#send", "Send Message")?;
    page.assert_value("#name", "")?;

    // The earlier red flash from the invalid attempt is long gone.
    assert_eq!(page.style("#name", "border-color")?, None);
    Ok(())
}

#[test]
fn product_filtering_and_search_do_not_collide() -> Result<()> {
    let mut page = Page::from_html(FULL_PAGE_HTML)?;

    page.select_value("#category-filter", "spirits")?;
    assert!(page.is_displayed("#p1")?);
    assert!(!page.is_displayed("#p2")?);
    assert!(page.is_displayed("#p3")?);

    page.type_text(".search-input", "umeshu")?;
    page.click(".search-form button")?;
    assert_eq!(page.take_console_logs(), ["Searching for: umeshu"]);
    assert_eq!(
        page.take_alerts(),
        ["Search functionality for \"umeshu\" will be implemented."]
    );
    // The search form never lands in the submission log.
    assert!(page.submissions().is_empty());
    Ok(())
}

#[test]
fn hash_load_then_manual_anchor_navigation() -> Result<()> {
    let mut page = Page::from_html_with_hash(FULL_PAGE_HTML, "#products")?;
    page.set_metrics(".header", 0, 64)?;
    page.set_metrics("#products", 900, 700)?;
    page.set_metrics("#contact", 1800, 500)?;

    page.advance_time(100)?;
    assert_eq!(page.scroll_requests().len(), 1);
    assert_eq!(page.scroll_requests()[0].top, 900);

    page.click("a[href=\"#contact\"]")?;
    assert_eq!(page.scroll_requests().len(), 2);
    assert_eq!(page.scroll_requests()[1].top, 1736);
    Ok(())
}

#[test]
fn trace_records_events_and_timer_firings() -> Result<()> {
    let mut page = Page::from_html(FULL_PAGE_HTML)?;
    page.enable_trace();

    page.click("#ind-1")?;
    page.advance_time(5000)?;
    let logs = page.take_trace_logs();
    assert!(logs.iter().any(|line| line.contains("click #ind-1")));
    assert!(logs.iter().any(|line| line.contains("timer fire")));
    Ok(())
}
