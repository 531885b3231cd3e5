//! Deterministic page-interaction controllers for a marketing site.
//!
//! A [`Page`] is built from an HTML string and carries its own in-memory
//! DOM, a simulated clock, and the controllers that drive the site's
//! behavior (mobile navigation, hero slider, scroll state, form
//! validation with a simulated submit round trip, reveal-on-scroll, and
//! the product grid with filtering, sorting, and pagination). Nothing
//! here touches a real browser, the network, or wall-clock time, so
//! every sequence is reproducible from tests.
//!
//! ```
//! use sitesim::Page;
//!
//! # fn main() -> sitesim::Result<()> {
//! let mut page = Page::from_html(
//!     r#"<header class="header"></header>
//!        <button id="mobileMenuBtn"></button>
//!        <nav id="nav"></nav>"#,
//! )?;
//! page.resize_to(375)?;
//! page.click("#mobileMenuBtn")?;
//! assert!(page.has_class("#nav", "active")?);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::collections::VecDeque;
use std::fmt;

mod controllers;
mod dom;
mod html;
mod scheduler;
mod selector;

#[cfg(test)]
mod tests;

pub use scheduler::PendingTimer;

use controllers::form::{self, FormController};
use controllers::navigation::NavController;
use controllers::products::ProductsController;
use controllers::reveal::RevealController;
use controllers::search::SearchController;
use controllers::slider::HeroSlider;
use dom::{Dom, NodeId};
use scheduler::{Scheduler, TimerTask};

const HASH_SCROLL_DELAY_MS: i64 = 100;
const PARSE_STACK_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    SelectorNotFound(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    Harness(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::HtmlParse(msg) => write!(f, "HTML parse error: {msg}"),
            Error::UnsupportedSelector(selector) => {
                write!(f, "unsupported selector: {selector:?}")
            }
            Error::SelectorNotFound(selector) => {
                write!(f, "no element matches selector: {selector:?}")
            }
            Error::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "element {selector:?} is a <{actual}>, expected {expected}"
            ),
            Error::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector:?}: expected {expected:?}, got {actual:?}\n  element: {dom_snippet}"
            ),
            Error::Harness(msg) => write!(f, "harness error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Simulated viewport geometry. `scroll_y` is the vertical scroll
/// offset of the page within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub(crate) width: i64,
    pub(crate) height: i64,
    pub(crate) scroll_y: i64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            scroll_y: 0,
        }
    }
}

/// Layout geometry injected per element. There is no layout engine;
/// tests that exercise scroll-dependent behavior assign positions with
/// [`Page::set_metrics`]. Elements without metrics sit at 0 with zero
/// height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Metrics {
    pub(crate) top: i64,
    pub(crate) height: i64,
}

/// A programmatic scroll issued by the page (anchor navigation, the
/// deferred hash scroll on load).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub top: i64,
    pub smooth: bool,
}

/// A captured form submission: the form's id (when it has one) and its
/// named control values in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub form_id: Option<String>,
    pub fields: Vec<(String, String)>,
}

#[derive(Default)]
struct Trace {
    enabled: bool,
    to_stderr: bool,
    logs: VecDeque<String>,
    log_limit: usize,
}

impl Trace {
    fn record(&mut self, line: String) {
        if !self.enabled {
            return;
        }
        if self.to_stderr {
            eprintln!("[sitesim] {line}");
        }
        let limit = if self.log_limit == 0 {
            10_000
        } else {
            self.log_limit
        };
        while self.logs.len() >= limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }
}

/// Shared mutable page state handed to controllers: the DOM, viewport
/// and injected metrics, and the outward-effect recorders (alerts,
/// console, scroll requests, submissions).
pub(crate) struct PageEnv {
    pub(crate) dom: Dom,
    pub(crate) viewport: Viewport,
    pub(crate) metrics: HashMap<NodeId, Metrics>,
    pub(crate) body: Option<NodeId>,
    pub(crate) alerts: Vec<String>,
    pub(crate) console_logs: Vec<String>,
    pub(crate) scroll_requests: Vec<ScrollRequest>,
    pub(crate) submissions: Vec<FormSubmission>,
    transport: Option<Box<dyn FnMut(&FormSubmission)>>,
    trace: Trace,
}

impl PageEnv {
    pub(crate) fn metrics_of(&self, node: NodeId) -> Metrics {
        self.metrics.get(&node).copied().unwrap_or_default()
    }

    pub(crate) fn metrics_opt(&self, node: NodeId) -> Option<Metrics> {
        self.metrics.get(&node).copied()
    }

    pub(crate) fn record_submission(&mut self, submission: FormSubmission) {
        if let Some(transport) = &mut self.transport {
            transport(&submission);
        }
        self.submissions.push(submission);
    }

    /// Records a programmatic scroll and applies it immediately. Smooth
    /// scrolling has no intermediate frames here; the offset jumps to
    /// its destination.
    pub(crate) fn request_scroll(&mut self, top: i64, smooth: bool) {
        let top = top.max(0);
        self.scroll_requests.push(ScrollRequest { top, smooth });
        self.viewport.scroll_y = top;
    }
}

/// A loaded page: DOM, simulated clock, and the interaction
/// controllers wired the way the site wires them on load.
pub struct Page {
    env: PageEnv,
    timers: Scheduler,
    nav: NavController,
    slider: Option<HeroSlider>,
    forms: Vec<FormController>,
    reveal: Option<RevealController>,
    products: Option<ProductsController>,
    search: Option<SearchController>,
    hash_target: Option<String>,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::open(html, None)
    }

    /// Like [`Page::from_html`], but the page loads with a location
    /// hash (for example `"#about"`). After the load-time settle delay
    /// the page scrolls to the element with that id, if present.
    pub fn from_html_with_hash(html: &str, hash: &str) -> Result<Self> {
        Self::open(html, Some(hash))
    }

    fn open(html: &str, hash: Option<&str>) -> Result<Self> {
        // Deeply nested markup recurses in both parsing and traversal.
        let dom = stacker::grow(PARSE_STACK_BYTES, || html::parse_html(html))?;
        let body = dom.first_by_tag("body");
        let mut env = PageEnv {
            dom,
            viewport: Viewport::default(),
            metrics: HashMap::new(),
            body,
            alerts: Vec::new(),
            console_logs: Vec::new(),
            scroll_requests: Vec::new(),
            submissions: Vec::new(),
            transport: None,
            trace: Trace::default(),
        };
        let mut timers = Scheduler::default();

        let mut nav = NavController::new(&env.dom)?;
        let mut slider = HeroSlider::new(&env.dom)?;
        if let Some(slider) = &mut slider {
            slider.show(&mut env);
            slider.start(&mut timers);
        }

        let search = SearchController::new(&env)?;
        let mut forms = Vec::new();
        for node in selector::select_all(&env.dom, "form")? {
            if selector::matches_selector(&env.dom, node, ".search-form")? {
                continue;
            }
            forms.push(FormController::new(&env.dom, node)?);
        }

        let mut reveal = RevealController::new(&mut env)?;
        let products = ProductsController::new(&mut env)?;

        // The load handlers run once with the initial scroll position.
        nav.on_scroll(&mut env);
        if let Some(reveal) = &mut reveal {
            reveal.check(&mut env);
        }

        let mut page = Self {
            env,
            timers,
            nav,
            slider,
            forms,
            reveal,
            products,
            search,
            hash_target: hash.map(str::to_string),
        };
        if page.hash_target.is_some() {
            page.timers
                .schedule(HASH_SCROLL_DELAY_MS, TimerTask::HashScroll);
        }
        Ok(page)
    }

    // ---- events ---------------------------------------------------------

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = selector::select_one(&self.env.dom, selector)?;
        self.env.trace.record(format!("click {selector}"));
        if self.env.dom.disabled(target) {
            return Ok(());
        }
        let scroll_before = self.env.viewport.scroll_y;
        self.dispatch_click(target)?;
        if self.env.viewport.scroll_y != scroll_before {
            self.run_scroll_reactions();
        }
        Ok(())
    }

    // Handlers run in the order the page registers them: menu toggle,
    // nav links, the document-level outside-click close, slider
    // indicators, anchor navigation, pagination, then form submission.
    fn dispatch_click(&mut self, target: NodeId) -> Result<()> {
        let in_menu_btn = self.nav.menu_btn.is_some_and(|btn| {
            target == btn || self.env.dom.is_descendant_of(target, btn)
        });
        if in_menu_btn {
            self.nav.toggle(&mut self.env);
        }

        let on_nav_link = self
            .env
            .dom
            .closest(target, |dom, node| dom.has_class_on(node, "nav-link"))
            .is_some();
        if on_nav_link {
            self.nav.on_link_click(&mut self.env);
        }

        self.nav.on_document_click(&mut self.env, target);

        if let Some(slider) = &mut self.slider {
            if let Some(index) = slider.indicator_index(&self.env.dom, target) {
                slider.select(&mut self.env, &mut self.timers, index);
            }
        }

        if let Some(anchor) = self.env.dom.closest(target, |dom, node| {
            dom.tag_name(node)
                .map(|tag| tag.eq_ignore_ascii_case("a"))
                .unwrap_or(false)
                && dom
                    .attr(node, "href")
                    .map(|href| href.starts_with('#'))
                    .unwrap_or(false)
        }) {
            self.nav.on_anchor_click(&mut self.env, anchor);
        }

        if let Some(products) = &mut self.products {
            if products.is_page_button(target) {
                products.on_page_button(&mut self.env, target)?;
            }
        }

        if let Some(control) = self
            .env
            .dom
            .closest(target, |dom, node| is_submit_control(dom, node))
        {
            if let Some(form) = self.env.dom.find_ancestor_by_tag(control, "form") {
                self.submit_form(form)?;
            }
        }
        Ok(())
    }

    /// Submits the form matched by `selector` (the form itself, or any
    /// element inside one).
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let node = selector::select_one(&self.env.dom, selector)?;
        self.env.trace.record(format!("submit {selector}"));
        let form = if self
            .env
            .dom
            .tag_name(node)
            .map(|tag| tag.eq_ignore_ascii_case("form"))
            .unwrap_or(false)
        {
            node
        } else {
            self.env
                .dom
                .find_ancestor_by_tag(node, "form")
                .ok_or_else(|| {
                    Error::Harness(format!("{selector:?} is not inside a form"))
                })?
        };
        self.submit_form(form)
    }

    fn submit_form(&mut self, form: NodeId) -> Result<()> {
        if let Some(search) = &mut self.search {
            if search.form == form {
                return search.on_submit(&mut self.env);
            }
        }
        if let Some(controller) = self.forms.iter_mut().find(|f| f.form == form) {
            controller.on_submit(&mut self.env, &mut self.timers)?;
        }
        Ok(())
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let node = selector::select_one(&self.env.dom, selector)?;
        self.env.trace.record(format!("type {selector} {text:?}"));
        let tag = self
            .env
            .dom
            .tag_name(node)
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "an <input> or <textarea>".to_string(),
                actual: tag,
            });
        }
        if self.env.dom.disabled(node) {
            return Ok(());
        }
        self.env.dom.set_value(node, text)
    }

    /// Sets a `<select>`'s value and fires its change handler. Changing
    /// a product filter or the sort order re-runs the grid pipeline.
    pub fn select_value(&mut self, selector: &str, value: &str) -> Result<()> {
        let node = selector::select_one(&self.env.dom, selector)?;
        self.env
            .trace
            .record(format!("select {selector} {value:?}"));
        let tag = self
            .env
            .dom
            .tag_name(node)
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if tag != "select" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "a <select>".to_string(),
                actual: tag,
            });
        }
        if self.env.dom.disabled(node) {
            return Ok(());
        }
        self.env.dom.set_value(node, value)?;

        if let Some(products) = &mut self.products {
            if products.is_filter_control(node) {
                products.on_filter_change(&mut self.env)?;
            } else if products.is_sort_control(node) {
                products.on_sort_change(&mut self.env)?;
            }
        }
        Ok(())
    }

    pub fn scroll_to(&mut self, scroll_y: i64) -> Result<()> {
        self.env.trace.record(format!("scroll_to {scroll_y}"));
        self.env.viewport.scroll_y = scroll_y.max(0);
        self.run_scroll_reactions();
        Ok(())
    }

    /// Resizes the viewport width. The settle handler (which closes the
    /// mobile menu on wide viewports) fires after the debounce delay.
    pub fn resize_to(&mut self, width: i64) -> Result<()> {
        self.env.trace.record(format!("resize_to {width}"));
        self.env.viewport.width = width;
        self.nav.on_resize(&mut self.timers);
        Ok(())
    }

    pub fn hover(&mut self, selector: &str) -> Result<()> {
        let node = selector::select_one(&self.env.dom, selector)?;
        self.env.trace.record(format!("hover {selector}"));
        if let Some(slider) = &mut self.slider {
            if slider.in_hero_region(&self.env.dom, node) {
                slider.pause(&mut self.timers);
            }
        }
        Ok(())
    }

    pub fn unhover(&mut self, selector: &str) -> Result<()> {
        let node = selector::select_one(&self.env.dom, selector)?;
        self.env.trace.record(format!("unhover {selector}"));
        if let Some(slider) = &mut self.slider {
            if slider.in_hero_region(&self.env.dom, node) {
                slider.resume(&mut self.timers);
            }
        }
        Ok(())
    }

    fn run_scroll_reactions(&mut self) {
        self.nav.on_scroll(&mut self.env);
        if let Some(reveal) = &mut self.reveal {
            reveal.check(&mut self.env);
        }
    }

    // ---- clock ----------------------------------------------------------

    /// Advances the simulated clock by `ms`, running every timer that
    /// comes due, in (due time, creation order). Intervals re-fire
    /// within the window.
    pub fn advance_time(&mut self, ms: i64) -> Result<()> {
        if ms < 0 {
            return Err(Error::Harness(format!(
                "cannot advance time by a negative amount: {ms}"
            )));
        }
        let target = self.timers.now_ms.saturating_add(ms);
        let mut steps = 0usize;
        while let Some(task) = self.timers.take_next(Some(target)) {
            steps += 1;
            if steps > self.timers.timer_step_limit {
                return Err(Error::Harness(format!(
                    "timer step limit exceeded ({} tasks); a zero-delay interval is likely looping",
                    self.timers.timer_step_limit
                )));
            }
            self.timers.now_ms = self.timers.now_ms.max(task.due_at);
            self.env
                .trace
                .record(format!("timer fire id={} {:?}", task.id, task.task));
            self.run_task(task.task)?;
        }
        self.timers.now_ms = target;
        Ok(())
    }

    /// Advances the clock to an absolute time; errors if it lies in the
    /// past.
    pub fn advance_time_to(&mut self, at_ms: i64) -> Result<()> {
        if at_ms < self.timers.now_ms {
            return Err(Error::Harness(format!(
                "cannot move the clock backwards: now is {}, requested {at_ms}",
                self.timers.now_ms
            )));
        }
        self.advance_time(at_ms - self.timers.now_ms)
    }

    /// Runs everything already due without advancing the clock. Returns
    /// the number of tasks run.
    pub fn run_due_timers(&mut self) -> Result<usize> {
        let mut ran = 0usize;
        while let Some(task) = self.timers.take_next(Some(self.timers.now_ms)) {
            ran += 1;
            if ran > self.timers.timer_step_limit {
                return Err(Error::Harness(format!(
                    "timer step limit exceeded ({} tasks); a zero-delay interval is likely looping",
                    self.timers.timer_step_limit
                )));
            }
            self.run_task(task.task)?;
        }
        Ok(ran)
    }

    /// Jumps the clock to the next pending timer and runs it. Returns
    /// `false` when no timer is pending.
    pub fn run_next_timer(&mut self) -> Result<bool> {
        let Some(task) = self.timers.take_next(None) else {
            return Ok(false);
        };
        self.timers.now_ms = self.timers.now_ms.max(task.due_at);
        self.env
            .trace
            .record(format!("timer fire id={} {:?}", task.id, task.task));
        self.run_task(task.task)?;
        Ok(true)
    }

    fn run_task(&mut self, task: TimerTask) -> Result<()> {
        match task {
            TimerTask::SlideAdvance => {
                if let Some(slider) = &mut self.slider {
                    slider.advance(&mut self.env);
                }
            }
            TimerTask::ResizeSettled => self.nav.on_resize_settled(&mut self.env),
            TimerTask::BorderFlashClear { field } => {
                form::clear_border_flash(&mut self.env.dom, field);
            }
            TimerTask::SubmitDeliver { form } => {
                if let Some(controller) = self.forms.iter_mut().find(|f| f.form == form) {
                    controller.on_deliver(&mut self.env, &mut self.timers)?;
                }
            }
            TimerTask::SubmitRestore { form } => {
                if let Some(controller) = self.forms.iter_mut().find(|f| f.form == form) {
                    controller.on_restore(&mut self.env)?;
                }
            }
            TimerTask::HashScroll => {
                if let Some(node) = self
                    .hash_target
                    .as_deref()
                    .map(|hash| hash.trim_start_matches('#'))
                    .and_then(|id| self.env.dom.by_id(id))
                {
                    let top = self.env.metrics_of(node).top;
                    self.env.request_scroll(top, true);
                    self.run_scroll_reactions();
                }
            }
        }
        Ok(())
    }

    pub fn clear_timer(&mut self, timer_id: i64) -> bool {
        self.timers.clear(timer_id)
    }

    pub fn clear_all_timers(&mut self) -> usize {
        self.timers.clear_all()
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.timers.pending()
    }

    pub fn now_ms(&self) -> i64 {
        self.timers.now_ms
    }

    pub fn set_timer_step_limit(&mut self, limit: usize) {
        self.timers.timer_step_limit = limit;
    }

    // ---- geometry -------------------------------------------------------

    pub fn set_viewport(&mut self, width: i64, height: i64) {
        self.env.viewport.width = width;
        self.env.viewport.height = height;
    }

    /// Assigns layout metrics to every element matching `selector`.
    /// Returns the number of elements updated.
    pub fn set_metrics(&mut self, selector: &str, top: i64, height: i64) -> Result<usize> {
        let nodes = selector::select_all(&self.env.dom, selector)?;
        for node in &nodes {
            self.env.metrics.insert(*node, Metrics { top, height });
        }
        Ok(nodes.len())
    }

    pub fn scroll_y(&self) -> i64 {
        self.env.viewport.scroll_y
    }

    // ---- inspection -----------------------------------------------------

    pub fn text(&self, selector: &str) -> Result<String> {
        let node = selector::select_one(&self.env.dom, selector)?;
        Ok(self.env.dom.text_content(node))
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let node = selector::select_one(&self.env.dom, selector)?;
        self.env.dom.value(node)
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let node = selector::select_one(&self.env.dom, selector)?;
        Ok(self.env.dom.has_class_on(node, class_name))
    }

    pub fn style(&self, selector: &str, property: &str) -> Result<Option<String>> {
        let node = selector::select_one(&self.env.dom, selector)?;
        Ok(self.env.dom.style_value(node, property))
    }

    pub fn is_disabled(&self, selector: &str) -> Result<bool> {
        let node = selector::select_one(&self.env.dom, selector)?;
        Ok(self.env.dom.disabled(node))
    }

    /// An element is displayed unless its inline style says
    /// `display: none`.
    pub fn is_displayed(&self, selector: &str) -> Result<bool> {
        let node = selector::select_one(&self.env.dom, selector)?;
        Ok(self.env.dom.style_value(node, "display").as_deref() != Some("none"))
    }

    pub fn body_scroll_locked(&self) -> bool {
        self.env
            .body
            .and_then(|body| self.env.dom.style_value(body, "overflow"))
            .as_deref()
            == Some("hidden")
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        selector::select_one(&self.env.dom, selector).map(|_| ())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let node = selector::select_one(&self.env.dom, selector)?;
        let actual = self.env.dom.text_content(node);
        if actual == expected {
            return Ok(());
        }
        Err(Error::AssertionFailed {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual,
            dom_snippet: self.env.dom.dump_node(node),
        })
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let node = selector::select_one(&self.env.dom, selector)?;
        let actual = self.env.dom.value(node)?;
        if actual == expected {
            return Ok(());
        }
        Err(Error::AssertionFailed {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual,
            dom_snippet: self.env.dom.dump_node(node),
        })
    }

    // ---- recorded effects -----------------------------------------------

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.env.alerts)
    }

    pub fn take_console_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.env.console_logs)
    }

    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.env.scroll_requests
    }

    pub fn submissions(&self) -> &[FormSubmission] {
        &self.env.submissions
    }

    pub fn take_submissions(&mut self) -> Vec<FormSubmission> {
        std::mem::take(&mut self.env.submissions)
    }

    /// Installs a callback invoked with each captured submission before
    /// it is recorded.
    pub fn set_submit_transport(&mut self, transport: impl FnMut(&FormSubmission) + 'static) {
        self.env.transport = Some(Box::new(transport));
    }

    // ---- trace ----------------------------------------------------------

    pub fn enable_trace(&mut self) {
        self.env.trace.enabled = true;
    }

    pub fn set_trace_stderr(&mut self, on: bool) {
        self.env.trace.to_stderr = on;
    }

    pub fn set_trace_log_limit(&mut self, limit: usize) {
        self.env.trace.log_limit = limit;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.env.trace.logs.drain(..).collect()
    }
}

fn is_submit_control(dom: &Dom, node: NodeId) -> bool {
    let Some(tag) = dom.tag_name(node).map(str::to_ascii_lowercase) else {
        return false;
    };
    let type_attr = dom.attr(node, "type").map(|t| t.to_ascii_lowercase());
    match tag.as_str() {
        "button" => type_attr.as_deref().is_none_or(|t| t == "submit"),
        "input" => type_attr.as_deref() == Some("submit"),
        _ => false,
    }
}
