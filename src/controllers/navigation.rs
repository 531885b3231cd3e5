use crate::dom::{Dom, NodeId};
use crate::scheduler::{Scheduler, TimerTask};
use crate::selector::select_all;
use crate::{PageEnv, Result};

pub(crate) const MOBILE_BREAKPOINT: i64 = 768;
pub(crate) const HEADER_SCROLLED_THRESHOLD: i64 = 100;
pub(crate) const SECTION_PROBE_OFFSET: i64 = 100;
pub(crate) const RESIZE_DEBOUNCE_MS: i64 = 250;

/// Mobile menu, header scroll state, active-link tracking, and smooth
/// anchor scrolling. Every element is optional: a page without a mobile
/// menu still gets header and anchor behavior.
#[derive(Debug)]
pub(crate) struct NavController {
    pub(crate) menu_btn: Option<NodeId>,
    pub(crate) nav: Option<NodeId>,
    pub(crate) header: Option<NodeId>,
    nav_links: Vec<NodeId>,
    sections: Vec<NodeId>,
    open: bool,
    resize_timer: Option<i64>,
}

impl NavController {
    pub(crate) fn new(dom: &Dom) -> Result<Self> {
        Ok(Self {
            menu_btn: dom.by_id("mobileMenuBtn"),
            nav: dom.by_id("nav"),
            header: select_all(dom, ".header")?.into_iter().next(),
            nav_links: select_all(dom, ".nav-link")?,
            sections: select_all(dom, "section[id]")?,
            open: false,
            resize_timer: None,
        })
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn toggle(&mut self, env: &mut PageEnv) {
        let open = !self.open;
        self.set_open(env, open);
    }

    pub(crate) fn close(&mut self, env: &mut PageEnv) {
        self.set_open(env, false);
    }

    fn set_open(&mut self, env: &mut PageEnv, open: bool) {
        let (Some(btn), Some(nav)) = (self.menu_btn, self.nav) else {
            return;
        };
        self.open = open;
        env.dom.set_class_state(btn, "active", open);
        env.dom.set_class_state(nav, "active", open);
        if let Some(body) = env.body {
            if open {
                env.dom.set_style(body, "overflow", "hidden");
            } else {
                env.dom.remove_style(body, "overflow");
            }
        }
    }

    pub(crate) fn on_link_click(&mut self, env: &mut PageEnv) {
        if env.viewport.width <= MOBILE_BREAKPOINT {
            self.close(env);
        }
    }

    /// The document-level click handler: on narrow viewports, any click
    /// landing outside both the panel and the toggle closes the menu.
    pub(crate) fn on_document_click(&mut self, env: &mut PageEnv, target: NodeId) {
        if env.viewport.width > MOBILE_BREAKPOINT {
            return;
        }
        let (Some(btn), Some(nav)) = (self.menu_btn, self.nav) else {
            return;
        };
        let within_nav = target == nav || env.dom.is_descendant_of(target, nav);
        let within_btn = target == btn || env.dom.is_descendant_of(target, btn);
        if !within_nav && !within_btn {
            self.close(env);
        }
    }

    pub(crate) fn on_resize(&mut self, timers: &mut Scheduler) {
        if let Some(pending) = self.resize_timer.take() {
            timers.clear(pending);
        }
        self.resize_timer = Some(timers.schedule(RESIZE_DEBOUNCE_MS, TimerTask::ResizeSettled));
    }

    pub(crate) fn on_resize_settled(&mut self, env: &mut PageEnv) {
        self.resize_timer = None;
        if env.viewport.width > MOBILE_BREAKPOINT {
            self.close(env);
        }
    }

    pub(crate) fn on_scroll(&mut self, env: &mut PageEnv) {
        if let Some(header) = self.header {
            let scrolled = env.viewport.scroll_y > HEADER_SCROLLED_THRESHOLD;
            env.dom.set_class_state(header, "scrolled", scrolled);
        }
        self.update_active_link(env);
    }

    // A section matches while the scroll offset sits inside its probe
    // window; the last match wins when windows overlap. With no match at
    // all, every link is cleared.
    fn update_active_link(&mut self, env: &mut PageEnv) {
        let scroll_y = env.viewport.scroll_y;
        let mut active_href: Option<String> = None;

        for section in &self.sections {
            let metrics = env.metrics_of(*section);
            let probe_top = metrics.top - SECTION_PROBE_OFFSET;
            let Some(id) = env.dom.attr(*section, "id") else {
                continue;
            };
            if scroll_y >= probe_top && scroll_y < probe_top + metrics.height {
                active_href = Some(format!("#{id}"));
            }
        }

        for link in &self.nav_links {
            let href = env.dom.attr(*link, "href");
            let active = match (&href, &active_href) {
                (Some(href), Some(target)) => href == target,
                _ => false,
            };
            env.dom.set_class_state(*link, "active", active);
        }
    }

    /// Same-page hash anchors scroll smoothly to the target section,
    /// offset by the fixed header's height. Bare `#`/`#!` anchors are
    /// left alone.
    pub(crate) fn on_anchor_click(&mut self, env: &mut PageEnv, anchor: NodeId) {
        let Some(href) = env.dom.attr(anchor, "href") else {
            return;
        };
        if href == "#" || href == "#!" {
            return;
        }
        let Some(target) = href.strip_prefix('#').and_then(|id| env.dom.by_id(id)) else {
            return;
        };

        let header_height = self
            .header
            .map(|header| env.metrics_of(header).height)
            .unwrap_or(0);
        let top = env.metrics_of(target).top - header_height;
        env.request_scroll(top, true);
    }
}
