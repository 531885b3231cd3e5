use crate::dom::{Dom, NodeId};
use crate::scheduler::{Scheduler, TimerTask};
use crate::selector::select_all;
use crate::{PageEnv, Result};

pub(crate) const SLIDE_INTERVAL_MS: i64 = 5000;

/// Cyclic auto-advancing hero slider. `active` is the single source of
/// truth; slides and indicators are re-marked from it on every change.
#[derive(Debug)]
pub(crate) struct HeroSlider {
    slides: Vec<NodeId>,
    indicators: Vec<NodeId>,
    hero: Option<NodeId>,
    active: usize,
    timer: Option<i64>,
}

impl HeroSlider {
    pub(crate) fn new(dom: &Dom) -> Result<Option<Self>> {
        let slides = select_all(dom, ".hero-slide")?;
        if slides.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            slides,
            indicators: select_all(dom, ".indicator")?,
            hero: select_all(dom, ".hero")?.into_iter().next(),
            active: 0,
            timer: None,
        }))
    }

    pub(crate) fn active_index(&self) -> usize {
        self.active
    }

    pub(crate) fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub(crate) fn show(&self, env: &mut PageEnv) {
        for (index, slide) in self.slides.iter().enumerate() {
            env.dom.set_class_state(*slide, "active", index == self.active);
        }
        for (index, indicator) in self.indicators.iter().enumerate() {
            env.dom
                .set_class_state(*indicator, "active", index == self.active);
        }
    }

    pub(crate) fn start(&mut self, timers: &mut Scheduler) {
        self.stop(timers);
        self.timer = Some(timers.schedule_interval(SLIDE_INTERVAL_MS, TimerTask::SlideAdvance));
    }

    pub(crate) fn stop(&mut self, timers: &mut Scheduler) {
        if let Some(timer) = self.timer.take() {
            timers.clear(timer);
        }
    }

    pub(crate) fn advance(&mut self, env: &mut PageEnv) {
        self.active = (self.active + 1) % self.slides.len();
        self.show(env);
    }

    /// Manual selection: jump to the slide and restart the interval so the
    /// next auto-advance is a full period away.
    pub(crate) fn select(&mut self, env: &mut PageEnv, timers: &mut Scheduler, index: usize) {
        if index >= self.slides.len() {
            return;
        }
        self.active = index;
        self.show(env);
        self.stop(timers);
        self.start(timers);
    }

    pub(crate) fn pause(&mut self, timers: &mut Scheduler) {
        self.stop(timers);
    }

    pub(crate) fn resume(&mut self, timers: &mut Scheduler) {
        self.start(timers);
    }

    pub(crate) fn indicator_index(&self, dom: &Dom, node: NodeId) -> Option<usize> {
        self.indicators.iter().position(|indicator| {
            node == *indicator || dom.is_descendant_of(node, *indicator)
        })
    }

    pub(crate) fn in_hero_region(&self, dom: &Dom, node: NodeId) -> bool {
        self.hero
            .map(|hero| node == hero || dom.is_descendant_of(node, hero))
            .unwrap_or(false)
    }
}
