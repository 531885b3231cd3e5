use crate::dom::NodeId;
use crate::selector::select_all;
use crate::{PageEnv, Result};

pub(crate) const REVEAL_TARGETS: &str = ".choose-card, .category-card, .stat-card, .news-card";
// Observer geometry: fires at 10% visibility, with the viewport's bottom
// edge pulled up by 50px.
pub(crate) const REVEAL_BOTTOM_MARGIN: i64 = 50;

/// One-shot reveal: each target starts hidden and offset, transitions to
/// its resting state the first time it intersects the viewport, and is
/// never re-hidden afterwards.
#[derive(Debug)]
pub(crate) struct RevealController {
    observed: Vec<NodeId>,
}

impl RevealController {
    pub(crate) fn new(env: &mut PageEnv) -> Result<Option<Self>> {
        let targets = select_all(&env.dom, REVEAL_TARGETS)?;
        if targets.is_empty() {
            return Ok(None);
        }
        for target in &targets {
            env.dom.set_style(*target, "opacity", "0");
            env.dom.set_style(*target, "transform", "translateY(30px)");
            env.dom.set_style(
                *target,
                "transition",
                "opacity 0.6s ease-out, transform 0.6s ease-out",
            );
        }
        Ok(Some(Self { observed: targets }))
    }

    pub(crate) fn observed_count(&self) -> usize {
        self.observed.len()
    }

    pub(crate) fn check(&mut self, env: &mut PageEnv) {
        let view_top = env.viewport.scroll_y;
        let view_bottom = view_top + env.viewport.height - REVEAL_BOTTOM_MARGIN;

        let mut revealed = Vec::new();
        self.observed.retain(|target| {
            // An element with no assigned geometry stays unobserved
            // rather than counting as stacked at the top of the page.
            let Some(metrics) = env.metrics_opt(*target) else {
                return true;
            };
            if intersects(metrics.top, metrics.height, view_top, view_bottom) {
                revealed.push(*target);
                false
            } else {
                true
            }
        });

        for target in revealed {
            env.dom.set_style(target, "opacity", "1");
            env.dom.set_style(target, "transform", "translateY(0)");
        }
    }
}

fn intersects(top: i64, height: i64, view_top: i64, view_bottom: i64) -> bool {
    if height <= 0 {
        return top >= view_top && top <= view_bottom;
    }
    let bottom = top + height;
    let overlap = bottom.min(view_bottom) - top.max(view_top);
    // >= 10% of the element's own height must be inside the band.
    overlap > 0 && overlap * 10 >= height
}
