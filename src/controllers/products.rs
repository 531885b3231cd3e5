use std::cmp::Ordering;

use crate::dom::{Dom, NodeId};
use crate::selector::select_all;
use crate::{PageEnv, Result};

pub(crate) const ITEMS_PER_PAGE: usize = 6;
pub(crate) const FILTER_FADE_ANIMATION: &str = "fadeIn 0.5s ease-out";

#[derive(Debug)]
struct Card {
    node: NodeId,
    category: String,
    country: Option<String>,
    year: Option<i64>,
}

/// Product grid: category/country filtering, year sorting, and a
/// six-per-page window. Filtering and sorting always re-run pagination,
/// and the current page is clamped so a shrinking result set never
/// strands the user on an empty page.
#[derive(Debug)]
pub(crate) struct ProductsController {
    grid: NodeId,
    cards: Vec<Card>,
    // Presentation order as indices into `cards`; rebuilt on sort.
    order: Vec<usize>,
    category_filter: Option<NodeId>,
    country_filter: Option<NodeId>,
    sort_filter: Option<NodeId>,
    prev_btn: Option<NodeId>,
    next_btn: Option<NodeId>,
    info: Option<NodeId>,
    current_page: usize,
}

impl ProductsController {
    pub(crate) fn new(env: &mut PageEnv) -> Result<Option<Self>> {
        let Some(grid) = env.dom.by_id("productsGrid") else {
            return Ok(None);
        };
        let cards = select_all(&env.dom, ".product-card")?
            .into_iter()
            .map(|node| Card {
                node,
                category: env.dom.attr(node, "data-category").unwrap_or_default(),
                country: env.dom.attr(node, "data-country"),
                year: env
                    .dom
                    .attr(node, "data-year")
                    .and_then(|raw| raw.trim().parse::<i64>().ok()),
            })
            .collect::<Vec<_>>();

        let buttons = select_all(&env.dom, ".pagination-btn")?;
        let order = (0..cards.len()).collect();
        let mut controller = Self {
            grid,
            cards,
            order,
            category_filter: env.dom.by_id("category-filter"),
            country_filter: env.dom.by_id("country-filter"),
            sort_filter: env.dom.by_id("sort-filter"),
            prev_btn: find_button(&env.dom, &buttons, "Previous"),
            next_btn: find_button(&env.dom, &buttons, "Next"),
            info: select_all(&env.dom, ".pagination-info")?.into_iter().next(),
            current_page: 1,
        };
        if controller.has_pagination() {
            controller.paginate(env)?;
        }
        Ok(Some(controller))
    }

    pub(crate) fn current_page(&self) -> usize {
        self.current_page
    }

    fn has_pagination(&self) -> bool {
        self.prev_btn.is_some() && self.next_btn.is_some()
    }

    pub(crate) fn is_filter_control(&self, node: NodeId) -> bool {
        self.category_filter == Some(node) || self.country_filter == Some(node)
    }

    pub(crate) fn is_sort_control(&self, node: NodeId) -> bool {
        self.sort_filter == Some(node)
    }

    pub(crate) fn is_page_button(&self, node: NodeId) -> bool {
        self.prev_btn == Some(node) || self.next_btn == Some(node)
    }

    fn filter_value(&self, env: &PageEnv, control: Option<NodeId>) -> Option<String> {
        control.and_then(|node| env.dom.value(node).ok())
    }

    fn card_visible(&self, env: &PageEnv, card: &Card) -> bool {
        let category = self
            .filter_value(env, self.category_filter)
            .unwrap_or_else(|| "all".to_string());
        if category != "all" && card.category != category {
            return false;
        }
        if let Some(country) = self.filter_value(env, self.country_filter) {
            if country != "all" && card.country.as_deref() != Some(country.as_str()) {
                return false;
            }
        }
        true
    }

    fn visible_in_order(&self, env: &PageEnv) -> Vec<NodeId> {
        self.order
            .iter()
            .map(|idx| &self.cards[*idx])
            .filter(|card| self.card_visible(env, card))
            .map(|card| card.node)
            .collect()
    }

    pub(crate) fn on_filter_change(&mut self, env: &mut PageEnv) -> Result<()> {
        let shown_before = self
            .cards
            .iter()
            .filter(|card| is_displayed(env, card.node))
            .map(|card| card.node)
            .collect::<Vec<_>>();

        self.clamp_page(env);
        self.paginate(env)?;

        // Cards newly brought into view replay the entrance animation.
        for card in &self.cards {
            if is_displayed(env, card.node) && !shown_before.contains(&card.node) {
                env.dom.set_style(card.node, "animation", FILTER_FADE_ANIMATION);
            }
        }
        Ok(())
    }

    pub(crate) fn on_sort_change(&mut self, env: &mut PageEnv) -> Result<()> {
        let mode = self
            .filter_value(env, self.sort_filter)
            .unwrap_or_else(|| "default".to_string());

        self.order = (0..self.cards.len()).collect();
        match mode.as_str() {
            "newest" => self.order.sort_by(|a, b| compare_years(
                self.cards[*b].year,
                self.cards[*a].year,
            )),
            "oldest" => self.order.sort_by(|a, b| compare_years(
                self.cards[*a].year,
                self.cards[*b].year,
            )),
            _ => {}
        }

        for idx in &self.order {
            env.dom.append_child(self.grid, self.cards[*idx].node);
        }
        self.clamp_page(env);
        self.paginate(env)
    }

    pub(crate) fn on_page_button(&mut self, env: &mut PageEnv, node: NodeId) -> Result<()> {
        let total = self.total_pages(env);
        if self.prev_btn == Some(node) {
            if self.current_page > 1 {
                self.current_page -= 1;
            }
        } else if self.next_btn == Some(node) && self.current_page < total {
            self.current_page += 1;
        }
        self.paginate(env)
    }

    fn total_pages(&self, env: &PageEnv) -> usize {
        self.visible_in_order(env).len().div_ceil(ITEMS_PER_PAGE)
    }

    fn clamp_page(&mut self, env: &PageEnv) {
        let total = self.total_pages(env);
        self.current_page = self.current_page.clamp(1, total.max(1));
    }

    fn paginate(&mut self, env: &mut PageEnv) -> Result<()> {
        let visible = self.visible_in_order(env);
        let total = visible.len().div_ceil(ITEMS_PER_PAGE);

        let window = if self.has_pagination() {
            let start = (self.current_page - 1) * ITEMS_PER_PAGE;
            let end = (start + ITEMS_PER_PAGE).min(visible.len());
            &visible[start.min(visible.len())..end]
        } else {
            &visible[..]
        };

        for card in &self.cards {
            let shown = window.contains(&card.node);
            if shown {
                env.dom.set_style(card.node, "display", "flex");
            } else {
                env.dom.set_style(card.node, "display", "none");
            }
        }

        if let Some(prev) = self.prev_btn {
            env.dom.set_disabled(prev, self.current_page <= 1);
        }
        if let Some(next) = self.next_btn {
            env.dom.set_disabled(next, self.current_page >= total);
        }
        if let Some(info) = self.info {
            env.dom.set_text_content(
                info,
                &format!("Page {} of {}", self.current_page, total.max(1)),
            )?;
        }
        Ok(())
    }
}

fn compare_years(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        // Cards without a year keep their relative document order.
        _ => Ordering::Equal,
    }
}

fn find_button(dom: &Dom, buttons: &[NodeId], label: &str) -> Option<NodeId> {
    buttons
        .iter()
        .copied()
        .find(|node| dom.text_content(*node).trim() == label)
}

fn is_displayed(env: &PageEnv, node: NodeId) -> bool {
    env.dom.style_value(node, "display").as_deref() != Some("none")
}
