use super::*;

mod hero_slider;
mod parser_and_selectors;
mod reveal_on_scroll;
