pub(crate) mod form;
pub(crate) mod navigation;
pub(crate) mod products;
pub(crate) mod reveal;
pub(crate) mod search;
pub(crate) mod slider;
