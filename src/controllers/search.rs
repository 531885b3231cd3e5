use crate::dom::NodeId;
use crate::selector::{select_all, select_all_within};
use crate::{PageEnv, Result};

/// Header search box. Submission is a placeholder: the term is logged
/// and announced, nothing is queried.
#[derive(Debug)]
pub(crate) struct SearchController {
    pub(crate) form: NodeId,
    input: Option<NodeId>,
}

impl SearchController {
    pub(crate) fn new(env: &PageEnv) -> Result<Option<Self>> {
        let Some(form) = select_all(&env.dom, ".search-form")?.into_iter().next() else {
            return Ok(None);
        };
        Ok(Some(Self {
            form,
            input: select_all_within(&env.dom, form, ".search-input")?
                .into_iter()
                .next(),
        }))
    }

    pub(crate) fn on_submit(&mut self, env: &mut PageEnv) -> Result<()> {
        let Some(input) = self.input else {
            return Ok(());
        };
        let term = env.dom.value(input)?.trim().to_string();
        if term.is_empty() {
            return Ok(());
        }
        env.console_logs.push(format!("Searching for: {term}"));
        env.alerts.push(format!(
            "Search functionality for \"{term}\" will be implemented."
        ));
        Ok(())
    }
}
