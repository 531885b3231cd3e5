use crate::dom::{Dom, NodeId};
use crate::scheduler::{Scheduler, TimerTask};
use crate::selector::select_all_within;
use crate::{FormSubmission, PageEnv, Result};

pub(crate) const INVALID_FLASH_MS: i64 = 3000;
pub(crate) const VALID_FLASH_MS: i64 = 2000;
pub(crate) const DELIVER_DELAY_MS: i64 = 1500;
pub(crate) const RESTORE_DELAY_MS: i64 = 3000;

pub(crate) const INVALID_BORDER: &str = "#ef4444";
pub(crate) const VALID_BORDER: &str = "#10b981";
pub(crate) const SUCCESS_BACKGROUND: &str = "#10b981";
pub(crate) const SENDING_LABEL: &str = "Sending...";
pub(crate) const SENT_LABEL: &str = "\u{2713} Sent Successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitPhase {
    Idle,
    Sending,
    Sent,
}

/// Per-form validation and simulated submission round trip:
/// submit -> "Sending..." -> (1500 ms) sent label -> (3000 ms) reset.
/// The submission itself goes to the page's pluggable transport; no
/// network is involved.
#[derive(Debug)]
pub(crate) struct FormController {
    pub(crate) form: NodeId,
    submit_btn: Option<NodeId>,
    phase: SubmitPhase,
    saved_label: String,
}

impl FormController {
    pub(crate) fn new(dom: &Dom, form: NodeId) -> Result<Self> {
        Ok(Self {
            form,
            submit_btn: select_all_within(dom, form, "button[type=\"submit\"]")?
                .into_iter()
                .next(),
            phase: SubmitPhase::Idle,
            saved_label: String::new(),
        })
    }

    pub(crate) fn on_submit(&mut self, env: &mut PageEnv, timers: &mut Scheduler) -> Result<()> {
        // A submit while the simulated round trip is in flight is dropped;
        // the control is disabled for that whole window anyway.
        if self.phase != SubmitPhase::Idle {
            return Ok(());
        }

        let required = select_all_within(
            &env.dom,
            self.form,
            "input[required], textarea[required]",
        )?;
        let mut valid = true;
        for field in required {
            if env.dom.value(field)?.trim().is_empty() {
                valid = false;
                env.dom.set_style(field, "border-color", INVALID_BORDER);
                timers.schedule(INVALID_FLASH_MS, TimerTask::BorderFlashClear { field });
            } else {
                env.dom.set_style(field, "border-color", VALID_BORDER);
                timers.schedule(VALID_FLASH_MS, TimerTask::BorderFlashClear { field });
            }
        }
        if !valid {
            return Ok(());
        }
        let Some(btn) = self.submit_btn else {
            return Ok(());
        };

        let submission = collect_submission(&env.dom, self.form);
        env.record_submission(submission);

        self.saved_label = env.dom.text_content(btn);
        env.dom.set_text_content(btn, SENDING_LABEL)?;
        env.dom.set_disabled(btn, true);
        self.phase = SubmitPhase::Sending;
        timers.schedule(DELIVER_DELAY_MS, TimerTask::SubmitDeliver { form: self.form });
        Ok(())
    }

    pub(crate) fn on_deliver(&mut self, env: &mut PageEnv, timers: &mut Scheduler) -> Result<()> {
        if self.phase != SubmitPhase::Sending {
            return Ok(());
        }
        let Some(btn) = self.submit_btn else {
            return Ok(());
        };
        env.dom.set_text_content(btn, SENT_LABEL)?;
        env.dom.set_style(btn, "background", SUCCESS_BACKGROUND);
        self.phase = SubmitPhase::Sent;
        timers.schedule(RESTORE_DELAY_MS, TimerTask::SubmitRestore { form: self.form });
        Ok(())
    }

    pub(crate) fn on_restore(&mut self, env: &mut PageEnv) -> Result<()> {
        if self.phase != SubmitPhase::Sent {
            return Ok(());
        }
        env.dom.reset_form(self.form);
        if let Some(btn) = self.submit_btn {
            env.dom.set_text_content(btn, &self.saved_label)?;
            env.dom.remove_style(btn, "background");
            env.dom.set_disabled(btn, false);
        }
        self.phase = SubmitPhase::Idle;
        Ok(())
    }
}

pub(crate) fn clear_border_flash(dom: &mut Dom, field: NodeId) {
    dom.remove_style(field, "border-color");
}

fn collect_submission(dom: &Dom, form: NodeId) -> FormSubmission {
    let mut fields = Vec::new();
    for node in dom.descendant_elements(form) {
        let tag = dom
            .tag_name(node)
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if tag != "input" && tag != "textarea" && tag != "select" {
            continue;
        }
        let Some(name) = dom.attr(node, "name") else {
            continue;
        };
        let value = dom.value(node).unwrap_or_default();
        fields.push((name, value));
    }
    FormSubmission {
        form_id: dom.attr(form, "id"),
        fields,
    }
}
