//! Keeps `is_time_based`, `name_is_pattern` and `name_interval` consistent

use kibi_core::Interval;
use kibi_patterns::pattern_default;

use super::IndexPatternWizard;
use super::draft::ModeWatch;

/// Upper bound on enforcer passes; the rules reach a fixed point in two
const MAX_MODE_PASSES: usize = 10;

impl IndexPatternWizard {
    /// Run the mode rules until the watched fields stop changing
    pub(super) fn settle_mode(&mut self) {
        for _ in 0..MAX_MODE_PASSES {
            let current = ModeWatch::of(&self.draft);
            if current == self.mode_watch {
                return;
            }
            let previous = std::mem::replace(&mut self.mode_watch, current);
            self.apply_mode_rules(previous.name_interval);
        }
        tracing::warn!(
            passes = MAX_MODE_PASSES,
            "mode rules did not settle, keeping the last state"
        );
        self.mode_watch = ModeWatch::of(&self.draft);
    }

    /// One pass of the rules. `old_interval` is the interval observed before
    /// the change being reacted to.
    pub(super) fn apply_mode_rules(&mut self, old_interval: Option<Interval>) {
        let draft = &mut self.draft;

        // An untouched default follows the interval
        if draft.name == pattern_default(old_interval) {
            let rewritten = pattern_default(draft.name_interval);
            if draft.name != rewritten {
                tracing::debug!(from = %draft.name, to = rewritten, "rewriting default name");
                draft.name = rewritten.to_string();
            }
        }

        if !draft.is_time_based {
            draft.name_is_pattern = false;
        }

        if draft.name_is_pattern {
            let interval = *draft
                .name_interval
                .get_or_insert(self.settings.default_interval);
            if draft.name.is_empty() {
                draft.name = pattern_default(Some(interval)).to_string();
            }
        } else {
            draft.name_interval = None;
            draft.time_field = None;
        }
    }
}
