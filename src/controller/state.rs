use tokio::task::JoinHandle;

use super::section::Section;

/// Mutable state of one controller instance.
///
/// While a generation is being polled, `job_id` and `poller` are both
/// `Some`; otherwise both are `None`.
#[derive(Debug)]
pub struct ControllerState {
    pub job_id: Option<String>,
    pub poller: Option<JoinHandle<()>>,
    /// Bumped on every submit, stop and reset. Work started under an older
    /// generation must not touch the view.
    pub generation: u64,
    pub section: Section,
    pub submit_enabled: bool,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            job_id: None,
            poller: None,
            generation: 0,
            section: Section::Input,
            submit_enabled: true,
        }
    }
}

impl ControllerState {
    /// Start a new generation and return its token.
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Whether a status result for `job_id` under `generation` may still be rendered.
    pub fn accepts(&self, generation: u64, job_id: &str) -> bool {
        self.is_current(generation) && self.job_id.as_deref() == Some(job_id)
    }

    /// Abort the poller if one is running and retire the current attempt,
    /// so responses still in flight are rejected by [`accepts`](Self::accepts).
    /// Safe to call when already stopped.
    pub fn stop_polling(&mut self) {
        if let Some(handle) = self.poller.take() {
            handle.abort();
        }
        self.job_id = None;
        self.next_generation();
    }

    /// End the current attempt from inside the poller itself: the handle is
    /// dropped rather than aborted so the running task can finish its render.
    pub fn finish_attempt(&mut self) {
        self.poller = None;
        self.job_id = None;
    }

    /// Move to `next`, returning `false` (and leaving the section alone)
    /// when the transition is not legal.
    pub fn transition(&mut self, next: Section) -> bool {
        if !self.section.can_transition_to(next) {
            tracing::warn!(from = %self.section, to = %next, "ignoring illegal section transition");
            return false;
        }
        self.section = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_input_with_submit_enabled() {
        let state = ControllerState::default();
        assert_eq!(state.section, Section::Input);
        assert!(state.submit_enabled);
        assert!(state.job_id.is_none());
        assert!(state.poller.is_none());
        assert_eq!(state.generation, 0);
    }

    #[test]
    fn generations_are_monotonic() {
        let mut state = ControllerState::default();
        let first = state.next_generation();
        let second = state.next_generation();
        assert!(second > first);
        assert!(!state.is_current(first));
        assert!(state.is_current(second));
    }

    #[test]
    fn accepts_requires_matching_job_and_generation() {
        let mut state = ControllerState::default();
        let generation = state.next_generation();
        state.job_id = Some("job-1".into());
        assert!(state.accepts(generation, "job-1"));
        assert!(!state.accepts(generation, "job-2"));
        assert!(!state.accepts(generation + 1, "job-1"));

        state.job_id = None;
        assert!(!state.accepts(generation, "job-1"));
    }

    #[test]
    fn stop_polling_is_idempotent() {
        let mut state = ControllerState::default();
        state.stop_polling();
        state.stop_polling();
        assert!(state.poller.is_none());
    }

    #[test]
    fn stop_polling_retires_attempt() {
        let mut state = ControllerState::default();
        let generation = state.next_generation();
        state.job_id = Some("job-1".into());

        state.stop_polling();

        assert!(state.job_id.is_none());
        assert!(!state.is_current(generation));
        assert!(!state.accepts(generation, "job-1"));
    }

    #[tokio::test]
    async fn stop_polling_aborts_task() {
        let mut state = ControllerState::default();
        let handle = tokio::spawn(std::future::pending::<()>());
        state.poller = Some(handle);
        state.stop_polling();
        assert!(state.poller.is_none());
    }

    #[test]
    fn illegal_transition_is_ignored() {
        let mut state = ControllerState::default();
        assert!(!state.transition(Section::Result));
        assert_eq!(state.section, Section::Input);
        assert!(state.transition(Section::Progress));
        assert!(state.transition(Section::Error));
        assert!(!state.transition(Section::Progress));
        assert_eq!(state.section, Section::Error);
    }
}
