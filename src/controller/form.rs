use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};

use super::retry::RetryPolicy;
use super::section::Section;
use super::state::ControllerState;
use super::validate::{ValidationError, validate_url};
use crate::api::{ApiError, JobApi, JobStatus};
use crate::view::View;

pub const INITIAL_MESSAGE: &str = "Initializing...";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to start brief generation. Please try again.";
pub const JOB_FAILED_MESSAGE: &str = "Brief generation failed";
pub const MISSING_RESULT_MESSAGE: &str = "Brief generation finished without a document link";
pub const CONNECTION_LOST_MESSAGE: &str = "Lost contact with the server while checking progress.";

/// Timing of the status poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub retry: RetryPolicy,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// A generation is already running; the submit control is disabled.
    #[error("a brief generation is already in progress")]
    Busy,

    #[error("failed to start brief generation: {0}")]
    Create(#[source] ApiError),

    /// The form was reset while the creation request was in flight.
    #[error("submission was superseded by a reset")]
    Superseded,
}

/// Keys the URL field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
}

/// What a single status check did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckOutcome {
    /// No job reference is held.
    Idle,
    /// Non-terminal status rendered; keep polling.
    Pending,
    /// A terminal section was rendered.
    Finished(Section),
    /// The request failed in transport or decoding. Nothing was rendered.
    Unreachable,
    /// The response belonged to a stopped or reset attempt and was dropped.
    Discarded,
}

struct Shared<A, V> {
    api: A,
    view: V,
    settings: PollSettings,
    state: Mutex<ControllerState>,
    section_tx: watch::Sender<Section>,
}

/// The brief form: submits a URL, polls the job and drives the view.
///
/// Cloning yields another handle to the same form.
pub struct Controller<A, V> {
    shared: Arc<Shared<A, V>>,
}

impl<A, V> Clone for Controller<A, V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A: JobApi, V: View> Controller<A, V> {
    pub fn new(api: A, view: V, settings: PollSettings) -> Self {
        let (section_tx, _) = watch::channel(Section::Input);
        Self {
            shared: Arc::new(Shared {
                api,
                view,
                settings,
                state: Mutex::new(ControllerState::default()),
                section_tx,
            }),
        }
    }

    pub fn view(&self) -> &V {
        &self.shared.view
    }

    pub fn section(&self) -> Section {
        self.shared.lock().section
    }

    pub fn job_id(&self) -> Option<String> {
        self.shared.lock().job_id.clone()
    }

    pub fn is_polling(&self) -> bool {
        self.shared.lock().poller.is_some()
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.shared.lock().submit_enabled
    }

    /// Receiver that observes every section change.
    pub fn subscribe(&self) -> watch::Receiver<Section> {
        self.shared.section_tx.subscribe()
    }

    /// Wait until the form leaves the progress section and return where it landed.
    pub async fn wait_for_outcome(&self) -> Section {
        let mut rx = self.subscribe();
        match rx.wait_for(|section| *section != Section::Progress).await {
            Ok(section) => *section,
            Err(_) => self.section(),
        }
    }

    /// Validate `raw`, create a job and start polling it.
    ///
    /// Invalid input raises an alert and changes nothing else. Every other
    /// failure is rendered in the error section before it is returned.
    pub async fn submit(&self, raw: &str) -> Result<String, SubmitError> {
        let url = match validate_url(raw) {
            Ok(url) => url.to_string(),
            Err(e) => {
                self.shared.view.alert(&e.to_string());
                return Err(e.into());
            }
        };

        let generation = {
            let mut state = self.shared.lock();
            if !state.submit_enabled {
                tracing::debug!("submit ignored while a generation is running");
                return Err(SubmitError::Busy);
            }
            state.stop_polling();
            let generation = state.next_generation();
            state.submit_enabled = false;
            self.shared.view.set_submit_enabled(false);
            self.shared.show(&mut state, Section::Progress);
            self.shared.view.set_progress(0, INITIAL_MESSAGE);
            generation
        };

        tracing::info!(%url, generation, "requesting brief generation");
        let created = self.shared.api.create_job(&url).await;

        let mut state = self.shared.lock();
        if !state.is_current(generation) {
            tracing::debug!(generation, "discarding creation response for a reset form");
            return Err(SubmitError::Superseded);
        }
        match created {
            Ok(job_id) => {
                tracing::info!(%job_id, generation, "job created, polling status");
                state.job_id = Some(job_id.clone());
                state.poller = Some(tokio::spawn(poll(
                    Arc::clone(&self.shared),
                    generation,
                    job_id.clone(),
                )));
                Ok(job_id)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to start brief generation");
                self.shared.view.set_error(CREATE_FAILED_MESSAGE);
                self.shared.show(&mut state, Section::Error);
                Err(SubmitError::Create(e))
            }
        }
    }

    /// URL field key handler: Enter behaves like the submit button.
    pub async fn on_keypress(&self, key: Key, input: &str) -> Option<Result<String, SubmitError>> {
        match key {
            Key::Enter => Some(self.submit(input).await),
            Key::Char(_) => None,
        }
    }

    /// Stop the poller. Status responses still in flight are discarded.
    pub fn stop_polling(&self) {
        self.shared.lock().stop_polling();
    }

    /// Return the form to the input section with an empty field.
    pub fn reset(&self) {
        let mut state = self.shared.lock();
        self.shared.view.clear_input();
        state.submit_enabled = true;
        self.shared.view.set_submit_enabled(true);
        state.stop_polling();
        self.shared.show(&mut state, Section::Input);
    }
}

impl<A: JobApi, V: View> Shared<A, V> {
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn show(&self, state: &mut ControllerState, section: Section) {
        if state.transition(section) {
            tracing::debug!(section = section.element_id(), "showing section");
            self.view.show_section(section);
            self.section_tx.send_replace(section);
        }
    }

    async fn check(&self, generation: u64, job_id: &str) -> CheckOutcome {
        let accepted = self.lock().accepts(generation, job_id);
        if !accepted {
            return CheckOutcome::Idle;
        }

        let snapshot = match self.api.job_status(job_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(%job_id, error = %e, "status check failed");
                return CheckOutcome::Unreachable;
            }
        };

        let mut state = self.lock();
        if !state.accepts(generation, job_id) {
            tracing::debug!(%job_id, generation, "discarding stale status response");
            return CheckOutcome::Discarded;
        }

        self.view
            .set_progress(snapshot.progress_percent(), &snapshot.message);

        match snapshot.status {
            JobStatus::Completed => {
                state.finish_attempt();
                match &snapshot.result {
                    Some(result) => {
                        tracing::info!(%job_id, url = %result.coda_url, "brief ready");
                        self.view.set_result(result);
                        self.show(&mut state, Section::Result);
                    }
                    None => {
                        tracing::warn!(%job_id, "job completed without a result");
                        self.view.set_error(MISSING_RESULT_MESSAGE);
                        self.show(&mut state, Section::Error);
                    }
                }
                CheckOutcome::Finished(state.section)
            }
            JobStatus::Failed => {
                state.finish_attempt();
                let message = snapshot
                    .error
                    .as_deref()
                    .filter(|e| !e.is_empty())
                    .unwrap_or(JOB_FAILED_MESSAGE);
                tracing::info!(%job_id, error = message, "job failed");
                self.view.set_error(message);
                self.show(&mut state, Section::Error);
                CheckOutcome::Finished(state.section)
            }
            JobStatus::Pending | JobStatus::Other(_) => CheckOutcome::Pending,
        }
    }

    /// Stop polling after the retry budget ran out.
    fn give_up(&self, generation: u64, job_id: &str, failures: u32) {
        let mut state = self.lock();
        if !state.accepts(generation, job_id) {
            return;
        }
        tracing::error!(%job_id, failures, "giving up on status checks");
        state.finish_attempt();
        self.view.set_error(CONNECTION_LOST_MESSAGE);
        self.show(&mut state, Section::Error);
    }
}

/// Poller body: one immediate check, then one per interval (stretched by
/// backoff after failures) until a terminal status or a stop.
async fn poll<A: JobApi, V: View>(shared: Arc<Shared<A, V>>, generation: u64, job_id: String) {
    let mut failures = 0u32;
    loop {
        let started = Instant::now();
        match shared.check(generation, &job_id).await {
            CheckOutcome::Pending => failures = 0,
            CheckOutcome::Unreachable => {
                failures += 1;
                if shared.settings.retry.is_exhausted(failures) {
                    shared.give_up(generation, &job_id, failures);
                    return;
                }
                tracing::debug!(%job_id, attempt = failures, "retrying status check");
            }
            CheckOutcome::Finished(_) | CheckOutcome::Discarded | CheckOutcome::Idle => return,
        }
        let delay = shared
            .settings
            .retry
            .next_delay(shared.settings.interval, failures);
        sleep_until(started + delay).await;
    }
}
