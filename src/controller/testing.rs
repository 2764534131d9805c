//! In-memory doubles for controller tests: a scripted backend and a view
//! that records what the page would show.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::api::{ApiError, BriefResult, JobApi, JobStatus, StatusSnapshot};
use crate::controller::Section;
use crate::view::View;

/// One scripted answer to a status request.
#[derive(Debug, Clone)]
pub enum Reply {
    Snapshot(StatusSnapshot),
    /// Transport failure.
    Unreachable,
}

pub fn pending(progress: i64, message: &str) -> Reply {
    Reply::Snapshot(StatusSnapshot {
        status: JobStatus::Pending,
        progress,
        message: message.to_string(),
        result: None,
        error: None,
    })
}

pub fn completed(coda_url: &str) -> Reply {
    Reply::Snapshot(StatusSnapshot {
        status: JobStatus::Completed,
        progress: 100,
        message: "Brief generated successfully!".to_string(),
        result: Some(BriefResult {
            coda_url: coda_url.to_string(),
            brand_name: None,
            completed_at: None,
        }),
        error: None,
    })
}

pub fn failed(error: Option<&str>) -> Reply {
    Reply::Snapshot(StatusSnapshot {
        status: JobStatus::Failed,
        progress: 35,
        message: "Error".to_string(),
        result: None,
        error: error.map(str::to_string),
    })
}

#[derive(Debug, Default)]
pub struct Calls {
    pub create: AtomicUsize,
    pub status: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl Calls {
    pub fn last_url(&self) -> Option<String> {
        self.urls.lock().unwrap().last().cloned()
    }
}

/// Backend double. Status replies are served in order; the last one repeats.
pub struct ScriptedApi {
    job_id: Result<String, u16>,
    replies: Mutex<VecDeque<Reply>>,
    create_gate: Option<Arc<Notify>>,
    status_gate: Option<Arc<Notify>>,
    calls: Arc<Calls>,
}

impl ScriptedApi {
    pub fn accepting(job_id: &str) -> Self {
        Self::with_creation(Ok(job_id.to_string()))
    }

    pub fn rejecting(status: u16) -> Self {
        Self::with_creation(Err(status))
    }

    fn with_creation(job_id: Result<String, u16>) -> Self {
        Self {
            job_id,
            replies: Mutex::new(VecDeque::new()),
            create_gate: None,
            status_gate: None,
            calls: Arc::new(Calls::default()),
        }
    }

    pub fn with_replies(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        *self.replies.lock().unwrap() = replies.into_iter().collect();
        self
    }

    /// Hold creation responses until `gate` is notified.
    pub fn gate_create(mut self, gate: Arc<Notify>) -> Self {
        self.create_gate = Some(gate);
        self
    }

    /// Hold status responses until `gate` is notified.
    pub fn gate_status(mut self, gate: Arc<Notify>) -> Self {
        self.status_gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Arc<Calls> {
        Arc::clone(&self.calls)
    }

    fn next_reply(&self) -> Reply {
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap_or_else(|| pending(0, ""))
        }
    }
}

impl JobApi for ScriptedApi {
    async fn create_job(&self, url: &str) -> Result<String, ApiError> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        self.calls.urls.lock().unwrap().push(url.to_string());
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }
        self.job_id.clone().map_err(|status| ApiError::Status {
            status,
            message: "scripted failure".to_string(),
        })
    }

    async fn job_status(&self, _job_id: &str) -> Result<StatusSnapshot, ApiError> {
        self.calls.status.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.status_gate {
            gate.notified().await;
        }
        match self.next_reply() {
            Reply::Snapshot(snapshot) => Ok(snapshot),
            Reply::Unreachable => Err(ApiError::Status {
                status: 503,
                message: "Service Unavailable".to_string(),
            }),
        }
    }
}

/// Progress and section renders, in the order the view received them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    Progress(u8),
    Section(Section),
}

/// What the page shows after a sequence of view calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub input: String,
    pub submit_enabled: bool,
    /// Visible section, or `None` before anything was shown.
    pub section: Option<Section>,
    pub section_history: Vec<Section>,
    pub progress_width: String,
    pub progress_text: String,
    pub status_text: String,
    pub result_href: Option<String>,
    pub error_text: Option<String>,
    pub alerts: Vec<String>,
    pub events: Vec<ViewEvent>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            input: String::new(),
            submit_enabled: true,
            section: None,
            section_history: Vec::new(),
            progress_width: String::new(),
            progress_text: String::new(),
            status_text: String::new(),
            result_href: None,
            error_text: None,
            alerts: Vec::new(),
            events: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingView {
    page: Mutex<Page>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_input(&self, text: &str) {
        self.page.lock().unwrap().input = text.to_string();
    }

    pub fn page(&self) -> Page {
        self.page.lock().unwrap().clone()
    }
}

impl View for RecordingView {
    fn alert(&self, message: &str) {
        self.page.lock().unwrap().alerts.push(message.to_string());
    }

    fn clear_input(&self) {
        self.page.lock().unwrap().input.clear();
    }

    fn set_submit_enabled(&self, enabled: bool) {
        self.page.lock().unwrap().submit_enabled = enabled;
    }

    fn show_section(&self, section: Section) {
        let mut page = self.page.lock().unwrap();
        page.section = Some(section);
        page.section_history.push(section);
        page.events.push(ViewEvent::Section(section));
    }

    fn set_progress(&self, percent: u8, message: &str) {
        let mut page = self.page.lock().unwrap();
        page.progress_width = format!("{percent}%");
        page.progress_text = percent.to_string();
        page.status_text = message.to_string();
        page.events.push(ViewEvent::Progress(percent));
    }

    fn set_result(&self, result: &BriefResult) {
        self.page.lock().unwrap().result_href = Some(result.coda_url.clone());
    }

    fn set_error(&self, message: &str) {
        self.page.lock().unwrap().error_text = Some(message.to_string());
    }
}
