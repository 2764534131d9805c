use crate::api::BriefResult;
use crate::controller::Section;

/// The element surface the controller reads and writes.
///
/// Methods take `&self` so a view can be shared with the polling task;
/// implementations use interior mutability.
pub trait View: Send + Sync + 'static {
    /// Blocking notice for input the controller refuses to submit.
    fn alert(&self, message: &str);

    /// Empty the URL field.
    fn clear_input(&self);

    fn set_submit_enabled(&self, enabled: bool);

    /// Make `section` the only visible section.
    fn show_section(&self, section: Section);

    /// Progress bar width and percentage text, plus the status message.
    fn set_progress(&self, percent: u8, message: &str);

    /// Point the result link at the finished document.
    fn set_result(&self, result: &BriefResult);

    fn set_error(&self, message: &str);
}
