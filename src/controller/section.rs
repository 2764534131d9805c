use std::fmt;

/// The four mutually exclusive views of the brief form.
///
/// Flow: INPUT → PROGRESS → RESULT | ERROR, and any section → INPUT on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Input,
    Progress,
    Result,
    Error,
}

impl Section {
    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// - `Input` only leads to `Progress` (a valid submit).
    /// - `Progress` may re-render itself, or end in `Result` or `Error`.
    /// - `Result` and `Error` are left only through a reset.
    /// - Reset (→ `Input`) is always allowed.
    pub fn can_transition_to(self, next: Section) -> bool {
        match (self, next) {
            (_, Section::Input) => true,
            (Section::Input, Section::Progress) => true,
            (Section::Progress, Section::Progress | Section::Result | Section::Error) => true,
            _ => false,
        }
    }

    /// Sections that end a generation attempt.
    pub fn is_terminal(self) -> bool {
        matches!(self, Section::Result | Section::Error)
    }

    /// Element id of the section in the page markup.
    pub fn element_id(self) -> &'static str {
        match self {
            Section::Input => "input-section",
            Section::Progress => "progress-section",
            Section::Result => "result-section",
            Section::Error => "error-section",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Input => write!(f, "INPUT"),
            Section::Progress => write!(f, "PROGRESS"),
            Section::Result => write!(f, "RESULT"),
            Section::Error => write!(f, "ERROR"),
        }
    }
}
