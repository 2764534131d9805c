mod form;
mod retry;
mod section;
mod state;
mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use form::{Controller, Key, PollSettings, SubmitError};
pub use retry::RetryPolicy;
pub use section::Section;
pub use validate::ValidationError;
