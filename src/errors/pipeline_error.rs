use std::any::Any;
use std::error::Error;
use std::fmt;

/// Errors surfaced by the pipeline itself rather than by user code calling
/// `error` explicitly.
#[derive(Debug)]
pub enum PipelineError {
    /// A user-supplied callback panicked while the pipeline was running.
    ///
    /// `stage` names the operator or factory whose callback unwound, e.g.
    /// `"map"` or `"create"`. The panic payload is captured as text when it
    /// is a string, which covers `panic!("...")` and `assert!` messages.
    CallbackPanic {
        stage: &'static str,
        message: String,
    },
}

impl PipelineError {
    /// Builds a `CallbackPanic` from the payload returned by
    /// `std::panic::catch_unwind`.
    pub fn callback_panic(stage: &'static str, payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic payload was not a string".to_string());

        PipelineError::CallbackPanic { stage, message }
    }

    /// The operator or factory whose callback failed.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::CallbackPanic { stage, .. } => stage,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::CallbackPanic { stage, message } => {
                write!(f, "{} callback panicked: {}", stage, message)
            }
        }
    }
}

impl Error for PipelineError {}
