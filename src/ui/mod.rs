//! Terminal UI components: styling, spinner, output gating and the
//! transcript view.

use anyhow::Result;
use inquire::InquireError;

mod spinner;
mod style;
mod terminal;
mod transcript;

pub use spinner::Spinner;
pub use style::Style;
pub use terminal::{GatedStderr, OutputGate, Stream, terminal};
pub use transcript::TerminalTranscript;

/// Check if the inquire error is a user cancellation/interruption.
pub(crate) const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Runs an interactive flow, turning Ctrl+C or Escape into a clean `Ok(())`.
pub fn handle_prompt_cancellation<F>(f: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    match f() {
        Ok(()) => Ok(()),
        Err(e)
            if e.downcast_ref::<InquireError>()
                .is_some_and(is_prompt_cancelled) =>
        {
            println!();
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_prompt_is_not_an_error() {
        for cancelled in [
            InquireError::OperationCanceled,
            InquireError::OperationInterrupted,
        ] {
            assert!(is_prompt_cancelled(&cancelled));
            assert!(handle_prompt_cancellation(|| Err(cancelled.into())).is_ok());
        }
    }

    #[test]
    fn test_other_errors_propagate() {
        assert!(!is_prompt_cancelled(&InquireError::Custom("boom".into())));

        let result = handle_prompt_cancellation(|| Err(anyhow::anyhow!("config write failed")));
        let Err(err) = result else {
            panic!("expected an error");
        };
        assert!(err.to_string().contains("config write failed"));
    }
}
