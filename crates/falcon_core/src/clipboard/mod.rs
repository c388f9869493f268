use crate::error::AppError;

mod system;
pub use system::SystemClipboard;

pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<(), AppError>;
}

/// A clipboard that always fails, so callers take their fallback path.
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn copy(&self, _text: &str) -> Result<(), AppError> {
        Err(AppError::clipboard("clipboard is disabled"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// The clipboard could not be written; the caller shows the text for
    /// manual selection and reports `error` as a notice.
    Fallback { error: AppError },
}

pub fn clipboard_from_env() -> Box<dyn Clipboard> {
    if std::env::var("FALCON_DISABLE_CLIPBOARD").is_ok() {
        return Box::new(UnavailableClipboard);
    }
    Box::new(SystemClipboard::for_platform())
}

pub fn copy_with_fallback(clipboard: &dyn Clipboard, text: &str) -> CopyOutcome {
    match clipboard.copy(text) {
        Ok(()) => CopyOutcome::Copied,
        Err(error) => {
            log::warn!("clipboard copy failed, falling back to manual copy: {error}");
            CopyOutcome::Fallback { error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Clipboard, CopyOutcome, UnavailableClipboard, copy_with_fallback};
    use crate::error::AppError;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingClipboard {
        copied: RefCell<Vec<String>>,
    }

    impl Clipboard for RecordingClipboard {
        fn copy(&self, text: &str) -> Result<(), AppError> {
            self.copied.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn copy_with_fallback_reports_success() {
        let clipboard = RecordingClipboard::default();
        let outcome = copy_with_fallback(&clipboard, "hello");
        assert_eq!(outcome, CopyOutcome::Copied);
        assert_eq!(clipboard.copied.borrow().as_slice(), ["hello".to_string()]);
    }

    #[test]
    fn copy_with_fallback_surfaces_error() {
        match copy_with_fallback(&UnavailableClipboard, "hello") {
            CopyOutcome::Fallback { error } => assert_eq!(error.code(), "clipboard_error"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
