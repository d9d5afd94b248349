//! Transient user notifications ("toasts").

/// A short notification shown after a successful action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Headline.
    pub title: String,
    /// Body text.
    pub description: String,
}

/// Port to whatever displays toasts.
pub trait Notifier {
    /// Shows `toast`.
    fn notify(&mut self, toast: Toast);
}

/// Writes toasts to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, toast: Toast) {
        log::info!("{}: {}", toast.title, toast.description);
    }
}
