//! Notification channel for user-visible toasts.

use mockall::automock;

/// Visual weight of a toast, matching the storefront's toast variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    /// Neutral information.
    Info,
    /// Something needs attention soon.
    Warning,
    /// Something was taken away.
    Destructive,
}

/// A user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Short headline.
    pub title: String,
    /// One-line detail.
    pub description: String,
    /// Visual weight.
    pub variant: ToastVariant,
}

impl Toast {
    /// Creates a toast.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        variant: ToastVariant,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant,
        }
    }
}

/// Sink for toasts. The storefront UI is one implementation; the runtime
/// default logs through `tracing`.
#[automock]
pub trait Notifier: Send + Sync {
    /// Delivers a toast to the user.
    fn notify(&self, toast: Toast);
}

/// Notifier that emits toasts as structured log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.variant {
            ToastVariant::Info => {
                tracing::info!(title = %toast.title, description = %toast.description, "toast");
            }
            ToastVariant::Warning | ToastVariant::Destructive => {
                tracing::warn!(title = %toast.title, description = %toast.description, "toast");
            }
        }
    }
}
