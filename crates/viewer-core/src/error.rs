use std::fmt::Display;

use doc_model::ToastId;

use crate::toast::ToastQueue;

const UNKNOWN_ERROR: &str = "unknown error";

/// Surface a failed backend call to the user as an error toast.
pub fn handle_invoke_error(toasts: &ToastQueue, error: &dyn Display) -> ToastId {
    let mut message = error.to_string();
    if message.trim().is_empty() {
        message = UNKNOWN_ERROR.to_owned();
    }
    tracing::warn!(%message, "invoke failed");
    toasts.error(message, Some(toasts.error_duration_ms()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use doc_model::ToastKind;
    use tokio::runtime::Handle;

    #[tokio::test(start_paused = true)]
    async fn error_toast_uses_message_and_error_duration() {
        let toasts = ToastQueue::new(Handle::current(), &ViewerConfig::default());

        let id = handle_invoke_error(&toasts, &"file vanished");

        let shown = toasts.contents();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id, id);
        assert_eq!(shown[0].content.kind, ToastKind::Error);
        assert_eq!(shown[0].content.messages, "file vanished");
        assert_eq!(shown[0].content.duration_milliseconds, 10000);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_message_becomes_unknown_error() {
        let toasts = ToastQueue::new(Handle::current(), &ViewerConfig::default());

        handle_invoke_error(&toasts, &"");

        assert_eq!(toasts.contents()[0].content.messages, "unknown error");
    }
}
