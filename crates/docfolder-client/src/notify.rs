//! Session status notifications.

/// Session transition reported to a [`StatusNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthEvent {
    /// A login succeeded and a fresh token was stored.
    LoggedIn,
    /// The user logged out explicitly.
    LoggedOut,
    /// The server rejected the token and the session was cleared.
    Expired,
}

impl AuthEvent {
    /// Whether the session is authenticated after this event.
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::LoggedIn)
    }

    /// Stable label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoggedIn => "logged_in",
            Self::LoggedOut => "logged_out",
            Self::Expired => "expired",
        }
    }
}

/// Receives session transitions; implementations decide how to surface them.
pub trait StatusNotifier: Send + Sync {
    /// Called after the session state has changed.
    fn notify(&self, event: AuthEvent);
}

impl<F> StatusNotifier for F
where
    F: Fn(AuthEvent) + Send + Sync,
{
    fn notify(&self, event: AuthEvent) {
        self(event);
    }
}

/// Notifier that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl StatusNotifier for NoopNotifier {
    fn notify(&self, _event: AuthEvent) {}
}

/// Notifier that records transitions as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl StatusNotifier for TracingNotifier {
    fn notify(&self, event: AuthEvent) {
        match event {
            AuthEvent::Expired => {
                tracing::warn!(
                    event = event.as_str(),
                    authenticated = event.is_authenticated(),
                    "session expired; token cleared"
                );
            }
            AuthEvent::LoggedIn | AuthEvent::LoggedOut => {
                tracing::info!(
                    event = event.as_str(),
                    authenticated = event.is_authenticated(),
                    "session state changed"
                );
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Mutex, PoisonError};

    use super::{AuthEvent, StatusNotifier};

    /// Captures every event for later assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingNotifier {
        events: Mutex<Vec<AuthEvent>>,
    }

    impl RecordingNotifier {
        pub(crate) fn events(&self) -> Vec<AuthEvent> {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl StatusNotifier for RecordingNotifier {
        fn notify(&self, event: AuthEvent) {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn closures_act_as_notifiers() {
        let calls = AtomicUsize::new(0);
        let notifier = |event: AuthEvent| {
            assert_eq!(event, AuthEvent::Expired);
            calls.fetch_add(1, Ordering::SeqCst);
        };
        notifier.notify(AuthEvent::Expired);
        notifier.notify(AuthEvent::Expired);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn only_login_leaves_session_authenticated() {
        assert!(AuthEvent::LoggedIn.is_authenticated());
        assert!(!AuthEvent::LoggedOut.is_authenticated());
        assert!(!AuthEvent::Expired.is_authenticated());
    }

    #[test]
    fn builtin_notifiers_accept_every_event() {
        for event in [AuthEvent::LoggedIn, AuthEvent::LoggedOut, AuthEvent::Expired] {
            NoopNotifier.notify(event);
            TracingNotifier.notify(event);
        }
    }
}
