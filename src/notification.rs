//! Transient user notifications
//!
//! A notification is shown once and then dismissed, either by the user or
//! automatically when its duration elapses. The dismiss callback runs
//! exactly once per notification.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default auto-dismiss delay
pub const DEFAULT_DURATION: Duration = Duration::from_millis(6000);

/// How prominent a notification is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Success,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Success => "success",
        };
        f.write_str(label)
    }
}

/// A message to show for a limited time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    /// Time until automatic dismissal
    pub duration: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity, duration: Duration) -> Self {
        Self {
            message: message.into(),
            severity,
            duration,
        }
    }
}

/// Called when a notification goes away
pub type DismissCallback = Box<dyn FnOnce() + Send + 'static>;

/// Something that can display notifications
pub trait NotificationSurface {
    /// Display `notification`, replacing the current one if any
    ///
    /// `on_dismiss` must be called exactly once: when the duration elapses,
    /// when the user acknowledges, or when a newer notification replaces
    /// this one, whichever comes first.
    fn show(&mut self, notification: Notification, on_dismiss: DismissCallback);

    /// Explicit dismissal by the user
    fn acknowledge(&mut self);
}

/// Shared slot holding a callback that can be taken only once
#[derive(Clone)]
struct DismissOnce(Arc<Mutex<Option<DismissCallback>>>);

impl DismissOnce {
    fn new(callback: DismissCallback) -> Self {
        Self(Arc::new(Mutex::new(Some(callback))))
    }

    fn fire(&self) -> bool {
        let callback = match self.0.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    fn is_pending(&self) -> bool {
        match self.0.lock() {
            Ok(slot) => slot.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }
}

struct Active {
    dismiss: DismissOnce,
    timer: Option<JoinHandle<()>>,
}

impl Active {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// Notification surface with a tokio auto-dismiss timer
///
/// `sink` renders the notification (print it, push it to a widget, ...).
/// Timers are spawned on the current tokio runtime; outside a runtime the
/// notification stays until acknowledged. Dropping the surface cancels the
/// pending timer without calling the callback.
pub struct TimedSurface<F>
where
    F: FnMut(&Notification),
{
    sink: F,
    active: Option<Active>,
}

impl<F> TimedSurface<F>
where
    F: FnMut(&Notification),
{
    pub fn new(sink: F) -> Self {
        Self { sink, active: None }
    }

    /// Check whether a notification is on screen and not yet dismissed
    pub fn is_showing(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.dismiss.is_pending())
    }
}

impl<F> NotificationSurface for TimedSurface<F>
where
    F: FnMut(&Notification),
{
    fn show(&mut self, notification: Notification, on_dismiss: DismissCallback) {
        if let Some(mut previous) = self.active.take() {
            previous.cancel_timer();
            if previous.dismiss.fire() {
                debug!("notification superseded");
            }
        }

        (self.sink)(&notification);

        let dismiss = DismissOnce::new(on_dismiss);
        let timer = match Handle::try_current() {
            Ok(runtime) => {
                let expiry = dismiss.clone();
                let duration = notification.duration;
                Some(runtime.spawn(async move {
                    tokio::time::sleep(duration).await;
                    if expiry.fire() {
                        debug!("notification expired");
                    }
                }))
            }
            Err(_) => {
                warn!("no async runtime, notification will stay until acknowledged");
                None
            }
        };
        self.active = Some(Active { dismiss, timer });
    }

    fn acknowledge(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.cancel_timer();
            if active.dismiss.fire() {
                debug!("notification acknowledged");
            }
        }
    }
}

impl<F> Drop for TimedSurface<F>
where
    F: FnMut(&Notification),
{
    fn drop(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.cancel_timer();
        }
    }
}
