//! Transient status messages shown over the panel
//!
//! Exactly one message is current at a time: a new `show` replaces whatever is
//! displayed. Success and info messages expire on their own, errors stay until
//! dismissed.

use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::constants::notify::AUTO_HIDE_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    /// No kind styling
    Plain,
}

impl NotificationKind {
    pub fn auto_hides(self) -> bool {
        matches!(self, NotificationKind::Success | NotificationKind::Info)
    }
}

/// Where messages end up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Rendered by the GUI overlay
    Overlay,
    /// No window; messages go to the log
    Log,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
    pub visible: bool,
}

impl Notification {
    /// Instant at which this message hides itself, if it ever does
    pub fn expires_at(&self, delay: Duration) -> Option<Instant> {
        self.kind.auto_hides().then(|| self.shown_at + delay)
    }
}

#[derive(Debug)]
pub struct Notifier {
    surface: Surface,
    auto_hide: Duration,
    current: Option<Notification>,
}

impl Notifier {
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            auto_hide: Duration::from_millis(AUTO_HIDE_MS),
            current: None,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.show_at(message, kind, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) {
        let message = message.into();

        if self.surface == Surface::Log {
            match kind {
                NotificationKind::Error => error!("{message}"),
                NotificationKind::Success | NotificationKind::Info => info!("{message}"),
                NotificationKind::Plain => debug!("{message}"),
            }
        }

        self.current = Some(Notification {
            message,
            kind,
            shown_at: now,
            visible: true,
        });
    }

    /// Manual close (the overlay's close button)
    pub fn dismiss(&mut self) {
        if let Some(current) = self.current.as_mut() {
            current.visible = false;
        }
    }

    /// Hide the current message once its auto-hide delay has passed
    pub fn tick(&mut self, now: Instant) {
        let delay = self.auto_hide;
        if let Some(current) = self.current.as_mut()
            && current.visible
            && current.expires_at(delay).is_some_and(|at| now >= at)
        {
            current.visible = false;
        }
    }

    /// Message currently on screen
    pub fn visible(&self) -> Option<&Notification> {
        self.current.as_ref().filter(|n| n.visible)
    }

    /// Most recent message, visible or not
    pub fn last(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Time until the visible message hides, for scheduling a repaint
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.visible()
            .and_then(|n| n.expires_at(self.auto_hide))
            .map(|at| at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAST_DELAY: Duration = Duration::from_millis(AUTO_HIDE_MS + 1);

    #[test]
    fn test_success_hides_after_delay() {
        let mut notifier = Notifier::new(Surface::Overlay);
        let start = Instant::now();
        notifier.show_at("File copied", NotificationKind::Success, start);

        notifier.tick(start + Duration::from_millis(AUTO_HIDE_MS - 1));
        assert!(notifier.visible().is_some());

        notifier.tick(start + PAST_DELAY);
        assert!(notifier.visible().is_none());
        assert_eq!(notifier.last().unwrap().message, "File copied");
    }

    #[test]
    fn test_info_hides_after_delay() {
        let mut notifier = Notifier::new(Surface::Overlay);
        let start = Instant::now();
        notifier.show_at("Preparing", NotificationKind::Info, start);
        notifier.tick(start + PAST_DELAY);
        assert!(notifier.visible().is_none());
    }

    #[test]
    fn test_error_persists_until_dismissed() {
        let mut notifier = Notifier::new(Surface::Overlay);
        let start = Instant::now();
        notifier.show_at("jam", NotificationKind::Error, start);

        notifier.tick(start + Duration::from_secs(3600));
        assert_eq!(notifier.visible().unwrap().kind, NotificationKind::Error);

        notifier.dismiss();
        assert!(notifier.visible().is_none());
    }

    #[test]
    fn test_plain_does_not_auto_hide() {
        let mut notifier = Notifier::new(Surface::Overlay);
        let start = Instant::now();
        notifier.show_at("hello", NotificationKind::Plain, start);
        notifier.tick(start + PAST_DELAY);
        assert!(notifier.visible().is_some());
    }

    #[test]
    fn test_new_message_replaces_current() {
        let mut notifier = Notifier::new(Surface::Overlay);
        let start = Instant::now();
        notifier.show_at("first", NotificationKind::Error, start);
        notifier.show_at("second", NotificationKind::Success, start);

        let visible = notifier.visible().unwrap();
        assert_eq!(visible.message, "second");
        assert_eq!(visible.kind, NotificationKind::Success);
    }

    #[test]
    fn test_later_message_gets_its_own_delay() {
        let mut notifier = Notifier::new(Surface::Overlay);
        let start = Instant::now();
        notifier.show_at("first", NotificationKind::Success, start);
        let later = start + Duration::from_secs(4);
        notifier.show_at("second", NotificationKind::Success, later);

        // The first message's deadline has passed, the second's has not
        notifier.tick(start + PAST_DELAY);
        assert_eq!(notifier.visible().unwrap().message, "second");

        notifier.tick(later + PAST_DELAY);
        assert!(notifier.visible().is_none());
    }

    #[test]
    fn test_remaining_reports_time_left() {
        let mut notifier = Notifier::new(Surface::Overlay);
        let start = Instant::now();
        notifier.show_at("ok", NotificationKind::Success, start);
        assert_eq!(
            notifier.remaining(start + Duration::from_secs(2)),
            Some(Duration::from_millis(AUTO_HIDE_MS - 2_000))
        );

        notifier.show_at("bad", NotificationKind::Error, start);
        assert_eq!(notifier.remaining(start), None);
    }

    #[test]
    fn test_log_surface_still_records_message() {
        let mut notifier = Notifier::new(Surface::Log);
        notifier.show("Print job failed: jam", NotificationKind::Error);
        assert_eq!(notifier.last().unwrap().message, "Print job failed: jam");
    }

    #[test]
    fn test_log_surface_plain_message_persists() {
        let start = Instant::now();
        let mut notifier = Notifier::new(Surface::Log);
        notifier.show_at("debug note", NotificationKind::Plain, start);

        notifier.tick(start + Duration::from_millis(AUTO_HIDE_MS + 1));
        assert_eq!(notifier.visible().unwrap().kind, NotificationKind::Plain);
    }
}
