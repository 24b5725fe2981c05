use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tui::style::Color;

pub const DEFAULT_TTL: Duration = Duration::from_secs(3);
pub const DEFAULT_CAPACITY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NoticeKind {
    pub fn icon(&self) -> &'static str {
        match self {
            NoticeKind::Success => "✓",
            NoticeKind::Error => "✕",
            NoticeKind::Info => "ℹ",
            NoticeKind::Warning => "⚠",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            NoticeKind::Success => Color::Green,
            NoticeKind::Error => Color::Red,
            NoticeKind::Info => Color::Blue,
            NoticeKind::Warning => Color::Yellow,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    created_at: Instant,
}

/// Transient notifications owned by the app, not by any global state.
/// Bounded queue: when full, the oldest entry is dropped to make room.
/// Each entry expires independently after `ttl`; the front entry can also
/// be dismissed by hand.
#[derive(Debug)]
pub struct Notifications {
    queue: VecDeque<Notice>,
    capacity: usize,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Notifications::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

impl Notifications {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Notifications {
            queue: VecDeque::with_capacity(capacity),
            capacity,
            ttl,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, kind: NoticeKind) {
        self.push_at(message, kind, Instant::now());
    }

    fn push_at(&mut self, message: impl Into<String>, kind: NoticeKind, at: Instant) {
        if self.queue.len() == self.capacity {
            self.queue.pop_front();
        }
        self.queue.push_back(Notice {
            message: message.into(),
            kind,
            created_at: at,
        });
    }

    /// Drop entries older than the ttl. Called once per event-loop tick.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.queue
            .retain(|n| now.saturating_duration_since(n.created_at) < ttl);
    }

    pub fn dismiss_front(&mut self) {
        self.queue.pop_front();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_drops_the_oldest_entry() {
        let mut notices = Notifications::new(2, DEFAULT_TTL);
        notices.push("one", NoticeKind::Info);
        notices.push("two", NoticeKind::Info);
        notices.push("three", NoticeKind::Info);

        let messages: Vec<&str> = notices.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["two", "three"]);
    }

    #[test]
    fn entries_expire_independently() {
        let mut notices = Notifications::new(4, Duration::from_secs(3));
        let start = Instant::now();
        notices.push_at("early", NoticeKind::Info, start);
        notices.push_at("late", NoticeKind::Success, start + Duration::from_secs(2));

        notices.prune(start + Duration::from_secs(4));
        let messages: Vec<&str> = notices.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["late"]);

        notices.prune(start + Duration::from_secs(6));
        assert!(notices.is_empty());
    }

    #[test]
    fn front_entry_is_dismissible() {
        let mut notices = Notifications::default();
        notices.push("stale", NoticeKind::Warning);
        notices.push("fresh", NoticeKind::Success);
        notices.dismiss_front();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices.iter().next().unwrap().message, "fresh");
    }
}
