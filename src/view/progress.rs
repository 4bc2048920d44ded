//! Per-result progress indicator.

use std::sync::{Arc, Mutex, MutexGuard};

use indicatif::ProgressBar;

/// Lifecycle of a progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressStatus {
    /// Hidden, no transfer.
    #[default]
    Idle,
    /// A transfer is running.
    Running,
    /// The transfer failed; the bar stays visible where it stopped.
    Stalled,
}

/// Point-in-time view of a [`ProgressSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub visible: bool,
    /// Percentage, 0..=100.
    pub value: u64,
    pub status: ProgressStatus,
}

#[derive(Debug, Default)]
struct Inner {
    snapshot: ProgressSnapshot,
    bar: Option<ProgressBar>,
}

/// Progress element scoped to one result block.
///
/// Clones share state, so the rendered block and the click handler bound to
/// it observe the same indicator.
#[derive(Debug, Clone, Default)]
pub struct ProgressSurface {
    inner: Arc<Mutex<Inner>>,
}

impl ProgressSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Mirror updates onto a terminal progress bar.
    pub fn attach_bar(&self, bar: ProgressBar) {
        self.lock().bar = Some(bar);
    }

    /// Reset to zero and show.
    pub fn start(&self) {
        let mut inner = self.lock();
        inner.snapshot = ProgressSnapshot {
            visible: true,
            value: 0,
            status: ProgressStatus::Running,
        };
        if let Some(bar) = &inner.bar {
            bar.reset();
            bar.set_length(100);
            bar.set_position(0);
        }
    }

    /// Set the percentage directly, clamped to 100.
    pub fn set_percent(&self, percent: u64) {
        let mut inner = self.lock();
        if inner.snapshot.status != ProgressStatus::Running {
            return;
        }
        let value = percent.min(100);
        inner.snapshot.value = value;
        if let Some(bar) = &inner.bar {
            bar.set_length(100);
            bar.set_position(value);
        }
    }

    /// Report byte progress. Unknown totals leave the percentage untouched.
    pub fn set_bytes(&self, loaded: u64, total: Option<u64>) {
        let mut inner = self.lock();
        if inner.snapshot.status != ProgressStatus::Running {
            return;
        }
        if let Some(total) = total.filter(|t| *t > 0) {
            inner.snapshot.value = (loaded.saturating_mul(100) / total).min(100);
            if let Some(bar) = &inner.bar {
                bar.set_length(total);
                bar.set_position(loaded.min(total));
            }
        } else if let Some(bar) = &inner.bar {
            bar.tick();
        }
    }

    /// Hide and reset to zero.
    pub fn hide(&self) {
        let mut inner = self.lock();
        inner.snapshot = ProgressSnapshot::default();
        if let Some(bar) = &inner.bar {
            bar.finish_and_clear();
        }
    }

    /// Show the bar where it stopped, marked as stalled.
    pub fn stall(&self) {
        let mut inner = self.lock();
        inner.snapshot.status = ProgressStatus::Stalled;
        inner.snapshot.visible = true;
        if let Some(bar) = &inner.bar {
            bar.abandon_with_message("stalled");
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.lock().snapshot
    }

    pub fn is_running(&self) -> bool {
        self.snapshot().status == ProgressStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_resets_to_zero() {
        let progress = ProgressSurface::new();
        progress.start();
        progress.set_percent(40);
        progress.stall();

        progress.start();
        let snapshot = progress.snapshot();
        assert!(snapshot.visible);
        assert_eq!(snapshot.value, 0);
        assert_eq!(snapshot.status, ProgressStatus::Running);
    }

    #[test]
    fn test_byte_progress() {
        let progress = ProgressSurface::new();
        progress.start();
        progress.set_bytes(250, Some(1000));
        assert_eq!(progress.snapshot().value, 25);

        progress.set_bytes(500, None);
        assert_eq!(progress.snapshot().value, 25);

        progress.set_bytes(2000, Some(1000));
        assert_eq!(progress.snapshot().value, 100);
    }

    #[test]
    fn test_updates_ignored_when_not_running() {
        let progress = ProgressSurface::new();
        progress.set_percent(50);
        assert_eq!(progress.snapshot(), ProgressSnapshot::default());

        progress.start();
        progress.set_percent(30);
        progress.stall();
        progress.set_percent(90);
        let snapshot = progress.snapshot();
        assert_eq!(snapshot.value, 30);
        assert!(snapshot.visible);
    }

    #[test]
    fn test_stall_after_hide_shows_bar() {
        let progress = ProgressSurface::new();
        progress.start();
        progress.hide();
        progress.stall();

        let snapshot = progress.snapshot();
        assert!(snapshot.visible);
        assert_eq!(snapshot.status, ProgressStatus::Stalled);
    }

    #[test]
    fn test_hide() {
        let progress = ProgressSurface::new();
        progress.start();
        progress.set_percent(80);
        progress.hide();
        assert_eq!(progress.snapshot(), ProgressSnapshot::default());
    }

    #[test]
    fn test_clones_share_state() {
        let progress = ProgressSurface::new();
        let handle = progress.clone();
        handle.start();
        assert!(progress.is_running());
    }
}
