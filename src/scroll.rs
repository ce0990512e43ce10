use std::cell::Cell;
use std::rc::Rc;

/// Whether the page underneath overlays may scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Auto,
    Hidden,
}

/// Shared handle to the page's overflow setting.
///
/// The grid consults it before scrolling; overlays take a [`ScrollLock`] from
/// it while they are mounted.
#[derive(Debug, Clone)]
pub struct ScrollGate {
    overflow: Rc<Cell<Overflow>>,
}

impl Default for ScrollGate {
    fn default() -> Self {
        Self::new(Overflow::default())
    }
}

impl ScrollGate {
    pub fn new(initial: Overflow) -> Self {
        Self {
            overflow: Rc::new(Cell::new(initial)),
        }
    }

    pub fn overflow(&self) -> Overflow {
        self.overflow.get()
    }

    pub fn can_scroll(&self) -> bool {
        self.overflow() != Overflow::Hidden
    }

    /// Disable scrolling until the returned guard is dropped.
    pub fn lock(&self) -> ScrollLock {
        let previous = self.overflow.replace(Overflow::Hidden);
        tracing::trace!(?previous, "scroll locked");
        ScrollLock {
            overflow: Rc::clone(&self.overflow),
            previous,
        }
    }
}

/// Guard returned by [`ScrollGate::lock`]. Restores the captured setting on drop.
#[derive(Debug)]
#[must_use = "scrolling is re-enabled as soon as the lock is dropped"]
pub struct ScrollLock {
    overflow: Rc<Cell<Overflow>>,
    previous: Overflow,
}

impl ScrollLock {
    pub fn previous(&self) -> Overflow {
        self.previous
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.overflow.set(self.previous);
        tracing::trace!(restored = ?self.previous, "scroll unlocked");
    }
}
