use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use crate::view::DashboardView;

#[async_trait(?Send)]
pub trait Delay {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Saved,
    SaveFailed,
    PresetApplied,
    PresetFailed,
}

impl NoticeKind {
    pub fn text(self) -> &'static str {
        match self {
            Self::Saved => "Saved!",
            Self::SaveFailed => "Save failed",
            Self::PresetApplied => "Preset applied",
            Self::PresetFailed => "Preset failed",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Saved | Self::PresetApplied)
    }
}

/// A transient message currently on screen, identified by its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub token: MessageToken,
}

/// Status line with token-guarded dismissal: a timer only clears the message
/// it was scheduled for.
#[derive(Clone)]
pub struct StatusLine<V> {
    view: V,
    current: Rc<Cell<u64>>,
}

impl<V: DashboardView> StatusLine<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            current: Rc::new(Cell::new(0)),
        }
    }

    pub fn show(&self, kind: NoticeKind) -> Notice {
        let next = self.current.get().wrapping_add(1);
        self.current.set(next);
        self.view.set_status_message(kind.text());
        Notice {
            kind,
            token: MessageToken(next),
        }
    }

    pub fn is_current(&self, token: MessageToken) -> bool {
        self.current.get() == token.0
    }

    /// Clears the status element if `token` still names the displayed message.
    pub fn dismiss(&self, token: MessageToken) -> bool {
        if !self.is_current(token) {
            tracing::trace!(token = token.0, "skipping stale status dismissal");
            return false;
        }
        self.view.set_status_message("");
        true
    }

    pub async fn dismiss_after<D: Delay>(
        &self,
        token: MessageToken,
        delay: &D,
        after: Duration,
    ) -> bool {
        delay.sleep(after).await;
        self.dismiss(token)
    }
}
