use std::time::Duration;

use leptos::prelude::*;

use crate::browser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
}

/// Page-wide success/error banner. Each notice dismisses itself after
/// `lifetime` unless a newer one replaced it first.
#[derive(Clone, Copy)]
pub struct Notifier {
    notice: RwSignal<Option<Notice>>,
    next_id: StoredValue<u64>,
    lifetime: Duration,
}

impl Notifier {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            notice: RwSignal::new(None),
            next_id: StoredValue::new(0),
            lifetime,
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(NoticeKind::Success, message.into());
    }

    /// Errors also scroll to the top so the banner is in view.
    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.show(NoticeKind::Error, message);
        browser::scroll_to_top();
    }

    pub fn dismiss(&self) {
        self.notice.set(None);
    }

    pub fn current(&self) -> Option<Notice> {
        self.notice.get()
    }

    fn show(&self, kind: NoticeKind, message: String) {
        self.next_id.update_value(|id| *id += 1);
        let id = self.next_id.get_value();
        self.notice.set(Some(Notice { id, kind, message }));

        let notice = self.notice;
        browser::set_timeout(self.lifetime, move || {
            if notice.get_untracked().is_some_and(|n| n.id == id) {
                notice.set(None);
            }
        });
    }
}

#[component]
pub fn NotificationBanner(notifier: Notifier) -> impl IntoView {
    move || {
        notifier.current().map(|notice| {
            let (class, icon) = match notice.kind {
                NoticeKind::Success => ("alert alert-success show", "\u{2713}"),
                NoticeKind::Error => ("alert alert-error show", "\u{2717}"),
            };
            view! {
                <div class=class role="alert">
                    <span class="alert-icon">{icon}</span>
                    <span class="alert-message">{notice.message}</span>
                    <button class="alert-close" on:click=move |_| notifier.dismiss()>"\u{00d7}"</button>
                </div>
            }
        })
    }
}
