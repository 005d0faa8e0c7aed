use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use super::{ModalSurface, Navigator, Notifier};

/// One call observed by a [`RecordingModal`].
#[derive(Debug, Clone, PartialEq)]
pub enum ModalCall<R> {
    Opened(Option<R>),
    Closed,
}

/// Modal surface that records every open/close call, in order.
#[derive(Debug, Default)]
pub struct RecordingModal<R> {
    calls: Mutex<Vec<ModalCall<R>>>,
}

impl<R: Clone> RecordingModal<R> {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ModalCall<R>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Whether the surface is open after the last recorded call.
    pub fn is_open(&self) -> bool {
        matches!(self.calls().last(), Some(ModalCall::Opened(_)))
    }

    /// The prefill of the most recent open call, if any.
    pub fn last_prefill(&self) -> Option<R> {
        self.calls()
            .iter()
            .rev()
            .find_map(|call| match call {
                ModalCall::Opened(prefill) => Some(prefill.clone()),
                ModalCall::Closed => None,
            })
            .flatten()
    }
}

impl<R: Clone + Send + Sync> ModalSurface<R> for RecordingModal<R> {
    fn open(&self, prefill: Option<R>) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ModalCall::Opened(prefill));
    }

    fn close(&self) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ModalCall::Closed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// One notification shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub detail: Option<String>,
}

/// Notifier that records every notice, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Notice {
                kind: NoticeKind::Success,
                message: message.to_string(),
                detail: None,
            });
    }

    fn failure(&self, message: &str, detail: &str) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Notice {
                kind: NoticeKind::Failure,
                message: message.to_string(),
                detail: Some(detail.to_string()),
            });
    }
}

/// Navigator that records every pushed path, in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, path: &str) {
        self.paths
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(path.to_string());
    }
}
