use std::sync::Mutex;

use crate::ports::outbound::{DisplayPort, RenderedElement, ViewList};

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    Toast(String),
    Status(String),
    Render(ViewList, String, RenderedElement),
    Remove(ViewList, String),
}

/// Display that records calls and keeps a model of each list.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    calls: Mutex<Vec<DisplayCall>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DisplayCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn toasts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                DisplayCall::Toast(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                DisplayCall::Status(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Current `(id, label)` pairs of `list`, in insertion order.
    pub fn elements(&self, list: ViewList) -> Vec<(String, String)> {
        let mut live: Vec<(String, String)> = Vec::new();
        for call in self.calls() {
            match call {
                DisplayCall::Render(l, id, element) if l == list => {
                    match live.iter_mut().find(|(existing, _)| *existing == id) {
                        Some(slot) => slot.1 = element.label,
                        None => live.push((id, element.label)),
                    }
                }
                DisplayCall::Remove(l, id) if l == list => live.retain(|(e, _)| *e != id),
                _ => {}
            }
        }
        live
    }

    fn record(&self, call: DisplayCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl DisplayPort for RecordingDisplay {
    fn toast(&self, text: &str) {
        if !text.is_empty() {
            self.record(DisplayCall::Toast(text.to_string()));
        }
    }

    fn set_status(&self, text: &str) {
        self.record(DisplayCall::Status(text.to_string()));
    }

    fn render(&self, list: ViewList, id: &str, element: &RenderedElement) {
        self.record(DisplayCall::Render(list, id.to_string(), element.clone()));
    }

    fn remove(&self, list: ViewList, id: &str) {
        self.record(DisplayCall::Remove(list, id.to_string()));
    }
}
