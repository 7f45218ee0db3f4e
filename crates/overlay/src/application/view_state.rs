//! Identity-keyed view state for the quest and request lists.
//!
//! Each map owns one rendered element per live id and mirrors every change to
//! the display. Upserts always re-render from the full payload, so applying the
//! same payload twice is indistinguishable from applying it once.

use std::collections::HashMap;

use overlay_protocol::{QuestData, RequestData};

use crate::ports::outbound::{DisplayPort, ElementStyle, RenderedElement, ViewList};

const QUEST_GLYPH: &str = "🗡️";
const REQUEST_GLYPH: &str = "📞";
const COMPLETED_OPACITY: f32 = 0.75;

/// A payload that can be shown as a list element.
pub trait ViewItem {
    fn item_id(&self) -> Option<&str>;
    fn render(&self) -> RenderedElement;
}

impl ViewItem for QuestData {
    fn item_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn render(&self) -> RenderedElement {
        let progress = whole(self.progress).unwrap_or(0);
        let target = whole(self.target).unwrap_or(1).max(1);
        let name = self.name.as_deref().unwrap_or("Quest");
        let done = progress >= target;

        RenderedElement {
            glyph: if self.icon_url.is_some() {
                None
            } else {
                Some(QUEST_GLYPH)
            },
            icon_url: self.icon_url.clone(),
            label: format!("{name} — {progress}/{target}"),
            annotation: None,
            style: if done {
                ElementStyle {
                    opacity: COMPLETED_OPACITY,
                    strike_through: true,
                }
            } else {
                ElementStyle::default()
            },
        }
    }
}

impl ViewItem for RequestData {
    fn item_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn render(&self) -> RenderedElement {
        let board = self.board.as_deref().unwrap_or("(request)");
        let label = match self.note.as_deref() {
            Some(note) => format!("{board} — {note}"),
            None => board.to_string(),
        };

        RenderedElement {
            glyph: Some(REQUEST_GLYPH),
            icon_url: None,
            label,
            annotation: self.masked_phone.clone(),
            style: ElementStyle::default(),
        }
    }
}

/// Whole-number view of a wire number; non-finite values are unusable.
fn whole(n: Option<f64>) -> Option<i64> {
    n.filter(|v| v.is_finite()).map(|v| v.trunc() as i64)
}

pub struct ViewStateMap {
    list: ViewList,
    order: Vec<String>,
    elements: HashMap<String, RenderedElement>,
}

impl ViewStateMap {
    pub fn new(list: ViewList) -> Self {
        Self {
            list,
            order: Vec::new(),
            elements: HashMap::new(),
        }
    }

    /// Create or fully re-render the element for `item`. Items without an id
    /// are ignored; returns whether anything was rendered.
    pub fn upsert(&mut self, item: &impl ViewItem, display: &dyn DisplayPort) -> bool {
        let Some(id) = item.item_id() else {
            tracing::trace!(list = self.list.as_str(), "ignoring upsert without id");
            return false;
        };

        let element = item.render();
        if !self.elements.contains_key(id) {
            self.order.push(id.to_string());
        }
        display.render(self.list, id, &element);
        self.elements.insert(id.to_string(), element);
        true
    }

    /// Discard the element for `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: &str, display: &dyn DisplayPort) -> bool {
        if self.elements.remove(id).is_none() {
            return false;
        }
        self.order.retain(|existing| existing != id);
        display.remove(self.list, id);
        true
    }

    pub fn get(&self, id: &str) -> Option<&RenderedElement> {
        self.elements.get(id)
    }

    /// Live ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::{DisplayCall, RecordingDisplay};

    fn quest(id: &str, progress: f64, target: f64) -> QuestData {
        QuestData {
            id: Some(id.into()),
            name: Some("Call a man \"ma'am\"".into()),
            progress: Some(progress),
            target: Some(target),
            icon_url: None,
        }
    }

    #[test]
    fn quest_label_and_glyph() {
        let el = quest("q1", 2.0, 5.0).render();
        assert_eq!(el.label, "Call a man \"ma'am\" — 2/5");
        assert_eq!(el.glyph, Some(QUEST_GLYPH));
        assert_eq!(el.style, ElementStyle::default());
    }

    #[test]
    fn quest_with_icon_drops_glyph() {
        let mut q = quest("q1", 0.0, 1.0);
        q.icon_url = Some("/icons/phone.png".into());
        let el = q.render();
        assert_eq!(el.glyph, None);
        assert_eq!(el.icon_url.as_deref(), Some("/icons/phone.png"));
    }

    #[test]
    fn quest_target_is_floored_to_one() {
        let el = QuestData {
            id: Some("q".into()),
            target: Some(0.0),
            progress: Some(f64::NAN),
            ..Default::default()
        }
        .render();
        assert_eq!(el.label, "Quest — 0/1");
        assert!(!el.style.strike_through);
    }

    #[test]
    fn completed_quest_is_dimmed() {
        let el = quest("q1", 5.0, 5.0).render();
        assert!(el.style.strike_through);
        assert_eq!(el.style.opacity, COMPLETED_OPACITY);
    }

    #[test]
    fn request_label_includes_note_and_phone() {
        let el = RequestData {
            id: Some("r1".into()),
            board: Some("Pizza place".into()),
            note: Some("ask for pineapple".into()),
            masked_phone: Some("***-***-1234".into()),
        }
        .render();
        assert_eq!(el.glyph, Some(REQUEST_GLYPH));
        assert_eq!(el.label, "Pizza place — ask for pineapple");
        assert_eq!(el.annotation.as_deref(), Some("***-***-1234"));

        let bare = RequestData {
            id: Some("r2".into()),
            ..Default::default()
        }
        .render();
        assert_eq!(bare.label, "(request)");
    }

    #[test]
    fn upsert_is_idempotent() {
        let display = RecordingDisplay::new();
        let mut quests = ViewStateMap::new(ViewList::Quests);

        let q = quest("q1", 1.0, 3.0);
        assert!(quests.upsert(&q, &display));
        let once = quests.get("q1").cloned();
        assert!(quests.upsert(&q, &display));

        assert_eq!(quests.len(), 1);
        assert_eq!(quests.get("q1").cloned(), once);
        assert_eq!(display.elements(ViewList::Quests).len(), 1);
    }

    #[test]
    fn upsert_keeps_position_on_rerender() {
        let display = RecordingDisplay::new();
        let mut quests = ViewStateMap::new(ViewList::Quests);
        quests.upsert(&quest("a", 0.0, 1.0), &display);
        quests.upsert(&quest("b", 0.0, 1.0), &display);
        quests.upsert(&quest("a", 1.0, 1.0), &display);

        assert_eq!(quests.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(quests.get("a").is_some_and(|el| el.style.strike_through));
    }

    #[test]
    fn upsert_without_id_is_ignored() {
        let display = RecordingDisplay::new();
        let mut requests = ViewStateMap::new(ViewList::Requests);
        assert!(!requests.upsert(&RequestData::default(), &display));
        assert!(requests.is_empty());
        assert!(display.calls().is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let display = RecordingDisplay::new();
        let mut requests = ViewStateMap::new(ViewList::Requests);
        assert!(!requests.remove("ghost", &display));
        assert!(display.calls().is_empty());

        requests.upsert(
            &RequestData {
                id: Some("r1".into()),
                ..Default::default()
            },
            &display,
        );
        assert!(requests.remove("r1", &display));
        assert!(!requests.remove("r1", &display));
        assert!(requests.is_empty());
        assert_eq!(
            display.calls().last(),
            Some(&DisplayCall::Remove(ViewList::Requests, "r1".into()))
        );
    }
}
