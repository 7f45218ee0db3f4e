//! Rendered output: notices, connection status and the two overlay lists.

/// Which overlay list an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewList {
    Quests,
    Requests,
}

impl ViewList {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewList::Quests => "quests",
            ViewList::Requests => "requests",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub opacity: f32,
    pub strike_through: bool,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            strike_through: false,
        }
    }
}

/// Content of one list element, fully re-derived on every render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedElement {
    /// Leading glyph shown when there is no icon
    pub glyph: Option<&'static str>,
    pub icon_url: Option<String>,
    pub label: String,
    /// Small trailing annotation, e.g. a masked phone number
    pub annotation: Option<String>,
    pub style: ElementStyle,
}

/// Sink for everything the overlay shows. Implementations must not block.
pub trait DisplayPort: Send + Sync {
    /// Append a transient notice.
    fn toast(&self, text: &str);

    /// Replace the connection status line.
    fn set_status(&self, text: &str);

    /// Create the element for `id` in `list`, or replace its content in place.
    fn render(&self, list: ViewList, id: &str, element: &RenderedElement);

    /// Discard the element for `id` in `list`.
    fn remove(&self, list: ViewList, id: &str);
}
