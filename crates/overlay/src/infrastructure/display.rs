//! Terminal rendering of the overlay.
//!
//! Every display call becomes one line on stdout, prefixed with the region it
//! targets. Lists are rendered incrementally: a line per upsert or removal.

use std::io::Write;

use crate::ports::outbound::{DisplayPort, RenderedElement, ViewList};

#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl TerminalDisplay {
    pub fn new() -> Self {
        Self
    }

    fn line(&self, region: &str, text: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "[{region}] {text}") {
            tracing::trace!(error = %e, "stdout write failed");
        }
    }
}

impl DisplayPort for TerminalDisplay {
    fn toast(&self, text: &str) {
        self.line("toast", text);
    }

    fn set_status(&self, text: &str) {
        self.line("status", text);
    }

    fn render(&self, list: ViewList, id: &str, element: &RenderedElement) {
        self.line(list.as_str(), &format!("{id} = {}", format_element(element)));
    }

    fn remove(&self, list: ViewList, id: &str) {
        self.line(list.as_str(), &format!("{id} removed"));
    }
}

/// One-line text form of a list element.
pub fn format_element(element: &RenderedElement) -> String {
    let mut text = String::new();

    match (&element.icon_url, element.glyph) {
        (Some(icon), _) => {
            text.push('<');
            text.push_str(icon);
            text.push_str("> ");
        }
        (None, Some(glyph)) => {
            text.push_str(glyph);
            text.push(' ');
        }
        (None, None) => {}
    }

    if element.style.strike_through {
        text.push_str("~~");
        text.push_str(&element.label);
        text.push_str("~~");
    } else {
        text.push_str(&element.label);
    }

    if let Some(annotation) = &element.annotation {
        text.push_str(" (");
        text.push_str(annotation);
        text.push(')');
    }

    if element.style.opacity < 1.0 {
        text.push_str(&format!(" [{:.0}%]", element.style.opacity * 100.0));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::ElementStyle;

    fn element(label: &str) -> RenderedElement {
        RenderedElement {
            glyph: None,
            icon_url: None,
            label: label.to_string(),
            annotation: None,
            style: ElementStyle::default(),
        }
    }

    #[test]
    fn glyph_prefixes_label() {
        let el = RenderedElement {
            glyph: Some("🗡️"),
            ..element("Slay dragon — 2/5")
        };
        assert_eq!(format_element(&el), "🗡️ Slay dragon — 2/5");
    }

    #[test]
    fn icon_replaces_glyph() {
        let el = RenderedElement {
            glyph: Some("🗡️"),
            icon_url: Some("/icons/dragon.png".into()),
            ..element("Slay dragon — 2/5")
        };
        assert_eq!(format_element(&el), "</icons/dragon.png> Slay dragon — 2/5");
    }

    #[test]
    fn completed_items_are_struck_and_dimmed() {
        let el = RenderedElement {
            style: ElementStyle {
                opacity: 0.75,
                strike_through: true,
            },
            ..element("Slay dragon — 5/5")
        };
        assert_eq!(format_element(&el), "~~Slay dragon — 5/5~~ [75%]");
    }

    #[test]
    fn annotation_is_parenthesised() {
        let el = RenderedElement {
            annotation: Some("***-***-1234".into()),
            ..element("📞 main — call me")
        };
        assert_eq!(format_element(&el), "📞 main — call me (***-***-1234)");
    }
}
