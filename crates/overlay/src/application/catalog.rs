//! Startup sound preloading from the backend catalog.

use overlay_protocol::Catalog;

use crate::application::AudioScheduler;
use crate::ports::outbound::DisplayPort;

/// Preload every catalog ability that has both an id and a sound.
///
/// Returns the number of sounds now cached and posts a notice when it is
/// non-zero.
pub fn preload_catalog(
    audio: &mut AudioScheduler,
    catalog: &Catalog,
    display: &dyn DisplayPort,
) -> usize {
    let mut count = 0;
    for ability in &catalog.abilities {
        let (Some(id), Some(url)) = (ability.id.as_deref(), ability.sfx_url.as_deref()) else {
            continue;
        };
        if audio.preload(id, url, ability.volume) {
            count += 1;
        }
    }

    if let Some(notice) = preload_notice(count) {
        display.toast(&notice);
    }
    tracing::info!(count, "preloaded ability sounds");
    count
}

fn preload_notice(count: usize) -> Option<String> {
    match count {
        0 => None,
        1 => Some("Preloading 1 sound…".to_string()),
        n => Some(format!("Preloading {n} sounds…")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::{RecordingAudio, RecordingDisplay};
    use overlay_protocol::CatalogAbility;
    use std::sync::Arc;

    fn ability(id: Option<&str>, url: Option<&str>, volume: Option<f64>) -> CatalogAbility {
        CatalogAbility {
            id: id.map(str::to_string),
            sfx_url: url.map(str::to_string),
            volume,
            ..Default::default()
        }
    }

    #[test]
    fn preloads_only_complete_abilities() {
        let audio = Arc::new(RecordingAudio::new());
        let mut sched = AudioScheduler::new(audio.clone());
        let display = RecordingDisplay::new();
        let catalog = Catalog {
            abilities: vec![
                ability(Some("trex"), Some("/sfx/roar.mp3"), Some(0.7)),
                ability(Some("goat"), None, Some(0.8)),
                ability(None, Some("/sfx/orphan.mp3"), None),
                ability(Some("horn"), Some("/sfx/horn.mp3"), None),
            ],
            quests: Vec::new(),
        };

        assert_eq!(preload_catalog(&mut sched, &catalog, &display), 2);
        assert!(sched.entry("trex").is_some());
        assert!(sched.entry("horn").is_some());
        assert!(sched.entry("goat").is_none());
        assert_eq!(display.toasts(), vec!["Preloading 2 sounds…".to_string()]);
    }

    #[test]
    fn singular_notice_and_silence_when_empty() {
        assert_eq!(preload_notice(1).as_deref(), Some("Preloading 1 sound…"));
        assert_eq!(preload_notice(0), None);

        let audio = Arc::new(RecordingAudio::new());
        let mut sched = AudioScheduler::new(audio);
        let display = RecordingDisplay::new();
        assert_eq!(preload_catalog(&mut sched, &Catalog::default(), &display), 0);
        assert!(display.toasts().is_empty());
    }
}
