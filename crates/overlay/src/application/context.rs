use std::sync::Arc;

use crate::application::{AudioScheduler, CooldownGate, SpeechAnnouncer, ViewStateMap};
use crate::ports::outbound::{AudioPort, ClockPort, DisplayPort, SpeechEnginePort, ViewList};

/// Ports the overlay core runs against.
pub struct OverlayDeps {
    pub audio: Arc<dyn AudioPort>,
    pub speech: Arc<dyn SpeechEnginePort>,
    pub display: Arc<dyn DisplayPort>,
    pub clock: Arc<dyn ClockPort>,
}

/// All mutable overlay state. Owned by the [`EventRouter`](super::EventRouter);
/// nothing else writes to it.
pub struct OverlayContext {
    pub cooldowns: CooldownGate,
    pub audio: AudioScheduler,
    pub speech: SpeechAnnouncer,
    pub quests: ViewStateMap,
    pub requests: ViewStateMap,
    pub display: Arc<dyn DisplayPort>,
}

impl OverlayContext {
    pub fn new(deps: OverlayDeps) -> Self {
        let OverlayDeps {
            audio,
            speech,
            display,
            clock,
        } = deps;

        Self {
            cooldowns: CooldownGate::new(clock),
            audio: AudioScheduler::new(audio),
            speech: SpeechAnnouncer::new(speech),
            quests: ViewStateMap::new(ViewList::Quests),
            requests: ViewStateMap::new(ViewList::Requests),
            display,
        }
    }
}
