//! Inbound message router.
//!
//! Decodes each frame and dispatches it to exactly one handler. The feed is a
//! best-effort live view: anything that does not decode, has no type, or has a
//! type we do not know is dropped without side effects.

use overlay_protocol::{
    decode, AbilityFireData, Catalog, DonationData, InboundMessage, TtsPlayData,
};

use crate::application::catalog::preload_catalog;
use crate::application::{OverlayContext, DEFAULT_COOLDOWN_MS};

pub struct EventRouter {
    ctx: OverlayContext,
}

impl EventRouter {
    pub fn new(ctx: OverlayContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &OverlayContext {
        &self.ctx
    }

    /// Decode and dispatch one raw text frame. Returns whether it was dispatched.
    pub fn handle_frame(&mut self, frame: &str) -> bool {
        match decode(frame) {
            Ok(message) => {
                self.dispatch(message);
                true
            }
            Err(e) => {
                tracing::trace!(error = %e, "dropping inbound frame");
                false
            }
        }
    }

    pub fn dispatch(&mut self, message: InboundMessage) {
        tracing::debug!(kind = message.kind(), "dispatching");
        let ctx = &mut self.ctx;
        let display = ctx.display.as_ref();

        match message {
            InboundMessage::Donation(data) => display.toast(&donation_notice(&data)),
            InboundMessage::AbilityFire(data) => fire_ability(ctx, data),
            InboundMessage::TtsPlay(TtsPlayData { text, voice }) => {
                ctx.speech
                    .speak(text.as_deref(), voice.as_deref(), ctx.display.as_ref())
            }
            InboundMessage::QuestUpsert(quest) => {
                ctx.quests.upsert(&quest, display);
            }
            InboundMessage::QuestAdd(quest) => {
                ctx.quests.upsert(&quest.with_add_defaults(), display);
            }
            InboundMessage::QuestRemove(data) => {
                if let Some(id) = data.id {
                    ctx.quests.remove(&id, display);
                }
            }
            InboundMessage::RequestAdd(request) => {
                ctx.requests.upsert(&request, display);
            }
            InboundMessage::RequestRemove(data) => {
                if let Some(id) = data.id {
                    ctx.requests.remove(&id, display);
                }
            }
        }
    }

    /// Warm the sound cache from the catalog fetched at startup.
    pub fn apply_catalog(&mut self, catalog: &Catalog) -> usize {
        let ctx = &mut self.ctx;
        preload_catalog(&mut ctx.audio, catalog, ctx.display.as_ref())
    }
}

fn fire_ability(ctx: &mut OverlayContext, data: AbilityFireData) {
    let Some(id) = data.id else {
        tracing::trace!("ignoring ability fire without id");
        return;
    };

    // the backend sends 0 for abilities without a configured cooldown
    let cooldown_ms = data
        .cooldown_ms
        .filter(|c| *c != 0.0)
        .unwrap_or(DEFAULT_COOLDOWN_MS as f64);
    if !ctx.cooldowns.try_fire(&id, cooldown_ms) {
        return;
    }

    match data.sfx_url {
        Some(url) => ctx.audio.play(&id, &url, data.volume),
        None => ctx.audio.beep(),
    }
}

fn donation_notice(data: &DonationData) -> String {
    let donor = data.donor.as_deref().unwrap_or("Anonymous");
    let dollars = format_cents(data.amount);
    match data.msg.as_deref() {
        Some(msg) => format!("💸 {donor} donated ${dollars} — {msg}"),
        None => format!("💸 {donor} donated ${dollars}"),
    }
}

/// Integer cents to a two-decimal dollar string; unusable amounts are zero.
pub fn format_cents(cents: Option<f64>) -> String {
    let cents = cents.filter(|c| c.is_finite()).unwrap_or(0.0);
    // adding 0.0 folds -0.0 into 0.0
    format!("{:.2}", cents / 100.0 + 0.0)
}
