//! Inbound event feed messages.
//!
//! Every frame on the feed is a JSON envelope `{ "type": "...", "data": { ... } }`.
//! The envelope is decoded in two steps: first the raw envelope, then the `data`
//! object into the payload struct selected by `type`. A missing or non-object
//! `data` decodes as an empty object so payload defaults apply.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::lenient;

// =============================================================================
// Message type tags
// =============================================================================

pub const DONATION: &str = "DONATION";
pub const ABILITY_FIRE: &str = "ABILITY_FIRE";
pub const TTS_PLAY: &str = "TTS_PLAY";
pub const QUEST_UPSERT: &str = "QUEST_UPSERT";
pub const QUEST_ADD: &str = "QUEST_ADD";
pub const QUEST_REMOVE: &str = "QUEST_REMOVE";
pub const REQUEST_ADD: &str = "REQUEST_ADD";
pub const REQUEST_REMOVE: &str = "REQUEST_REMOVE";

/// Messages pushed from the backend to overlay clients
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Donation(DonationData),
    AbilityFire(AbilityFireData),
    TtsPlay(TtsPlayData),
    QuestUpsert(QuestData),
    /// Same shape as `QuestUpsert`; the receiver fills in progress/target defaults
    QuestAdd(QuestData),
    QuestRemove(RemoveData),
    RequestAdd(RequestData),
    RequestRemove(RemoveData),
}

impl InboundMessage {
    /// The wire tag this message was decoded from.
    pub fn kind(&self) -> &'static str {
        match self {
            InboundMessage::Donation(_) => DONATION,
            InboundMessage::AbilityFire(_) => ABILITY_FIRE,
            InboundMessage::TtsPlay(_) => TTS_PLAY,
            InboundMessage::QuestUpsert(_) => QUEST_UPSERT,
            InboundMessage::QuestAdd(_) => QUEST_ADD,
            InboundMessage::QuestRemove(_) => QUEST_REMOVE,
            InboundMessage::RequestAdd(_) => REQUEST_ADD,
            InboundMessage::RequestRemove(_) => REQUEST_REMOVE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DonationData {
    /// Integer cents
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub donor: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub msg: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AbilityFireData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cooldown_ms: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sfx_url: Option<String>,
    /// 0..=1, clamped by the receiver
    #[serde(default, deserialize_with = "lenient::number")]
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TtsPlayData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub text: Option<String>,
    /// Case-insensitive substring of the preferred voice name
    #[serde(default, deserialize_with = "lenient::text")]
    pub voice: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuestData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub progress: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub target: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub icon_url: Option<String>,
}

impl QuestData {
    /// Defaults applied to `QUEST_ADD`: a zero, NaN or missing progress becomes 0,
    /// a zero, NaN or missing target becomes 1.
    pub fn with_add_defaults(mut self) -> Self {
        if !self.progress.is_some_and(is_truthy) {
            self.progress = Some(0.0);
        }
        if !self.target.is_some_and(is_truthy) {
            self.target = Some(1.0);
        }
        self
    }
}

fn is_truthy(n: f64) -> bool {
    n != 0.0 && !n.is_nan()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub board: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub masked_phone: Option<String>,
}

/// Payload of `QUEST_REMOVE` / `REQUEST_REMOVE`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoveData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
}

// =============================================================================
// Decoding
// =============================================================================

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("frame is not a JSON envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("frame is JSON but not an object")]
    NotAnObject,

    #[error("envelope has no type")]
    MissingType,

    #[error("unrecognized message type: {0}")]
    UnknownType(String),

    #[error("invalid {kind} payload: {source}")]
    Payload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode one text frame from the feed.
pub fn decode(frame: &str) -> Result<InboundMessage, DecodeError> {
    let Value::Object(mut envelope) = serde_json::from_str::<Value>(frame)? else {
        return Err(DecodeError::NotAnObject);
    };

    let kind = match envelope.remove("type") {
        Some(Value::String(kind)) if !kind.is_empty() => kind,
        _ => return Err(DecodeError::MissingType),
    };

    let data = match envelope.remove("data") {
        Some(Value::Object(map)) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    let message = match kind.as_str() {
        DONATION => InboundMessage::Donation(payload(DONATION, data)?),
        ABILITY_FIRE => InboundMessage::AbilityFire(payload(ABILITY_FIRE, data)?),
        TTS_PLAY => InboundMessage::TtsPlay(payload(TTS_PLAY, data)?),
        QUEST_UPSERT => InboundMessage::QuestUpsert(payload(QUEST_UPSERT, data)?),
        QUEST_ADD => InboundMessage::QuestAdd(payload(QUEST_ADD, data)?),
        QUEST_REMOVE => InboundMessage::QuestRemove(payload(QUEST_REMOVE, data)?),
        REQUEST_ADD => InboundMessage::RequestAdd(payload(REQUEST_ADD, data)?),
        REQUEST_REMOVE => InboundMessage::RequestRemove(payload(REQUEST_REMOVE, data)?),
        _ => return Err(DecodeError::UnknownType(kind)),
    };

    Ok(message)
}

fn payload<T: DeserializeOwned>(kind: &'static str, data: Value) -> Result<T, DecodeError> {
    serde_json::from_value(data).map_err(|source| DecodeError::Payload { kind, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_ability_fire() {
        let msg = decode(
            r#"{"type":"ABILITY_FIRE","data":{"id":"trex","cooldown_ms":2500,"sfx_url":"/sfx/roar.mp3","volume":"0.5"}}"#,
        );
        let Ok(InboundMessage::AbilityFire(data)) = msg else {
            panic!("expected ABILITY_FIRE, got {msg:?}");
        };
        assert_eq!(data.id.as_deref(), Some("trex"));
        assert_eq!(data.cooldown_ms, Some(2500.0));
        assert_eq!(data.sfx_url.as_deref(), Some("/sfx/roar.mp3"));
        assert_eq!(data.volume, Some(0.5));
    }

    #[test]
    fn missing_data_decodes_as_empty_payload() {
        let msg = decode(r#"{"type":"DONATION"}"#);
        assert!(matches!(msg, Ok(InboundMessage::Donation(d)) if d == DonationData::default()));
    }

    #[test]
    fn non_object_data_decodes_as_empty_payload() {
        let msg = decode(r#"{"type":"REQUEST_REMOVE","data":"oops"}"#);
        assert!(matches!(msg, Ok(InboundMessage::RequestRemove(RemoveData { id: None }))));
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(decode("not json"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode("null"), Err(DecodeError::NotAnObject)));
        assert!(matches!(
            decode(r#"["DONATION",{"amount":500}]"#),
            Err(DecodeError::NotAnObject)
        ));
    }

    #[test]
    fn rejects_missing_or_empty_type() {
        assert!(matches!(
            decode(r#"{"data":{"id":"x"}}"#),
            Err(DecodeError::MissingType)
        ));
        assert!(matches!(
            decode(r#"{"type":"","data":{}}"#),
            Err(DecodeError::MissingType)
        ));
    }

    #[test]
    fn rejects_unknown_type() {
        let err = decode(r#"{"type":"CONFETTI","data":{}}"#);
        assert!(matches!(err, Err(DecodeError::UnknownType(t)) if t == "CONFETTI"));
    }

    #[test]
    fn quest_add_defaults_fill_zero_and_missing_fields() {
        let quest = QuestData {
            id: Some("q1".into()),
            target: Some(0.0),
            ..Default::default()
        }
        .with_add_defaults();
        assert_eq!(quest.progress, Some(0.0));
        assert_eq!(quest.target, Some(1.0));

        let kept = QuestData {
            progress: Some(3.0),
            target: Some(5.0),
            ..Default::default()
        }
        .with_add_defaults();
        assert_eq!(kept.progress, Some(3.0));
        assert_eq!(kept.target, Some(5.0));
    }

    #[test]
    fn kind_round_trips_the_wire_tag() {
        let msg = decode(r#"{"type":"QUEST_ADD","data":{"id":"q"}}"#);
        assert!(matches!(msg, Ok(ref m) if m.kind() == QUEST_ADD));
    }
}
