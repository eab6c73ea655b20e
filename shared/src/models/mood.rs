//! Farmer mood check-in models

use serde::{Deserialize, Serialize};

/// Label and confidence returned by an emotion classifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmotionDetection {
    pub emotion: String,
    pub confidence: f64,
}

/// How the motivational message should be shown
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageTone {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MotivationalMessage {
    pub tone: MessageTone,
    pub text: String,
}

/// Message for the three labels the dashboard reacts to; `None` otherwise
pub fn motivational_message(emotion: &str) -> Option<MotivationalMessage> {
    let (tone, text) = match emotion {
        "anxious" => (
            MessageTone::Info,
            "You're not alone. Let's look at your crop health and find a way forward.",
        ),
        "joy" => (
            MessageTone::Success,
            "Great to hear! Let’s keep that momentum going.",
        ),
        "anger" => (
            MessageTone::Warning,
            "Let’s channel that energy into smart decisions. We’ve got your back.",
        ),
        _ => return None,
    };

    Some(MotivationalMessage {
        tone,
        text: text.to_string(),
    })
}

/// Result of a mood check-in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodCheckIn {
    pub emotion: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<MotivationalMessage>,
}

impl From<EmotionDetection> for MoodCheckIn {
    fn from(detection: EmotionDetection) -> Self {
        let message = motivational_message(&detection.emotion);
        Self {
            emotion: detection.emotion,
            confidence: detection.confidence,
            message,
        }
    }
}
