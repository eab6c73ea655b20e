//! Farmer mood check-in

use shared::{round_to, validate_free_text, EmotionDetection, MoodCheckIn};

use crate::config::SentimentConfig;
use crate::error::{AppError, AppResult};
use crate::external::SentimentClient;

/// Label returned when no cue words are found
pub const NEUTRAL: &str = "neutral";

const LEXICON: &[(&str, &[&str])] = &[
    (
        "anxious",
        &[
            "worried", "worry", "anxious", "nervous", "afraid", "scared", "uncertain", "stress",
            "stressed", "fear", "unsure", "panic",
        ],
    ),
    (
        "joy",
        &[
            "happy", "glad", "great", "good", "excited", "hopeful", "joy", "pleased", "wonderful",
            "love", "thankful", "grateful",
        ],
    ),
    (
        "anger",
        &[
            "angry", "furious", "mad", "annoyed", "frustrated", "hate", "unfair", "rage",
            "irritated", "fed",
        ],
    ),
    (
        "sadness",
        &[
            "sad", "tired", "lost", "hopeless", "down", "depressed", "lonely", "exhausted",
            "miserable", "crying",
        ],
    ),
];

/// Offline classifier matching cue words per emotion
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    /// Label with the most cue words; confidence is its share of all matches
    pub fn classify(&self, text: &str) -> EmotionDetection {
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        let counts: Vec<(&str, usize)> = LEXICON
            .iter()
            .map(|(label, cues)| {
                let hits = words.iter().filter(|w| cues.contains(&w.as_str())).count();
                (*label, hits)
            })
            .collect();
        let total: usize = counts.iter().map(|(_, hits)| hits).sum();

        // First label wins ties
        let best = counts
            .iter()
            .fold(None::<(&str, usize)>, |best, &(label, hits)| match best {
                Some((_, top)) if top >= hits => best,
                _ if hits > 0 => Some((label, hits)),
                _ => best,
            });

        match best {
            Some((label, hits)) => EmotionDetection {
                emotion: label.to_string(),
                confidence: round_to(hits as f64 / total as f64, 2),
            },
            None => EmotionDetection {
                emotion: NEUTRAL.to_string(),
                confidence: 0.5,
            },
        }
    }
}

/// Emotion classifier behind the mood check-in
#[derive(Clone)]
pub enum MoodClassifier {
    Remote(SentimentClient),
    Keyword(KeywordClassifier),
}

impl MoodClassifier {
    pub fn from_config(config: &SentimentConfig) -> Self {
        match &config.endpoint {
            Some(endpoint) => {
                tracing::info!("Using remote emotion classifier at {}", endpoint);
                MoodClassifier::Remote(SentimentClient::new(
                    endpoint.clone(),
                    config.api_key.clone(),
                ))
            }
            None => {
                tracing::info!("Using keyword emotion classifier");
                MoodClassifier::Keyword(KeywordClassifier)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MoodClassifier::Remote(_) => "remote",
            MoodClassifier::Keyword(_) => "keyword",
        }
    }

    pub async fn classify(&self, text: &str) -> AppResult<EmotionDetection> {
        match self {
            MoodClassifier::Remote(client) => client.classify(text).await,
            MoodClassifier::Keyword(classifier) => Ok(classifier.classify(text)),
        }
    }
}

/// Validate the text, classify it and attach the motivational message
pub async fn check_in(classifier: &MoodClassifier, text: &str) -> AppResult<MoodCheckIn> {
    validate_free_text(text).map_err(|e| AppError::validation("text", e))?;

    let detection = classifier.classify(text).await?;
    tracing::debug!(
        "Detected emotion {} ({})",
        detection.emotion,
        detection.confidence
    );
    Ok(MoodCheckIn::from(detection))
}
