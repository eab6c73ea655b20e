//! External API integrations

pub mod sentiment;

pub use sentiment::SentimentClient;
