//! Model client module for AI inference.

mod client;

pub use client::{
    MessageBuilder, ModelClient, ModelConfig, ModelError, ModelResponse, DEFAULT_BASE_URL,
    DEFAULT_MAX_RETRIES, DEFAULT_MODEL_NAME, DEFAULT_RETRY_DELAY_SECS,
};
