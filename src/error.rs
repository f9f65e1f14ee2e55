use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("XAI_API_KEY is not set; export it or add it to .env")]
    MissingApiKey,
    #[error("config invalid or unreadable: {0}")]
    InvalidConfig(String),
    #[error("summary API returned status {status}: {body}")]
    ApiStatus { status: u16, body: String },
    #[error("summary API response malformed: {0}")]
    MalformedResponse(String),
    #[error("archive entry already exists: {0}")]
    EntryExists(String),
}
