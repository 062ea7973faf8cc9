use thiserror::Error as ThisError;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("title required")]
    TitleRequired,

    #[error("photo_url must be text")]
    PhotoUrlNotText,

    /// The body could not be decoded into a create request at all.
    #[error("{0}")]
    Malformed(String),
}
