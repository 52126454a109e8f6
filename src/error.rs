use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("You can only upload a maximum of {max} images.")]
    TooManyImages { selected: usize, max: usize },

    #[error("price must be a non-negative number: {0:?}")]
    InvalidPrice(String),

    #[error("move-in date must look like YYYY-MM-DD: {0:?}")]
    InvalidMoveInDate(String),

    #[error("a submission is already in flight")]
    SubmitInFlight,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}
