#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("upstream status {0}")]
    UpstreamStatus(u16),

    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("failed to read upstream body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return FeedError::Timeout;
        }

        let message = crate::upstream::get_error(&err);
        if err.is_body() || err.is_decode() {
            FeedError::Body(message)
        } else {
            FeedError::Transport(message)
        }
    }
}
