/// Errors raised while fetching a job posting page.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Access blocked by the site (HTTP 403): {0}")]
    Blocked(String),

    #[error("Job posting not found (HTTP 404): {0}")]
    NotFound(String),

    #[error("Rate limited by the site (HTTP 429): {0}")]
    RateLimited(String),

    #[error("Unexpected HTTP status {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}
