use thiserror::Error;

/// A link that could not be constructed. Callers must not enqueue it.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("`{url}` is not a valid absolute URL: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("cannot resolve `{url}` against referrer `{referrer}`: {source}")]
    BadReferrer {
        url: String,
        referrer: String,
        source: url::ParseError,
    },
}

/// A token that is neither a status code, a wildcard pattern, nor `idk`.
#[derive(Error, Debug)]
#[error("invalid status code: {0}")]
pub struct StatusCodeError(pub String);

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("profile needs at least one root to start from")]
    NoRoots,

    #[error("invalid root `{url}`: {source}")]
    InvalidRoot {
        url: String,
        source: url::ParseError,
    },

    #[error("invalid glob pattern `{pattern}`: {source}")]
    InvalidGlob {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("profile `{0}` doesn't exist")]
    NotFound(String),

    #[error("profile `{0}` already exists")]
    AlreadyExists(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
