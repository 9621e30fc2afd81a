use crate::status::StatusCode;

/// What the fetch delegate reports for one URL.
///
/// HTTP error statuses are ordinary data here; `error` is reserved for
/// transport-level failures. `page` is present only when a page was
/// actually retrieved.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub status: StatusCode,
    pub error: Option<String>,
    pub page: Option<PageSnapshot>,
}

impl FetchOutcome {
    /// An HTTP response with no retrievable page (4xx, 5xx, unfollowed 3xx).
    pub fn status_only(status: StatusCode) -> Self {
        Self {
            status,
            error: None,
            page: None,
        }
    }

    /// A failure below HTTP: DNS, connect, timeout, TLS.
    pub fn transport_error(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::Unknown,
            error: Some(message.into()),
            page: None,
        }
    }

    pub fn with_page(status: StatusCode, page: PageSnapshot) -> Self {
        Self {
            status,
            error: None,
            page: Some(page),
        }
    }

    /// A fetch succeeded when it produced a page.
    pub fn is_success(&self) -> bool {
        self.page.is_some()
    }
}

/// A retrieved page: where it landed after redirects, the raw hrefs it
/// links to, and its body when it was an HTML document.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub final_url: String,
    pub links: Vec<String>,
    pub is_asset: bool,
    pub body: String,
}

impl PageSnapshot {
    pub fn html(
        final_url: impl Into<String>,
        links: Vec<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            final_url: final_url.into(),
            links,
            is_asset: false,
            body: body.into(),
        }
    }

    /// A non-HTML response body: images, archives, documents. Never
    /// expanded and never probed for selectors.
    pub fn asset(final_url: impl Into<String>) -> Self {
        Self {
            final_url: final_url.into(),
            links: Vec::new(),
            is_asset: true,
            body: String::new(),
        }
    }
}
