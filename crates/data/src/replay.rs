use async_trait::async_trait;
use kis_core::{ApiResponse, Json, KisError, PageSource};
use std::path::Path;
use tracing::debug;

/// A [`PageSource`] that serves previously recorded responses in order.
///
/// The recording is a JSON array of `{ "header": {...}, "body": {...} }`
/// objects. Every request's `(extra_header, extra_param)` is kept so callers
/// can check what would have been sent to the server.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    pages: Vec<ApiResponse>,
    requests: Vec<(Json, Json)>,
}

impl ReplaySource {
    pub fn new(pages: Vec<ApiResponse>) -> Self {
        Self {
            pages,
            requests: Vec::new(),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, KisError> {
        let pages: Vec<ApiResponse> = serde_json::from_str(s)?;
        Ok(Self::new(pages))
    }

    pub fn load(path: &Path) -> Result<Self, KisError> {
        let file = std::fs::File::open(path)?;
        let pages: Vec<ApiResponse> = serde_json::from_reader(std::io::BufReader::new(file))?;
        debug!(path = %path.display(), pages = pages.len(), "Loaded recorded responses");
        Ok(Self::new(pages))
    }

    /// Recorded pages not yet served.
    pub fn remaining(&self) -> usize {
        self.pages.len().saturating_sub(self.requests.len())
    }

    /// Requests received so far, as `(extra_header, extra_param)`.
    pub fn requests(&self) -> &[(Json, Json)] {
        &self.requests
    }
}

#[async_trait]
impl PageSource for ReplaySource {
    type Error = KisError;

    async fn fetch_page(
        &mut self,
        extra_header: &Json,
        extra_param: &Json,
    ) -> Result<ApiResponse, KisError> {
        let idx = self.requests.len();
        let page = self
            .pages
            .get(idx)
            .cloned()
            .ok_or(KisError::ReplayExhausted(self.pages.len()))?;
        self.requests.push((extra_header.clone(), extra_param.clone()));
        Ok(page)
    }
}
