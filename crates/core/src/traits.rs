use crate::models::*;
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised by the client helpers themselves.
///
/// Failures of an injected request function are not wrapped in this type;
/// they reach the caller in the caller's own error type.
#[derive(Debug, thiserror::Error)]
pub enum KisError {
    #[error("invalid market code: {0}")]
    InvalidMarketCode(String),
    #[error("missing {section} field: {key}")]
    MissingField { section: &'static str, key: String },
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Replay exhausted after {0} pages")]
    ReplayExhausted(usize),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Tabular
// ---------------------------------------------------------------------------

/// A decoded page that can be stacked row-wise with pages of the same kind.
pub trait Tabular: Sized {
    /// Concatenate pages in order.
    fn concat(pages: Vec<Self>) -> Self;

    /// Number of rows, used for logging.
    fn row_count(&self) -> usize;
}

impl<T> Tabular for Vec<T> {
    fn concat(pages: Vec<Self>) -> Self {
        pages.into_iter().flatten().collect()
    }

    fn row_count(&self) -> usize {
        self.len()
    }
}

// ---------------------------------------------------------------------------
// Page Source
// ---------------------------------------------------------------------------

/// Issues one page of a list-style query.
///
/// `extra_header` and `extra_param` carry the continuation protocol and are
/// merged by the implementation into its own headers and query parameters.
#[async_trait]
pub trait PageSource: Send {
    type Error: From<KisError> + Send;

    async fn fetch_page(
        &mut self,
        extra_header: &Json,
        extra_param: &Json,
    ) -> Result<ApiResponse, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(Vec<ApiResponse>);

    #[async_trait]
    impl PageSource for Fixed {
        type Error = KisError;

        async fn fetch_page(
            &mut self,
            _extra_header: &Json,
            _extra_param: &Json,
        ) -> Result<ApiResponse, KisError> {
            self.0.pop().ok_or(KisError::ReplayExhausted(0))
        }
    }

    #[test]
    fn test_vec_concat_preserves_order() {
        let out = <Vec<i32> as Tabular>::concat(vec![vec![1, 2], vec![], vec![3]]);
        assert_eq!(out, vec![1, 2, 3]);
        assert_eq!(out.row_count(), 3);
    }

    #[test]
    fn test_error_messages() {
        let err = KisError::InvalidMarketCode("XXXX".into());
        assert_eq!(err.to_string(), "invalid market code: XXXX");

        let err = KisError::MissingField {
            section: "body",
            key: "ctx_area_fk100".into(),
        };
        assert_eq!(err.to_string(), "missing body field: ctx_area_fk100");
    }

    #[tokio::test]
    async fn test_page_source_object_usage() {
        let mut header = Json::new();
        header.insert("tr_cont".into(), json!("E"));
        let mut source = Fixed(vec![ApiResponse::new(header, Json::new())]);

        let res = source.fetch_page(&Json::new(), &Json::new()).await.unwrap();
        assert_eq!(res.header_value("tr_cont").unwrap(), "E");
        assert!(source.fetch_page(&Json::new(), &Json::new()).await.is_err());
    }
}
