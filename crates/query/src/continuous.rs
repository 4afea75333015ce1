//! Continuous (multi-page) queries.
//!
//! List-style endpoints return at most one page per call. The response header
//! `tr_cont` says whether more data follows (`F` or `M`), and the body carries
//! two opaque context values that must be echoed back as query parameters on
//! the next call, together with `tr_cont: N` in the request header.

use kis_core::{ApiResponse, Json, KisError, Locale, PageSource, Tabular};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ContinuousQueryConfig;

/// Default cap on pages fetched by one continuous query.
pub const MAX_PAGES: usize = 100;

const TR_CONT: &str = "tr_cont";
const NEXT_PAGE: &str = "N";

/// Code naming the continuation parameters: `"100"` for domestic, `"200"` for overseas.
pub fn get_continuous_query_code(is_kr: bool) -> &'static str {
    Locale::from(is_kr).query_code()
}

/// Header and parameter values to send with the next page request.
#[derive(Debug, Clone, Default)]
pub struct ContinuationState {
    locale: Locale,
    pages: usize,
    extra_header: Json,
    extra_param: Json,
}

impl ContinuationState {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Default::default()
        }
    }

    /// Pages received so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn extra_header(&self) -> &Json {
        &self.extra_header
    }

    pub fn extra_param(&self) -> &Json {
        &self.extra_param
    }

    /// Record a received page. Returns `true` if the server has more data, in
    /// which case the header and parameters for the next request are updated.
    ///
    /// Context fields are only required on pages that announce more data.
    pub fn advance(&mut self, res: &ApiResponse) -> Result<bool, KisError> {
        self.pages += 1;

        let has_more = matches!(
            res.header_value(TR_CONT)?,
            Value::String(s) if s == "F" || s == "M"
        );
        if !has_more {
            return Ok(false);
        }

        let code = self.locale.query_code();
        let fk = res.body_value(&format!("ctx_area_fk{}", code))?.clone();
        let nk = res.body_value(&format!("ctx_area_nk{}", code))?.clone();
        self.extra_param.insert(format!("CTX_AREA_FK{}", code), fk);
        self.extra_param.insert(format!("CTX_AREA_NK{}", code), nk);

        self.extra_header = Json::new();
        self.extra_header
            .insert(TR_CONT.to_string(), Value::String(NEXT_PAGE.to_string()));

        Ok(true)
    }
}

/// Fetch every page of a list query and concatenate the decoded pages.
///
/// `request_function` receives `(extra_header, extra_param)`; its errors are
/// returned as-is. Stops on the server's end-of-data signal or silently after
/// [`MAX_PAGES`] pages.
pub fn send_continuous_query<T, E, F, D>(
    request_function: F,
    to_dataframe: D,
    is_kr: bool,
) -> Result<T, E>
where
    T: Tabular,
    E: From<KisError>,
    F: FnMut(&Json, &Json) -> Result<ApiResponse, E>,
    D: FnMut(&ApiResponse) -> Result<T, E>,
{
    let config = ContinuousQueryConfig::for_locale(Locale::from(is_kr));
    send_continuous_query_with(&config, request_function, to_dataframe)
}

/// [`send_continuous_query`] with an explicit page cap and locale.
pub fn send_continuous_query_with<T, E, F, D>(
    config: &ContinuousQueryConfig,
    mut request_function: F,
    mut to_dataframe: D,
) -> Result<T, E>
where
    T: Tabular,
    E: From<KisError>,
    F: FnMut(&Json, &Json) -> Result<ApiResponse, E>,
    D: FnMut(&ApiResponse) -> Result<T, E>,
{
    config.validate()?;

    let mut state = ContinuationState::new(config.locale);
    let mut outputs = Vec::new();
    let mut has_more = true;

    while has_more && state.pages() < config.max_pages {
        let res = request_function(state.extra_header(), state.extra_param())?;
        let output = to_dataframe(&res)?;
        debug!(page = state.pages() + 1, rows = output.row_count(), "Fetched page");
        outputs.push(output);
        has_more = state.advance(&res)?;
    }

    Ok(finish(&state, has_more, outputs))
}

/// Async counterpart of [`send_continuous_query_with`] over a [`PageSource`].
///
/// Pages are awaited one at a time, in order.
pub async fn fetch_all_pages<S, T, D>(
    source: &mut S,
    mut decode: D,
    config: &ContinuousQueryConfig,
) -> Result<T, S::Error>
where
    S: PageSource,
    T: Tabular,
    D: FnMut(&ApiResponse) -> Result<T, S::Error>,
{
    config.validate()?;

    let mut state = ContinuationState::new(config.locale);
    let mut outputs = Vec::new();
    let mut has_more = true;

    while has_more && state.pages() < config.max_pages {
        let res = source
            .fetch_page(state.extra_header(), state.extra_param())
            .await?;
        let output = decode(&res)?;
        debug!(page = state.pages() + 1, rows = output.row_count(), "Fetched page");
        outputs.push(output);
        has_more = state.advance(&res)?;
    }

    Ok(finish(&state, has_more, outputs))
}

fn finish<T: Tabular>(state: &ContinuationState, has_more: bool, outputs: Vec<T>) -> T {
    if has_more {
        debug!(pages = state.pages(), "Page cap reached with more data pending");
    }
    let table = T::concat(outputs);
    info!(pages = state.pages(), rows = table.row_count(), "Continuous query complete");
    table
}
