pub mod config;
pub mod continuous;
pub mod currency;

pub use config::ContinuousQueryConfig;
pub use continuous::{
    fetch_all_pages, get_continuous_query_code, send_continuous_query,
    send_continuous_query_with, ContinuationState, MAX_PAGES,
};
pub use currency::{get_currency_code_from_market_code, market_codes_for_currency};
