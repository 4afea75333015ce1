//! Overseas exchange code to settlement currency lookup.

use kis_core::{Currency, KisError};

const USD_MARKETS: &[&str] = &["NASD", "NAS", "NYSE", "AMEX", "AMS"];
const HKD_MARKETS: &[&str] = &["SEHK", "HKS"];
const CNY_MARKETS: &[&str] = &["SHAA", "SZAA", "SHS", "SZS"];
const JPY_MARKETS: &[&str] = &["TKSE", "TSE"];
const VND_MARKETS: &[&str] = &["HASE", "VNSE", "HSX", "HNX"];

/// Resolve the trading currency of an exchange code (case-insensitive).
///
/// Both the order-API codes (`NASD`, `SEHK`, ...) and the quote-API codes
/// (`NAS`, `HKS`, ...) are accepted.
pub fn get_currency_code_from_market_code(market_code: &str) -> Result<Currency, KisError> {
    let market_code = market_code.to_uppercase();
    match market_code.as_str() {
        "NASD" | "NAS" | "NYSE" | "AMEX" | "AMS" => Ok(Currency::Usd),
        "SEHK" | "HKS" => Ok(Currency::Hkd),
        "SHAA" | "SZAA" | "SHS" | "SZS" => Ok(Currency::Cny),
        "TKSE" | "TSE" => Ok(Currency::Jpy),
        "HASE" | "VNSE" | "HSX" | "HNX" => Ok(Currency::Vnd),
        _ => Err(KisError::InvalidMarketCode(market_code)),
    }
}

/// Exchange codes settled in `currency`, order-API codes first.
pub fn market_codes_for_currency(currency: Currency) -> &'static [&'static str] {
    match currency {
        Currency::Usd => USD_MARKETS,
        Currency::Hkd => HKD_MARKETS,
        Currency::Cny => CNY_MARKETS,
        Currency::Jpy => JPY_MARKETS,
        Currency::Vnd => VND_MARKETS,
    }
}
