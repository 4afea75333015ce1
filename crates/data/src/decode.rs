use kis_core::{ApiResponse, KisError, Table};
use serde_json::Value;

/// Decode `body[key]` into a table.
///
/// List endpoints return an array of records; summary outputs (`output2` on
/// most balance queries) are a single object and become one row.
pub fn decode_output(res: &ApiResponse, key: &str) -> Result<Table, KisError> {
    match res.body_value(key)? {
        Value::Array(records) => Table::from_records(records),
        Value::Object(record) => {
            let mut table = Table::default();
            table.push_record(record);
            Ok(table)
        }
        Value::Null => Ok(Table::default()),
        other => Err(KisError::Decode(format!(
            "body field {} is neither a record nor a list of records: {}",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: Value) -> ApiResponse {
        serde_json::from_value(json!({ "header": { "tr_cont": "E" }, "body": body })).unwrap()
    }

    #[test]
    fn test_decode_record_list() {
        let res = response(json!({
            "output1": [
                { "ovrs_pdno": "AAPL", "ovrs_cblc_qty": "3" },
                { "ovrs_pdno": "TSLA", "ovrs_cblc_qty": "1" },
            ]
        }));
        let table = decode_output(&res, "output1").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "ovrs_pdno"), Some(&json!("TSLA")));
    }

    #[test]
    fn test_decode_single_record() {
        let res = response(json!({ "output2": { "tot_evlu_pfls_amt": "1200" } }));
        let table = decode_output(&res, "output2").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.columns(), ["tot_evlu_pfls_amt"]);
    }

    #[test]
    fn test_decode_empty_list() {
        let res = response(json!({ "output1": [] }));
        assert!(decode_output(&res, "output1").unwrap().is_empty());
    }

    #[test]
    fn test_decode_missing_key() {
        let res = response(json!({}));
        let err = decode_output(&res, "output1").unwrap_err();
        assert!(matches!(err, KisError::MissingField { section: "body", .. }));
    }

    #[test]
    fn test_decode_scalar_rejected() {
        let res = response(json!({ "output1": "oops" }));
        assert!(matches!(
            decode_output(&res, "output1"),
            Err(KisError::Decode(_))
        ));
    }
}
