//! Schema validation helpers – compiled into WASM.

use jsonschema::JSONSchema;
use lazy_static::lazy_static;
use serde_json::Value;

use crate::error::AppError;

lazy_static! {
    static ref FEED_PAGE_SCHEMA: Result<JSONSchema, String> = {
        // At compile-time embed the schema JSON string.
        let raw = include_str!("schema/feed_page_schema.json");
        serde_json::from_str::<Value>(raw)
            .map_err(|e| e.to_string())
            .and_then(|parsed| JSONSchema::compile(&parsed).map_err(|e| e.to_string()))
    };
}

/// Validate a raw feed response against the *FeedPage* schema.
pub fn validate_feed_page(value: &Value) -> Result<(), AppError> {
    let schema = FEED_PAGE_SCHEMA
        .as_ref()
        .map_err(|e| AppError::Config(format!("feed page schema: {}", e)))?;

    schema.validate(value).map_err(|errors| {
        let details: Vec<String> = errors
            .map(|err| format!("{} at '{}'", err, err.instance_path))
            .collect();
        AppError::InvalidResponse(details.join("; "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_product_and_user_pages() {
        let products = json!({
            "products": [{ "id": 1, "title": "Phone", "price": 9.5 }],
            "total": 194, "skip": 0, "limit": 10
        });
        assert!(validate_feed_page(&products).is_ok());

        let users = json!({
            "users": [{ "id": 1, "firstName": "A", "lastName": "B", "username": "ab" }],
            "total": 1, "skip": 0, "limit": 10
        });
        assert!(validate_feed_page(&users).is_ok());
    }

    #[test]
    fn rejects_malformed_pages() {
        let missing_total = json!({ "products": [], "skip": 0, "limit": 10 });
        assert!(matches!(
            validate_feed_page(&missing_total),
            Err(AppError::InvalidResponse(_))
        ));

        let no_items = json!({ "total": 0, "skip": 0, "limit": 10 });
        assert!(validate_feed_page(&no_items).is_err());

        let bad_item = json!({
            "products": [{ "id": "one", "title": "Phone" }],
            "total": 1, "skip": 0, "limit": 10
        });
        assert!(validate_feed_page(&bad_item).is_err());

        let negative = json!({ "products": [], "total": -1, "skip": 0, "limit": 10 });
        assert!(validate_feed_page(&negative).is_err());
    }
}
