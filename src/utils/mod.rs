//! Pure validation helpers shared by the resource modules.

use serde_json::Value;
use time::{format_description::FormatItem, macros::format_description, Date};

/// Keys a book payload must carry at creation and update.
pub const REQUIRED_BOOK_FIELDS: [&str; 8] = [
    "title",
    "author",
    "genre",
    "description",
    "publication_date",
    "availability_status",
    "edition",
    "summary",
];

const PUBLICATION_DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Return the required keys absent from `payload`. Only key presence is
/// checked; value validation happens separately. A non-object payload
/// reports every field missing.
pub fn missing_book_fields(payload: &Value) -> Vec<&'static str> {
    match payload.as_object() {
        Some(map) => REQUIRED_BOOK_FIELDS
            .iter()
            .copied()
            .filter(|key| !map.contains_key(*key))
            .collect(),
        None => REQUIRED_BOOK_FIELDS.to_vec(),
    }
}

/// Strict `YYYY-MM-DD` parse of a publication date.
pub fn parse_publication_date(raw: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw, PUBLICATION_DATE_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn complete_payload_has_no_missing_fields() {
        let payload = json!({
            "title": "Book 1",
            "author": "Author 1",
            "genre": "Fiction",
            "description": "d",
            "publication_date": "2024-10-31",
            "availability_status": "available",
            "edition": "1st Edition",
            "summary": "s",
        });
        assert!(missing_book_fields(&payload).is_empty());
    }

    #[test]
    fn absent_keys_are_reported_in_declaration_order() {
        let payload = json!({
            "title": "Book 1",
            "genre": "Fiction",
            "description": "d",
            "publication_date": "2024-10-31",
            "edition": "1st Edition",
            "summary": "s",
        });
        assert_eq!(
            missing_book_fields(&payload),
            vec!["author", "availability_status"]
        );
    }

    #[test]
    fn null_values_still_count_as_present() {
        // Presence is about keys, not values; stage validation stops there.
        let payload = json!({
            "title": null,
            "author": null,
            "genre": null,
            "description": null,
            "publication_date": null,
            "availability_status": null,
            "edition": null,
            "summary": null,
        });
        assert!(missing_book_fields(&payload).is_empty());
    }

    #[test]
    fn non_object_payload_reports_every_field() {
        assert_eq!(missing_book_fields(&json!([1, 2])).len(), 8);
        assert_eq!(missing_book_fields(&json!("nope")).len(), 8);
    }

    #[test]
    fn valid_dates_parse() {
        assert!(parse_publication_date("2024-10-31").is_ok());
        assert!(parse_publication_date("1999-01-01").is_ok());
    }

    #[test]
    fn malformed_dates_are_rejected() {
        assert!(parse_publication_date("31-10-2024").is_err());
        assert!(parse_publication_date("2024/10/31").is_err());
        assert!(parse_publication_date("2024-13-01").is_err());
        assert!(parse_publication_date("not a date").is_err());
        assert!(parse_publication_date("").is_err());
    }
}
