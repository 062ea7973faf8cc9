use crate::error::ValidationError;
use movies_schema::{MovieCreateRequest, NewMovie};
use serde_json::Value;

/// Checks a create request and turns it into the row to insert.
///
/// The title is stored trimmed. `year` and `overview` pass through untouched.
pub fn validate_create(request: MovieCreateRequest) -> Result<NewMovie, ValidationError> {
    let title = request.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }

    let photo_url = match request.photo_url {
        None | Some(Value::Null) => None,
        Some(Value::String(url)) => Some(url),
        Some(_) => return Err(ValidationError::PhotoUrlNotText),
    };

    Ok(NewMovie {
        title: title.to_string(),
        year: request.year,
        overview: request.overview,
        photo_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(title: Option<&str>, photo_url: Option<Value>) -> MovieCreateRequest {
        MovieCreateRequest {
            title: title.map(str::to_string),
            photo_url,
            ..MovieCreateRequest::default()
        }
    }

    #[test]
    fn blank_or_missing_titles_are_rejected() {
        for title in [None, Some(""), Some("   "), Some("\t\n")] {
            assert_eq!(
                validate_create(request(title, None)),
                Err(ValidationError::TitleRequired),
                "title {title:?} should be rejected"
            );
        }
    }

    #[test]
    fn title_is_trimmed_and_other_fields_pass_through() {
        let req = MovieCreateRequest {
            title: Some("  Inception ".to_string()),
            year: Some(2010),
            overview: Some(" A mind-bending heist. ".to_string()),
            photo_url: None,
        };
        let movie = validate_create(req).expect("valid");
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.year, Some(2010));
        assert_eq!(movie.overview.as_deref(), Some(" A mind-bending heist. "));
        assert!(!movie.has_photo_url());
    }

    #[test]
    fn non_text_photo_urls_are_rejected() {
        for photo_url in [json!(42), json!(true), json!(["a"]), json!({ "u": "x" })] {
            assert_eq!(
                validate_create(request(Some("Dune"), Some(photo_url))),
                Err(ValidationError::PhotoUrlNotText)
            );
        }
    }

    #[test]
    fn text_or_null_photo_urls_are_accepted() {
        let movie = validate_create(request(Some("Dune"), Some(json!("http://x/y.jpg")))).unwrap();
        assert_eq!(movie.photo_url.as_deref(), Some("http://x/y.jpg"));

        let movie = validate_create(request(Some("Dune"), Some(Value::Null))).unwrap();
        assert!(movie.photo_url.is_none());
    }
}
