use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound body of `POST /api/movies`.
///
/// Every field is optional at the decoding layer; required-ness and the text check on
/// `photo_url` are enforced by the validator so they can report their own messages.
/// `photo_url` stays a raw JSON value for that reason. An explicit `null` decodes to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MovieCreateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub photo_url: Option<Value>,
}

/// Insert payload sent to the database. Unset fields are not sent at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMovie {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl NewMovie {
    pub fn has_photo_url(&self) -> bool {
        self.photo_url.is_some()
    }

    /// Same payload with the `photo_url` column dropped.
    pub fn without_photo_url(&self) -> Self {
        Self {
            photo_url: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_photo_url_decodes_as_absent() {
        let req: MovieCreateRequest =
            serde_json::from_value(json!({ "title": "Dune", "photo_url": null })).unwrap();
        assert!(req.photo_url.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res = serde_json::from_value::<MovieCreateRequest>(json!({ "title": "Dune", "id": 3 }));
        assert!(res.is_err());
    }

    #[test]
    fn insert_payload_skips_unset_fields() {
        let movie = NewMovie {
            title: "Dune".to_string(),
            year: None,
            overview: None,
            photo_url: Some("http://x/y.jpg".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&movie).unwrap(),
            json!({ "title": "Dune", "photo_url": "http://x/y.jpg" })
        );
        assert_eq!(
            serde_json::to_value(movie.without_photo_url()).unwrap(),
            json!({ "title": "Dune" })
        );
    }
}
