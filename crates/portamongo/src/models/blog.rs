use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Sample document stored by the startup binary in the `Blog` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Blog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(default)]
    pub sub_title: String,
    #[serde(default)]
    pub text: String,
}

impl Blog {
    pub fn new(
        title: impl Into<String>,
        sub_title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            sub_title: sub_title.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portamongo_core::collection::CollectionDescriptor;

    #[test]
    fn test_blog_lives_in_blog_collection() {
        assert_eq!(CollectionDescriptor::of::<Blog>().name(), "Blog");
    }

    #[test]
    fn test_new_blog_serializes_without_id() {
        let blog = Blog::new("My First Blog", "How to insert data", "insert_one");

        let value = serde_json::to_value(&blog).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "Title": "My First Blog",
                "SubTitle": "How to insert data",
                "Text": "insert_one"
            })
        );
    }

    #[test]
    fn test_title_is_required() {
        let result = serde_json::from_value::<Blog>(serde_json::json!({ "Text": "body" }));
        assert!(result.is_err());
    }
}
