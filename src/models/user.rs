use serde::{Deserialize, Serialize};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

/// Document in the "users" collection.
///
/// Relationship arrays hold `user_id` strings. Set semantics are enforced
/// by the services ($addToSet), not by the store itself.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub _id: Option<ObjectId>,
    pub user_id: String,  // PRIMARY IDENTIFIER
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub verification_token: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub looking_for: Vec<String>,
    #[serde(default)]
    pub profile_images: Vec<String>,
    /// Users this user has liked.
    #[serde(default)]
    pub liked: Vec<String>,
    /// Pending, unmatched likes only. Accepting a like moves the pair
    /// into `matches` and pulls it from here on both sides.
    #[serde(default)]
    pub received_likes: Vec<String>,
    #[serde(default)]
    pub matches: Vec<String>,
    #[serde(default)]
    pub created_at: Option<BsonDateTime>,
    #[serde(default)]
    pub updated_at: Option<BsonDateTime>,
}

/// Public projection of a user document. Never carries the password hash
/// or the verification token.
#[derive(Debug, Serialize, Clone, utoipa::ToSchema)]
pub struct ProfileInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub gender: Option<String>,
    pub description: Option<String>,
    pub preferences: Vec<String>,
    pub looking_for: Vec<String>,
    pub profile_images: Vec<String>,
    pub verified: bool,
}

impl From<User> for ProfileInfo {
    fn from(user: User) -> Self {
        ProfileInfo {
            id: user.user_id,
            name: user.name,
            email: user.email,
            gender: user.gender,
            description: user.description,
            preferences: user.preferences,
            looking_for: user.looking_for,
            profile_images: user.profile_images,
            verified: user.verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn minimal_document_gets_defaults() {
        // Documents written before the relationship arrays existed must
        // still deserialize.
        let doc = doc! {
            "user_id": "abc123",
            "name": "Ana",
            "email": "ana@example.com",
            "password_hash": "$2b$04$hash",
        };

        let user: User = mongodb::bson::from_document(doc).unwrap();
        assert!(!user.verified);
        assert!(user.verification_token.is_none());
        assert!(user.liked.is_empty());
        assert!(user.received_likes.is_empty());
        assert!(user.matches.is_empty());
        assert!(user.preferences.is_empty());
        assert!(user.profile_images.is_empty());
    }

    #[test]
    fn profile_info_hides_credentials() {
        let user = User {
            _id: None,
            user_id: "u1".to_string(),
            name: "Bruno".to_string(),
            email: "bruno@example.com".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            verification_token: Some("tok".to_string()),
            verified: true,
            gender: Some("male".to_string()),
            description: None,
            preferences: vec!["quiet".to_string()],
            looking_for: vec![],
            profile_images: vec![],
            liked: vec![],
            received_likes: vec![],
            matches: vec![],
            created_at: None,
            updated_at: None,
        };

        let profile = ProfileInfo::from(user);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("$2b$04$secret"));
        assert!(!json.contains("verification_token"));
        assert_eq!(profile.id, "u1");
    }
}
