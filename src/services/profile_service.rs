// ==================== DISCOVERY FEED ====================
// Candidate feed for a user: everyone except the requester, their matches
// and their likes, with optional gender and tag filters. The exclusion set
// is computed from the requester's relationship state.

use crate::{
    database::MongoDB,
    models::{ProfileInfo, User},
    utils::error::AppError,
};
use futures::stream::StreamExt;
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DiscoveryQuery {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub gender: Option<String>,
    /// Comma-separated tag list matched against candidates' looking_for.
    pub preferences: Option<String>,
    #[serde(rename = "lookingFor")]
    pub looking_for: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProfilesResponse {
    pub success: bool,
    pub profiles: Vec<ProfileInfo>,
    pub count: usize,
}

/// Builds the candidate filter. Gender is an equality constraint when
/// requested; the preferences and lookingFor params merge into a single
/// $in set against the candidate's looking_for tags.
pub fn discovery_filter(user: &User, query: &DiscoveryQuery) -> Document {
    let mut excluded: Vec<String> =
        Vec::with_capacity(1 + user.matches.len() + user.liked.len());
    excluded.push(user.user_id.clone());
    excluded.extend(user.matches.iter().cloned());
    excluded.extend(user.liked.iter().cloned());

    let mut filter = doc! { "user_id": { "$nin": excluded } };

    if let Some(gender) = query.gender.as_deref().filter(|g| !g.trim().is_empty()) {
        filter.insert("gender", gender);
    }

    let mut tags: Vec<String> = Vec::new();
    for raw in [query.preferences.as_deref(), query.looking_for.as_deref()]
        .into_iter()
        .flatten()
    {
        tags.extend(
            raw.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from),
        );
    }
    tags.sort();
    tags.dedup();

    if !tags.is_empty() {
        filter.insert("looking_for", doc! { "$in": tags });
    }

    filter
}

pub async fn list_profiles(
    db: &MongoDB,
    query: &DiscoveryQuery,
) -> Result<ProfilesResponse, AppError> {
    let collection = db.collection::<User>("users");

    let requester = collection
        .find_one(doc! { "user_id": &query.user_id })
        .await
        .map_err(|e| AppError::Database(format!("Database error: {}", e)))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let filter = discovery_filter(&requester, query);

    let mut cursor = collection
        .find(filter)
        .await
        .map_err(|e| AppError::Database(format!("Database error: {}", e)))?;

    let mut profiles: Vec<ProfileInfo> = Vec::new();
    while let Some(candidate) = cursor.next().await {
        match candidate {
            Ok(user) => profiles.push(ProfileInfo::from(user)),
            // A single undecodable legacy document should not kill the feed
            Err(e) => log::error!("❌ Skipping unreadable profile document: {}", e),
        }
    }

    let count = profiles.len();

    Ok(ProfilesResponse {
        success: true,
        profiles,
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    fn user_with_relations(matches: &[&str], liked: &[&str]) -> User {
        User {
            _id: None,
            user_id: "me".to_string(),
            name: "Me".to_string(),
            email: "me@example.com".to_string(),
            password_hash: String::new(),
            verification_token: None,
            verified: true,
            gender: None,
            description: None,
            preferences: vec![],
            looking_for: vec![],
            profile_images: vec![],
            liked: liked.iter().map(|s| s.to_string()).collect(),
            received_likes: vec![],
            matches: matches.iter().map(|s| s.to_string()).collect(),
            created_at: None,
            updated_at: None,
        }
    }

    fn query(gender: Option<&str>, preferences: Option<&str>, looking_for: Option<&str>) -> DiscoveryQuery {
        DiscoveryQuery {
            user_id: "me".to_string(),
            gender: gender.map(String::from),
            preferences: preferences.map(String::from),
            looking_for: looking_for.map(String::from),
        }
    }

    fn nin_set(filter: &Document) -> Vec<String> {
        filter
            .get_document("user_id")
            .unwrap()
            .get_array("$nin")
            .unwrap()
            .iter()
            .map(|b| b.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn excludes_self_matches_and_likes() {
        let user = user_with_relations(&["m1", "m2"], &["l1"]);
        let filter = discovery_filter(&user, &query(None, None, None));

        let excluded = nin_set(&filter);
        assert_eq!(excluded, vec!["me", "m1", "m2", "l1"]);
        assert!(filter.get("gender").is_none());
        assert!(filter.get("looking_for").is_none());
    }

    #[test]
    fn gender_filter_is_an_equality_constraint() {
        let user = user_with_relations(&[], &[]);
        let filter = discovery_filter(&user, &query(Some("female"), None, None));

        assert_eq!(filter.get("gender"), Some(&Bson::String("female".to_string())));
    }

    #[test]
    fn blank_gender_is_ignored() {
        let user = user_with_relations(&[], &[]);
        let filter = discovery_filter(&user, &query(Some("  "), None, None));
        assert!(filter.get("gender").is_none());
    }

    #[test]
    fn tag_params_merge_into_one_in_set() {
        let user = user_with_relations(&[], &[]);
        let filter = discovery_filter(
            &user,
            &query(None, Some("quiet, non-smoker"), Some("roommate,quiet")),
        );

        let tags: Vec<&str> = filter
            .get_document("looking_for")
            .unwrap()
            .get_array("$in")
            .unwrap()
            .iter()
            .map(|b| b.as_str().unwrap())
            .collect();

        // deduplicated union of both params
        assert_eq!(tags, vec!["non-smoker", "quiet", "roommate"]);
    }
}
