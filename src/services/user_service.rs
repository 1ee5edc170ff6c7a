// ==================== PROFILE ATTRIBUTES ====================
// Single-user field mutations keyed by user_id. Preferences and
// looking_for keep set semantics ($addToSet / $pull); profile images are
// an append-only ordered list.

use crate::{
    database::MongoDB,
    models::{ProfileInfo, User},
    utils::error::AppError,
};
use mongodb::bson::{doc, Document, DateTime as BsonDateTime};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SetGenderRequest {
    pub gender: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SetDescriptionRequest {
    pub description: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PreferenceRequest {
    pub preferences: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LookingForRequest {
    #[serde(rename = "lookingFor")]
    pub looking_for: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddImageRequest {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Applies a single update document to a user, mapping "no such user" to
/// NotFound. All attribute mutations funnel through here.
async fn apply_update(db: &MongoDB, user_id: &str, update: Document) -> Result<(), AppError> {
    let collection = db.collection::<User>("users");

    let result = collection
        .update_one(doc! { "user_id": user_id }, update)
        .await
        .map_err(|e| AppError::Database(format!("Database error: {}", e)))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(())
}

pub async fn get_user(db: &MongoDB, user_id: &str) -> Result<ProfileInfo, AppError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| AppError::Database(format!("Database error: {}", e)))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(ProfileInfo::from(user))
}

pub async fn set_gender(db: &MongoDB, user_id: &str, gender: &str) -> Result<(), AppError> {
    apply_update(
        db,
        user_id,
        doc! { "$set": { "gender": gender, "updated_at": BsonDateTime::now() } },
    )
    .await
}

pub async fn set_description(db: &MongoDB, user_id: &str, description: &str) -> Result<(), AppError> {
    apply_update(
        db,
        user_id,
        doc! { "$set": { "description": description, "updated_at": BsonDateTime::now() } },
    )
    .await
}

/// Set union - adding a preference already present is a no-op.
pub async fn add_preference(db: &MongoDB, user_id: &str, preference: &str) -> Result<(), AppError> {
    apply_update(
        db,
        user_id,
        doc! {
            "$addToSet": { "preferences": preference },
            "$set": { "updated_at": BsonDateTime::now() },
        },
    )
    .await
}

pub async fn remove_preference(db: &MongoDB, user_id: &str, preference: &str) -> Result<(), AppError> {
    apply_update(
        db,
        user_id,
        doc! {
            "$pull": { "preferences": preference },
            "$set": { "updated_at": BsonDateTime::now() },
        },
    )
    .await
}

pub async fn add_looking_for(db: &MongoDB, user_id: &str, tag: &str) -> Result<(), AppError> {
    apply_update(
        db,
        user_id,
        doc! {
            "$addToSet": { "looking_for": tag },
            "$set": { "updated_at": BsonDateTime::now() },
        },
    )
    .await
}

pub async fn remove_looking_for(db: &MongoDB, user_id: &str, tag: &str) -> Result<(), AppError> {
    apply_update(
        db,
        user_id,
        doc! {
            "$pull": { "looking_for": tag },
            "$set": { "updated_at": BsonDateTime::now() },
        },
    )
    .await
}

/// Appends to the ordered image list.
pub async fn add_profile_image(db: &MongoDB, user_id: &str, image_url: &str) -> Result<(), AppError> {
    if image_url.trim().is_empty() {
        return Err(AppError::Validation("imageUrl must not be empty".to_string()));
    }

    apply_update(
        db,
        user_id,
        doc! {
            "$push": { "profile_images": image_url },
            "$set": { "updated_at": BsonDateTime::now() },
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_bodies_use_client_field_names() {
        let looking: LookingForRequest =
            serde_json::from_str(r#"{"lookingFor": "roommate"}"#).unwrap();
        assert_eq!(looking.looking_for, "roommate");

        let image: AddImageRequest =
            serde_json::from_str(r#"{"imageUrl": "https://cdn.example.com/a.jpg"}"#).unwrap();
        assert_eq!(image.image_url, "https://cdn.example.com/a.jpg");

        let preference: PreferenceRequest =
            serde_json::from_str(r#"{"preferences": "non-smoker"}"#).unwrap();
        assert_eq!(preference.preferences, "non-smoker");
    }
}
