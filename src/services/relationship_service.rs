// ==================== LIKE / MATCH WORKFLOW ====================
// State machine per ordered pair (A,B): none -> liked (A->B) -> matched.
// Every transition touches two user documents, so it runs inside a single
// client-session transaction: either both sides move or neither does.
// Invariants kept here:
//   - matches is symmetric (A in B.matches iff B in A.matches)
//   - received_likes holds pending, unmatched likes only
//   - no duplicate entries in any relationship array

use crate::{
    database::MongoDB,
    models::{ProfileInfo, User},
    utils::error::AppError,
};
use futures::stream::StreamExt;
use mongodb::bson::{doc, Document, DateTime as BsonDateTime};
use mongodb::{ClientSession, Collection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PairRequest {
    #[serde(rename = "currentUserId")]
    pub current_user_id: String,
    #[serde(rename = "selectedUserId")]
    pub selected_user_id: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ReceivedLikesResponse {
    pub success: bool,
    pub received_likes: Vec<ProfileInfo>,
    pub count: usize,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MatchesResponse {
    pub success: bool,
    pub matches: Vec<ProfileInfo>,
    pub count: usize,
}

fn db_err(e: impl std::fmt::Display) -> AppError {
    AppError::Database(format!("Database error: {}", e))
}

/// Rejects a like that cannot move the pair forward. A repeat like is not
/// rejected here - $addToSet makes it a no-op.
fn like_guard(sender: &User, to_id: &str) -> Result<(), AppError> {
    if sender.matches.iter().any(|id| id == to_id) {
        return Err(AppError::Conflict("Users are already matched".to_string()));
    }
    Ok(())
}

/// A match must consume a pending like: the initiator has to be in the
/// responder's received_likes.
fn match_guard(responder: &User, initiator_id: &str) -> Result<(), AppError> {
    if responder.matches.iter().any(|id| id == initiator_id) {
        return Err(AppError::Conflict("Users are already matched".to_string()));
    }
    if !responder.received_likes.iter().any(|id| id == initiator_id) {
        return Err(AppError::Conflict("No pending like to accept".to_string()));
    }
    Ok(())
}

/// The two update documents applied when a match is created: each side
/// gains the other in matches, and the pending like disappears in both
/// directions so received_likes stays pending-only.
fn match_updates(responder_id: &str, initiator_id: &str) -> (Document, Document) {
    let now = BsonDateTime::now();

    let responder_update = doc! {
        "$addToSet": { "matches": initiator_id },
        "$pull": { "received_likes": initiator_id, "liked": initiator_id },
        "$set": { "updated_at": now },
    };

    let initiator_update = doc! {
        "$addToSet": { "matches": responder_id },
        "$pull": { "liked": responder_id, "received_likes": responder_id },
        "$set": { "updated_at": now },
    };

    (responder_update, initiator_update)
}

async fn find_in_txn(
    users: &Collection<User>,
    session: &mut ClientSession,
    user_id: &str,
) -> Result<User, AppError> {
    users
        .find_one(doc! { "user_id": user_id })
        .session(&mut *session)
        .await
        .map_err(db_err)?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
}

/// none -> liked (from -> to)
pub async fn send_like(db: &MongoDB, from_id: &str, to_id: &str) -> Result<(), AppError> {
    if from_id == to_id {
        return Err(AppError::Validation("Cannot like your own profile".to_string()));
    }

    let users = db.collection::<User>("users");

    let mut session = db.client().start_session().await.map_err(db_err)?;
    session.start_transaction().await.map_err(db_err)?;

    let outcome = send_like_in_txn(&users, &mut session, from_id, to_id).await;

    match outcome {
        Ok(()) => {
            session.commit_transaction().await.map_err(db_err)?;
            log::info!("💌 Like recorded: {} -> {}", from_id, to_id);
            Ok(())
        }
        Err(e) => {
            let _ = session.abort_transaction().await;
            Err(e)
        }
    }
}

async fn send_like_in_txn(
    users: &Collection<User>,
    session: &mut ClientSession,
    from_id: &str,
    to_id: &str,
) -> Result<(), AppError> {
    let sender = find_in_txn(users, session, from_id).await?;
    find_in_txn(users, session, to_id).await?;

    like_guard(&sender, to_id)?;

    let now = BsonDateTime::now();

    users
        .update_one(
            doc! { "user_id": from_id },
            doc! {
                "$addToSet": { "liked": to_id },
                "$set": { "updated_at": now },
            },
        )
        .session(&mut *session)
        .await
        .map_err(db_err)?;

    users
        .update_one(
            doc! { "user_id": to_id },
            doc! {
                "$addToSet": { "received_likes": from_id },
                "$set": { "updated_at": now },
            },
        )
        .session(&mut *session)
        .await
        .map_err(db_err)?;

    Ok(())
}

/// liked -> matched. The responder accepts a pending like from the
/// initiator; both documents change atomically.
pub async fn create_match(
    db: &MongoDB,
    responder_id: &str,
    initiator_id: &str,
) -> Result<(), AppError> {
    if responder_id == initiator_id {
        return Err(AppError::Validation("Cannot match with your own profile".to_string()));
    }

    let users = db.collection::<User>("users");

    let mut session = db.client().start_session().await.map_err(db_err)?;
    session.start_transaction().await.map_err(db_err)?;

    let outcome = create_match_in_txn(&users, &mut session, responder_id, initiator_id).await;

    match outcome {
        Ok(()) => {
            session.commit_transaction().await.map_err(db_err)?;
            log::info!("💞 Match created: {} <-> {}", responder_id, initiator_id);
            Ok(())
        }
        Err(e) => {
            let _ = session.abort_transaction().await;
            Err(e)
        }
    }
}

async fn create_match_in_txn(
    users: &Collection<User>,
    session: &mut ClientSession,
    responder_id: &str,
    initiator_id: &str,
) -> Result<(), AppError> {
    let responder = find_in_txn(users, session, responder_id).await?;
    find_in_txn(users, session, initiator_id).await?;

    match_guard(&responder, initiator_id)?;

    let (responder_update, initiator_update) = match_updates(responder_id, initiator_id);

    users
        .update_one(doc! { "user_id": responder_id }, responder_update)
        .session(&mut *session)
        .await
        .map_err(db_err)?;

    users
        .update_one(doc! { "user_id": initiator_id }, initiator_update)
        .session(&mut *session)
        .await
        .map_err(db_err)?;

    Ok(())
}

/// Resolves a set of user ids to full profiles with one $in query.
async fn resolve_profiles(db: &MongoDB, ids: &[String]) -> Result<Vec<ProfileInfo>, AppError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let collection = db.collection::<User>("users");

    let mut cursor = collection
        .find(doc! { "user_id": { "$in": ids } })
        .await
        .map_err(db_err)?;

    let mut profiles = Vec::with_capacity(ids.len());
    while let Some(result) = cursor.next().await {
        match result {
            Ok(user) => profiles.push(ProfileInfo::from(user)),
            Err(e) => log::error!("❌ Skipping unreadable profile document: {}", e),
        }
    }

    Ok(profiles)
}

pub async fn list_received_likes(
    db: &MongoDB,
    user_id: &str,
) -> Result<ReceivedLikesResponse, AppError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(db_err)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let received_likes = resolve_profiles(db, &user.received_likes).await?;
    let count = received_likes.len();

    Ok(ReceivedLikesResponse {
        success: true,
        received_likes,
        count,
    })
}

pub async fn list_matches(db: &MongoDB, user_id: &str) -> Result<MatchesResponse, AppError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(db_err)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let matches = resolve_profiles(db, &user.matches).await?;
    let count = matches.len();

    Ok(MatchesResponse {
        success: true,
        matches,
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, liked: &[&str], received: &[&str], matches: &[&str]) -> User {
        User {
            _id: None,
            user_id: id.to_string(),
            name: id.to_string(),
            email: format!("{}@example.com", id),
            password_hash: String::new(),
            verification_token: None,
            verified: true,
            gender: None,
            description: None,
            preferences: vec![],
            looking_for: vec![],
            profile_images: vec![],
            liked: liked.iter().map(|s| s.to_string()).collect(),
            received_likes: received.iter().map(|s| s.to_string()).collect(),
            matches: matches.iter().map(|s| s.to_string()).collect(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn like_guard_rejects_matched_pair() {
        let sender = user("a", &[], &[], &["b"]);
        assert!(matches!(like_guard(&sender, "b"), Err(AppError::Conflict(_))));
    }

    #[test]
    fn like_guard_allows_fresh_and_repeat_likes() {
        let fresh = user("a", &[], &[], &[]);
        assert!(like_guard(&fresh, "b").is_ok());

        // Repeat like passes the guard; $addToSet keeps it idempotent
        let repeat = user("a", &["b"], &[], &[]);
        assert!(like_guard(&repeat, "b").is_ok());
    }

    #[test]
    fn match_guard_requires_pending_like() {
        let responder = user("b", &[], &[], &[]);
        assert!(matches!(
            match_guard(&responder, "a"),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn match_guard_rejects_existing_match() {
        let responder = user("b", &[], &["a"], &["a"]);
        assert!(matches!(
            match_guard(&responder, "a"),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn match_guard_accepts_pending_like() {
        let responder = user("b", &[], &["a"], &[]);
        assert!(match_guard(&responder, "a").is_ok());
    }

    #[test]
    fn match_updates_are_symmetric() {
        let (responder_update, initiator_update) = match_updates("b", "a");

        // Both sides gain the other in matches
        assert_eq!(
            responder_update.get_document("$addToSet").unwrap().get_str("matches").unwrap(),
            "a"
        );
        assert_eq!(
            initiator_update.get_document("$addToSet").unwrap().get_str("matches").unwrap(),
            "b"
        );

        // The pending like disappears in both directions on both documents
        let responder_pull = responder_update.get_document("$pull").unwrap();
        assert_eq!(responder_pull.get_str("received_likes").unwrap(), "a");
        assert_eq!(responder_pull.get_str("liked").unwrap(), "a");

        let initiator_pull = initiator_update.get_document("$pull").unwrap();
        assert_eq!(initiator_pull.get_str("liked").unwrap(), "b");
        assert_eq!(initiator_pull.get_str("received_likes").unwrap(), "b");
    }
}
