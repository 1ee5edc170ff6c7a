use serde::{Deserialize, Serialize};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

/// Delivery state of a queued message.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Queued,
    Sent,
    Failed,
}

/// Document in the "outbound_emails" collection - one record per message
/// handed to the mail queue, updated as delivery attempts happen.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutboundEmail {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub _id: Option<ObjectId>,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub created_at: Option<BsonDateTime>,
    #[serde(default)]
    pub updated_at: Option<BsonDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        let status = mongodb::bson::to_bson(&DeliveryStatus::Queued).unwrap();
        assert_eq!(status, mongodb::bson::Bson::String("queued".to_string()));

        let back: DeliveryStatus =
            mongodb::bson::from_bson(mongodb::bson::Bson::String("failed".to_string())).unwrap();
        assert_eq!(back, DeliveryStatus::Failed);
    }
}
