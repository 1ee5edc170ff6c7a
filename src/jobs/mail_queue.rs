// ==================== BACKGROUND MAIL QUEUE ====================
// Single worker task that drains queued messages and drives delivery
// through the mail relay. Every message gets a persisted delivery record
// in "outbound_emails" so failures stay observable after the fact.
// Requests only enqueue - they never wait on the relay.

use crate::{
    database::MongoDB,
    models::{DeliveryStatus, OutboundEmail},
    services::mailer_service::MailerClient,
    utils::error::AppError,
};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY_SECS: u64 = 2;

#[derive(Debug, Clone)]
pub struct QueuedMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub struct MailQueue {
    db: MongoDB,
    tx: mpsc::UnboundedSender<(ObjectId, QueuedMail)>,
}

impl MailQueue {
    /// Spawns the delivery worker and returns the queue handle.
    pub fn start(db: MongoDB, mailer: MailerClient) -> MailQueue {
        log::info!("📬 Starting mail delivery worker...");

        let (tx, mut rx) = mpsc::unbounded_channel::<(ObjectId, QueuedMail)>();

        let worker_db = db.clone();
        tokio::spawn(async move {
            while let Some((record_id, mail)) = rx.recv().await {
                deliver(&worker_db, &mailer, record_id, mail).await;
            }
            log::warn!("📪 Mail queue channel closed, delivery worker stopping");
        });

        log::info!("✅ Mail delivery worker started");

        MailQueue { db, tx }
    }

    /// Persists the delivery record and hands the message to the worker.
    /// Never blocks on the relay.
    pub async fn enqueue(&self, mail: QueuedMail) -> Result<(), AppError> {
        let collection = self.db.collection::<OutboundEmail>("outbound_emails");

        let now = BsonDateTime::now();
        let record = OutboundEmail {
            _id: None,
            to: mail.to.clone(),
            subject: mail.subject.clone(),
            body: mail.body.clone(),
            status: DeliveryStatus::Queued,
            attempts: 0,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let inserted = collection
            .insert_one(&record)
            .await
            .map_err(|e| AppError::Database(format!("Failed to record outbound email: {}", e)))?;

        let record_id = inserted
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Database("Outbound email record has no id".to_string()))?;

        self.tx
            .send((record_id, mail))
            .map_err(|e| AppError::Mail(format!("Mail queue unavailable: {}", e)))?;

        Ok(())
    }
}

/// Attempts delivery up to MAX_ATTEMPTS with linear backoff, then settles
/// the record as sent or failed.
async fn deliver(db: &MongoDB, mailer: &MailerClient, record_id: ObjectId, mail: QueuedMail) {
    for attempt in 1..=MAX_ATTEMPTS {
        match mailer.send(&mail.to, &mail.subject, &mail.body).await {
            Ok(()) => {
                log::info!("✉️  Mail delivered to {} (attempt {})", mail.to, attempt);
                settle(db, record_id, DeliveryStatus::Sent, attempt).await;
                return;
            }
            Err(e) => {
                log::warn!(
                    "⚠️  Mail delivery to {} failed (attempt {}/{}): {}",
                    mail.to,
                    attempt,
                    MAX_ATTEMPTS,
                    e
                );
                if attempt < MAX_ATTEMPTS {
                    sleep(Duration::from_secs(RETRY_DELAY_SECS * attempt as u64)).await;
                }
            }
        }
    }

    log::error!("❌ Giving up on mail to {} after {} attempts", mail.to, MAX_ATTEMPTS);
    settle(db, record_id, DeliveryStatus::Failed, MAX_ATTEMPTS).await;
}

async fn settle(db: &MongoDB, record_id: ObjectId, status: DeliveryStatus, attempts: u32) {
    let collection = db.collection::<OutboundEmail>("outbound_emails");

    let status_bson = match mongodb::bson::to_bson(&status) {
        Ok(bson) => bson,
        Err(e) => {
            log::error!("❌ Failed to encode delivery status: {}", e);
            return;
        }
    };

    let update = doc! {
        "$set": {
            "status": status_bson,
            "attempts": attempts,
            "updated_at": BsonDateTime::now(),
        }
    };

    if let Err(e) = collection.update_one(doc! { "_id": record_id }, update).await {
        log::error!("❌ Failed to update delivery record {}: {}", record_id, e);
    }
}
