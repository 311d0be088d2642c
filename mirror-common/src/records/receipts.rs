//! Payment receipts
//!
//! A receipt is created when the payment page reports a completed (or
//! pending) order and is later moved between statuses by admin actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{normalize_email, require_non_empty, validate_amount};
use crate::store::{Record, RecordCollection, SharedStore};
use crate::{Error, Result};

/// Fresh ids tried before giving up on a unique receipt number
const RECEIPT_NUMBER_ATTEMPTS: usize = 8;

/// Receipt lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Pending,
    Completed,
    Refunded,
    Failed,
}

impl ReceiptStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(ReceiptStatus::Pending),
            "completed" => Some(ReceiptStatus::Completed),
            "refunded" => Some(ReceiptStatus::Refunded),
            "failed" => Some(ReceiptStatus::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptStatus::Pending => "pending",
            ReceiptStatus::Completed => "completed",
            ReceiptStatus::Refunded => "refunded",
            ReceiptStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub receipt_number: String,
    pub email: String,
    pub name: String,
    pub plan: String,
    pub amount_cents: i64,
    pub currency: String,
    #[serde(default)]
    pub payment_id: Option<String>,
    pub status: ReceiptStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Receipt {
    const STORE_KEY: &'static str = "receipts";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Payment event reported by the payment page
#[derive(Debug, Clone, Deserialize)]
pub struct NewReceipt {
    pub email: String,
    pub name: String,
    pub plan: String,
    pub amount_cents: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub status: Option<ReceiptStatus>,
}

/// Receipt number shown to customers: `MOD-YYYYMMDD-XXXXXX`
pub fn generate_receipt_number(id: &Uuid, at: DateTime<Utc>) -> String {
    let suffix: String = id.simple().to_string().chars().take(6).collect();
    format!("MOD-{}-{}", at.format("%Y%m%d"), suffix.to_uppercase())
}

/// Take the first candidate id whose receipt number is not in `existing`
fn unique_receipt_number(
    existing: &[Receipt],
    at: DateTime<Utc>,
    candidates: impl IntoIterator<Item = Uuid>,
) -> Result<(Uuid, String)> {
    candidates
        .into_iter()
        .take(RECEIPT_NUMBER_ATTEMPTS)
        .map(|id| (id, generate_receipt_number(&id, at)))
        .find(|(_, number)| existing.iter().all(|r| &r.receipt_number != number))
        .ok_or_else(|| Error::Internal("Could not generate a unique receipt number".to_string()))
}

#[derive(Clone)]
pub struct ReceiptService {
    receipts: RecordCollection<Receipt>,
}

impl ReceiptService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            receipts: RecordCollection::new(store),
        }
    }

    pub async fn create_receipt(&self, input: NewReceipt) -> Result<Receipt> {
        let email = normalize_email("email", &input.email)?;
        let name = require_non_empty("name", &input.name)?;
        let plan = require_non_empty("plan", &input.plan)?;
        let amount_cents = validate_amount(input.amount_cents)?;
        let currency = match input.currency {
            Some(c) => require_non_empty("currency", &c)?.to_uppercase(),
            None => "USD".to_string(),
        };

        let payment_id = input.payment_id.filter(|p| !p.trim().is_empty());
        let status = input.status.unwrap_or(ReceiptStatus::Completed);

        let receipt = self
            .receipts
            .insert_with(|existing| {
                let now = Utc::now();
                let (id, receipt_number) =
                    unique_receipt_number(existing, now, std::iter::repeat_with(Uuid::new_v4))?;
                Ok(Receipt {
                    id: id.to_string(),
                    receipt_number,
                    email,
                    name,
                    plan,
                    amount_cents,
                    currency,
                    payment_id,
                    status,
                    created_at: now,
                    updated_at: now,
                })
            })
            .await?;
        info!(
            "Created receipt {} ({} {} cents, {})",
            receipt.receipt_number,
            receipt.currency,
            receipt.amount_cents,
            receipt.status.as_str()
        );
        Ok(receipt)
    }

    pub async fn get_receipt(&self, id: &str) -> Result<Receipt> {
        self.receipts
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Receipt '{}'", id)))
    }

    pub async fn find_by_number(&self, receipt_number: &str) -> Result<Receipt> {
        let wanted = receipt_number.trim().to_uppercase();
        self.receipts
            .find(|r| r.receipt_number == wanted)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Receipt '{}'", receipt_number)))
    }

    pub async fn list_receipts(&self) -> Result<Vec<Receipt>> {
        self.receipts.list().await
    }

    pub async fn update_receipt_status(&self, id: &str, status: ReceiptStatus) -> Result<Receipt> {
        let receipt = self
            .receipts
            .update(id, |r| {
                r.status = status;
                r.updated_at = Utc::now();
                Ok(())
            })
            .await?;
        info!("Receipt {} is now {}", receipt.receipt_number, status.as_str());
        Ok(receipt)
    }

    pub async fn delete_receipt(&self, id: &str) -> Result<Receipt> {
        let receipt = self.receipts.remove(id).await?;
        info!("Deleted receipt {}", receipt.receipt_number);
        Ok(receipt)
    }
}
