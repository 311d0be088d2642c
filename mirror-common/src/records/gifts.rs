//! Gift subscriptions
//!
//! A gift is bought by one person for another and identified publicly by an
//! eight-character code. Codes are redeemable once, and only while the gift
//! is `active`.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::{normalize_email, require_non_empty, validate_amount};
use crate::store::{Record, RecordCollection, SharedStore};
use crate::{Error, Result};

/// Code alphabet without look-alike characters (0/O, 1/I)
const GIFT_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const GIFT_CODE_LENGTH: usize = 8;
const GIFT_CODE_ATTEMPTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiftStatus {
    /// Awaiting payment confirmation
    Pending,
    /// Paid and redeemable
    Active,
    Redeemed,
    Cancelled,
}

impl GiftStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(GiftStatus::Pending),
            "active" => Some(GiftStatus::Active),
            "redeemed" => Some(GiftStatus::Redeemed),
            "cancelled" | "canceled" => Some(GiftStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GiftStatus::Pending => "pending",
            GiftStatus::Active => "active",
            GiftStatus::Redeemed => "redeemed",
            GiftStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gift {
    pub id: String,
    pub gift_code: String,
    pub giver_name: String,
    pub giver_email: String,
    pub recipient_name: String,
    pub recipient_email: String,
    #[serde(default)]
    pub message: Option<String>,
    pub plan: String,
    pub amount_cents: i64,
    pub status: GiftStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub redeemed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub redeemed_by: Option<String>,
}

impl Record for Gift {
    const STORE_KEY: &'static str = "gifts";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGift {
    pub giver_name: String,
    pub giver_email: String,
    pub recipient_name: String,
    pub recipient_email: String,
    #[serde(default)]
    pub message: Option<String>,
    pub plan: String,
    pub amount_cents: i64,
    /// Set when the payment already cleared on the client
    #[serde(default)]
    pub paid: bool,
}

/// Random gift code drawn from [`GIFT_CODE_ALPHABET`]
pub fn generate_gift_code<R: Rng>(rng: &mut R) -> String {
    (0..GIFT_CODE_LENGTH)
        .map(|_| GIFT_CODE_ALPHABET[rng.gen_range(0..GIFT_CODE_ALPHABET.len())] as char)
        .collect()
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Clone)]
pub struct GiftService {
    gifts: RecordCollection<Gift>,
}

impl GiftService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            gifts: RecordCollection::new(store),
        }
    }

    pub async fn create_gift(&self, input: NewGift) -> Result<Gift> {
        let giver_name = require_non_empty("giver_name", &input.giver_name)?;
        let giver_email = normalize_email("giver_email", &input.giver_email)?;
        let recipient_name = require_non_empty("recipient_name", &input.recipient_name)?;
        let recipient_email = normalize_email("recipient_email", &input.recipient_email)?;
        let plan = require_non_empty("plan", &input.plan)?;
        let amount_cents = validate_amount(input.amount_cents)?;
        let message = input
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        let status = if input.paid {
            GiftStatus::Active
        } else {
            GiftStatus::Pending
        };

        let gift = self
            .gifts
            .insert_with(|existing| {
                let mut rng = rand::thread_rng();
                let gift_code = (0..GIFT_CODE_ATTEMPTS)
                    .map(|_| generate_gift_code(&mut rng))
                    .find(|code| existing.iter().all(|g| &g.gift_code != code))
                    .ok_or_else(|| {
                        Error::Internal("Could not generate a unique gift code".to_string())
                    })?;

                let now = Utc::now();
                Ok(Gift {
                    id: Uuid::new_v4().to_string(),
                    gift_code,
                    giver_name,
                    giver_email,
                    recipient_name,
                    recipient_email,
                    message,
                    plan,
                    amount_cents,
                    status,
                    created_at: now,
                    updated_at: now,
                    redeemed_at: None,
                    redeemed_by: None,
                })
            })
            .await?;

        info!("Created gift {} ({})", gift.gift_code, gift.status.as_str());
        Ok(gift)
    }

    pub async fn get_gift_by_code(&self, code: &str) -> Result<Gift> {
        let wanted = normalize_code(code);
        self.gifts
            .find(|g| g.gift_code == wanted)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Gift code '{}'", code)))
    }

    /// Mark an active gift redeemed by `redeemer_email`
    pub async fn redeem_gift(&self, code: &str, redeemer_email: &str) -> Result<Gift> {
        let redeemer = normalize_email("email", redeemer_email)?;
        let gift = self.get_gift_by_code(code).await?;

        let redeemed = self
            .gifts
            .update(&gift.id, |g| {
                if g.status != GiftStatus::Active {
                    return Err(Error::Conflict(format!(
                        "Gift {} is {} and cannot be redeemed",
                        g.gift_code,
                        g.status.as_str()
                    )));
                }
                let now = Utc::now();
                g.status = GiftStatus::Redeemed;
                g.redeemed_at = Some(now);
                g.redeemed_by = Some(redeemer.clone());
                g.updated_at = now;
                Ok(())
            })
            .await
            .map_err(|e| {
                if matches!(e, Error::Conflict(_)) {
                    warn!("Rejected redemption of gift {}: {}", gift.gift_code, e);
                }
                e
            })?;

        info!("Gift {} redeemed by {}", redeemed.gift_code, redeemer);
        Ok(redeemed)
    }

    pub async fn update_gift_status(&self, id: &str, status: GiftStatus) -> Result<Gift> {
        let gift = self
            .gifts
            .update(id, |g| {
                g.status = status;
                if status != GiftStatus::Redeemed {
                    g.redeemed_at = None;
                    g.redeemed_by = None;
                }
                g.updated_at = Utc::now();
                Ok(())
            })
            .await?;
        info!("Gift {} is now {}", gift.gift_code, status.as_str());
        Ok(gift)
    }

    pub async fn list_gifts(&self) -> Result<Vec<Gift>> {
        self.gifts.list().await
    }

    pub async fn delete_gift(&self, id: &str) -> Result<Gift> {
        let gift = self.gifts.remove(id).await?;
        info!("Deleted gift {}", gift.gift_code);
        Ok(gift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn service() -> GiftService {
        GiftService::new(Arc::new(MemoryStore::new()))
    }

    fn order(paid: bool) -> NewGift {
        NewGift {
            giver_name: "Giver".to_string(),
            giver_email: "giver@example.com".to_string(),
            recipient_name: "Friend".to_string(),
            recipient_email: "friend@example.com".to_string(),
            message: Some("  Sweet dreams  ".to_string()),
            plan: "premium".to_string(),
            amount_cents: 4900,
            paid,
        }
    }

    #[test]
    fn test_gift_code_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let code = generate_gift_code(&mut rng);
            assert_eq!(code.len(), GIFT_CODE_LENGTH);
            assert!(code.bytes().all(|b| GIFT_CODE_ALPHABET.contains(&b)));
        }
    }

    #[tokio::test]
    async fn test_create_gift_status_follows_payment() {
        let gifts = service();
        let unpaid = gifts.create_gift(order(false)).await.unwrap();
        let paid = gifts.create_gift(order(true)).await.unwrap();

        assert_eq!(unpaid.status, GiftStatus::Pending);
        assert_eq!(paid.status, GiftStatus::Active);
        assert_eq!(paid.message.as_deref(), Some("Sweet dreams"));
        assert_ne!(unpaid.gift_code, paid.gift_code);
    }

    #[tokio::test]
    async fn test_redeem_once() {
        let gifts = service();
        let gift = gifts.create_gift(order(true)).await.unwrap();

        let redeemed = gifts
            .redeem_gift(&gift.gift_code.to_lowercase(), "Friend@Example.com")
            .await
            .unwrap();
        assert_eq!(redeemed.status, GiftStatus::Redeemed);
        assert_eq!(redeemed.redeemed_by.as_deref(), Some("friend@example.com"));
        assert!(redeemed.redeemed_at.is_some());

        let again = gifts.redeem_gift(&gift.gift_code, "friend@example.com").await;
        assert!(matches!(again, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_pending_gift_not_redeemable_until_activated() {
        let gifts = service();
        let gift = gifts.create_gift(order(false)).await.unwrap();

        assert!(matches!(
            gifts.redeem_gift(&gift.gift_code, "friend@example.com").await,
            Err(Error::Conflict(_))
        ));

        gifts.update_gift_status(&gift.id, GiftStatus::Active).await.unwrap();
        assert!(gifts.redeem_gift(&gift.gift_code, "friend@example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_code_not_found() {
        let gifts = service();
        assert!(matches!(gifts.get_gift_by_code("ZZZZZZZZ").await, Err(Error::NotFound(_))));
    }
}
