//! Early-access registrations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{normalize_email, require_non_empty};
use crate::store::{Record, RecordCollection, SharedStore};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl RegistrationStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(RegistrationStatus::Pending),
            "confirmed" => Some(RegistrationStatus::Confirmed),
            "cancelled" | "canceled" => Some(RegistrationStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Confirmed => "confirmed",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub language: Option<String>,
    /// Where the visitor came from (landing page, referral code, ...)
    #[serde(default)]
    pub source: Option<String>,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Registration {
    const STORE_KEY: &'static str = "registrations";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Clone)]
pub struct RegistrationService {
    registrations: RecordCollection<Registration>,
}

impl RegistrationService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            registrations: RecordCollection::new(store),
        }
    }

    /// Register a visitor; one registration per email address
    pub async fn create_registration(&self, input: NewRegistration) -> Result<Registration> {
        let name = require_non_empty("name", &input.name)?;
        let email = normalize_email("email", &input.email)?;
        let language = input
            .language
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty());
        let source = input
            .source
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let registration = self
            .registrations
            .insert_with(|existing| {
                if existing.iter().any(|r| r.email == email) {
                    return Err(Error::Conflict(format!("'{}' is already registered", email)));
                }
                let now = Utc::now();
                Ok(Registration {
                    id: Uuid::new_v4().to_string(),
                    name,
                    email: email.clone(),
                    language,
                    source,
                    status: RegistrationStatus::Pending,
                    created_at: now,
                    updated_at: now,
                })
            })
            .await?;

        info!("New registration {}", registration.id);
        Ok(registration)
    }

    pub async fn list_registrations(&self) -> Result<Vec<Registration>> {
        self.registrations.list().await
    }

    pub async fn update_registration_status(
        &self,
        id: &str,
        status: RegistrationStatus,
    ) -> Result<Registration> {
        let registration = self
            .registrations
            .update(id, |r| {
                r.status = status;
                r.updated_at = Utc::now();
                Ok(())
            })
            .await?;
        info!("Registration {} is now {}", registration.id, status.as_str());
        Ok(registration)
    }

    pub async fn delete_registration(&self, id: &str) -> Result<Registration> {
        let registration = self.registrations.remove(id).await?;
        info!("Deleted registration {}", registration.id);
        Ok(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn signup(email: &str) -> NewRegistration {
        NewRegistration {
            name: "Sleeper".to_string(),
            email: email.to_string(),
            language: Some(" EN ".to_string()),
            source: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_case_insensitive() {
        let service = RegistrationService::new(Arc::new(MemoryStore::new()));
        let first = service.create_registration(signup("sleeper@example.com")).await.unwrap();
        assert_eq!(first.language.as_deref(), Some("en"));
        assert_eq!(first.status, RegistrationStatus::Pending);

        let dup = service.create_registration(signup("SLEEPER@example.com")).await;
        assert!(matches!(dup, Err(Error::Conflict(_))));
        assert_eq!(service.list_registrations().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_confirm_and_delete() {
        let service = RegistrationService::new(Arc::new(MemoryStore::new()));
        let reg = service.create_registration(signup("a@example.com")).await.unwrap();

        let confirmed = service
            .update_registration_status(&reg.id, RegistrationStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, RegistrationStatus::Confirmed);

        service.delete_registration(&reg.id).await.unwrap();
        assert!(service.list_registrations().await.unwrap().is_empty());
        assert!(matches!(
            service.update_registration_status(&reg.id, RegistrationStatus::Cancelled).await,
            Err(Error::NotFound(_))
        ));
    }
}
