use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::models::CredentialRecord;
use crate::domain::user::models::CredentialUpdate;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PutOutcome;
use crate::domain::user::ports::CredentialStore;
use crate::user::errors::UserError;

/// Process-local credential store, selected with `store.url = "memory://"`.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<EmailAddress, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, identity: &EmailAddress) -> Result<Option<CredentialRecord>, UserError> {
        Ok(self.records.read().await.get(identity).cloned())
    }

    async fn put_if_absent(&self, record: CredentialRecord) -> Result<PutOutcome, UserError> {
        match self.records.write().await.entry(record.identity.clone()) {
            Entry::Occupied(_) => Ok(PutOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(PutOutcome::Created)
            }
        }
    }

    async fn update(
        &self,
        identity: &EmailAddress,
        update: CredentialUpdate,
    ) -> Result<CredentialRecord, UserError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(identity)
            .ok_or_else(|| UserError::NotFound(identity.to_string()))?;

        if let Some(display_name) = update.display_name {
            record.display_name = display_name;
        }
        if let Some(profile) = update.profile {
            record.profile = profile;
        }
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    async fn delete(&self, identity: &EmailAddress) -> Result<(), UserError> {
        self.records
            .write()
            .await
            .remove(identity)
            .map(|_| ())
            .ok_or_else(|| UserError::NotFound(identity.to_string()))
    }
}
