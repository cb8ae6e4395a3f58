//! In-memory notification store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use taskhub_core::result::AppResult;
use taskhub_core::types::{NotificationId, PageRequest, UserId};
use taskhub_entity::notification::{CreateNotification, Notification};

use super::Sequence;
use crate::store::NotificationStore;

/// Notification store over a `DashMap`.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    rows: DashMap<NotificationId, (u64, Notification)>,
    seq: Sequence,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored notifications across all recipients.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn matching(&self, recipient: UserId, is_read: Option<bool>) -> Vec<(u64, Notification)> {
        self.rows
            .iter()
            .filter(|e| {
                let n = &e.value().1;
                n.recipient == recipient && is_read.is_none_or(|r| n.is_read == r)
            })
            .map(|e| e.value().clone())
            .collect()
    }

    fn set_read(n: &mut Notification) -> bool {
        if n.is_read {
            return false;
        }
        n.is_read = true;
        n.read_at = Some(Utc::now());
        true
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn create(&self, data: &CreateNotification) -> AppResult<Notification> {
        let notification = Notification {
            id: NotificationId::new(),
            recipient: data.recipient,
            sender: data.sender,
            notification_type: data.notification_type,
            title: data.title.clone(),
            message: data.message.clone(),
            metadata: data.metadata.clone(),
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        };
        self.rows
            .insert(notification.id, (self.seq.next(), notification.clone()));
        Ok(notification)
    }

    async fn find_by_recipient(
        &self,
        recipient: UserId,
        is_read: Option<bool>,
        page: &PageRequest,
    ) -> AppResult<Vec<Notification>> {
        let mut rows = self.matching(recipient, is_read);
        rows.sort_by(|a, b| (b.1.created_at, b.0).cmp(&(a.1.created_at, a.0)));
        Ok(rows
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.limit as usize)
            .map(|(_, n)| n)
            .collect())
    }

    async fn count_by_recipient(&self, recipient: UserId, is_read: Option<bool>) -> AppResult<u64> {
        Ok(self
            .rows
            .iter()
            .filter(|e| {
                let n = &e.value().1;
                n.recipient == recipient && is_read.is_none_or(|r| n.is_read == r)
            })
            .count() as u64)
    }

    async fn find_owned(
        &self,
        id: NotificationId,
        recipient: UserId,
    ) -> AppResult<Option<Notification>> {
        Ok(self
            .rows
            .get(&id)
            .map(|e| e.value().1.clone())
            .filter(|n| n.is_owned_by(recipient)))
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        recipient: UserId,
    ) -> AppResult<Option<Notification>> {
        let Some(mut entry) = self.rows.get_mut(&id) else {
            return Ok(None);
        };
        let n = &mut entry.value_mut().1;
        if !n.is_owned_by(recipient) {
            return Ok(None);
        }
        Self::set_read(n);
        Ok(Some(n.clone()))
    }

    async fn mark_many_read(&self, recipient: UserId, ids: &[NotificationId]) -> AppResult<u64> {
        let mut changed = 0;
        for id in ids {
            if let Some(mut entry) = self.rows.get_mut(id) {
                let n = &mut entry.value_mut().1;
                if n.is_owned_by(recipient) && Self::set_read(n) {
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    async fn mark_all_read(&self, recipient: UserId) -> AppResult<u64> {
        let mut changed = 0;
        for mut entry in self.rows.iter_mut() {
            let n = &mut entry.value_mut().1;
            if n.is_owned_by(recipient) && Self::set_read(n) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete_owned(&self, id: NotificationId, recipient: UserId) -> AppResult<bool> {
        Ok(self
            .rows
            .remove_if(&id, |_, (_, n)| n.is_owned_by(recipient))
            .is_some())
    }

    async fn delete_all_read(&self, recipient: UserId) -> AppResult<u64> {
        let mut removed = 0;
        self.rows.retain(|_, (_, n)| {
            let drop = n.is_owned_by(recipient) && n.is_read;
            if drop {
                removed += 1;
            }
            !drop
        });
        Ok(removed)
    }

    async fn delete_for_recipient(&self, recipient: UserId) -> AppResult<u64> {
        let mut removed = 0;
        self.rows.retain(|_, (_, n)| {
            let drop = n.is_owned_by(recipient);
            if drop {
                removed += 1;
            }
            !drop
        });
        Ok(removed)
    }
}
