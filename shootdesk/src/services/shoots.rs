//! Shoots service
//!
//! Keeps the local cache authoritative while mirroring every change to the
//! remote table on a best-effort basis. Local writes land (and persist)
//! before any network call starts, so the UI never waits on, or rolls back
//! because of, the remote.
//!
//! Create and delete mirror in a detached background task whose failure is
//! only logged. Update awaits the remote and hands its error back to the
//! caller; the local change stays in place either way.

use crate::config;
use crate::error::Result;
use crate::models::{
    ClientSummary, PersonSummary, Principal, ShootDraft, ShootRecord, ShootStatus, ShootUpdate,
};
use crate::remote::{is_uuid_shaped, update_columns, RemoteResult, RemoteShootRow, RemoteStore};
use crate::services::notifications::{LogNotifier, Notification, Notifier};
use crate::services::{history, queries};
use crate::storage::{KeyValueStore, LocalCache};
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::task::JoinHandle;

/// Handle to a background remote mirror call.
///
/// Dropping it detaches the task. Awaiting [`RemoteSync::finished`] waits
/// for the call to complete; the outcome itself is only logged.
#[derive(Debug)]
pub struct RemoteSync {
    task: Option<JoinHandle<()>>,
}

impl RemoteSync {
    fn skipped() -> Self {
        Self { task: None }
    }

    /// Whether a remote call was started at all
    pub fn is_scheduled(&self) -> bool {
        self.task.is_some()
    }

    pub async fn finished(self) {
        if let Some(task) = self.task {
            if let Err(e) = task.await {
                tracing::error!("Remote mirror task did not complete: {}", e);
            }
        }
    }
}

/// Run `call` in the background, logging its outcome
fn spawn_mirror<F>(op: &'static str, shoot_id: &str, call: F) -> RemoteSync
where
    F: Future<Output = RemoteResult<()>> + Send + 'static,
{
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        tracing::warn!(shoot_id, op, "No async runtime available, remote sync skipped");
        return RemoteSync::skipped();
    };

    let shoot_id = shoot_id.to_string();
    let task = runtime.spawn(async move {
        match call.await {
            Ok(()) => tracing::info!(shoot_id = %shoot_id, op, "Remote mirror succeeded"),
            Err(e) => tracing::error!(
                shoot_id = %shoot_id,
                op,
                error = %e,
                "Remote mirror failed, local copy kept"
            ),
        }
    });

    RemoteSync { task: Some(task) }
}

/// Service owning the shoot cache and its remote mirror
#[derive(Clone)]
pub struct ShootsService {
    cache: Arc<RwLock<LocalCache>>,
    remote: Option<Arc<dyn RemoteStore>>,
    notifier: Arc<dyn Notifier>,
    principal: Arc<RwLock<Option<Principal>>>,
}

impl ShootsService {
    /// Restore the cache from `store`; `remote` is optional
    pub fn new(store: Arc<dyn KeyValueStore>, remote: Option<Arc<dyn RemoteStore>>) -> Self {
        let cache = LocalCache::restore(store, config::SHOOTS_STORAGE_KEY);

        Self {
            cache: Arc::new(RwLock::new(cache)),
            remote,
            notifier: Arc::new(LogNotifier),
            principal: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, LocalCache> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, LocalCache> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remote to mirror `shoot_id` to, if any. Non-UUID ids stay local.
    fn mirror_target(&self, shoot_id: &str) -> Option<Arc<dyn RemoteStore>> {
        let remote = self.remote.as_ref()?;

        if !is_uuid_shaped(shoot_id) {
            tracing::debug!("Skipping remote sync for non-UUID id: {}", shoot_id);
            return None;
        }

        Some(Arc::clone(remote))
    }

    // ===== Session =====

    /// Login/logout hook of the authentication collaborator
    pub fn set_principal(&self, principal: Option<Principal>) {
        match &principal {
            Some(p) => tracing::info!("Signed in as {} ({:?})", p.email, p.role),
            None => tracing::info!("Signed out"),
        }
        *self.principal.write().unwrap_or_else(PoisonError::into_inner) = principal;
    }

    pub fn principal(&self) -> Option<Principal> {
        self.principal
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ===== Loading =====

    /// Replace the cache with the remote table's rows.
    ///
    /// Called once at startup. Returns how many shoots were loaded; zero
    /// means the remote was unavailable or empty and the restored local data
    /// was kept.
    pub async fn load(&self) -> usize {
        let Some(remote) = self.remote.as_ref() else {
            tracing::info!("No remote store configured, using local data");
            return 0;
        };

        let rows = match remote.select_all().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Error loading shoots from remote: {}", e);
                return 0;
            }
        };

        let mut seen = HashSet::new();
        let records: Vec<ShootRecord> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<RemoteShootRow>(row) {
                Ok(row) => Some(ShootRecord::from(row)),
                Err(e) => {
                    tracing::warn!("Skipping malformed remote shoot row: {}", e);
                    None
                }
            })
            .filter(|record| seen.insert(record.id.clone()))
            .collect();

        if records.is_empty() {
            tracing::info!("No shoots found remotely, using local data");
            return 0;
        }

        let count = records.len();
        if let Err(e) = self.write_cache().replace_all(records) {
            tracing::error!("Failed to persist shoots loaded from remote: {}", e);
            return 0;
        }

        tracing::info!("Loaded {} shoots from remote", count);
        count
    }

    // ===== Mutations =====

    /// Add a shoot locally, then mirror it in the background.
    ///
    /// Only local failures (duplicate id, persistence) are returned; the
    /// remote insert outcome is logged.
    pub fn add_shoot(&self, record: ShootRecord) -> Result<RemoteSync> {
        tracing::info!("Adding shoot: {}", record.id);

        let row = RemoteShootRow::from(&record);
        let id = record.id.clone();

        self.write_cache().insert(record)?;

        let Some(remote) = self.mirror_target(&id) else {
            return Ok(RemoteSync::skipped());
        };

        Ok(spawn_mirror("insert", &id, async move { remote.insert(&row).await }))
    }

    /// Book a shoot from a partial draft, filling defaults from the
    /// signed-in principal
    pub fn new_shoot(&self, draft: ShootDraft) -> Result<(ShootRecord, RemoteSync)> {
        let today = chrono::Local::now().date_naive();
        let record = draft.into_record(self.principal().as_ref(), today)?;

        let sync = self.add_shoot(record.clone())?;
        Ok((record, sync))
    }

    /// Merge `update` into the shoot with `id` and mirror it.
    ///
    /// The local change is kept even when the remote rejects it; in that case
    /// the remote error is returned after a destructive notification.
    pub async fn update_shoot(&self, id: &str, update: ShootUpdate) -> Result<ShootRecord> {
        tracing::debug!("Updating shoot {}: {:?}", id, update.provided_fields());

        let merged = self.write_cache().update(id, &update)?;

        let columns = update_columns(&update)?;
        if columns.is_empty() {
            return Ok(merged);
        }

        let Some(remote) = self.mirror_target(id) else {
            self.notifier.notify(Notification::info(
                "Notes saved",
                "Your changes have been saved to local storage",
            ));
            return Ok(merged);
        };

        match remote.update(id, &columns).await {
            Ok(()) => {
                tracing::info!("Shoot updated remotely: {}", id);
                self.notifier.notify(Notification::info(
                    "Notes saved",
                    "Your changes have been saved successfully",
                ));
                Ok(merged)
            }
            Err(e) => {
                tracing::error!(shoot_id = id, error = %e, "Error updating shoot remotely");
                self.notifier
                    .notify(Notification::error("Error updating shoot", e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Remove a shoot locally, then delete it remotely in the background
    pub fn delete_shoot(&self, id: &str) -> Result<RemoteSync> {
        tracing::info!("Deleting shoot: {}", id);

        if self.write_cache().remove(id)?.is_none() {
            tracing::warn!("Shoot {} was not in the local cache", id);
        }

        let Some(remote) = self.mirror_target(id) else {
            return Ok(RemoteSync::skipped());
        };

        let target = id.to_string();
        Ok(spawn_mirror("delete", id, async move { remote.delete(&target).await }))
    }

    // ===== Queries =====

    pub fn shoots(&self) -> Vec<ShootRecord> {
        self.read_cache().records().to_vec()
    }

    pub fn get_shoot(&self, id: &str) -> Option<ShootRecord> {
        self.read_cache().get(id).cloned()
    }

    /// Shoots with `status` visible to the signed-in principal;
    /// `scheduled` includes `booked`
    pub fn get_client_shoots_by_status(&self, status: ShootStatus) -> Vec<ShootRecord> {
        let principal = self.principal();
        queries::shoots_by_status(self.read_cache().records(), status, principal.as_ref())
    }

    /// The shoot-history page's literal status listing
    pub fn history_shoots_by_status(&self, status: ShootStatus) -> Vec<ShootRecord> {
        let principal = self.principal();
        history::history_shoots_by_status(self.read_cache().records(), status, principal.as_ref())
    }

    pub fn get_unique_photographers(&self) -> Vec<PersonSummary> {
        queries::unique_photographers(self.read_cache().records())
    }

    pub fn get_unique_editors(&self) -> Vec<PersonSummary> {
        queries::unique_editors(self.read_cache().records())
    }

    pub fn get_unique_clients(&self) -> Vec<ClientSummary> {
        queries::unique_clients(self.read_cache().records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, RemoteError};
    use crate::models::fixtures::shoot;
    use crate::models::{Patch, Role};
    use crate::services::notifications::{NotificationVariant, RecordingNotifier};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use serde_json::{Map, Value};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    const ID_A: &str = "3f2b8c1e-9a4d-4e6f-8b2a-1c3d5e7f9a0b";
    const ID_B: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

    /// Remote that counts calls and can be told to fail or to hold updates
    #[derive(Default)]
    struct FakeRemote {
        rows: Mutex<Vec<Value>>,
        fail: AtomicBool,
        hold_updates: AtomicBool,
        release: Notify,
        select_count: AtomicUsize,
        insert_count: AtomicUsize,
        update_count: AtomicUsize,
        delete_count: AtomicUsize,
        last_update: Mutex<Option<Map<String, Value>>>,
    }

    impl FakeRemote {
        fn failing() -> Self {
            let remote = Self::default();
            remote.fail.store(true, Ordering::SeqCst);
            remote
        }

        fn with_rows(rows: Vec<Value>) -> Self {
            let remote = Self::default();
            *remote.rows.lock().unwrap() = rows;
            remote
        }

        fn outcome(&self) -> RemoteResult<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(RemoteError::Rejected {
                    status: 400,
                    message: "Mock remote failure".to_string(),
                });
            }
            Ok(())
        }

        fn calls(&self) -> usize {
            self.insert_count.load(Ordering::SeqCst)
                + self.update_count.load(Ordering::SeqCst)
                + self.delete_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RemoteStore for FakeRemote {
        async fn select_all(&self) -> RemoteResult<Vec<Value>> {
            self.select_count.fetch_add(1, Ordering::SeqCst);
            self.outcome()?;
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn insert(&self, row: &RemoteShootRow) -> RemoteResult<()> {
            self.insert_count.fetch_add(1, Ordering::SeqCst);
            self.outcome()?;
            self.rows.lock().unwrap().push(serde_json::to_value(row)?);
            Ok(())
        }

        async fn update(&self, _id: &str, columns: &Map<String, Value>) -> RemoteResult<()> {
            self.update_count.fetch_add(1, Ordering::SeqCst);
            *self.last_update.lock().unwrap() = Some(columns.clone());
            if self.hold_updates.load(Ordering::SeqCst) {
                self.release.notified().await;
            }
            self.outcome()
        }

        async fn delete(&self, _id: &str) -> RemoteResult<()> {
            self.delete_count.fetch_add(1, Ordering::SeqCst);
            self.outcome()
        }
    }

    fn create_test_service(remote: Arc<FakeRemote>) -> (ShootsService, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let service = ShootsService::new(Arc::new(MemoryStore::new()), Some(remote))
            .with_notifier(notifier.clone());
        (service, notifier)
    }

    #[tokio::test]
    async fn test_created_shoot_visible_even_when_remote_fails() {
        let remote = Arc::new(FakeRemote::failing());
        let (service, notifier) = create_test_service(remote.clone());

        let sync = service.add_shoot(shoot(ID_A, ShootStatus::Pending)).unwrap();
        assert!(sync.is_scheduled());

        let pending = service.get_client_shoots_by_status(ShootStatus::Pending);
        assert_eq!(pending.len(), 1);

        sync.finished().await;
        assert_eq!(remote.insert_count.load(Ordering::SeqCst), 1);
        assert_eq!(service.shoots().len(), 1);
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_create_mirrors_snake_case_row() {
        let remote = Arc::new(FakeRemote::default());
        let (service, _) = create_test_service(remote.clone());

        service
            .add_shoot(shoot(ID_A, ShootStatus::Scheduled))
            .unwrap()
            .finished()
            .await;

        let rows = remote.rows.lock().unwrap().clone();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["scheduled_date"], "2024-05-01");
        assert_eq!(rows[0]["created_by"], "tester");
    }

    #[tokio::test]
    async fn test_duplicate_create_is_rejected_locally() {
        let remote = Arc::new(FakeRemote::default());
        let (service, _) = create_test_service(remote.clone());

        service.add_shoot(shoot(ID_A, ShootStatus::Scheduled)).unwrap().finished().await;
        let result = service.add_shoot(shoot(ID_A, ShootStatus::Booked));

        assert!(matches!(result, Err(AppError::DuplicateShoot(_))));
        assert_eq!(remote.insert_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_deleted_shoot_disappears_regardless_of_remote() {
        let remote = Arc::new(FakeRemote::failing());
        let (service, _) = create_test_service(remote.clone());

        service.add_shoot(shoot(ID_A, ShootStatus::Scheduled)).unwrap();
        service.add_shoot(shoot(ID_B, ShootStatus::Scheduled)).unwrap();

        let sync = service.delete_shoot(ID_A).unwrap();

        let scheduled = service.get_client_shoots_by_status(ShootStatus::Scheduled);
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].id, ID_B);
        assert_eq!(service.get_unique_photographers()[0].shoot_count, 1);

        sync.finished().await;
        assert_eq!(remote.delete_count.load(Ordering::SeqCst), 1);
        assert!(service.get_shoot(ID_A).is_none());
    }

    #[tokio::test]
    async fn test_update_visible_before_remote_resolves() {
        let remote = Arc::new(FakeRemote::default());
        remote.hold_updates.store(true, Ordering::SeqCst);
        let (service, _) = create_test_service(remote.clone());
        service.add_shoot(shoot(ID_A, ShootStatus::Scheduled)).unwrap().finished().await;

        let background = service.clone();
        let pending_update = tokio::spawn(async move {
            background
                .update_shoot(ID_A, ShootUpdate::status(ShootStatus::Completed))
                .await
        });

        while remote.update_count.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let completed = service.get_client_shoots_by_status(ShootStatus::Completed);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, ID_A);

        remote.release.notify_one();
        let merged = pending_update.await.unwrap().unwrap();
        assert_eq!(merged.status, ShootStatus::Completed);
    }

    #[tokio::test]
    async fn test_update_failure_is_surfaced_but_local_change_kept() {
        let remote = Arc::new(FakeRemote::default());
        let (service, notifier) = create_test_service(remote.clone());
        service.add_shoot(shoot(ID_A, ShootStatus::Scheduled)).unwrap().finished().await;

        remote.fail.store(true, Ordering::SeqCst);
        let result = service
            .update_shoot(ID_A, ShootUpdate::notes(Some("lockbox 4411".to_string())))
            .await;

        assert!(matches!(
            result,
            Err(AppError::Remote(RemoteError::Rejected { status: 400, .. }))
        ));
        assert_eq!(
            service.get_shoot(ID_A).unwrap().notes.as_deref(),
            Some("lockbox 4411")
        );

        let notifications = notifier.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Error updating shoot");
        assert_eq!(notifications[0].variant, NotificationVariant::Destructive);
    }

    #[tokio::test]
    async fn test_update_sends_only_provided_columns() {
        let remote = Arc::new(FakeRemote::default());
        let (service, notifier) = create_test_service(remote.clone());
        service.add_shoot(shoot(ID_A, ShootStatus::Scheduled)).unwrap().finished().await;

        let update = ShootUpdate {
            completed_date: Patch::Set("2024-05-02".to_string()),
            editor: Patch::Clear,
            ..ShootUpdate::default()
        };
        service.update_shoot(ID_A, update).await.unwrap();

        let columns = remote.last_update.lock().unwrap().clone().unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns["completed_date"], "2024-05-02");
        assert_eq!(columns["editor"], Value::Null);
        assert_eq!(notifier.notifications()[0].title, "Notes saved");
    }

    #[tokio::test]
    async fn test_empty_update_skips_remote() {
        let remote = Arc::new(FakeRemote::default());
        let (service, notifier) = create_test_service(remote.clone());
        service.add_shoot(shoot(ID_A, ShootStatus::Scheduled)).unwrap().finished().await;

        service.update_shoot(ID_A, ShootUpdate::default()).await.unwrap();

        assert_eq!(remote.update_count.load(Ordering::SeqCst), 0);
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_non_uuid_ids_never_reach_remote() {
        let remote = Arc::new(FakeRemote::default());
        let (service, notifier) = create_test_service(remote.clone());

        let sync = service.add_shoot(shoot("1715012345678", ShootStatus::Booked)).unwrap();
        assert!(!sync.is_scheduled());

        service
            .update_shoot("1715012345678", ShootUpdate::status(ShootStatus::Completed))
            .await
            .unwrap();
        let sync = service.delete_shoot("1715012345678").unwrap();
        assert!(!sync.is_scheduled());

        assert_eq!(remote.calls(), 0);
        assert_eq!(
            notifier.notifications()[0].description,
            "Your changes have been saved to local storage"
        );
    }

    #[tokio::test]
    async fn test_update_unknown_shoot_fails_without_remote_call() {
        let remote = Arc::new(FakeRemote::default());
        let (service, _) = create_test_service(remote.clone());

        let result = service
            .update_shoot(ID_A, ShootUpdate::status(ShootStatus::Completed))
            .await;

        assert!(matches!(result, Err(AppError::ShootNotFound(_))));
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_load_replaces_cache_with_remote_rows() {
        let remote_row =
            serde_json::to_value(RemoteShootRow::from(&shoot(ID_B, ShootStatus::Completed)))
                .unwrap();
        let remote = Arc::new(FakeRemote::with_rows(vec![
            remote_row.clone(),
            serde_json::json!({"id": "broken"}),
            remote_row,
        ]));
        let (service, _) = create_test_service(remote.clone());
        service.add_shoot(shoot("local-only", ShootStatus::Pending)).unwrap();

        assert_eq!(service.load().await, 1);

        let shoots = service.shoots();
        assert_eq!(shoots.len(), 1);
        assert_eq!(shoots[0].id, ID_B);
    }

    #[tokio::test]
    async fn test_load_keeps_local_data_when_remote_empty_or_failing() {
        for remote in [FakeRemote::default(), FakeRemote::failing()] {
            let remote = Arc::new(remote);
            let (service, _) = create_test_service(remote.clone());
            service.add_shoot(shoot("local-only", ShootStatus::Pending)).unwrap();

            assert_eq!(service.load().await, 0);
            assert_eq!(remote.select_count.load(Ordering::SeqCst), 1);
            assert_eq!(service.shoots().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_client_principal_narrows_status_listing() {
        let remote = Arc::new(FakeRemote::default());
        let (service, _) = create_test_service(remote);

        let mut mine = shoot("mine", ShootStatus::Booked);
        mine.client.email = "dana@homes.test".to_string();
        service.add_shoot(mine).unwrap();
        service.add_shoot(shoot("theirs", ShootStatus::Scheduled)).unwrap();

        service.set_principal(Some(Principal {
            id: "u1".to_string(),
            name: "Dana".to_string(),
            email: "dana@homes.test".to_string(),
            company: None,
            phone: None,
            role: Role::Client,
        }));

        let scheduled = service.get_client_shoots_by_status(ShootStatus::Scheduled);
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].id, "mine");
        assert!(service.history_shoots_by_status(ShootStatus::Scheduled).is_empty());

        service.set_principal(None);
        assert_eq!(service.get_client_shoots_by_status(ShootStatus::Scheduled).len(), 2);
    }

    #[tokio::test]
    async fn test_new_shoot_uses_principal_as_creator() {
        let remote = Arc::new(FakeRemote::default());
        let (service, _) = create_test_service(remote.clone());
        service.set_principal(Some(Principal {
            id: "admin-1".to_string(),
            name: "Office Admin".to_string(),
            email: "office@test".to_string(),
            company: None,
            phone: None,
            role: Role::Admin,
        }));

        let (record, sync) = service.new_shoot(ShootDraft::default()).unwrap();
        sync.finished().await;

        assert_eq!(record.created_by, "Office Admin");
        assert_eq!(service.get_shoot(&record.id).unwrap(), record);
        assert_eq!(remote.insert_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_create_without_runtime_skips_remote() {
        let remote = Arc::new(FakeRemote::default());
        let (service, _) = create_test_service(remote.clone());

        let sync = service.add_shoot(shoot(ID_A, ShootStatus::Scheduled)).unwrap();

        assert!(!sync.is_scheduled());
        assert_eq!(service.shoots().len(), 1);
    }
}
