//! In-memory notification state with fetch/poll/mark-read actions.

use std::sync::{Arc, Mutex};

use concierge_core::types::DbId;

use crate::api::{ClientError, Notification, NotificationsApi};

/// Optional filters applied when fetching the full list.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchQuery {
    /// Restrict the fetch to one read state.
    pub read: Option<bool>,
}

/// Mutable store state. Locked only for synchronous reads/writes, never
/// across an await point.
#[derive(Debug, Default)]
struct StoreState {
    loading: bool,
    error: Option<String>,
    notifications: Vec<Notification>,
}

/// Client-side cache of the current user's notifications.
///
/// The server is the source of truth; this store only reflects it. Fetches
/// replace the whole list (last fetch wins). Polls refresh unread items while
/// preserving locally known read items. Marking a notification read does NOT
/// eagerly update the local copy -- the change becomes visible on the next
/// fetch or poll.
pub struct NotificationStore {
    api: Arc<dyn NotificationsApi>,
    user_id: Mutex<Option<DbId>>,
    state: Mutex<StoreState>,
    /// Single-flight guard: at most one poll in flight at a time.
    poll_gate: tokio::sync::Mutex<()>,
}

impl NotificationStore {
    /// Create a store backed by the given API, with no current user.
    pub fn new(api: Arc<dyn NotificationsApi>) -> Self {
        Self {
            api,
            user_id: Mutex::new(None),
            state: Mutex::new(StoreState::default()),
            poll_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Set or clear the current user. Polling is a no-op while unset.
    pub fn set_user(&self, user_id: Option<DbId>) {
        *self.user_id.lock().expect("store lock poisoned") = user_id;
    }

    /// Whether a fetch or mark-read call is in progress.
    pub fn loading(&self) -> bool {
        self.state.lock().expect("store lock poisoned").loading
    }

    /// The last surfaced failure, if any.
    pub fn error(&self) -> Option<String> {
        self.state.lock().expect("store lock poisoned").error.clone()
    }

    /// Snapshot of the notification list, in server-provided order.
    pub fn notifications(&self) -> Vec<Notification> {
        self.state
            .lock()
            .expect("store lock poisoned")
            .notifications
            .clone()
    }

    /// Number of locally known unread notifications.
    pub fn unread_count(&self) -> usize {
        self.state
            .lock()
            .expect("store lock poisoned")
            .notifications
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    /// Fetch the full notification list for the current user.
    ///
    /// Toggles `loading` around the request and clears any previous error. On
    /// success the local list is replaced wholesale; on failure the list is
    /// left untouched, the error is surfaced, and the call returns `Err`.
    pub async fn fetch_notifications(&self, query: FetchQuery) -> Result<(), ClientError> {
        self.begin_request();

        let result = match self.current_user() {
            Some(user_id) => self.api.list(user_id, query.read).await,
            None => Err(ClientError::NoUser),
        };

        let mut state = self.state.lock().expect("store lock poisoned");
        state.loading = false;
        match result {
            Ok(notifications) => {
                state.notifications = notifications;
                Ok(())
            }
            Err(e) => {
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Refresh unread notifications for the current user.
    ///
    /// No-op if no user is set, or if another poll is already in flight. The
    /// resulting list is the fresh unread items followed by the read items
    /// already held locally, so read history survives polls without being
    /// re-fetched. Does not touch `loading` or `error`; a failed poll mutates
    /// nothing and returns `Err`.
    pub async fn poll_notifications(&self) -> Result<(), ClientError> {
        let Some(user_id) = self.current_user() else {
            return Ok(());
        };
        let Ok(_guard) = self.poll_gate.try_lock() else {
            tracing::debug!("Skipping poll: previous poll still in flight");
            return Ok(());
        };

        let unread = self.api.list(user_id, Some(false)).await?;

        let mut state = self.state.lock().expect("store lock poisoned");
        let read: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|n| n.read)
            .cloned()
            .collect();
        state.notifications = unread.into_iter().chain(read).collect();
        Ok(())
    }

    /// Ask the server to mark one notification read.
    ///
    /// Toggles `loading` and clears any previous error, like a fetch. The
    /// local `read` flag is deliberately NOT updated on success; local state
    /// only reflects server truth after the next fetch or poll.
    pub async fn read_notification(&self, id: DbId) -> Result<(), ClientError> {
        self.begin_request();

        let result = self.api.mark_read(id).await;

        let mut state = self.state.lock().expect("store lock poisoned");
        state.loading = false;
        if let Err(e) = &result {
            state.error = Some(e.to_string());
        }
        result
    }

    /// Clear the surfaced error.
    pub fn clean_error(&self) {
        self.state.lock().expect("store lock poisoned").error = None;
    }

    fn current_user(&self) -> Option<DbId> {
        *self.user_id.lock().expect("store lock poisoned")
    }

    fn begin_request(&self) {
        let mut state = self.state.lock().expect("store lock poisoned");
        state.error = None;
        state.loading = true;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// In-memory API double: serves canned lists and records mark-read calls.
    #[derive(Default)]
    struct FakeApi {
        /// Responses for `list` calls, consumed front to back; the last one
        /// repeats. Empty serves an empty list.
        responses: Mutex<Vec<Vec<Notification>>>,
        fail_list: std::sync::atomic::AtomicBool,
        fail_mark_read: std::sync::atomic::AtomicBool,
        list_calls: AtomicUsize,
        marked: Mutex<Vec<DbId>>,
    }

    impl FakeApi {
        fn with_response(notifications: Vec<Notification>) -> Self {
            Self {
                responses: Mutex::new(vec![notifications]),
                ..Self::default()
            }
        }

        fn failing_list() -> Self {
            let api = Self::default();
            api.fail_list.store(true, Ordering::SeqCst);
            api
        }
    }

    #[async_trait]
    impl NotificationsApi for FakeApi {
        async fn list(
            &self,
            _user_id: DbId,
            _read: Option<bool>,
        ) -> Result<Vec<Notification>, ClientError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(ClientError::Status(500));
            }
            let mut responses = self.responses.lock().unwrap();
            match responses.len() {
                0 => Ok(vec![]),
                1 => Ok(responses[0].clone()),
                _ => Ok(responses.remove(0)),
            }
        }

        async fn mark_read(&self, id: DbId) -> Result<(), ClientError> {
            if self.fail_mark_read.load(Ordering::SeqCst) {
                return Err(ClientError::Status(500));
            }
            self.marked.lock().unwrap().push(id);
            Ok(())
        }
    }

    fn notification(id: DbId, read: bool) -> Notification {
        Notification {
            id,
            read,
            extra: serde_json::Map::new(),
        }
    }

    fn store_with(api: FakeApi) -> (NotificationStore, Arc<FakeApi>) {
        let api = Arc::new(api);
        let store = NotificationStore::new(api.clone());
        store.set_user(Some(1));
        (store, api)
    }

    #[tokio::test]
    async fn fetch_replaces_list_and_clears_loading() {
        let (store, _api) = store_with(FakeApi::with_response(vec![
            notification(1, false),
            notification(2, true),
        ]));

        store
            .fetch_notifications(FetchQuery::default())
            .await
            .expect("fetch should succeed");

        assert!(!store.loading());
        assert!(store.error().is_none());
        assert_eq!(store.notifications().len(), 2);
        assert_eq!(store.unread_count(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_sets_error_and_keeps_list() {
        let (store, api) = store_with(FakeApi::with_response(vec![notification(1, false)]));
        store
            .fetch_notifications(FetchQuery::default())
            .await
            .expect("initial fetch should succeed");

        api.fail_list.store(true, Ordering::SeqCst);
        let result = store.fetch_notifications(FetchQuery::default()).await;

        assert!(result.is_err());
        assert!(!store.loading(), "loading must end false on failure");
        assert!(store.error().is_some());
        assert_eq!(
            store.notifications(),
            vec![notification(1, false)],
            "a failed fetch must not disturb the list"
        );
    }

    #[tokio::test]
    async fn fetch_without_user_fails() {
        let (store, _api) = store_with(FakeApi::default());
        store.set_user(None);

        let result = store.fetch_notifications(FetchQuery::default()).await;

        assert!(matches!(result, Err(ClientError::NoUser)));
        assert!(!store.loading());
        assert!(store.error().is_some());
    }

    #[tokio::test]
    async fn poll_merges_unread_before_known_read() {
        // Local state: one read notification. Server: one new unread.
        let (store, api) = store_with(FakeApi::with_response(vec![notification(1, true)]));
        store
            .fetch_notifications(FetchQuery::default())
            .await
            .expect("seed fetch should succeed");

        *api.responses.lock().unwrap() = vec![vec![notification(2, false)]];
        store
            .poll_notifications()
            .await
            .expect("poll should succeed");

        assert_eq!(
            store.notifications(),
            vec![notification(2, false), notification(1, true)],
            "poll result must be new unread followed by known read items"
        );
        assert_eq!(store.unread_count(), 1);
    }

    /// API double whose `list` blocks until released, to hold a poll in
    /// flight while another one is attempted.
    #[derive(Default)]
    struct BlockingApi {
        release: tokio::sync::Notify,
        list_calls: AtomicUsize,
    }

    #[async_trait]
    impl NotificationsApi for BlockingApi {
        async fn list(
            &self,
            _user_id: DbId,
            _read: Option<bool>,
        ) -> Result<Vec<Notification>, ClientError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            Ok(vec![])
        }

        async fn mark_read(&self, _id: DbId) -> Result<(), ClientError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn overlapping_poll_is_skipped() {
        let api = Arc::new(BlockingApi::default());
        let store = Arc::new(NotificationStore::new(api.clone()));
        store.set_user(Some(1));

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.poll_notifications().await }
        });

        // Let the first poll reach the API and park there.
        while api.list_calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        store
            .poll_notifications()
            .await
            .expect("overlapping poll should return Ok");
        assert_eq!(
            api.list_calls.load(Ordering::SeqCst),
            1,
            "the overlapping poll must not issue a request"
        );

        api.release.notify_one();
        first
            .await
            .expect("task should join")
            .expect("first poll should succeed");
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn poll_without_user_is_noop() {
        let (store, api) = store_with(FakeApi::default());
        store.set_user(None);

        store
            .poll_notifications()
            .await
            .expect("userless poll should be Ok");
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 0, "no request made");
    }

    #[tokio::test]
    async fn poll_failure_mutates_nothing() {
        let (store, _api) = store_with(FakeApi::failing_list());
        let before = store.notifications();

        let result = store.poll_notifications().await;

        assert!(result.is_err());
        assert!(store.error().is_none(), "polls never surface errors");
        assert!(!store.loading(), "polls never toggle loading");
        assert_eq!(store.notifications(), before);
    }

    #[tokio::test]
    async fn read_notification_does_not_update_local_flag() {
        let (store, api) = store_with(FakeApi::with_response(vec![notification(7, false)]));
        store
            .fetch_notifications(FetchQuery::default())
            .await
            .expect("seed fetch should succeed");

        store
            .read_notification(7)
            .await
            .expect("mark-read should succeed");

        assert_eq!(*api.marked.lock().unwrap(), vec![7]);
        // Intentional: the local copy stays unread until the next fetch/poll.
        assert_eq!(store.unread_count(), 1, "local read flag must not change");
        assert!(!store.loading());
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn read_notification_failure_sets_error() {
        let (store, api) = store_with(FakeApi::default());
        api.fail_mark_read.store(true, Ordering::SeqCst);

        let result = store.read_notification(3).await;

        assert!(result.is_err());
        assert!(store.error().is_some());
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn clean_error_clears_error() {
        let (store, _api) = store_with(FakeApi::failing_list());
        let _ = store.fetch_notifications(FetchQuery::default()).await;
        assert!(store.error().is_some());

        store.clean_error();
        assert!(store.error().is_none());
    }
}
