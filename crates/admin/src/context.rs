//! Application-wide state shared by every screen.
//!
//! [`AppContext`] is created once at startup and handed to the controllers.
//! It owns the API client, the toast channel, the logged-in session and the
//! cached class list. Login and logout are the only writers of the session;
//! logout also drops the class cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use casa_client::query::ListQuery;
use casa_client::{ApiClient, FileTokenStore, TokenStore};
use casa_core::class::ClassInfo;
use casa_core::pagination::{PageRequest, ROSTER_FETCH_LIMIT};
use casa_core::sorting::SortOrder;
use casa_core::user::{LoginForm, User};
use casa_core::validation::validate_form;

use crate::config::AdminConfig;
use crate::error::AdminError;
use crate::gateway::RosterGateway;
use crate::list::{
    ClassAttendanceList, ClassAttendanceSource, ClassList, ClassSource, ClassStudentsList,
    ClassStudentsSource, ListController, StudentList, StudentSource, UserList, UserSource,
};
use crate::notify::Notifier;
use crate::student::StudentForms;

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
}

#[derive(Debug, Default)]
struct ClassCache {
    classes: Vec<ClassInfo>,
    /// Stamp of the fetch that produced `classes`.
    generation: u64,
}

pub struct AppContext {
    config: AdminConfig,
    client: ApiClient,
    notifier: Notifier,
    session: RwLock<Option<Session>>,
    classes: RwLock<ClassCache>,
    class_stamp: AtomicU64,
}

impl AppContext {
    pub fn new(config: AdminConfig, client: ApiClient, notifier: Notifier) -> Self {
        Self {
            config,
            client,
            notifier,
            session: RwLock::new(None),
            classes: RwLock::new(ClassCache::default()),
            class_stamp: AtomicU64::new(0),
        }
    }

    /// Build the client from `config`, persisting the token in
    /// `config.token_path`.
    pub fn from_config(config: AdminConfig) -> Result<Self, AdminError> {
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_path.clone()));
        let client = ApiClient::new(&config.client_config(), tokens)?;
        tracing::info!(api_url = %config.api_url, "Application context created");
        Ok(Self::new(config, client, Notifier::default()))
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn gateway(&self) -> Arc<dyn RosterGateway> {
        Arc::new(self.client.clone())
    }

    pub fn student_forms(&self) -> StudentForms {
        StudentForms::new(self.client.clone(), self.notifier.clone())
    }

    // ---- session ----

    pub async fn login(&self, form: &LoginForm) -> Result<User, AdminError> {
        validate_form(form)?;
        match self.client.login(form).await {
            Ok(response) => {
                *self.session.write().await = Some(Session {
                    user: response.user.clone(),
                });
                Ok(response.user)
            }
            Err(e) => {
                let err = AdminError::from(e);
                self.notifier.error(err.user_message());
                Err(err)
            }
        }
    }

    /// Rebuild the session from a stored token. A rejected token is cleared.
    pub async fn restore_session(&self) -> Result<Option<User>, AdminError> {
        if self.client.tokens().load().map_err(casa_client::ApiError::from)?.is_none() {
            return Ok(None);
        }
        match self.client.current_user().await {
            Ok(user) => {
                *self.session.write().await = Some(Session { user: user.clone() });
                tracing::info!(user_id = %user.id, "Session restored");
                Ok(Some(user))
            }
            Err(e) if e.is_unauthorized() => {
                tracing::info!("Stored token rejected, clearing it");
                self.client.logout()?;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Clear the token, the session and the class cache.
    pub async fn logout(&self) -> Result<(), AdminError> {
        self.client.logout()?;
        *self.session.write().await = None;
        let stamp = self.next_class_stamp();
        *self.classes.write().await = ClassCache {
            classes: Vec::new(),
            generation: stamp,
        };
        Ok(())
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    // ---- class cache ----

    fn next_class_stamp(&self) -> u64 {
        self.class_stamp.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub async fn classes(&self) -> Vec<ClassInfo> {
        self.classes.read().await.classes.clone()
    }

    /// Store a class list fetched under `stamp`. Lists older than the
    /// cached one are ignored; returns whether the cache changed.
    async fn store_classes(&self, stamp: u64, classes: Vec<ClassInfo>) -> bool {
        let mut cache = self.classes.write().await;
        if stamp <= cache.generation {
            tracing::debug!(stamp, cached = cache.generation, "Ignoring stale class list");
            return false;
        }
        cache.classes = classes;
        cache.generation = stamp;
        true
    }

    /// Fetch every class (name ascending) into the cache.
    pub async fn refresh_classes(&self) -> Result<Vec<ClassInfo>, AdminError> {
        let stamp = self.next_class_stamp();
        let query = ListQuery::new(
            &PageRequest::first(ROSTER_FETCH_LIMIT),
            "",
            Some(SortOrder::Asc),
        );
        let page = self.client.list_classes(&query).await?;
        if self.store_classes(stamp, page.data).await {
            tracing::debug!(stamp, "Class cache updated");
        }
        Ok(self.classes().await)
    }

    // ---- list controllers ----

    pub fn student_list(&self) -> StudentList {
        ListController::new(StudentSource::new(self.client.clone()), self.config.search_debounce)
    }

    pub fn class_list(&self) -> ClassList {
        ListController::new(ClassSource::new(self.client.clone()), self.config.search_debounce)
    }

    pub fn user_list(&self) -> UserList {
        ListController::new(UserSource::new(self.client.clone()), self.config.search_debounce)
    }

    pub fn class_students_list(&self, class_id: &str) -> ClassStudentsList {
        ListController::new(
            ClassStudentsSource::new(self.client.clone(), self.notifier.clone(), class_id),
            self.config.search_debounce,
        )
    }

    pub fn class_attendance_list(&self, class_id: &str) -> ClassAttendanceList {
        ListController::new(
            ClassAttendanceSource::new(self.client.clone(), class_id),
            self.config.search_debounce,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casa_client::{ClientConfig, MemoryTokenStore};

    fn context() -> AppContext {
        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        let client = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9"), tokens).unwrap();
        AppContext::new(AdminConfig::default(), client, Notifier::default())
    }

    fn class(id: &str) -> ClassInfo {
        ClassInfo {
            id: id.to_string(),
            name: format!("Oficina {id}"),
            description: None,
            teacher_name: None,
            schedule: None,
            student_count: None,
        }
    }

    #[tokio::test]
    async fn older_class_fetch_cannot_overwrite_newer() {
        let ctx = context();
        let older = ctx.next_class_stamp();
        let newer = ctx.next_class_stamp();

        assert!(ctx.store_classes(newer, vec![class("new")]).await);
        assert!(!ctx.store_classes(older, vec![class("old")]).await);
        assert_eq!(ctx.classes().await[0].id, "new");
    }

    #[tokio::test]
    async fn logout_clears_cache_and_blocks_in_flight_fetches() {
        let ctx = context();
        let in_flight = ctx.next_class_stamp();
        ctx.store_classes(ctx.next_class_stamp(), vec![class("c1")])
            .await;

        ctx.logout().await.unwrap();
        assert!(ctx.classes().await.is_empty());
        assert!(!ctx.is_authenticated().await);

        assert!(!ctx.store_classes(in_flight, vec![class("c1")]).await);
        assert!(ctx.classes().await.is_empty());
    }

    #[tokio::test]
    async fn from_config_persists_token_in_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AdminConfig {
            api_url: "http://127.0.0.1:9/".into(),
            token_path: dir.path().join("storage.json"),
            ..AdminConfig::default()
        };
        let ctx = AppContext::from_config(config).unwrap();
        assert_eq!(ctx.client().base_url(), "http://127.0.0.1:9");

        ctx.client().tokens().save("jwt").unwrap();
        let raw = std::fs::read_to_string(dir.path().join("storage.json")).unwrap();
        assert!(raw.contains("@casa-apoio:token"));
    }

    #[tokio::test]
    async fn restore_without_token_is_anonymous() {
        let ctx = context();
        assert_eq!(ctx.restore_session().await.unwrap(), None);
        assert_eq!(ctx.current_user().await, None);
    }

    #[test]
    fn list_controllers_use_screen_page_sizes() {
        use crate::list::ListSource;
        let ctx = context();
        assert_eq!(ctx.student_list().source().page_size(), 10);
        assert_eq!(ctx.user_list().source().page_size(), 10);
        assert_eq!(ctx.class_list().source().page_size(), 5);
        assert_eq!(ctx.class_students_list("c1").source().page_size(), 10);
        assert_eq!(ctx.class_attendance_list("c1").source().page_size(), 5);
    }
}
