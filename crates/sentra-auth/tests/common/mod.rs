//! Shared fixtures: in-memory repositories, a failing cache, and a fully
//! wired environment over the memory cache provider.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use sentra_auth::account::AccountService;
use sentra_auth::guard::{GuardConfig, RequestGuard};
use sentra_auth::jwt::{JwtDecoder, JwtEncoder};
use sentra_auth::otp::OtpService;
use sentra_auth::ratelimit::RateLimiter;
use sentra_auth::revocation::RevocationStore;
use sentra_auth::session::{SessionManager, SessionStore};
use sentra_cache::CacheManager;
use sentra_cache::memory::MemoryCacheProvider;
use sentra_core::config::cache::MemoryCacheConfig;
use sentra_core::config::{AuthConfig, RateLimitConfig, RateLimitRule, SessionConfig};
use sentra_core::error::AppError;
use sentra_core::result::AppResult;
use sentra_core::traits::cache::CacheProvider;
use sentra_entity::otp::{Otp, OtpKind};
use sentra_entity::repository::{OtpRepository, SessionRepository, UserRepository};
use sentra_entity::session::Session;
use sentra_entity::user::{User, UserStatus};

/// In-memory user repository backed by a mutexed vector.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn with_user(user: User) -> Arc<Self> {
        let repo = Self::default();
        repo.users.lock().unwrap().push(user);
        Arc::new(repo)
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str, tenant_id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.tenant_id == tenant_id && u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.tenant_id == tenant_id && u.id == id)
            .cloned())
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        Ok(())
    }
}

/// In-memory session repository.
#[derive(Debug, Default)]
pub struct MemorySessionRepository {
    sessions: Mutex<Vec<Session>>,
}

impl MemorySessionRepository {
    pub fn all(&self) -> Vec<Session> {
        self.sessions.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
        tenant_id: Uuid,
    ) -> AppResult<Option<Session>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| {
                s.tenant_id == tenant_id
                    && (s.access_token_hash == token_hash || s.refresh_token_hash == token_hash)
            })
            .cloned())
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => *existing = session.clone(),
            None => sessions.push(session.clone()),
        }
        Ok(())
    }

    async fn delete_by_user(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<u64> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| !(s.user_id == user_id && s.tenant_id == tenant_id));
        Ok((before - sessions.len()) as u64)
    }
}

/// Session repository whose every call fails, for downstream-failure paths.
#[derive(Debug, Default)]
pub struct FailingSessionRepository;

#[async_trait]
impl SessionRepository for FailingSessionRepository {
    async fn find_by_token_hash(&self, _: &str, _: Uuid) -> AppResult<Option<Session>> {
        Err(AppError::database("session store unavailable"))
    }

    async fn save(&self, _: &Session) -> AppResult<()> {
        Err(AppError::database("session store unavailable"))
    }

    async fn delete_by_user(&self, _: Uuid, _: Uuid) -> AppResult<u64> {
        Err(AppError::database("session store unavailable"))
    }
}

/// In-memory OTP repository; lookups return the most recent record.
#[derive(Debug, Default)]
pub struct MemoryOtpRepository {
    otps: Mutex<Vec<Otp>>,
}

impl MemoryOtpRepository {
    pub fn get(&self, id: Uuid) -> Option<Otp> {
        self.otps.lock().unwrap().iter().find(|o| o.id == id).cloned()
    }
}

#[async_trait]
impl OtpRepository for MemoryOtpRepository {
    async fn find_by_email(
        &self,
        email: &str,
        tenant_id: Uuid,
        kind: OtpKind,
    ) -> AppResult<Option<Otp>> {
        Ok(self
            .otps
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.tenant_id == tenant_id && o.email == email && o.kind == kind)
            .max_by_key(|o| o.created_at)
            .cloned())
    }

    async fn save(&self, otp: &Otp) -> AppResult<()> {
        let mut otps = self.otps.lock().unwrap();
        match otps.iter_mut().find(|o| o.id == otp.id) {
            Some(existing) => *existing = otp.clone(),
            None => otps.push(otp.clone()),
        }
        Ok(())
    }
}

/// Cache provider whose every call fails, for fail-open/fail-closed paths.
#[derive(Debug, Default)]
pub struct FailingCacheProvider;

#[async_trait]
impl CacheProvider for FailingCacheProvider {
    async fn get(&self, _: &str) -> AppResult<Option<String>> {
        Err(AppError::cache("cache unavailable"))
    }

    async fn set(&self, _: &str, _: &str, _: Duration) -> AppResult<()> {
        Err(AppError::cache("cache unavailable"))
    }

    async fn delete(&self, _: &str) -> AppResult<()> {
        Err(AppError::cache("cache unavailable"))
    }

    async fn exists(&self, _: &str) -> AppResult<bool> {
        Err(AppError::cache("cache unavailable"))
    }

    async fn incr(&self, _: &str) -> AppResult<i64> {
        Err(AppError::cache("cache unavailable"))
    }

    async fn expire(&self, _: &str, _: Duration) -> AppResult<bool> {
        Err(AppError::cache("cache unavailable"))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }

    async fn flush_all(&self) -> AppResult<()> {
        Err(AppError::cache("cache unavailable"))
    }
}

/// Auth configuration with a fast argon2 work factor and a low lockout
/// threshold so tests stay quick.
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "integration-test-secret".into(),
        argon2_memory_kib: 1024,
        argon2_iterations: 1,
        max_failed_attempts: 3,
        lockout_duration_minutes: 30,
        ..AuthConfig::default()
    }
}

/// Tight limits so window exhaustion is reachable in a handful of calls.
pub fn test_rate_limit_config() -> RateLimitConfig {
    RateLimitConfig {
        login: RateLimitRule::new(5, 60_000, 120_000),
        refresh_token: RateLimitRule::new(5, 60_000, 120_000),
        user: RateLimitRule::new(5, 60_000, 120_000),
        ..RateLimitConfig::default()
    }
}

pub fn memory_cache() -> Arc<CacheManager> {
    let provider = MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 10_000 });
    Arc::new(CacheManager::from_provider(Arc::new(provider)))
}

pub fn failing_cache() -> Arc<CacheManager> {
    Arc::new(CacheManager::from_provider(Arc::new(FailingCacheProvider)))
}

pub const TEST_PASSWORD: &str = "Sup3r-Secret!";

/// A fully wired environment over in-memory stores.
pub struct TestEnv {
    pub tenant_id: Uuid,
    pub users: Arc<MemoryUserRepository>,
    pub sessions: Arc<MemorySessionRepository>,
    pub cache: Arc<CacheManager>,
    pub account: AccountService,
    pub encoder: JwtEncoder,
    pub decoder: JwtDecoder,
    pub revocation: RevocationStore,
    pub limiter: RateLimiter,
    pub store: SessionStore,
    pub manager: SessionManager,
    pub user: User,
}

impl TestEnv {
    /// One active user with a known password, memory-backed everything.
    pub fn new() -> Self {
        Self::build(memory_cache(), false)
    }

    /// Same wiring, but the session repository rejects every call. The
    /// tracked `sessions` field is an unused placeholder here.
    pub fn with_failing_sessions() -> Self {
        Self::build_with_sessions(
            memory_cache(),
            Arc::new(FailingSessionRepository),
            Arc::new(MemorySessionRepository::default()),
            false,
        )
    }

    fn build(cache: Arc<CacheManager>, require_mfa: bool) -> Self {
        let sessions = Arc::new(MemorySessionRepository::default());
        Self::build_with_sessions(cache, sessions.clone(), sessions, require_mfa)
    }

    fn build_with_sessions(
        cache: Arc<CacheManager>,
        session_repo: Arc<dyn SessionRepository>,
        sessions: Arc<MemorySessionRepository>,
        require_mfa: bool,
    ) -> Self {
        let config = test_auth_config();
        let account = AccountService::new(&config);
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);
        let revocation = RevocationStore::new(cache.clone());
        let limiter = RateLimiter::new(cache.clone(), test_rate_limit_config());

        let tenant_id = Uuid::new_v4();
        let user = make_user(tenant_id, &account);
        let users = MemoryUserRepository::with_user(user.clone());

        let store = SessionStore::new(session_repo, &SessionConfig::default());

        let manager = SessionManager::new(
            users.clone(),
            store.clone(),
            account.clone(),
            decoder.clone(),
            revocation.clone(),
            limiter.clone(),
            require_mfa,
        );

        Self {
            tenant_id,
            users,
            sessions,
            cache,
            account,
            encoder,
            decoder,
            revocation,
            limiter,
            store,
            manager,
            user,
        }
    }

    /// A guard wired against this environment's stores.
    pub fn guard(&self, config: GuardConfig) -> RequestGuard {
        RequestGuard::new(
            self.decoder.clone(),
            self.revocation.clone(),
            self.limiter.clone(),
            config,
        )
    }

    /// An OTP service over a fresh in-memory repository.
    pub fn otp_service() -> (OtpService, Arc<MemoryOtpRepository>) {
        let repo = Arc::new(MemoryOtpRepository::default());
        (OtpService::new(repo.clone()), repo)
    }
}

pub fn make_user(tenant_id: Uuid, account: &AccountService) -> User {
    let hash = account
        .hasher()
        .hash_password(TEST_PASSWORD)
        .expect("hashing test password");
    User {
        id: Uuid::new_v4(),
        tenant_id,
        email: "user@example.com".into(),
        username: "user".into(),
        password_hash: hash,
        roles: vec!["member".into()],
        permissions: vec!["REPORTS:READ".into(), "USERS:ADMIN".into()],
        status: UserStatus::Active,
        failed_login_attempts: 0,
        locked_until: None,
        require_mfa: false,
        last_login_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
