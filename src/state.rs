//! Application state: the in-memory session registry, prompts, and model gateway.
//!
//! This module owns:
//!   - quiz sessions by id (transient, never persisted)
//!   - the prompts struct (from TOML or defaults)
//!   - the model gateway (OpenAI if configured, otherwise an always-failing stub)
//!
//! Locking: the registry lock is only held to look up, insert or remove a handle.
//! Each session has its own mutex, held for a whole action including the gateway
//! call, so actions on one session run one at a time.
//!
//! Lifetime: a session not touched for `session_ttl` (env SESSION_TTL_SECS,
//! default 30 min) is gone. Expired entries are dropped on lookup, swept on
//! every `create_session`, and swept periodically by `spawn_session_sweeper`.

use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::{load_agent_config_from_env, Prompts};
use crate::gateway::{ModelGateway, Unconfigured};
use crate::openai::OpenAI;
use crate::quiz::QuizSession;

const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub type SessionHandle = Arc<Mutex<QuizSession>>;

pub struct SessionEntry {
    handle: SessionHandle,
    last_seen: Instant,
}

impl SessionEntry {
    fn expired(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.last_seen) > ttl
    }
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    pub session_ttl: Duration,
    pub gateway: Arc<dyn ModelGateway>,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load config, init the OpenAI gateway, read the session TTL.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let prompts = load_agent_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        let gateway: Arc<dyn ModelGateway> = match OpenAI::from_env() {
            Some(oa) => {
                info!(target: "studybuddy_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
                Arc::new(oa)
            }
            None => {
                info!(target: "studybuddy_backend", "OpenAI disabled (no OPENAI_API_KEY). Quiz generation will fail until configured.");
                Arc::new(Unconfigured)
            }
        };

        let ttl_secs = std::env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_SESSION_TTL_SECS);
        info!(target: "studybuddy_backend", ttl_secs, "Session TTL configured");

        Self::with_gateway(gateway, prompts).with_session_ttl(Duration::from_secs(ttl_secs))
    }

    pub fn with_gateway(gateway: Arc<dyn ModelGateway>, prompts: Prompts) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            gateway,
            prompts,
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Register a fresh `Empty` session and return its id and handle.
    /// Idle sessions are swept first so the registry cannot grow without bound.
    #[instrument(level = "debug", skip(self))]
    pub async fn create_session(&self) -> (String, SessionHandle) {
        let id = Uuid::new_v4().to_string();
        let handle: SessionHandle = Arc::new(Mutex::new(QuizSession::default()));
        let (live, evicted) = {
            let mut sessions = self.sessions.write().await;
            let evicted = evict_expired(&mut sessions, self.session_ttl);
            sessions.insert(id.clone(), SessionEntry { handle: handle.clone(), last_seen: Instant::now() });
            (sessions.len(), evicted)
        };
        info!(target: "quiz", session_id = %id, live, evicted, "Session created");
        (id, handle)
    }

    /// Look up a session and mark it as used. An idle one is dropped instead.
    pub async fn session(&self, id: &str) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let entry = sessions.get_mut(id)?;
        if entry.expired(now, self.session_ttl) {
            sessions.remove(id);
            info!(target: "quiz", session_id = %id, "Session expired");
            return None;
        }
        entry.last_seen = now;
        Some(entry.handle.clone())
    }

    /// Drop a session. Returns false if the id was unknown.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn remove_session(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!(target: "quiz", session_id = %id, "Session removed");
        }
        removed
    }

    /// Drop every idle session; returns how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        evict_expired(&mut sessions, self.session_ttl)
    }

    /// Periodic sweep so idle sessions go away even when nobody creates new ones.
    pub fn spawn_session_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let state = Arc::clone(self);
        let period = state.session_ttl.min(MAX_SWEEP_INTERVAL);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = state.sweep_expired().await;
                if evicted > 0 {
                    info!(target: "quiz", evicted, "Swept idle sessions");
                }
            }
        })
    }
}

fn evict_expired(sessions: &mut HashMap<String, SessionEntry>, ttl: Duration) -> usize {
    let now = Instant::now();
    let before = sessions.len();
    sessions.retain(|_, entry| !entry.expired(now, ttl));
    before - sessions.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sessions_are_independent() {
        let state = AppState::with_gateway(Arc::new(Unconfigured), Prompts::default());
        let (a, ha) = state.create_session().await;
        let (b, _) = state.create_session().await;
        assert_ne!(a, b);

        *ha.lock().await = QuizSession::AwaitingTopic;
        let hb = state.session(&b).await.unwrap();
        assert_eq!(*hb.lock().await, QuizSession::Empty);
    }

    #[tokio::test]
    async fn removed_sessions_are_gone() {
        let state = AppState::with_gateway(Arc::new(Unconfigured), Prompts::default());
        let (id, _) = state.create_session().await;
        assert!(state.remove_session(&id).await);
        assert!(!state.remove_session(&id).await);
        assert!(state.session(&id).await.is_none());
    }

    #[tokio::test]
    async fn idle_session_is_dropped_on_lookup() {
        let state = AppState::with_gateway(Arc::new(Unconfigured), Prompts::default())
            .with_session_ttl(Duration::from_millis(50));
        let (id, _) = state.create_session().await;
        assert!(state.session(&id).await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(state.session(&id).await.is_none());
        assert!(state.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn lookups_keep_a_session_alive() {
        let state = AppState::with_gateway(Arc::new(Unconfigured), Prompts::default())
            .with_session_ttl(Duration::from_millis(200));
        let (id, _) = state.create_session().await;
        for _ in 0..4 {
            tokio::time::sleep(Duration::from_millis(80)).await;
            assert!(state.session(&id).await.is_some());
        }
    }

    #[tokio::test]
    async fn creating_a_session_sweeps_idle_ones() {
        let state = AppState::with_gateway(Arc::new(Unconfigured), Prompts::default())
            .with_session_ttl(Duration::from_millis(50));
        for _ in 0..5 {
            state.create_session().await;
        }
        tokio::time::sleep(Duration::from_millis(120)).await;

        let (fresh, _) = state.create_session().await;
        let sessions = state.sessions.read().await;
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key(&fresh));
    }

    #[tokio::test]
    async fn sweeper_task_evicts_without_new_sessions() {
        let state = Arc::new(
            AppState::with_gateway(Arc::new(Unconfigured), Prompts::default())
                .with_session_ttl(Duration::from_millis(30)),
        );
        state.create_session().await;
        let sweeper = state.spawn_session_sweeper();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(state.sessions.read().await.is_empty());
        sweeper.abort();
    }

    #[tokio::test]
    async fn unconfigured_gateway_keeps_session_awaiting_topic() {
        let state = AppState::with_gateway(Arc::new(Unconfigured), Prompts::default());
        let (_, handle) = state.create_session().await;
        let mut session = handle.lock().await;
        let err = session
            .start_generation("Photosynthesis", state.gateway.as_ref(), &state.prompts)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "gateway_error");
        assert_eq!(*session, QuizSession::AwaitingTopic);
    }
}
