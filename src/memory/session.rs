//! 会话管理
//!
//! 按用户键（不透明字符串）隔离会话：首次交互时创建并加载所选用户画像，
//! 之后同一用户复用同一会话。不同会话可完全并行；同一会话的两次轮次
//! 必须串行——memory 上的 tokio::Mutex 即是这把串行锁，编排循环在
//! 读取与写回之间假定独占访问。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};

use crate::core::AgentError;
use crate::memory::ConversationMemory;
use crate::profile::{FileProfileStore, UserProfile};

/// 单个会话：一份对话历史 + 一份只读用户画像
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub user_key: String,
    pub profile: UserProfile,
    /// 对话历史；同一会话的轮次串行化在这把锁上
    pub memory: Mutex<ConversationMemory>,
    pub created_at: Instant,
    last_active: std::sync::Mutex<Instant>,
}

impl Session {
    pub fn new(user_key: String, profile: UserProfile, max_turns: usize) -> Self {
        let id = format!("session_{}", uuid::Uuid::new_v4());
        Self {
            id,
            user_key,
            profile,
            memory: Mutex::new(ConversationMemory::new(max_turns)),
            created_at: Instant::now(),
            last_active: std::sync::Mutex::new(Instant::now()),
        }
    }

    /// 刷新活跃时间（成功结束一轮后调用）
    pub fn touch(&self) {
        if let Ok(mut t) = self.last_active.lock() {
            *t = Instant::now();
        }
    }

    /// 会话是否过期
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_active
            .lock()
            .map(|t| t.elapsed() > timeout)
            .unwrap_or(false)
    }
}

/// 会话存储：用户键 -> Session；会话不显式销毁，只随空闲过期清理
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    max_context_turns: usize,
    session_timeout: Duration,
}

impl SessionStore {
    pub fn new(max_context_turns: usize, session_timeout_secs: u64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_context_turns,
            session_timeout: Duration::from_secs(session_timeout_secs),
        }
    }

    /// 获取用户的会话；不存在时加载画像并创建
    pub async fn get_or_create(
        &self,
        user_key: &str,
        profiles: &FileProfileStore,
    ) -> Result<Arc<Session>, AgentError> {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(user_key) {
                return Ok(session.clone());
            }
        }

        let profile = profiles.load(user_key)?;
        let mut sessions = self.sessions.write().await;
        // 双检：写锁等待期间可能已有并发创建
        if let Some(session) = sessions.get(user_key) {
            return Ok(session.clone());
        }
        let session = Arc::new(Session::new(
            user_key.to_string(),
            profile,
            self.max_context_turns,
        ));
        sessions.insert(user_key.to_string(), session.clone());
        Ok(session)
    }

    pub async fn get(&self, user_key: &str) -> Option<Arc<Session>> {
        self.sessions.read().await.get(user_key).cloned()
    }

    /// 清理过期会话，返回清理条数
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(self.session_timeout))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            sessions.remove(key);
        }
        expired.len()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(20, 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn profile_store_with(name: &str) -> (tempfile::TempDir, FileProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join(format!("{name}.toml"))).unwrap();
        writeln!(
            f,
            r#"
            name = "Maro"
            timezone = "Europe/Berlin"
            priorities = ["family", "health"]

            [work_hours]
            start = "09:00"
            end = "17:00"
            "#
        )
        .unwrap();
        let store = FileProfileStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_same_user_reuses_session() {
        let (_dir, profiles) = profile_store_with("maro");
        let store = SessionStore::new(20, 3600);
        let a = store.get_or_create("maro", &profiles).await.unwrap();
        let b = store.get_or_create("maro", &profiles).await.unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(store.active_count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_profile_is_an_error() {
        let (_dir, profiles) = profile_store_with("maro");
        let store = SessionStore::new(20, 3600);
        let err = store.get_or_create("nobody", &profiles).await.unwrap_err();
        assert!(matches!(err, AgentError::ProfileNotFound(_)));
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let (_dir, profiles) = profile_store_with("maro");
        let store = SessionStore::new(20, 0);
        store.get_or_create("maro", &profiles).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert_eq!(store.cleanup_expired().await, 1);
        assert_eq!(store.active_count().await, 0);
    }
}
