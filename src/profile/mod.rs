//! 用户画像
//!
//! 每个用户一个 TOML 文件（profiles/<user>.toml），会话创建时加载一次，只读输入，
//! 编排循环不会修改它；画像内容拼入规划角色的 system prompt。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::AgentError;

/// 工作时间段（本地时间，HH:MM）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHours {
    pub start: String,
    pub end: String,
}

/// 用户画像：名字、IANA 时区、工作时间、按重要性排序的优先级
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub timezone: String,
    pub work_hours: WorkHours,
    #[serde(default)]
    pub priorities: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "friend".to_string(),
            timezone: "Europe/Berlin".to_string(),
            work_hours: WorkHours {
                start: "09:00".to_string(),
                end: "17:00".to_string(),
            },
            priorities: Vec::new(),
        }
    }
}

/// 基于目录的画像存储：load(username) 读取 <dir>/<username>.toml
pub struct FileProfileStore {
    root: PathBuf,
}

impl FileProfileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, username: &str) -> Result<UserProfile, AgentError> {
        // 用户键来自外部输入，只允许落在 profiles 目录内的简单文件名
        if username.is_empty()
            || !username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(AgentError::ProfileNotFound(username.to_string()));
        }
        let path = self.root.join(format!("{username}.toml"));
        let raw = std::fs::read_to_string(&path)
            .map_err(|_| AgentError::ProfileNotFound(username.to_string()))?;
        toml::from_str(&raw)
            .map_err(|e| AgentError::Config(format!("profile '{username}' is malformed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_profile() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join("maro.toml")).unwrap();
        writeln!(
            f,
            r#"
            name = "Maro"
            timezone = "Europe/Berlin"
            priorities = ["family", "deep work"]

            [work_hours]
            start = "09:00"
            end = "17:00"
            "#
        )
        .unwrap();

        let store = FileProfileStore::new(dir.path());
        let profile = store.load("maro").unwrap();
        assert_eq!(profile.name, "Maro");
        assert_eq!(profile.timezone, "Europe/Berlin");
        assert_eq!(profile.priorities, vec!["family", "deep work"]);
    }

    #[test]
    fn test_missing_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProfileStore::new(dir.path());
        let err = store.load("ghost").unwrap_err();
        assert!(matches!(err, AgentError::ProfileNotFound(name) if name == "ghost"));
    }

    #[test]
    fn test_path_escape_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProfileStore::new(dir.path());
        assert!(matches!(
            store.load("../etc/passwd"),
            Err(AgentError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_profile_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.toml"), "name = ").unwrap();
        let store = FileProfileStore::new(dir.path());
        assert!(matches!(store.load("bad"), Err(AgentError::Config(_))));
    }
}
