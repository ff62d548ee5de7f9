//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `BILLA__*` 覆盖（双下划线表示嵌套，如 `BILLA__LLM__MODEL=gpt-4o`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub llm: LlmSection,
    pub calendar: CalendarSection,
    pub profiles: ProfilesSection,
}

/// [app] 段：应用名、对话轮数上限、会话过期时间
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: Option<String>,
    /// 对话历史保留轮数（单个会话）
    #[serde(default = "default_max_context_turns")]
    pub max_context_turns: usize,
    /// 会话空闲过期时间（秒）
    #[serde(default = "default_session_timeout_secs")]
    pub session_timeout_secs: u64,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: None,
            max_context_turns: default_max_context_turns(),
            session_timeout_secs: default_session_timeout_secs(),
        }
    }
}

fn default_max_context_turns() -> usize {
    20
}

fn default_session_timeout_secs() -> u64 {
    3600
}

/// [llm] 段：模型、端点与采样参数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    #[serde(default = "default_model")]
    pub model: String,
    /// OpenAI 兼容端点；未设置时用官方默认
    pub base_url: Option<String>,
    /// API Key；未设置时回退到环境变量 OPENAI_API_KEY
    pub api_key: Option<String>,
    /// 固定采样温度
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// 单次补全输出上限（token）
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: None,
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

/// [calendar] 段：端点、日历 ID、凭证与查询结果上限
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CalendarSection {
    #[serde(default = "default_calendar_base_url")]
    pub base_url: String,
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    /// Bearer 访问令牌；未设置时回退到环境变量 GOOGLE_CALENDAR_TOKEN
    pub token: Option<String>,
    /// find_event 单次返回的最大条数
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl Default for CalendarSection {
    fn default() -> Self {
        Self {
            base_url: default_calendar_base_url(),
            calendar_id: default_calendar_id(),
            token: None,
            max_results: default_max_results(),
        }
    }
}

fn default_calendar_base_url() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

fn default_max_results() -> u32 {
    5
}

/// [profiles] 段：用户画像 TOML 文件所在目录
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProfilesSection {
    #[serde(default = "default_profiles_dir")]
    pub dir: PathBuf,
}

impl Default for ProfilesSection {
    fn default() -> Self {
        Self {
            dir: default_profiles_dir(),
        }
    }
}

fn default_profiles_dir() -> PathBuf {
    PathBuf::from("profiles")
}

/// 从 config 目录加载配置，环境变量 BILLA__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 BILLA__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("BILLA")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.llm.temperature, 0.7);
        assert_eq!(cfg.llm.max_tokens, 500);
        assert_eq!(cfg.calendar.calendar_id, "primary");
        assert_eq!(cfg.calendar.max_results, 5);
        assert_eq!(cfg.app.max_context_turns, 20);
        assert_eq!(cfg.app.session_timeout_secs, 3600);
    }

    #[test]
    fn test_missing_app_section_keeps_session_bounds() {
        // 没有 [app] 段时走 AppSection::default()，轮数与过期时间不能归零
        let cfg: AppConfig = toml::from_str(
            r#"
            [llm]
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.app.max_context_turns, 20);
        assert_eq!(cfg.app.session_timeout_secs, 3600);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [llm]
            model = "gpt-4o-mini"

            [calendar]
            max_results = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.llm.model, "gpt-4o-mini");
        assert_eq!(cfg.llm.temperature, 0.7);
        assert_eq!(cfg.calendar.max_results, 3);
    }
}
