//! Google Calendar v3 客户端
//!
//! 通过 reqwest 直连 REST 端点（calendars/<id>/events），Bearer 令牌鉴权；
//! OAuth 授权流程不在本层（令牌由配置/环境注入）。非 2xx 一律转为类型化 CalendarError，
//! 本层不做任何自动重试——重试策略归调用方。

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::CalendarSection;

/// 日历服务错误
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("calendar service is not authenticated")]
    Unauthenticated,

    #[error("calendar event not found: {0}")]
    NotFound(String),

    #[error("calendar service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("calendar transport error: {0}")]
    Transport(String),
}

/// 对外部日历服务的窄接口；执行器与测试替身都走这里
#[async_trait]
pub trait CalendarApi: Send + Sync {
    async fn insert(&self, event_body: &Value) -> Result<Value, CalendarError>;

    async fn search(
        &self,
        query: &str,
        time_min: &str,
        time_max: &str,
        max_results: u32,
    ) -> Result<Vec<Value>, CalendarError>;

    async fn update(&self, event_id: &str, partial_body: &Value) -> Result<Value, CalendarError>;

    async fn delete(&self, event_id: &str) -> Result<(), CalendarError>;
}

/// Google Calendar 客户端：持有 HTTP 连接池、端点与令牌
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    base_url: String,
    calendar_id: String,
    token: Option<String>,
}

impl GoogleCalendarClient {
    pub fn new(cfg: &CalendarSection) -> Self {
        let token = cfg
            .token
            .clone()
            .or_else(|| std::env::var("GOOGLE_CALENDAR_TOKEN").ok());
        Self {
            http: reqwest::Client::new(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            calendar_id: cfg.calendar_id.clone(),
            token,
        }
    }

    fn bearer(&self) -> Result<&str, CalendarError> {
        self.token.as_deref().ok_or(CalendarError::Unauthenticated)
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, self.calendar_id)
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), event_id)
    }

    /// 非 2xx 响应映射为类型化错误：401/403 视为鉴权失效，404 为事件不存在
    async fn error_for(event_id: Option<&str>, resp: reqwest::Response) -> CalendarError {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        match status {
            401 | 403 => CalendarError::Unauthenticated,
            404 => CalendarError::NotFound(event_id.unwrap_or("(unknown)").to_string()),
            _ => CalendarError::Status { status, message },
        }
    }

    async fn json_or_error(
        event_id: Option<&str>,
        resp: reqwest::Response,
    ) -> Result<Value, CalendarError> {
        if !resp.status().is_success() {
            return Err(Self::error_for(event_id, resp).await);
        }
        resp.json::<Value>()
            .await
            .map_err(|e| CalendarError::Transport(e.to_string()))
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn insert(&self, event_body: &Value) -> Result<Value, CalendarError> {
        let token = self.bearer()?;
        let resp = self
            .http
            .post(self.events_url())
            .bearer_auth(token)
            .json(event_body)
            .send()
            .await
            .map_err(|e| CalendarError::Transport(e.to_string()))?;
        Self::json_or_error(None, resp).await
    }

    async fn search(
        &self,
        query: &str,
        time_min: &str,
        time_max: &str,
        max_results: u32,
    ) -> Result<Vec<Value>, CalendarError> {
        let token = self.bearer()?;
        let resp = self
            .http
            .get(self.events_url())
            .bearer_auth(token)
            .query(&[
                ("q", query),
                ("timeMin", time_min),
                ("timeMax", time_max),
                ("maxResults", &max_results.to_string()),
                // 展开周期性事件，按开始时间升序
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await
            .map_err(|e| CalendarError::Transport(e.to_string()))?;
        let payload = Self::json_or_error(None, resp).await?;
        let items = payload
            .get("items")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        Ok(items)
    }

    async fn update(&self, event_id: &str, partial_body: &Value) -> Result<Value, CalendarError> {
        let token = self.bearer()?;
        // PATCH：请求中缺席的字段服务器端保持不变
        let resp = self
            .http
            .patch(self.event_url(event_id))
            .bearer_auth(token)
            .json(partial_body)
            .send()
            .await
            .map_err(|e| CalendarError::Transport(e.to_string()))?;
        Self::json_or_error(Some(event_id), resp).await
    }

    async fn delete(&self, event_id: &str) -> Result<(), CalendarError> {
        let token = self.bearer()?;
        let resp = self
            .http
            .delete(self.event_url(event_id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| CalendarError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Self::error_for(Some(event_id), resp).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_is_unauthenticated() {
        let cfg = CalendarSection {
            token: None,
            ..CalendarSection::default()
        };
        // 环境变量可能在 CI 注入，跳过这种情况
        if std::env::var("GOOGLE_CALENDAR_TOKEN").is_ok() {
            return;
        }
        let client = GoogleCalendarClient::new(&cfg);
        let err = client.delete("abc").await.unwrap_err();
        assert!(matches!(err, CalendarError::Unauthenticated));
    }

    #[test]
    fn test_event_url_joins_calendar_id() {
        let cfg = CalendarSection {
            base_url: "https://example.test/v3/".into(),
            calendar_id: "primary".into(),
            token: Some("t".into()),
            max_results: 5,
        };
        let client = GoogleCalendarClient::new(&cfg);
        assert_eq!(
            client.event_url("abc123"),
            "https://example.test/v3/calendars/primary/events/abc123"
        );
    }
}
