//! 日历动作执行器
//!
//! 一种工具对应一个操作：create / find / update / delete。入参是已通过
//! 形状校验的请求，这里只再守住业务不变量（end 必须严格晚于 start，且校验
//! 失败时不发起远程调用），把结果归一化为 CalendarEventResult，并为每次
//! 调用输出结构化审计日志（JSON）。远程失败原样上抛为 CalendarError，不重试。

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde_json::{json, Value};

use crate::calendar::{
    CalendarApi, CalendarEventResult, DeleteEventRequest, EventCreateRequest, EventDateTime,
    EventUpdateRequest, FindEventRequest,
};
use crate::core::AgentError;

/// 执行器：持有日历服务句柄与查询结果上限
pub struct CalendarExecutor {
    api: Arc<dyn CalendarApi>,
    max_results: u32,
}

impl CalendarExecutor {
    pub fn new(api: Arc<dyn CalendarApi>, max_results: u32) -> Self {
        Self { api, max_results }
    }

    /// 创建事件；end <= start 直接拒绝（报错，不做静默纠正），不触达远程
    pub async fn create_event(
        &self,
        req: &EventCreateRequest,
    ) -> Result<CalendarEventResult, AgentError> {
        validate_window(&req.start, &req.end)?;

        let body = serde_json::to_value(req).expect("event request serializes");
        let started = Instant::now();
        let result = self.api.insert(&body).await;
        audit("create_event", result.is_ok(), started);
        Ok(CalendarEventResult::from_raw(result?))
    }

    /// 查询事件：窗口受 timeMin/timeMax 约束，按开始时间升序，条数上限 max_results
    pub async fn find_events(
        &self,
        req: &FindEventRequest,
    ) -> Result<Vec<CalendarEventResult>, AgentError> {
        let started = Instant::now();
        let result = self
            .api
            .search(&req.query, &req.time_min, &req.time_max, self.max_results)
            .await;
        audit("find_event", result.is_ok(), started);
        Ok(result?
            .into_iter()
            .map(CalendarEventResult::from_raw)
            .collect())
    }

    /// 部分更新：请求中缺席的字段服务器端保持不变
    pub async fn update_event(
        &self,
        req: &EventUpdateRequest,
    ) -> Result<CalendarEventResult, AgentError> {
        let mut body = serde_json::to_value(req).expect("event request serializes");
        if let Some(obj) = body.as_object_mut() {
            // event_id 走 URL，不进请求体
            obj.remove("event_id");
        }
        let started = Instant::now();
        let result = self.api.update(&req.event_id, &body).await;
        audit("update_event", result.is_ok(), started);
        Ok(CalendarEventResult::from_raw(result?))
    }

    /// 删除事件；重复删除已删除的 id 会原样上报外部服务的 not-found，不重试
    pub async fn delete_event(&self, req: &DeleteEventRequest) -> Result<Value, AgentError> {
        let started = Instant::now();
        let result = self.api.delete(&req.event_id).await;
        audit("delete_event", result.is_ok(), started);
        result?;
        Ok(json!({ "deleted": true, "event_id": req.event_id }))
    }
}

/// 事件时间戳的两种形态：带偏移（RFC3339）或无偏移的本地墙钟。
/// 两种形态不在同一时间参照系内，不可跨形态比较。
enum EventInstant {
    Offset(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

/// create 的时间窗不变量：start/end 都必须带可解析的 dateTime（仅 date 的整日值不可创建），
/// 两者形态一致，且 end 严格晚于 start。任何一条不满足都在触达远程之前拒绝。
fn validate_window(start: &EventDateTime, end: &EventDateTime) -> Result<(), AgentError> {
    let mut fields = Vec::new();
    let start_dt = start.date_time.as_deref().and_then(parse_event_instant);
    if start_dt.is_none() {
        fields.push("start.dateTime must be a valid timestamp".to_string());
    }
    let end_dt = end.date_time.as_deref().and_then(parse_event_instant);
    if end_dt.is_none() {
        fields.push("end.dateTime must be a valid timestamp".to_string());
    }

    let ordered = match (start_dt, end_dt) {
        (Some(EventInstant::Offset(s)), Some(EventInstant::Offset(e))) => Some(e > s),
        (Some(EventInstant::Naive(s)), Some(EventInstant::Naive(e))) => Some(e > s),
        (Some(_), Some(_)) => {
            fields.push(
                "start.dateTime and end.dateTime must not mix offset and offset-less forms"
                    .to_string(),
            );
            None
        }
        _ => None,
    };
    if ordered == Some(false) {
        fields.push("end.dateTime must be strictly after start.dateTime".to_string());
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AgentError::Validation {
            tool: "create_event".to_string(),
            fields,
        })
    }
}

/// 解析事件时间戳：先试 RFC3339（带偏移），再试无偏移的本地墙钟格式
fn parse_event_instant(s: &str) -> Option<EventInstant> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(EventInstant::Offset(dt));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .map(EventInstant::Naive)
}

fn audit(tool: &str, ok: bool, started: Instant) {
    let audit = json!({
        "event": "calendar_audit",
        "tool": tool,
        "ok": ok,
        "duration_ms": started.elapsed().as_millis() as u64,
    });
    tracing::info!(audit = %audit.to_string(), "calendar");
}
