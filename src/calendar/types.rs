//! 日历数据模型
//!
//! 线上格式对齐 Google Calendar API v3 的 Event 资源（dateTime/timeZone/htmlLink 等 camelCase 键）。
//! 请求模型承载工具参数的五种固定形状中的四种日历形状；CalendarEventResult 是对外部服务
//! 返回值的防御性裁剪——原始负载不保证可安全序列化，只保留我们认识的字段。

use serde::{Deserialize, Serialize};

/// 事件的开始/结束时间；创建与更新要求 dateTime + timeZone 同时在场（只有 date 的整日事件不可创建）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// create_event 的参数形状
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCreateRequest {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// find_event 的参数形状
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindEventRequest {
    pub query: String,
    pub time_min: String,
    pub time_max: String,
}

/// update_event 的参数形状：event_id 必填，其余字段缺省即「服务器端保持不变」
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventUpdateRequest {
    pub event_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDateTime>,
}

/// delete_event 的参数形状
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEventRequest {
    pub event_id: String,
}

/// create/update 后归一化的事件结果：只保留规划需要的字段子集
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarEventResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDateTime>,
}

impl CalendarEventResult {
    /// 从外部服务的原始负载裁剪；未知形状按空结果处理，不让不可信字段向上渗透
    pub fn from_raw(raw: serde_json::Value) -> Self {
        serde_json::from_value(raw).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_datetime_wire_keys_are_camel_case() {
        let edt = EventDateTime {
            date: None,
            date_time: Some("2024-01-02T15:00:00".into()),
            time_zone: Some("Europe/Berlin".into()),
        };
        let v = serde_json::to_value(&edt).unwrap();
        assert_eq!(v["dateTime"], "2024-01-02T15:00:00");
        assert_eq!(v["timeZone"], "Europe/Berlin");
    }

    #[test]
    fn test_result_drops_unknown_fields() {
        let raw = json!({
            "kind": "calendar#event",
            "etag": "\"33\"",
            "id": "abc123",
            "summary": "Dentist",
            "htmlLink": "https://calendar.google.com/event?eid=abc123",
            "organizer": {"email": "x@y.z"},
            "start": {"dateTime": "2024-01-02T15:00:00", "timeZone": "Europe/Berlin"},
            "end": {"dateTime": "2024-01-02T16:00:00", "timeZone": "Europe/Berlin"}
        });
        let result = CalendarEventResult::from_raw(raw);
        assert_eq!(result.summary.as_deref(), Some("Dentist"));
        assert_eq!(
            result.start.as_ref().unwrap().date_time.as_deref(),
            Some("2024-01-02T15:00:00")
        );
        let v = serde_json::to_value(&result).unwrap();
        assert!(v.get("organizer").is_none());
        assert!(v.get("etag").is_none());
    }
}
