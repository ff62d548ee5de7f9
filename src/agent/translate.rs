//! Tool Schema Validator：工具翻译角色输出 -> 类型化工具调用
//!
//! 剥掉 Markdown 代码围栏后解析 JSON，把 {"tool_name": ..., "parameters": {...}}
//! 校验成五种固定参数形状之一。整体解析失败视为普通自由文本（不是错误）；
//! 已知工具但必填字段缺失/类型错误给出逐字段的 Validation；未知工具名是
//! 类型化的 UnknownTool——对该步骤终结，对会话不终结。本模块是纯函数，无副作用。

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::calendar::{
    DeleteEventRequest, EventCreateRequest, EventUpdateRequest, FindEventRequest,
};
use crate::core::AgentError;

/// reply_text 的参数形状
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyTextRequest {
    pub text: String,
}

/// 五种固定工具形状上的带标签联合；序列化格式与翻译角色的输出一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool_name", content = "parameters", rename_all = "snake_case")]
pub enum ToolInvocation {
    CreateEvent(EventCreateRequest),
    FindEvent(FindEventRequest),
    UpdateEvent(EventUpdateRequest),
    DeleteEvent(DeleteEventRequest),
    ReplyText(ReplyTextRequest),
}

impl ToolInvocation {
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolInvocation::CreateEvent(_) => "create_event",
            ToolInvocation::FindEvent(_) => "find_event",
            ToolInvocation::UpdateEvent(_) => "update_event",
            ToolInvocation::DeleteEvent(_) => "delete_event",
            ToolInvocation::ReplyText(_) => "reply_text",
        }
    }
}

/// 校验结果：要么是自由文本（原样作为回答），要么是一条类型化工具调用
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCommand {
    FreeText(String),
    Invocation(ToolInvocation),
}

/// 解析并校验工具翻译角色的原始输出
pub fn parse_tool_invocation(raw: &str) -> Result<ParsedCommand, AgentError> {
    let json_str = extract_json_block(raw);
    let Some(json_str) = json_str else {
        return Ok(ParsedCommand::FreeText(raw.trim().to_string()));
    };

    let value: Value = match serde_json::from_str(json_str) {
        Ok(v) => v,
        // JSON 坏掉：整串当普通文本处理
        Err(_) => return Ok(ParsedCommand::FreeText(raw.trim().to_string())),
    };
    let Some(obj) = value.as_object() else {
        return Ok(ParsedCommand::FreeText(raw.trim().to_string()));
    };

    let tool_name = obj
        .get("tool_name")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if tool_name.is_empty() {
        // 合法 JSON 但不是工具调用
        return Ok(ParsedCommand::FreeText(raw.trim().to_string()));
    }
    let params = obj.get("parameters").cloned().unwrap_or_else(|| json!({}));

    let invocation = match tool_name.as_str() {
        "create_event" => {
            require_fields(&tool_name, &params, &["summary", "start", "end"])?;
            let req: EventCreateRequest = from_params(&tool_name, params)?;
            require_window_fields(&tool_name, &req)?;
            ToolInvocation::CreateEvent(req)
        }
        "find_event" => {
            require_fields(&tool_name, &params, &["query", "timeMin", "timeMax"])?;
            ToolInvocation::FindEvent(from_params(&tool_name, params)?)
        }
        "update_event" => {
            require_fields(&tool_name, &params, &["event_id"])?;
            ToolInvocation::UpdateEvent(from_params(&tool_name, params)?)
        }
        "delete_event" => {
            require_fields(&tool_name, &params, &["event_id"])?;
            ToolInvocation::DeleteEvent(from_params(&tool_name, params)?)
        }
        "reply_text" => {
            require_fields(&tool_name, &params, &["text"])?;
            ToolInvocation::ReplyText(from_params(&tool_name, params)?)
        }
        other => return Err(AgentError::UnknownTool(other.to_string())),
    };
    Ok(ParsedCommand::Invocation(invocation))
}

/// 提取 JSON 块：```json 围栏优先，其次最外层花括号区间；都没有则返回 None
fn extract_json_block(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + 7..];
        return Some(
            rest.find("```")
                .map(|end| rest[..end].trim())
                .unwrap_or(rest.trim()),
        );
    }
    if let Some(start) = trimmed.find("```") {
        let rest = &trimmed[start + 3..];
        return Some(
            rest.find("```")
                .map(|end| rest[..end].trim())
                .unwrap_or(rest.trim()),
        );
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| &trimmed[start..=end])
}

/// 必填键检查，逐字段收集缺失信息
fn require_fields(tool: &str, params: &Value, required: &[&str]) -> Result<(), AgentError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|key| params.get(**key).map_or(true, Value::is_null))
        .map(|key| format!("missing required field: {key}"))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AgentError::Validation {
            tool: tool.to_string(),
            fields: missing,
        })
    }
}

fn from_params<T: serde::de::DeserializeOwned>(tool: &str, params: Value) -> Result<T, AgentError> {
    serde_json::from_value(params).map_err(|e| AgentError::Validation {
        tool: tool.to_string(),
        fields: vec![e.to_string()],
    })
}

/// create_event 要求 start/end 各自带 dateTime + timeZone
fn require_window_fields(tool: &str, req: &EventCreateRequest) -> Result<(), AgentError> {
    let mut fields = Vec::new();
    for (label, edt) in [("start", &req.start), ("end", &req.end)] {
        if edt.date_time.is_none() {
            fields.push(format!("missing required field: {label}.dateTime"));
        }
        if edt.time_zone.is_none() {
            fields.push(format!("missing required field: {label}.timeZone"));
        }
    }
    if fields.is_empty() {
        Ok(())
    } else {
        Err(AgentError::Validation {
            tool: tool.to_string(),
            fields,
        })
    }
}
