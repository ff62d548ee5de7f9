//! Result Summarizer
//!
//! 把工具结果裁剪到规划所需的最小字段，再作为 OBSERVATION 写回对话，
//! 约束 prompt 随轮次增长。find_event 的结果每条只留 {summary, start, end}
//! （取 dateTime 值）；其余工具的结果原样通过。这是必经步骤，不是可选优化。

use serde_json::{json, Value};

/// 裁剪工具结果
pub fn summarize_result(tool_name: &str, result: &Value) -> Value {
    if tool_name != "find_event" {
        return result.clone();
    }
    let Some(items) = result.as_array() else {
        return result.clone();
    };
    let reduced: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "summary": item.get("summary").cloned().unwrap_or(Value::Null),
                "start": item.pointer("/start/dateTime").cloned().unwrap_or(Value::Null),
                "end": item.pointer("/end/dateTime").cloned().unwrap_or(Value::Null),
            })
        })
        .collect();
    Value::Array(reduced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_results_reduce_to_triples() {
        let raw = json!([
            {
                "id": "e1", "summary": "Dentist", "htmlLink": "https://x",
                "start": {"dateTime": "2024-01-02T15:00:00", "timeZone": "Europe/Berlin"},
                "end": {"dateTime": "2024-01-02T16:00:00", "timeZone": "Europe/Berlin"},
                "organizer": {"email": "a@b.c"}
            },
            {
                "id": "e2", "summary": "Standup",
                "start": {"dateTime": "2024-01-03T09:00:00"},
                "end": {"dateTime": "2024-01-03T09:15:00"}
            },
            {
                "id": "e3", "summary": "Lunch",
                "start": {"dateTime": "2024-01-03T12:00:00"},
                "end": {"dateTime": "2024-01-03T13:00:00"}
            }
        ]);
        let reduced = summarize_result("find_event", &raw);
        let items = reduced.as_array().unwrap();
        assert_eq!(items.len(), 3);
        for item in items {
            let obj = item.as_object().unwrap();
            assert_eq!(obj.len(), 3);
            assert!(obj.contains_key("summary"));
            assert!(obj.contains_key("start"));
            assert!(obj.contains_key("end"));
        }
        assert_eq!(items[0]["summary"], "Dentist");
        assert_eq!(items[0]["start"], "2024-01-02T15:00:00");
        assert_eq!(items[0]["end"], "2024-01-02T16:00:00");
    }

    #[test]
    fn test_other_tools_pass_through() {
        let raw = json!({"summary": "Dentist", "htmlLink": "https://x"});
        assert_eq!(summarize_result("create_event", &raw), raw);
        assert_eq!(summarize_result("delete_event", &raw), raw);
    }
}
