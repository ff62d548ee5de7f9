//! 规划 / 工具翻译两种角色的 system prompt
//!
//! 把推理（自由文本）与格式化（严格 JSON）拆成两次调用：单次调用同时承担
//! 两者会明显破坏结构化输出的稳定性。规划角色拼入用户画像与当前时间；
//! 翻译角色只拿到规划回复，输出一条工具调用 JSON。

use chrono::{DateTime, Utc};

use crate::agent::classify::FINAL_ANSWER_MARKER;
use crate::profile::UserProfile;

/// 规划角色（personal-assistant）的 system prompt
pub fn planner_system_prompt(profile: &UserProfile, now: DateTime<Utc>) -> String {
    let priorities = if profile.priorities.is_empty() {
        "(none given)".to_string()
    } else {
        profile.priorities.join(", ")
    };
    format!(
        "You are Billa the Bee, a cheerful and helpful personal scheduling assistant.\n\
         You are talking to {name}. Their timezone is {tz}; their working hours are \
         {wh_start}-{wh_end}; their priorities, most important first: {priorities}.\n\
         The current time is {now} (UTC).\n\
         \n\
         Think step by step about what the user needs.\n\
         - When you need to touch the calendar, say so plainly in one sentence, e.g. \
         \"I will check the calendar for ...\", \"I am creating an event for ...\", \
         \"I will delete an event ...\", \"I will update an event ...\".\n\
         - Lines starting with OBSERVATION: are results of calendar actions you already \
         took this turn; use them instead of acting again.\n\
         - When you have everything you need, give the user their answer on a line \
         starting with {marker} followed by the reply text.",
        name = profile.name,
        tz = profile.timezone,
        wh_start = profile.work_hours.start,
        wh_end = profile.work_hours.end,
        priorities = priorities,
        now = now.to_rfc3339(),
        marker = FINAL_ANSWER_MARKER,
    )
}

/// 工具翻译角色的 system prompt：只输出一条工具调用 JSON
pub fn translator_system_prompt(profile: &UserProfile, now: DateTime<Utc>) -> String {
    format!(
        "You translate an assistant's stated intention into exactly one tool call.\n\
         The user's timezone is {tz}. The current time is {now} (UTC).\n\
         Reply with a single JSON object and nothing else:\n\
         {{\"tool_name\": \"<name>\", \"parameters\": {{...}}}}\n\
         \n\
         Available tools:\n\
         - create_event: parameters {{\"summary\", \"description\"?, \"location\"?, \
         \"start\": {{\"dateTime\": \"YYYY-MM-DDTHH:MM:SS\", \"timeZone\": \"<IANA zone>\"}}, \
         \"end\": same shape}}\n\
         - find_event: parameters {{\"query\", \"timeMin\", \"timeMax\"}} (RFC3339 timestamps)\n\
         - update_event: parameters {{\"event_id\", \"summary\"?, \"description\"?, \
         \"location\"?, \"start\"?, \"end\"?}}\n\
         - delete_event: parameters {{\"event_id\"}}\n\
         - reply_text: parameters {{\"text\"}}\n\
         \n\
         Use the user's timezone for event times. end must be after start.",
        tz = profile.timezone,
        now = now.to_rfc3339(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_planner_prompt_mentions_profile_and_marker() {
        let profile = UserProfile::default();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let prompt = planner_system_prompt(&profile, now);
        assert!(prompt.contains("Europe/Berlin"));
        assert!(prompt.contains(FINAL_ANSWER_MARKER));
        assert!(prompt.contains("2024-01-01T00:00:00+00:00"));
    }

    #[test]
    fn test_translator_prompt_lists_all_five_tools() {
        let profile = UserProfile::default();
        let prompt = translator_system_prompt(&profile, Utc::now());
        for tool in [
            "create_event",
            "find_event",
            "update_event",
            "delete_event",
            "reply_text",
        ] {
            assert!(prompt.contains(tool), "missing {tool}");
        }
    }
}
