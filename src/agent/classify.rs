//! 规划回复分类器
//!
//! 对规划角色的回复做首个命中生效的三分类：终结标记 / 日历意图触发短语 / 普通回答。
//! 触发短语是廉价的本地门控，避免每一轮都调用工具翻译角色。
//! 注意：没有标记也没有触发短语的回复会被当作终结性普通回答——模型若用了
//! 意料之外的措辞表达「还想继续」，这一轮也会提前收尾。这是沿袭下来的已知
//! 识别精度缺口，不是缺陷修复对象。

/// 终结标记：回复中出现即进入 FINAL
pub const FINAL_ANSWER_MARKER: &str = "FINAL ANSWER:";

/// 日历意图触发短语（小写匹配）
const TRIGGER_PHRASES: &[&str] = &[
    "check the calendar",
    "checking the calendar",
    "check your calendar",
    "checking your calendar",
    "search the calendar",
    "searching the calendar",
    "find an event",
    "finding an event",
    "find the event",
    "create an event",
    "creating an event",
    "create the event",
    "add an event",
    "adding an event",
    "schedule an event",
    "scheduling an event",
    "delete an event",
    "deleting an event",
    "delete the event",
    "update an event",
    "updating an event",
    "update the event",
];

/// 分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyClass {
    /// 带终结标记：载荷是剥掉标记并去除首尾空白后的回答
    Final(String),
    /// 命中触发短语：进入工具翻译
    ToolIntent,
    /// 兜底终结路径：回复本身就是给用户的回答
    PlainAnswer,
}

/// 分类规划回复；标记优先于触发短语
pub fn classify_reply(reply: &str) -> ReplyClass {
    if let Some(idx) = reply.find(FINAL_ANSWER_MARKER) {
        let answer = reply[idx + FINAL_ANSWER_MARKER.len()..].trim().to_string();
        return ReplyClass::Final(answer);
    }
    let lower = reply.to_lowercase();
    if TRIGGER_PHRASES.iter().any(|p| lower.contains(p)) {
        ReplyClass::ToolIntent
    } else {
        ReplyClass::PlainAnswer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_marker_strips_and_trims() {
        let out = classify_reply("Let me confirm. FINAL ANSWER:  Sounds good!  ");
        assert_eq!(out, ReplyClass::Final("Sounds good!".to_string()));
    }

    #[test]
    fn test_marker_wins_over_trigger_phrase() {
        let out = classify_reply("FINAL ANSWER: I will check the calendar tomorrow.");
        assert!(matches!(out, ReplyClass::Final(_)));
    }

    #[test]
    fn test_trigger_phrase_detected_case_insensitive() {
        assert_eq!(
            classify_reply("Sure! I'm Creating an Event for your appointment."),
            ReplyClass::ToolIntent
        );
        assert_eq!(
            classify_reply("Let me check the calendar for you."),
            ReplyClass::ToolIntent
        );
    }

    #[test]
    fn test_plain_answer_fallback() {
        assert_eq!(
            classify_reply("You have a lovely day ahead!"),
            ReplyClass::PlainAnswer
        );
    }
}
