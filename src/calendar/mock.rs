//! Mock 日历服务（用于测试，无需网络）
//!
//! 记录全部调用并返回可配置的结果；delete 对 missing_ids 中的 id 返回 NotFound，
//! 模拟「重复删除已删除事件」时外部服务的行为。

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::calendar::{CalendarApi, CalendarError};

#[derive(Debug, Default)]
pub struct MockCalendarApi {
    pub inserted: Mutex<Vec<Value>>,
    pub updated: Mutex<Vec<(String, Value)>>,
    pub deleted: Mutex<Vec<String>>,
    /// search 的预设返回
    pub search_results: Mutex<Vec<Value>>,
    /// delete 时视为不存在的 id
    pub missing_ids: Mutex<HashSet<String>>,
    /// 为 true 时所有调用返回 Unauthenticated
    pub unauthenticated: Mutex<bool>,
}

impl MockCalendarApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_results(results: Vec<Value>) -> Self {
        let mock = Self::default();
        *mock.search_results.lock().unwrap() = results;
        mock
    }

    pub fn call_count(&self) -> usize {
        self.inserted.lock().unwrap().len()
            + self.updated.lock().unwrap().len()
            + self.deleted.lock().unwrap().len()
    }

    fn check_auth(&self) -> Result<(), CalendarError> {
        if *self.unauthenticated.lock().unwrap() {
            Err(CalendarError::Unauthenticated)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CalendarApi for MockCalendarApi {
    async fn insert(&self, event_body: &Value) -> Result<Value, CalendarError> {
        self.check_auth()?;
        self.inserted.lock().unwrap().push(event_body.clone());
        let mut created = event_body.clone();
        if let Some(obj) = created.as_object_mut() {
            obj.insert("id".into(), json!("evt_1"));
            obj.insert(
                "htmlLink".into(),
                json!("https://calendar.google.com/event?eid=evt_1"),
            );
        }
        Ok(created)
    }

    async fn search(
        &self,
        _query: &str,
        _time_min: &str,
        _time_max: &str,
        max_results: u32,
    ) -> Result<Vec<Value>, CalendarError> {
        self.check_auth()?;
        let results = self.search_results.lock().unwrap().clone();
        Ok(results.into_iter().take(max_results as usize).collect())
    }

    async fn update(&self, event_id: &str, partial_body: &Value) -> Result<Value, CalendarError> {
        self.check_auth()?;
        self.updated
            .lock()
            .unwrap()
            .push((event_id.to_string(), partial_body.clone()));
        let mut updated = partial_body.clone();
        if let Some(obj) = updated.as_object_mut() {
            obj.insert("id".into(), json!(event_id));
        }
        Ok(updated)
    }

    async fn delete(&self, event_id: &str) -> Result<(), CalendarError> {
        self.check_auth()?;
        if self.missing_ids.lock().unwrap().contains(event_id) {
            return Err(CalendarError::NotFound(event_id.to_string()));
        }
        self.deleted.lock().unwrap().push(event_id.to_string());
        Ok(())
    }
}
