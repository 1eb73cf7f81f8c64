#![allow(dead_code)]

use herald::{BoxError, Dispatcher, Response, Subscriber};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Dispatcher Types
// ============================================================================

pub type TextDispatcher = Dispatcher<String, String>;

pub fn text(value: &str) -> herald::Payload<String> {
    herald::Payload::Single(value.to_string())
}

pub fn values(items: &[&str]) -> Vec<Option<String>> {
    items.iter().map(|item| Some(item.to_string())).collect()
}

// ============================================================================
// Test Subscribers
// ============================================================================

/// Answers `"{first arg} {suffix}"`.
pub fn suffixer(suffix: &'static str) -> impl Fn(&[String]) -> Option<String> + Send + Sync + 'static {
    move |args: &[String]| Some(format!("{} {suffix}", args[0]))
}

pub struct OrderRecordingSubscriber {
    pub id: usize,
    pub order: Arc<Mutex<Vec<usize>>>,
}

impl Subscriber<String, String> for OrderRecordingSubscriber {
    fn invoke(&self, _args: &[String]) -> Result<Response<String>, BoxError> {
        self.order.lock().unwrap().push(self.id);
        Ok(Response::Value(self.id.to_string()))
    }
}

pub struct CountingResponder {
    pub call_count: Arc<AtomicUsize>,
    pub response: Response<String>,
}

impl Subscriber<String, String> for CountingResponder {
    fn invoke(&self, _args: &[String]) -> Result<Response<String>, BoxError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}
