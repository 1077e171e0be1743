use std::sync::{Arc, Mutex};

use promptdag::errors::Result;
use promptdag::tasks::TaskSource;

/// In-memory task source whose payload can be swapped between imports.
#[derive(Debug, Clone, Default)]
pub struct StaticTaskSource {
    payload: Arc<Mutex<Vec<u8>>>,
}

impl StaticTaskSource {
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            payload: Arc::new(Mutex::new(payload)),
        }
    }

    /// Replace the payload returned by subsequent reads.
    pub fn set_payload(&self, payload: Vec<u8>) {
        *self.payload.lock().unwrap() = payload;
    }
}

impl TaskSource for StaticTaskSource {
    fn read(&self) -> Result<Vec<u8>> {
        Ok(self.payload.lock().unwrap().clone())
    }
}
