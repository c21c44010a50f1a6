use std::collections::{BTreeMap, HashMap};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use common::config::ConfigHandler;
use tokio::sync::Mutex;

/// In-memory `.env` stand-in that counts how often it was written.
#[derive(Default)]
pub struct MockConfigHandlerImpl {
    stored: Mutex<BTreeMap<String, String>>,
    writes: AtomicUsize,
}

impl MockConfigHandlerImpl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler pre-seeded as if the pairs were already on disk.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let stored = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        MockConfigHandlerImpl { stored: Mutex::new(stored), writes: AtomicUsize::new(0) }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigHandler for MockConfigHandlerImpl {
    async fn get_configs(&self) -> BTreeMap<String, String> {
        self.stored.lock().await.clone()
    }

    async fn set_configs(&self, values: HashMap<String, String>) -> io::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.stored.lock().await.extend(values);
        Ok(())
    }
}
