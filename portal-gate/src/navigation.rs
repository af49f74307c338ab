//! Navigation: where a denied caller is sent

use parking_lot::Mutex;
use tracing::info;

/// Redirect primitive. Replaces the current page; there is no way back.
pub trait Navigator: Send + Sync {
    fn redirect(&self, target: &str);
}

/// Navigator that records every redirect instead of performing it
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().clone()
    }

    pub fn redirect_count(&self) -> usize {
        self.redirects.lock().len()
    }

    pub fn last_redirect(&self) -> Option<String> {
        self.redirects.lock().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, target: &str) {
        info!(target_page = target, "Redirecting");
        self.redirects.lock().push(target.to_string());
    }
}
