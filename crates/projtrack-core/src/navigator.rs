use std::sync::Mutex;

use tracing::info;

use crate::routes;

/// Where the user currently is, and a way to send them elsewhere.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;

    fn redirect(&self, path: &str);
}

/// In-process navigator: tracks the current route and records redirects.
#[derive(Debug)]
pub struct MemoryNavigator {
    current: Mutex<String>,
    redirects: Mutex<Vec<String>>,
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new(routes::HOME)
    }
}

impl MemoryNavigator {
    pub fn new(path: &str) -> Self {
        Self {
            current: Mutex::new(path.to_string()),
            redirects: Mutex::new(Vec::new()),
        }
    }

    /// Navigate without recording a redirect
    pub fn visit(&self, path: &str) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = path.to_string();
    }

    /// Redirects issued since creation, oldest first
    pub fn redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last_redirect(&self) -> Option<String> {
        self.redirects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn redirect(&self, path: &str) {
        info!(to = %path, "Redirecting");
        self.visit(path);
        self.redirects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(path.to_string());
    }
}
