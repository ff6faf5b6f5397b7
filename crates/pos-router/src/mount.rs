//! The single view region routes render into.

use parking_lot::Mutex;

/// Render target.
pub trait Mount: Send + Sync {
    /// Replace the mounted content.
    fn render(&self, content: &str);

    /// Reset the scroll position.
    fn scroll_to_top(&self) {}
}

/// Mount that keeps what was rendered, for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryMount {
    state: Mutex<MountState>,
}

#[derive(Debug, Default)]
struct MountState {
    content: String,
    renders: usize,
    scrolls: usize,
}

impl MemoryMount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last rendered content.
    pub fn content(&self) -> String {
        self.state.lock().content.clone()
    }

    pub fn render_count(&self) -> usize {
        self.state.lock().renders
    }

    pub fn scroll_count(&self) -> usize {
        self.state.lock().scrolls
    }
}

impl Mount for MemoryMount {
    fn render(&self, content: &str) {
        let mut state = self.state.lock();
        state.content = content.to_string();
        state.renders += 1;
    }

    fn scroll_to_top(&self) {
        self.state.lock().scrolls += 1;
    }
}
