//! Where the current fragment lives.

use parking_lot::RwLock;
use tokio::sync::mpsc;

/// A fragment change, as delivered to the router's listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashChange {
    /// New fragment without the leading `#`.
    pub fragment: String,
}

/// The location fragment.
///
/// Assigning a different fragment notifies whoever listens for hash
/// changes; assigning the current one does nothing.
pub trait Location: Send + Sync {
    /// Current fragment without the leading `#`.
    fn fragment(&self) -> String;

    /// Assign a fragment. A leading `#` is ignored.
    fn set_fragment(&self, fragment: &str);
}

/// In-process location.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    fragment: RwLock<String>,
    changes: Option<mpsc::UnboundedSender<HashChange>>,
}

impl MemoryLocation {
    /// A location nobody listens to.
    pub fn new() -> Self {
        Self::default()
    }

    /// A location together with the receiver for its changes.
    pub fn with_listener() -> (Self, mpsc::UnboundedReceiver<HashChange>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let location = Self {
            fragment: RwLock::new(String::new()),
            changes: Some(tx),
        };
        (location, rx)
    }

    /// Set the fragment without notifying, as if the page had loaded there.
    pub fn starting_at(self, fragment: &str) -> Self {
        *self.fragment.write() = strip_hash(fragment).to_string();
        self
    }
}

impl Location for MemoryLocation {
    fn fragment(&self) -> String {
        self.fragment.read().clone()
    }

    fn set_fragment(&self, fragment: &str) {
        let fragment = strip_hash(fragment);
        {
            let mut current = self.fragment.write();
            if *current == fragment {
                return;
            }
            *current = fragment.to_string();
        }
        if let Some(tx) = &self.changes {
            if tx
                .send(HashChange {
                    fragment: fragment.to_string(),
                })
                .is_err()
            {
                tracing::debug!(fragment, "hash change dropped, no listener");
            }
        }
    }
}

fn strip_hash(fragment: &str) -> &str {
    fragment.strip_prefix('#').unwrap_or(fragment)
}
