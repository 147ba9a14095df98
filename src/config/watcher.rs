//! Rule change subscription and the file-backed rule source.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::source::{route_rule_key, ConfigChange, ConfigSource, GLOBAL_RULE_KEY, ROUTE_RULE_PREFIX};
use crate::routing::store::RuleStore;

/// Applies configuration change events to a rule store.
pub struct RuleWatcher {
    store: Arc<RuleStore>,
    events: mpsc::UnboundedReceiver<ConfigChange>,
}

impl RuleWatcher {
    pub fn new(store: Arc<RuleStore>, events: mpsc::UnboundedReceiver<ConfigChange>) -> Self {
        Self { store, events }
    }

    /// Consume change events until the sender side is dropped.
    pub fn spawn(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(change) = self.events.recv().await {
                debug!(keys = ?change.keys, "route rule change event");
                self.store
                    .on_config_changed(change.keys.iter().map(String::as_str));
            }
            info!("route rule event stream closed");
        })
    }
}

/// File stem of the global rule file.
pub const GLOBAL_RULE_FILE: &str = "global";

/// Rule source backed by a directory of YAML files.
///
/// `global.yaml` holds the global rule set; any other `<name>.yaml` file
/// holds the rules for the service `<name>`. File events are translated
/// into [`ConfigChange`] notifications.
pub struct FileRuleSource {
    dir: PathBuf,
    events: mpsc::UnboundedSender<ConfigChange>,
}

impl FileRuleSource {
    /// Returns the source and the receiver end of its change events.
    pub fn new(dir: &Path) -> (Arc<Self>, mpsc::UnboundedReceiver<ConfigChange>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                dir: dir.to_path_buf(),
                events: tx,
            }),
            rx,
        )
    }

    /// Keys for the rule files currently present in the directory. Useful
    /// for priming a store before the first file event arrives.
    pub fn existing_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Ok(entries) = std::fs::read_dir(&self.dir) {
            for entry in entries.flatten() {
                if let Some(key) = Self::key_for(&entry.path()) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    /// Start watching the directory. The returned watcher must be kept
    /// alive for events to keep flowing.
    pub fn run(&self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.events.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                        let keys: HashSet<String> = event
                            .paths
                            .iter()
                            .filter_map(|path| Self::key_for(path))
                            .collect();
                        if !keys.is_empty() {
                            let _ = tx.send(ConfigChange { keys });
                        }
                    }
                }
                Err(e) => error!("rule file watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&self.dir, RecursiveMode::NonRecursive)?;

        info!(dir = ?self.dir, "rule file watcher started");
        Ok(watcher)
    }

    fn key_for(path: &Path) -> Option<String> {
        if path.extension().and_then(|ext| ext.to_str()) != Some("yaml") {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        if stem == GLOBAL_RULE_FILE {
            Some(GLOBAL_RULE_KEY.to_string())
        } else {
            Some(route_rule_key(stem))
        }
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let stem = if key == GLOBAL_RULE_KEY {
            GLOBAL_RULE_FILE
        } else {
            key.strip_prefix(ROUTE_RULE_PREFIX)?
        };
        Some(self.dir.join(format!("{stem}.yaml")))
    }
}

impl ConfigSource for FileRuleSource {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key)?;
        std::fs::read_to_string(path).ok()
    }
}
