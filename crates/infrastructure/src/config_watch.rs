use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::SystemTime;
use switchyard_dns_application::BuildRuleTableUseCase;
use switchyard_dns_domain::{CliOverrides, Config, ConfigError, RuleTable};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Owns the live rule table and reloads it when the config file changes.
///
/// Readers take a whole immutable snapshot per request via `current()`;
/// publication is a single atomic swap, so a reload in flight never shows
/// anyone a half-built table. The mutex serializes rebuilds only — the
/// request path never waits on it unless the file actually moved.
///
/// A failed reload logs, keeps the previous snapshot, and keeps the old
/// mtime too, so the next request retries the load.
pub struct ConfigWatcher {
    snapshot: ArcSwap<RuleTable>,
    path: String,
    overrides: CliOverrides,
    builder: BuildRuleTableUseCase,
    reload: Mutex<Option<SystemTime>>,
}

impl ConfigWatcher {
    /// Wraps an already-built initial table. The initial load is the
    /// caller's problem (and fatal there); from here on failures are soft.
    pub fn new(
        path: String,
        overrides: CliOverrides,
        builder: BuildRuleTableUseCase,
        initial: RuleTable,
    ) -> Self {
        let loaded_at = std::fs::metadata(&path).and_then(|m| m.modified()).ok();
        Self {
            snapshot: ArcSwap::from_pointee(initial),
            path,
            overrides,
            builder,
            reload: Mutex::new(loaded_at),
        }
    }

    /// The current immutable snapshot. Cheap enough to call per datagram.
    pub fn current(&self) -> Arc<RuleTable> {
        self.snapshot.load_full()
    }

    /// Rebuilds and swaps in a new table if the file's mtime advanced
    /// since the last successful load.
    pub async fn reload_if_stale(&self) {
        let modified = match std::fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                debug!(path = %self.path, error = %e, "Cannot stat config file, keeping current rules");
                return;
            }
        };

        // A held lock means another handler is already rebuilding; this
        // request just proceeds with the snapshot it can see.
        let Ok(mut loaded) = self.reload.try_lock() else {
            return;
        };
        if *loaded == Some(modified) {
            return;
        }

        match self.rebuild().await {
            Ok(table) => {
                info!(path = %self.path, rules = table.rule_count(), "Config reloaded");
                self.snapshot.store(Arc::new(table));
                *loaded = Some(modified);
            }
            Err(e) => {
                error!(path = %self.path, error = %e, "Config reload failed, keeping previous rules");
            }
        }
    }

    async fn rebuild(&self) -> Result<RuleTable, ConfigError> {
        let config = Config::load(Some(&self.path), self.overrides.clone())?;
        self.builder.execute(&config).await
    }
}
