use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use backend_client::BackendClient;
use chat_core::{Branch, Config, ModelId};
use chat_state::{
    DispatchCoordinator, ModelSelection, Notice, NoticeBus, Preferences, QuotaMonitor,
    RecordCache, Reconciler, Services,
};
use colored::Colorize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const NOTICE_CAPACITY: usize = 16;

/// Everything a command needs, wired once per run.
pub struct App {
    pub config: Config,
    pub client: Arc<BackendClient>,
    pub coordinator: DispatchCoordinator,
    pub prefs: Preferences,
    notices: mpsc::Receiver<Notice>,
    cancel: CancellationToken,
}

impl App {
    pub fn new(config: Config, left: Option<&str>, right: Option<&str>) -> anyhow::Result<Self> {
        let client = Arc::new(BackendClient::new(&config).context("Failed to build HTTP client")?);
        let prefs = Preferences::load();

        let stored = prefs.model_selection(&config)?;
        let selection = ModelSelection::new(
            left.map(ModelId::from).unwrap_or_else(|| stored.get(Branch::Left).clone()),
            right.map(ModelId::from).unwrap_or_else(|| stored.get(Branch::Right).clone()),
        )?;
        for branch in Branch::BOTH {
            warn_if_unknown(selection.get(branch));
        }

        let (bus, notices) = NoticeBus::new(NOTICE_CAPACITY);
        let quota = Arc::new(
            QuotaMonitor::new(client.clone(), config.quota.warning_percent).with_notices(bus),
        );
        let services = Services {
            dispatcher: client.clone(),
            store: client.clone(),
            sessions: client.clone(),
        };
        let coordinator = DispatchCoordinator::new(
            services,
            Reconciler::new(Arc::new(RecordCache::new())),
            quota,
            &selection,
        )
        .with_title_max_chars(config.title_max_chars);

        Ok(Self {
            config,
            client,
            coordinator,
            prefs,
            notices,
            cancel: CancellationToken::new(),
        })
    }

    /// Notices emitted since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut drained = Vec::new();
        while let Ok(notice) = self.notices.try_recv() {
            drained.push(notice);
        }
        drained
    }

    pub fn start_quota_polling(&self) {
        let interval = Duration::from_secs(self.config.quota.poll_interval_secs.max(1));
        Arc::clone(self.coordinator.quota()).spawn_polling(interval, self.cancel.clone());
    }

    /// Refresh the quota snapshot; failures only degrade the submit guard.
    pub async fn refresh_quota(&self) {
        if let Err(err) = self.coordinator.quota().refresh().await {
            tracing::warn!("Could not fetch quota: {}", err);
        }
    }

    /// Resolve the selected library prompts and hand them to the coordinator.
    pub async fn load_context(&self) -> anyhow::Result<usize> {
        if self.prefs.prompts.is_empty() {
            self.coordinator.set_context_fragments(Vec::new());
            return Ok(0);
        }
        let system = self.client.list_system_prompts().await?;
        let user = self.client.list_user_prompts().await?;
        let fragments = self.prefs.prompts.context_fragments(&system, &user);
        let count = fragments.len();
        self.coordinator.set_context_fragments(fragments);
        Ok(count)
    }

    /// Persist the coordinator's current model pair.
    pub fn save_models(&mut self) -> anyhow::Result<()> {
        let selection = ModelSelection::new(
            self.coordinator.model(Branch::Left),
            self.coordinator.model(Branch::Right),
        )?;
        self.prefs.models = Some(selection);
        self.prefs.save().context("Failed to save preferences")?;
        Ok(())
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

pub fn warn_if_unknown(model: &ModelId) {
    if !model.is_known() {
        eprintln!(
            "{}",
            format!("⚠️  Model '{}' is not in the catalog; the backend may reject it", model).yellow()
        );
    }
}
