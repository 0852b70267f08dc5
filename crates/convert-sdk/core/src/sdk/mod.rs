mod convert;
mod interval;
mod quote;
mod wrap;

use std::{sync::Arc, time::Duration};

use tracing::debug;

use crate::{
    ChainClient, Logger, TransactionService,
    error::ConvertError,
    logger,
    models::{
        Config, DEFAULT_MAX_SLIPPAGE_BPS, DEFAULT_RESET_DELAY_MS, IntervalSettings,
    },
    store::ConversionStore,
    utils::deferred_task::DeferredTask,
};

/// Coordinates the conversion workflow: quoting, expected results, execution,
/// wrapping and interval jobs, all working from one [`ConversionStore`].
///
/// The chain client and transaction service are injected; the SDK holds no
/// global state.
#[derive(Clone)]
pub struct ConvertSdk {
    pub(crate) config: Config,
    pub(crate) store: Arc<ConversionStore>,
    pub(crate) chain_client: Arc<dyn ChainClient>,
    pub(crate) transaction_service: Arc<dyn TransactionService>,
    pub(crate) pending_reset: Arc<DeferredTask>,
}

impl ConvertSdk {
    pub fn new(
        config: Config,
        store: Arc<ConversionStore>,
        chain_client: Arc<dyn ChainClient>,
        transaction_service: Arc<dyn TransactionService>,
    ) -> Self {
        Self {
            config,
            store,
            chain_client,
            transaction_service,
            pending_reset: Arc::new(DeferredTask::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The store the UI mutates and reads derived values from.
    pub fn store(&self) -> &Arc<ConversionStore> {
        &self.store
    }

    /// Cancels the reset scheduled by a completed conversion, if it has not fired yet.
    pub async fn cancel_pending_reset(&self) -> bool {
        self.pending_reset.cancel().await
    }

    /// Whether a completed conversion is still waiting to clear the selection.
    pub async fn has_pending_reset(&self) -> bool {
        self.pending_reset.is_pending().await
    }

    /// Called when a conversion operation starts so an earlier conversion's
    /// deferred reset cannot clear the new one.
    async fn begin_conversion(&self) {
        if self.pending_reset.cancel().await {
            debug!("Cancelled pending reset of a previous conversion");
        }
    }

    /// Clears the selection after the configured delay, unless it has moved
    /// past `generation` by then.
    async fn schedule_reset(&self, generation: u64) {
        let store = Arc::clone(&self.store);
        let delay = Duration::from_millis(self.config.reset_delay_ms);
        debug!("Scheduling conversion state reset in {delay:?}");
        self.pending_reset
            .schedule(delay, move || {
                if !store.reset_if_current(generation) {
                    debug!("Selection changed since the conversion, skipping reset");
                }
            })
            .await;
    }
}

/// Initializes the global tracing subscriber.
///
/// * `log_dir` - Directory receiving `convert.log`; no file is written when `None`
/// * `app_logger` - Optional listener receiving INFO and above
/// * `log_filter` - `EnvFilter` directives, defaults to `debug` with noisy crates at `warn`
pub fn init_logging(
    log_dir: Option<String>,
    app_logger: Option<Box<dyn Logger>>,
    log_filter: Option<String>,
) -> Result<(), ConvertError> {
    logger::init_logging(log_dir, app_logger, log_filter)
}

pub fn default_config() -> Config {
    Config {
        chain_rpc_url: None,
        rpc_max_retries: 3,
        default_max_slippage_bps: DEFAULT_MAX_SLIPPAGE_BPS,
        reset_delay_ms: DEFAULT_RESET_DELAY_MS,
        interval_defaults: IntervalSettings::default(),
    }
}
