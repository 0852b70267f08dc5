use std::sync::Arc;

use tracing::debug;

use crate::{
    chain::{ChainClient, rpc_client::JsonRpcChainClient},
    error::ConvertError,
    models::Config,
    sdk::ConvertSdk,
    store::ConversionStore,
    transactions::TransactionService,
};

/// Builder for creating `ConvertSdk` instances with customizable components.
#[derive(Clone)]
pub struct ConvertSdkBuilder {
    config: Config,
    chain_client: Option<Arc<dyn ChainClient>>,
    transaction_service: Option<Arc<dyn TransactionService>>,
    store: Option<Arc<ConversionStore>>,
}

impl ConvertSdkBuilder {
    /// Creates a new `ConvertSdkBuilder` with the provided configuration.
    pub fn new(config: Config) -> Self {
        ConvertSdkBuilder {
            config,
            chain_client: None,
            transaction_service: None,
            store: None,
        }
    }

    /// Sets the chain client used for quoting.
    #[must_use]
    pub fn with_chain_client(mut self, chain_client: Arc<dyn ChainClient>) -> Self {
        self.chain_client = Some(chain_client);
        self
    }

    /// Quotes through a JSON-RPC node at `url`.
    /// Arguments:
    /// - `url`: The node endpoint.
    #[must_use]
    pub fn with_json_rpc_chain_client(mut self, url: String) -> Self {
        self.chain_client = Some(Arc::new(JsonRpcChainClient::new(
            url,
            self.config.rpc_max_retries,
        )));
        self
    }

    #[must_use]
    pub fn with_transaction_service(
        mut self,
        transaction_service: Arc<dyn TransactionService>,
    ) -> Self {
        self.transaction_service = Some(transaction_service);
        self
    }

    /// Shares an existing store, e.g. one the UI already observes.
    #[must_use]
    pub fn with_store(mut self, store: Arc<ConversionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the `ConvertSdk` instance with the configured components.
    ///
    /// Without an explicit chain client, `config.chain_rpc_url` is used.
    pub fn build(self) -> Result<ConvertSdk, ConvertError> {
        let transaction_service = self
            .transaction_service
            .ok_or_else(|| ConvertError::Generic("Transaction service is required".to_string()))?;
        let rpc_url = self.config.chain_rpc_url.clone();
        let chain_client: Arc<dyn ChainClient> = match (self.chain_client, rpc_url) {
            (Some(client), _) => client,
            (None, Some(url)) => {
                debug!("Using JSON-RPC chain client at {url}");
                Arc::new(JsonRpcChainClient::new(url, self.config.rpc_max_retries))
            }
            (None, None) => {
                return Err(ConvertError::Generic(
                    "Either a chain client or chain_rpc_url is required".to_string(),
                ));
            }
        };
        let store = self.store.unwrap_or_else(|| {
            Arc::new(ConversionStore::with_defaults(
                self.config.default_max_slippage_bps,
                self.config.interval_defaults,
            ))
        });

        Ok(ConvertSdk::new(self.config, store, chain_client, transaction_service))
    }
}
