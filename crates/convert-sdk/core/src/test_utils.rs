use std::sync::{Arc, Mutex};

use crate::{
    ChainClient, ChainClientError, ConversionAccount, ConversionAmountRequest,
    ConversionDirection, ConversionStore, ConvertSdk, IntervalConversion,
    IntervalConversionRequest, IntervalConversionStatus, LedgerAccountTotal, TransactionService,
    TransactionServiceError, UtxoAccount, default_config,
};

type Hook = Box<dyn FnOnce() + Send>;

pub(crate) fn utxo_account() -> ConversionAccount {
    UtxoAccount {
        address: "0x0080a1b2c3d4e5f60718293a4b5c6d7e8f901234".to_string(),
        label: Some("Savings".to_string()),
    }
    .into()
}

pub(crate) fn ledger_account() -> ConversionAccount {
    ledger_total().into()
}

pub(crate) fn ledger_total() -> LedgerAccountTotal {
    LedgerAccountTotal {
        address: "0x0010f1e2d3c4b5a69788796a5b4c3d2e1f009876".to_string(),
        label: Some("Main".to_string()),
    }
}

/// Chain client returning fixed answers and recording what it was asked.
#[derive(Default)]
pub(crate) struct MockChainClient {
    pub(crate) rate: Mutex<u128>,
    pub(crate) conversion_amount: Mutex<u128>,
    pub(crate) fail_with: Mutex<Option<ChainClientError>>,
    pub(crate) rate_requests: Mutex<Vec<(ConversionDirection, u128)>>,
    pub(crate) amount_requests: Mutex<Vec<ConversionAmountRequest>>,
    /// Runs while a request is in flight, before the answer is returned
    pub(crate) on_request: Mutex<Option<Hook>>,
}

impl MockChainClient {
    pub(crate) fn new(rate: u128, conversion_amount: u128) -> Self {
        Self {
            rate: Mutex::new(rate),
            conversion_amount: Mutex::new(conversion_amount),
            ..Default::default()
        }
    }

    pub(crate) fn set_on_request(&self, hook: impl FnOnce() + Send + 'static) {
        *self.on_request.lock().unwrap() = Some(Box::new(hook));
    }

    fn in_flight(&self) -> Result<(), ChainClientError> {
        if let Some(hook) = self.on_request.lock().unwrap().take() {
            hook();
        }
        match self.fail_with.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl ChainClient for MockChainClient {
    async fn get_latest_rate(
        &self,
        direction: ConversionDirection,
        unit_amount: u128,
    ) -> Result<u128, ChainClientError> {
        self.rate_requests
            .lock()
            .unwrap()
            .push((direction, unit_amount));
        self.in_flight()?;
        Ok(*self.rate.lock().unwrap())
    }

    async fn calculate_conversion_amount(
        &self,
        request: ConversionAmountRequest,
    ) -> Result<u128, ChainClientError> {
        self.amount_requests.lock().unwrap().push(request);
        self.in_flight()?;
        Ok(*self.conversion_amount.lock().unwrap())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TxCall {
    ConvertUtxoToLedger {
        destination_address: String,
        amount: String,
        max_slippage_bps: u32,
    },
    ConvertLedgerToUtxo {
        source_address: String,
        amount: String,
        max_slippage_bps: u32,
    },
    Wrap {
        amount: String,
        destination_address: String,
    },
    Unwrap {
        amount: String,
        source_address: String,
    },
    ClaimWrappedDeposit(String),
    GetWrappedDeposit(String),
    StartInterval(IntervalConversionRequest),
    ListIntervals,
    GetInterval(String),
    CancelInterval(String),
}

/// Transaction service keeping interval jobs in memory and recording every call.
#[derive(Default)]
pub(crate) struct MockTransactionService {
    pub(crate) calls: Mutex<Vec<TxCall>>,
    pub(crate) fail_with: Mutex<Option<TransactionServiceError>>,
    pub(crate) wrapped_deposit: Mutex<u128>,
    pub(crate) jobs: Mutex<Vec<IntervalConversion>>,
    /// Runs while a call is in flight, before it is answered
    pub(crate) on_call: Mutex<Option<Hook>>,
}

impl MockTransactionService {
    pub(crate) fn failing(error: TransactionServiceError) -> Self {
        Self {
            fail_with: Mutex::new(Some(error)),
            ..Default::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<TxCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn set_on_call(&self, hook: impl FnOnce() + Send + 'static) {
        *self.on_call.lock().unwrap() = Some(Box::new(hook));
    }

    fn record(&self, call: TxCall) -> Result<(), TransactionServiceError> {
        self.calls.lock().unwrap().push(call);
        if let Some(hook) = self.on_call.lock().unwrap().take() {
            hook();
        }
        match self.fail_with.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl TransactionService for MockTransactionService {
    async fn convert_utxo_to_ledger(
        &self,
        destination_address: &str,
        amount: &str,
        max_slippage_bps: u32,
    ) -> Result<(), TransactionServiceError> {
        self.record(TxCall::ConvertUtxoToLedger {
            destination_address: destination_address.to_string(),
            amount: amount.to_string(),
            max_slippage_bps,
        })
    }

    async fn convert_ledger_to_utxo(
        &self,
        source_address: &str,
        amount: &str,
        max_slippage_bps: u32,
    ) -> Result<(), TransactionServiceError> {
        self.record(TxCall::ConvertLedgerToUtxo {
            source_address: source_address.to_string(),
            amount: amount.to_string(),
            max_slippage_bps,
        })
    }

    async fn wrap(
        &self,
        amount: &str,
        destination_address: &str,
    ) -> Result<String, TransactionServiceError> {
        self.record(TxCall::Wrap {
            amount: amount.to_string(),
            destination_address: destination_address.to_string(),
        })?;
        Ok("0xwraptx".to_string())
    }

    async fn unwrap(
        &self,
        amount: &str,
        source_address: &str,
    ) -> Result<String, TransactionServiceError> {
        self.record(TxCall::Unwrap {
            amount: amount.to_string(),
            source_address: source_address.to_string(),
        })?;
        Ok("0xunwraptx".to_string())
    }

    async fn claim_wrapped_deposit(&self, address: &str) -> Result<(), TransactionServiceError> {
        self.record(TxCall::ClaimWrappedDeposit(address.to_string()))
    }

    async fn get_wrapped_deposit(&self, address: &str) -> Result<u128, TransactionServiceError> {
        self.record(TxCall::GetWrappedDeposit(address.to_string()))?;
        Ok(*self.wrapped_deposit.lock().unwrap())
    }

    async fn start_interval_conversion(
        &self,
        request: IntervalConversionRequest,
    ) -> Result<String, TransactionServiceError> {
        self.record(TxCall::StartInterval(request.clone()))?;
        let mut jobs = self.jobs.lock().unwrap();
        let id = format!("job-{}", jobs.len() + 1);
        jobs.push(IntervalConversion {
            id: id.clone(),
            source_address: request.source.address().to_string(),
            destination_address: request.destination.address().to_string(),
            amount: request.amount,
            max_slippage_bps: request.max_slippage_bps,
            transaction_count: request.transaction_count,
            completed_count: 0,
            interval_minutes: request.interval_minutes,
            status: IntervalConversionStatus::Active,
        });
        Ok(id)
    }

    async fn list_interval_conversions(
        &self,
    ) -> Result<Vec<IntervalConversion>, TransactionServiceError> {
        self.record(TxCall::ListIntervals)?;
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn get_interval_conversion(
        &self,
        id: &str,
    ) -> Result<Option<IntervalConversion>, TransactionServiceError> {
        self.record(TxCall::GetInterval(id.to_string()))?;
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .find(|job| job.id == id)
            .cloned())
    }

    async fn cancel_interval_conversion(&self, id: &str) -> Result<(), TransactionServiceError> {
        self.record(TxCall::CancelInterval(id.to_string()))?;
        let mut jobs = self.jobs.lock().unwrap();
        match jobs.iter_mut().find(|job| job.id == id) {
            Some(job) => {
                job.status = IntervalConversionStatus::Cancelled;
                Ok(())
            }
            None => Err(TransactionServiceError::Service {
                message: format!("Unknown interval conversion {id}"),
                code: Some("NOT_FOUND".to_string()),
            }),
        }
    }
}

pub(crate) struct TestSdk {
    pub(crate) sdk: ConvertSdk,
    pub(crate) chain: Arc<MockChainClient>,
    pub(crate) tx: Arc<MockTransactionService>,
}

pub(crate) fn test_sdk(chain: MockChainClient, tx: MockTransactionService) -> TestSdk {
    let chain = Arc::new(chain);
    let tx = Arc::new(tx);
    let sdk = ConvertSdk::new(
        default_config(),
        Arc::new(ConversionStore::new()),
        chain.clone(),
        tx.clone(),
    );
    TestSdk { sdk, chain, tx }
}
