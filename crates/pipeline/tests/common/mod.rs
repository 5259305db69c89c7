#![allow(dead_code)]
//! Scripted chain and bundler doubles shared by the pipeline tests.
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use alloy_primitives::{Address, B256, Bytes, U256, address};
use alloy_sol_types::SolValue;
use async_trait::async_trait;
use txflow_bundler_client::{BundlerApi, BundlerError};
use txflow_core::{GasEstimate, UserOperation};
use txflow_pipeline::{ChainClient, ChainError};

pub const OWNER: Address = address!("00000000000000000000000000000000000000aa");
pub const TARGET: Address = address!("00000000000000000000000000000000000000cc");
pub const FACTORY: Address = address!("00000000000000000000000000000000000000f1");
pub const PAYMASTER: Address = address!("00000000000000000000000000000000000000e2");
pub const ENTRY_POINT: Address = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");
pub const IMPLEMENTATION: Address = address!("00000000000000000000000000000000000000a1");

// a throwaway but fixed key so the signer address is stable across a test
pub const TEST_PRIVATE_KEY: &str =
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

pub fn ret_bool(value: bool) -> Bytes {
    value.abi_encode().into()
}

pub fn ret_address(value: Address) -> Bytes {
    value.abi_encode().into()
}

pub fn ret_u256(value: U256) -> Bytes {
    value.abi_encode().into()
}

/// Scripted [`ChainClient`]: `eth_call` responses are keyed by contract
/// address and 4-byte selector; everything else is a plain programmed value.
/// All requests are recorded for assertions.
pub struct MockChain {
    call_responses: HashMap<(Address, [u8; 4]), Bytes>,
    failing_selectors: HashSet<[u8; 4]>,
    pub calls: Mutex<Vec<(Address, Bytes)>>,
    pub sent_transactions: Mutex<Vec<Bytes>>,
    balance: U256,
    gas_price: u128,
    priority_fee: Option<u128>,
    transaction_count: u64,
    estimate_gas: u64,
    send_error: Option<String>,
    estimate_error: Option<String>,
    tx_hash: B256,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            call_responses: HashMap::new(),
            failing_selectors: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            sent_transactions: Mutex::new(Vec::new()),
            balance: U256::from(1_000_000_000_000_000_000u128),
            gas_price: 2_000_000_000,
            priority_fee: Some(1_500_000_000),
            transaction_count: 4,
            estimate_gas: 90_000,
            send_error: None,
            estimate_error: None,
            tx_hash: B256::repeat_byte(0xd1),
        }
    }

    pub fn with_call(mut self, contract: Address, selector: [u8; 4], response: Bytes) -> Self {
        self.call_responses.insert((contract, selector), response);
        self
    }

    pub fn with_failing_selector(mut self, selector: [u8; 4]) -> Self {
        self.failing_selectors.insert(selector);
        self
    }

    pub fn with_priority_fee(mut self, fee: Option<u128>) -> Self {
        self.priority_fee = fee;
        self
    }

    pub fn with_send_error(mut self, raw_node_message: &str) -> Self {
        self.send_error = Some(raw_node_message.to_string());
        self
    }

    pub fn with_estimate_gas_error(mut self, raw_node_message: &str) -> Self {
        self.estimate_error = Some(raw_node_message.to_string());
        self
    }

    pub fn with_tx_hash(mut self, hash: B256) -> Self {
        self.tx_hash = hash;
        self
    }

    pub fn recorded_calls(&self) -> Vec<(Address, Bytes)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent_transaction_count(&self) -> usize {
        self.sent_transactions.lock().unwrap().len()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
        self.calls.lock().unwrap().push((to, data.clone()));

        let selector: [u8; 4] = data
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .unwrap_or_default();

        if self.failing_selectors.contains(&selector) {
            return Err(ChainError::Rpc("scripted failure".to_string()));
        }

        self.call_responses
            .get(&(to, selector))
            .cloned()
            .ok_or_else(|| ChainError::Rpc(format!("unexpected call to {to}")))
    }

    async fn balance(&self, _address: Address) -> Result<U256, ChainError> {
        Ok(self.balance)
    }

    async fn gas_price(&self) -> Result<u128, ChainError> {
        Ok(self.gas_price)
    }

    async fn max_priority_fee_per_gas(&self) -> Result<u128, ChainError> {
        self.priority_fee
            .ok_or_else(|| ChainError::Rpc("method not supported".to_string()))
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64, ChainError> {
        Ok(self.transaction_count)
    }

    async fn estimate_gas(
        &self,
        _from: Address,
        _to: Address,
        _data: Bytes,
        _value: U256,
    ) -> Result<u64, ChainError> {
        match &self.estimate_error {
            Some(message) => Err(ChainError::from_rpc_message(message.clone())),
            None => Ok(self.estimate_gas),
        }
    }

    async fn send_raw_transaction(&self, encoded: Bytes) -> Result<B256, ChainError> {
        self.sent_transactions.lock().unwrap().push(encoded);
        match &self.send_error {
            Some(message) => Err(ChainError::from_rpc_message(message.clone())),
            None => Ok(self.tx_hash),
        }
    }
}

/// An operation draft the way the builder leaves it: gas fields zero,
/// signature empty.
pub fn zero_gas_draft() -> UserOperation {
    UserOperation {
        sender: OWNER,
        nonce: U256::ZERO,
        init_code: Bytes::new(),
        call_data: Bytes::new(),
        call_gas_limit: U256::ZERO,
        verification_gas_limit: U256::ZERO,
        pre_verification_gas: U256::ZERO,
        max_fee_per_gas: U256::from(2_000_000_000u64),
        max_priority_fee_per_gas: U256::from(1_000_000_000u64),
        paymaster_and_data: Bytes::new(),
        signature: Bytes::new(),
    }
}

/// What the scripted bundler should answer for each method.
pub enum BundlerScript {
    Ok,
    RpcError,
    HttpError,
}

/// Scripted [`BundlerApi`] recording every request.
pub struct MockBundler {
    configured: bool,
    estimate: Option<GasEstimate>,
    send: BundlerScript,
    operation_count: Option<U256>,
    operation_hash: B256,
    pub estimate_requests: Mutex<Vec<UserOperation>>,
    pub submitted: Mutex<Vec<UserOperation>>,
    pub count_requests: Mutex<Vec<Address>>,
}

impl MockBundler {
    pub fn new() -> Self {
        Self {
            configured: true,
            estimate: Some(GasEstimate {
                call_gas_limit: U256::from(120_000),
                verification_gas_limit: U256::from(150_000),
                pre_verification_gas: U256::from(60_000),
            }),
            send: BundlerScript::Ok,
            operation_count: Some(U256::ZERO),
            operation_hash: B256::repeat_byte(0xb0),
            estimate_requests: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            count_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn with_estimate(mut self, estimate: Option<GasEstimate>) -> Self {
        self.estimate = estimate;
        self
    }

    pub fn with_send(mut self, script: BundlerScript) -> Self {
        self.send = script;
        self
    }

    pub fn with_operation_count(mut self, count: Option<U256>) -> Self {
        self.operation_count = count;
        self
    }

    pub fn with_operation_hash(mut self, hash: B256) -> Self {
        self.operation_hash = hash;
        self
    }

    pub fn estimate_call_count(&self) -> usize {
        self.estimate_requests.lock().unwrap().len()
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl BundlerApi for MockBundler {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn estimate_user_operation_gas(
        &self,
        user_operation: &UserOperation,
    ) -> Result<GasEstimate, BundlerError> {
        if !self.configured {
            return Err(BundlerError::Unconfigured);
        }
        self.estimate_requests
            .lock()
            .unwrap()
            .push(user_operation.clone());
        self.estimate.clone().ok_or(BundlerError::Rpc {
            code: -32500,
            message: "estimation reverted".to_string(),
        })
    }

    async fn send_user_operation(
        &self,
        user_operation: &UserOperation,
    ) -> Result<B256, BundlerError> {
        if !self.configured {
            return Err(BundlerError::Unconfigured);
        }
        self.submitted.lock().unwrap().push(user_operation.clone());
        match self.send {
            BundlerScript::Ok => Ok(self.operation_hash),
            BundlerScript::RpcError => Err(BundlerError::Rpc {
                code: -32507,
                message: "signature rejected".to_string(),
            }),
            BundlerScript::HttpError => Err(BundlerError::Http {
                status: 500,
                body: "internal error".to_string(),
            }),
        }
    }

    async fn get_user_operation_count(&self, sender: Address) -> Result<U256, BundlerError> {
        if !self.configured {
            return Err(BundlerError::Unconfigured);
        }
        self.count_requests.lock().unwrap().push(sender);
        self.operation_count.ok_or(BundlerError::Unconfigured)
    }
}
