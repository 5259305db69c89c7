//! EIP-4337 user operation types for the submission pipeline
use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use alloy_sol_types::{SolValue, sol};
use serde::{Deserialize, Serialize};

/// Sponsored operation submitted to a bundler, EIP-4337 v0.6 field layout.
///
/// Serializes to the bundler wire shape: camelCase keys, lower-case hex
/// addresses, `0x`-quantity integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperation {
    pub sender: Address,
    pub nonce: U256,
    /// Factory address ++ encoded create call; empty once the account exists.
    pub init_code: Bytes,
    pub call_data: Bytes,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    /// Sponsoring paymaster address ++ paymaster data; empty means self-funded.
    pub paymaster_and_data: Bytes,
    pub signature: Bytes,
}

impl UserOperation {
    /// True while any of the three gas fields is still zero. Bundlers reject
    /// zero-valued gas, so such an operation must go through estimation
    /// before submission.
    pub fn needs_gas_estimation(&self) -> bool {
        self.call_gas_limit.is_zero()
            || self.verification_gas_limit.is_zero()
            || self.pre_verification_gas.is_zero()
    }

    /// Copy estimated gas values into the operation.
    pub fn apply_gas_estimate(&mut self, estimate: &GasEstimate) {
        self.call_gas_limit = estimate.call_gas_limit;
        self.verification_gas_limit = estimate.verification_gas_limit;
        self.pre_verification_gas = estimate.pre_verification_gas;
    }

    /// Full EIP-4337 v0.6 operation hash:
    /// `keccak256(abi.encode(keccak256(abi.encode(packedFields)), entryPoint, chainId))`.
    pub fn user_op_hash(&self, entry_point: Address, chain_id: u64) -> B256 {
        let packed = PackedForHash {
            sender: self.sender,
            nonce: self.nonce,
            hashInitCode: keccak256(&self.init_code),
            hashCallData: keccak256(&self.call_data),
            callGasLimit: self.call_gas_limit,
            verificationGasLimit: self.verification_gas_limit,
            preVerificationGas: self.pre_verification_gas,
            maxFeePerGas: self.max_fee_per_gas,
            maxPriorityFeePerGas: self.max_priority_fee_per_gas,
            hashPaymasterAndData: keccak256(&self.paymaster_and_data),
        };

        let inner = keccak256(packed.abi_encode());
        keccak256((inner, entry_point, U256::from(chain_id)).abi_encode())
    }
}

sol! {
    struct PackedForHash {
        address sender;
        uint256 nonce;
        bytes32 hashInitCode;
        bytes32 hashCallData;
        uint256 callGasLimit;
        uint256 verificationGasLimit;
        uint256 preVerificationGas;
        uint256 maxFeePerGas;
        uint256 maxPriorityFeePerGas;
        bytes32 hashPaymasterAndData;
    }
}

/// Gas components estimated by the bundler (or substituted locally).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasEstimate {
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
}

impl GasEstimate {
    /// Replace zero components with the matching value from `floor`.
    /// A zero-valued gas field gets the operation rejected downstream, so
    /// estimates are never allowed to stay silently zero.
    pub fn floored_at(mut self, floor: &Self) -> Self {
        if self.call_gas_limit.is_zero() {
            self.call_gas_limit = floor.call_gas_limit;
        }
        if self.verification_gas_limit.is_zero() {
            self.verification_gas_limit = floor.verification_gas_limit;
        }
        if self.pre_verification_gas.is_zero() {
            self.pre_verification_gas = floor.pre_verification_gas;
        }
        self
    }
}
