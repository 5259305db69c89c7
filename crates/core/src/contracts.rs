//! `sol!` bindings for the on-chain collaborators and the ABI helpers built
//! on top of them: deployment payloads, the account `execute` call, and the
//! CREATE2 counterfactual address derivation.
use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use alloy_sol_types::{SolCall, SolValue, sol};

sol! {
    /// Entry-point surface consumed by the pipeline.
    interface IEntryPoint {
        function getNonce(address sender, uint192 key) external view returns (uint256 nonce);
    }

    /// Deterministic smart-account factory.
    interface IAccountFactory {
        function createAccount(address owner, uint256 salt) external returns (address account);
        function getAccount(address owner) external view returns (address account);
        function hasAccount(address owner) external view returns (bool exists);
        function accountImplementation() external view returns (address implementation);
    }

    /// Sponsoring paymaster: entry-point deposit plus two whitelist scopes
    /// (account creation only, or all transactions) and the global flags
    /// that gate them.
    interface ISponsorPaymaster {
        function getDeposit() external view returns (uint256 amount);
        function deposit() external payable;
        function withdrawTo(address payable to, uint256 amount) external;
        function sponsorAllTransactions() external view returns (bool enabled);
        function sponsorAccountCreation() external view returns (bool enabled);
        function globalWhitelist(address account) external view returns (bool whitelisted);
        function creationWhitelist(address account) external view returns (bool whitelisted);
        function addToGlobalWhitelist(address account) external;
        function addToCreationWhitelist(address account) external;
        function removeFromGlobalWhitelist(address account) external;
        function removeFromCreationWhitelist(address account) external;
    }

    /// Execution surface of the smart account itself.
    interface IAccount {
        function execute(address dest, uint256 value, bytes calldata func) external;
    }
}

/// Encode the account's `execute(dest, value, func)` call. This is the
/// `callData` of every sponsored operation.
pub fn encode_execute_call(target: Address, value: U256, data: Bytes) -> Bytes {
    IAccount::executeCall {
        dest: target,
        value,
        func: data,
    }
    .abi_encode()
    .into()
}

/// Build the deployment payload for a not-yet-deployed account: the factory
/// address followed by the encoded `createAccount(owner, salt)` call. The
/// entry point splits it at byte 20 on first use.
pub fn encode_deployment_payload(factory: Address, owner: Address, salt: U256) -> Bytes {
    let mut payload = factory.to_vec();
    payload.extend_from_slice(&IAccountFactory::createAccountCall { owner, salt }.abi_encode());
    payload.into()
}

/// Components of a decoded deployment payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentCall {
    pub factory: Address,
    pub owner: Address,
    pub salt: U256,
}

/// Errors from [`decode_deployment_payload`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("deployment payload shorter than a factory address ({0} bytes)")]
    TooShort(usize),
    #[error("deployment payload is not a createAccount call: {0}")]
    NotCreateCall(String),
}

/// Split a deployment payload back into factory, owner and salt.
pub fn decode_deployment_payload(payload: &[u8]) -> Result<DeploymentCall, PayloadError> {
    if payload.len() < Address::len_bytes() {
        return Err(PayloadError::TooShort(payload.len()));
    }
    let (factory, call) = payload.split_at(Address::len_bytes());
    let decoded = IAccountFactory::createAccountCall::abi_decode(call)
        .map_err(|e| PayloadError::NotCreateCall(e.to_string()))?;

    Ok(DeploymentCall {
        factory: Address::from_slice(factory),
        owner: decoded.owner,
        salt: decoded.salt,
    })
}

/// ERC-1167 minimal-proxy creation code for `implementation`.
fn minimal_proxy_creation_code(implementation: Address) -> Vec<u8> {
    let mut code = Vec::with_capacity(55);
    code.extend_from_slice(&alloy_primitives::hex!(
        "3d602d80600a3d3981f3363d3d373d3d3d363d73"
    ));
    code.extend_from_slice(implementation.as_slice());
    code.extend_from_slice(&alloy_primitives::hex!("5af43d82803e903d91602b57fd5bf3"));
    code
}

/// CREATE2 address the factory will deploy the account at.
///
/// The factory deploys a minimal proxy over its account implementation with
/// `keccak256(abi.encode(owner, salt))` as the CREATE2 salt, so the result
/// is stable for a fixed `(owner, salt)` pair.
pub fn counterfactual_address(
    factory: Address,
    implementation: Address,
    owner: Address,
    salt: U256,
) -> Address {
    let create2_salt: B256 = keccak256((owner, salt).abi_encode());
    let init_code_hash = keccak256(minimal_proxy_creation_code(implementation));
    factory.create2(create2_salt, init_code_hash)
}
