//! The orchestration context: everything one `execute` call threads through the lender
//! callback and exposes to hooks. It exists only for the duration of that call.

use alloc::vec::Vec;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolValue};

sol! {
    struct ActionAbi {
        address target;
        uint256 value;
        bytes data;
    }

    struct ContextAbi {
        address sender;
        address[] tokens;
        uint256[] amounts;
        address flashToken;
        uint256 flashAmount;
        uint256 actionIndex;
        ActionAbi[] actions;
        bytes[] results;
    }
}

/// One hook invocation: call `target.onFlashloanHook(data)` forwarding `value`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Action {
    pub target: Address,
    pub value: U256,
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlashRequest {
    pub tokens: Vec<Address>,
    pub amounts: Vec<U256>,
    pub flash_token: Address,
    pub flash_amount: U256,
    pub actions: Vec<Action>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlashContext {
    pub sender: Address,
    pub tokens: Vec<Address>,
    pub amounts: Vec<U256>,
    pub flash_token: Address,
    pub flash_amount: U256,
    pub action_index: usize,
    pub actions: Vec<Action>,
    pub results: Vec<Vec<u8>>,
}

impl FlashContext {
    pub fn open(sender: Address, request: FlashRequest) -> Self {
        Self {
            sender,
            tokens: request.tokens,
            amounts: request.amounts,
            flash_token: request.flash_token,
            flash_amount: request.flash_amount,
            action_index: 0,
            results: Vec::with_capacity(request.actions.len()),
            actions: request.actions,
        }
    }

    /// User tokens, first occurrence order, without duplicates.
    pub fn user_tokens(&self) -> Vec<Address> {
        let mut out: Vec<Address> = Vec::with_capacity(self.tokens.len());
        for token in &self.tokens {
            if !out.contains(token) {
                out.push(*token);
            }
        }
        out
    }

    /// Every token the orchestrator may hold mid-flight: user tokens plus the flash token.
    pub fn held_tokens(&self) -> Vec<Address> {
        let mut out = self.user_tokens();
        if !out.contains(&self.flash_token) {
            out.push(self.flash_token);
        }
        out
    }

    pub fn encode(&self) -> Vec<u8> {
        let abi = ContextAbi {
            sender: self.sender,
            tokens: self.tokens.clone(),
            amounts: self.amounts.clone(),
            flashToken: self.flash_token,
            flashAmount: self.flash_amount,
            actionIndex: U256::from(self.action_index),
            actions: self
                .actions
                .iter()
                .map(|a| ActionAbi {
                    target: a.target,
                    value: a.value,
                    data: Bytes::from(a.data.clone()),
                })
                .collect(),
            results: self.results.iter().cloned().map(Bytes::from).collect(),
        };
        SolValue::abi_encode(&abi)
    }

    /// `None` for empty or malformed input (no flash loan in flight).
    pub fn decode(data: &[u8]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        let abi = <ContextAbi as SolValue>::abi_decode(data, true).ok()?;
        Some(Self {
            sender: abi.sender,
            tokens: abi.tokens,
            amounts: abi.amounts,
            flash_token: abi.flashToken,
            flash_amount: abi.flashAmount,
            action_index: usize::try_from(abi.actionIndex).ok()?,
            actions: abi
                .actions
                .into_iter()
                .map(|a| Action {
                    target: a.target,
                    value: a.value,
                    data: a.data.to_vec(),
                })
                .collect(),
            results: abi.results.into_iter().map(|r| r.to_vec()).collect(),
        })
    }
}
