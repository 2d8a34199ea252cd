//! # Ledger Orchestrator
//!
//! Runs a fixed workflow against a distributed ledger: create an account, query its
//! balance, transfer hbar to it, create a fungible token, associate the token with
//! the new account and transfer token units to it. Every step waits for its receipt,
//! and the first failure ends the run.
//!
//! ## Layers
//!
//! ### 1. The Workflow ([`orchestrator`])
//! - **Role**: Validates configuration, runs the [`WorkflowPlan`](orchestrator::WorkflowPlan) step by step and reports outcomes.
//! - **Key items**: [`Orchestrator`](orchestrator::Orchestrator), [`WorkflowError`](orchestrator::WorkflowError).
//!
//! ### 2. The SDK ([`sdk`])
//! - **Role**: Builders with a freeze/sign/execute life cycle, queries and the [`Ledger`](sdk::Ledger) trait
//!   they are submitted through.
//! - **Key items**: [`Client`](sdk::Client), [`TransferTransaction`](sdk::TransferTransaction),
//!   [`MockLedger`](sdk::mock::MockLedger).
//!
//! ### 3. The Simulated Network ([`lifecycle`], [`account_actor`], [`token_actor`], [`transaction_actor`])
//! - **Role**: An in-process ledger made of resource actors. The transaction actor verifies signatures,
//!   charges fees and applies bodies through the account and token actors.
//! - **Key items**: [`LedgerNetwork`](lifecycle::LedgerNetwork), [`NetworkConfig`](lifecycle::NetworkConfig).
//!
//! ### 4. The Engine ([`framework`], [`clients`])
//! - **Role**: The generic `ResourceActor<T>` message loop and the typed clients in front of it.
//! - **Key items**: [`ActorEntity`](framework::ActorEntity), [`ResourceActor`](framework::ResourceActor),
//!   [`MockClient`](framework::mock::MockClient).
//!
//! ## Running
//!
//! ```bash
//! MY_ACCOUNT_ID=0.0.2 MY_PRIVATE_KEY=302e0201... RUST_LOG=info cargo run
//! ```

pub mod account_actor;
pub mod clients;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod orchestrator;
pub mod sdk;
pub mod token_actor;
pub mod transaction_actor;
