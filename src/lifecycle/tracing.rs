//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide `tracing` subscriber.
//!
//! - **Structured logging** with the `tracing` crate
//! - **Configurable log levels** via the `RUST_LOG` environment variable (default `info`)
//! - **Compact format** with spans inline and module paths hidden
//!
//! ## What Gets Traced
//!
//! - **Workflow steps**: one `step` span per orchestrator step, with the outcome
//! - **Transactions**: submission, fee, consensus status
//! - **Actors**: startup, entity creation, actions, shutdown
//!
//! ```bash
//! # Step outcomes and transaction statuses
//! RUST_LOG=info cargo run
//!
//! # Full request payloads
//! RUST_LOG=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a run looks like:
//!
//! ```text
//! INFO Ledger network started genesis=1
//! INFO step{step=create_account}: Submitting transaction transaction_id=0.0.2@1700000000.000000001
//! INFO step{step=create_account}: Reached consensus kind=account_create status=SUCCESS fee=5000000 tℏ
//! INFO step{step=create_account}: Step completed step=create_account outcome=The new account id is: 0.0.1001
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();
}
