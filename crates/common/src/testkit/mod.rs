/// Lightweight in-process fakes for integration tests
///
/// Provides an in-memory ledger, a capacity-tracking fee injector, and
/// deterministic signing collaborators, so the mint/locate/reconstruct
/// paths and both connectors can be exercised end to end without
/// external infrastructure.
///
/// # Example
///
/// ```rust,ignore
/// use common::testkit::{MemoryLedger, StaticFeeInjector};
///
/// #[tokio::test]
/// async fn test_round_trip() -> anyhow::Result<()> {
///     let ledger = Arc::new(MemoryLedger::new());
///     let fee_payer = ledger.seed(payer_key(), 1_000_000_000_000);
///     let injector = Arc::new(StaticFeeInjector::new(ledger.clone()));
///     // ... mint, locate, reconstruct
///     Ok(())
/// }
/// ```
mod ledger;
mod signers;

pub use ledger::{MemoryLedger, StaticFeeInjector, FLAT_FEE};
pub use signers::{
    random_content, FixedChallengeSigner, FixedClockValidator, FixedKeySigner,
};
