//! SFT Staking Integration Tests
//!
//! Full dashboard flows against the in-memory chain session. Each test builds
//! a fresh [`TestContext`]: a funded wallet on a 9-decimal token, a staking
//! contract reporting the published pool rates, and a dashboard wired to both.

use sft_staking_client::testing::MockChain;
use sft_staking_client::StakingDashboard;
use std::sync::Arc;

/// Raw units per whole token (9 decimals)
pub const TOKEN: u128 = 1_000_000_000;

/// Test context with a funded wallet and a dashboard
pub struct TestContext {
    pub chain: Arc<MockChain>,
    pub dashboard: StakingDashboard<MockChain>,
}

impl TestContext {
    /// Wallet holding `tokens` whole tokens, nothing approved yet
    pub fn funded(tokens: u128) -> Self {
        sft_staking_client::init_logging();

        let chain = Arc::new(MockChain::new().with_balance(tokens * TOKEN));
        let dashboard = StakingDashboard::new(Arc::clone(&chain), &chain.config());
        log::info!("Test wallet {} funded with {} SFT", chain.user(), tokens);

        Self { chain, dashboard }
    }

    /// Signatures of every transaction submitted so far
    pub fn submitted_signatures(&self) -> Vec<&'static str> {
        self.chain
            .submitted()
            .iter()
            .map(|call| call.signature())
            .collect()
    }
}
