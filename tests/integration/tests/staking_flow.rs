//! End-to-end dashboard flows
//!
//! Stake form and unstake table driven through the public dashboard API
//! against the in-memory chain.

use sft_staking_client::pool::SECONDS_PER_DAY;
use sft_staking_client::{PoolId, StakeOutcome};
use sft_staking_integration_tests::{TestContext, TOKEN};

/// Stake into every pool, watch locks expire, withdraw one by one
#[tokio::test]
async fn test_full_stake_and_unstake_cycle() {
    let ctx = TestContext::funded(1_000);
    let dash = &ctx.dashboard;

    assert_eq!(dash.approvals().get_balance().await, "1000.0");

    for (amount, pool) in [
        ("100", PoolId::FIFTEEN_DAY),
        ("200", PoolId::THIRTY_DAY),
        ("300", PoolId::NINETY_DAY),
    ] {
        dash.on_amount_changed(amount).await;
        assert_eq!(dash.stake(amount, pool).await, StakeOutcome::Staked);
    }
    assert_eq!(dash.approvals().balance(), "400.0");

    let board = dash.refresh_board_at(ctx.chain.now()).await;
    assert_eq!(board.locked.len(), 3);
    assert!(board.unlocked.is_empty());

    // Day 20: only the 15 day pool has opened
    ctx.chain.advance(20 * SECONDS_PER_DAY);
    let board = dash.refresh_board_at(ctx.chain.now()).await;
    assert_eq!(board.unlocked.len(), 1);
    assert_eq!(board.unlocked[0].pool_id, PoolId::FIFTEEN_DAY);
    assert_eq!(board.unlocked[0].amount, "100.0");
    assert_eq!(board.locked.len(), 2);

    let opened = board.unlocked[0].clone();
    assert!(dash.unstake(&opened).await);
    let remaining = dash.stakes().stakes();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|s| s.pool_id != PoolId::FIFTEEN_DAY));

    // Principal plus reward came back
    let balance = ctx.chain.balance();
    assert!(balance > 500 * TOKEN, "balance {} should include reward", balance);

    // Day 91: everything has opened
    ctx.chain.advance(71 * SECONDS_PER_DAY);
    let board = dash.refresh_board_at(ctx.chain.now()).await;
    assert!(board.locked.is_empty());
    for stake in board.unlocked {
        assert!(dash.unstake(&stake).await);
    }
    assert!(dash.refresh_board_at(ctx.chain.now()).await.is_empty());
}

/// Withdrawing (pool 1, index 0) removes exactly that position
#[tokio::test]
async fn test_withdraw_removes_position() {
    let ctx = TestContext::funded(100);
    let dash = &ctx.dashboard;

    assert_eq!(dash.stake("10", PoolId::THIRTY_DAY).await, StakeOutcome::Staked);
    assert_eq!(dash.stake("20", PoolId::THIRTY_DAY).await, StakeOutcome::Staked);
    assert_eq!(dash.stake("30", PoolId::FIFTEEN_DAY).await, StakeOutcome::Staked);

    ctx.chain.advance(30 * SECONDS_PER_DAY);
    assert!(dash.stakes().withdraw(PoolId::THIRTY_DAY, 0).await);

    let stakes = dash.stakes().get_user_stakes().await;
    assert!(!stakes
        .iter()
        .any(|s| s.pool_id == PoolId::THIRTY_DAY && s.stake_index == 0));
    assert!(stakes
        .iter()
        .any(|s| s.pool_id == PoolId::THIRTY_DAY && s.stake_index == 1));
    assert_eq!(stakes.len(), 2);
}

/// A wallet that rejects signatures leaves no trace
#[tokio::test]
async fn test_rejected_signatures_create_nothing() {
    let ctx = TestContext::funded(100);
    ctx.chain.reject_submissions(true);
    let dash = &ctx.dashboard;

    assert!(!dash.approvals().approve("50").await);
    assert!(!dash.stakes().stake("50", PoolId::FIFTEEN_DAY).await);
    assert_eq!(
        dash.stake("50", PoolId::FIFTEEN_DAY).await,
        StakeOutcome::ApprovalFailed
    );

    assert!(!dash.approvals().is_approved());
    assert_eq!(ctx.chain.allowance(), 0);
    assert_eq!(ctx.chain.balance(), 100 * TOKEN);
    assert!(dash.stakes().get_user_stakes().await.is_empty());
    assert_eq!(
        ctx.submitted_signatures(),
        vec![
            "approve(address,uint256)",
            "stake(uint256,uint256)",
            "approve(address,uint256)",
        ]
    );
}

/// Disconnected wallet: every operation prompts and returns a safe default
#[tokio::test]
async fn test_disconnected_wallet_defaults() {
    let ctx = TestContext::funded(100);
    ctx.chain.set_connected(false);
    let dash = &ctx.dashboard;

    assert_eq!(dash.approvals().get_balance().await, "0");
    assert!(!dash.on_amount_changed("5").await);
    assert_eq!(dash.stake("5", PoolId::FIFTEEN_DAY).await, StakeOutcome::NotConnected);
    assert!(dash.refresh_board_at(ctx.chain.now()).await.is_empty());
    assert_eq!(
        dash.stakes().calculate_reward(PoolId::FIFTEEN_DAY, 0).await,
        "0"
    );
    assert!(ctx.chain.connection_prompts() >= 5);
    assert!(ctx.chain.submitted().is_empty());

    // Connecting recovers without restarting anything
    ctx.chain.set_connected(true);
    assert_eq!(dash.approvals().get_balance().await, "100.0");
}

/// Displayed APY follows the published table even when the contract disagrees
#[tokio::test]
async fn test_published_apy_shown_for_positions() {
    let ctx = TestContext::funded(100);
    ctx.chain.set_contract_pool(PoolId::NINETY_DAY, 90, 1_000);
    let dash = &ctx.dashboard;

    assert_eq!(dash.stake("10", PoolId::NINETY_DAY).await, StakeOutcome::Staked);
    let stakes = dash.stakes().get_user_stakes().await;
    assert_eq!(stakes[0].apy_percent, 500);
    assert_eq!(stakes[0].lock_duration_days, 90);

    assert_eq!(dash.preview("10", PoolId::NINETY_DAY), "12.33");
}
