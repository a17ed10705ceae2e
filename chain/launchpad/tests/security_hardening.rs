//! Security Hardening Tests
//!
//! Adversarial testing of the launchpad core:
//! - Atomic rollback when a collaborator fails mid-operation
//! - Arithmetic overflow
//! - Permission checks (creator-only withdrawal)
//! - Unknown / foreign tokens
//! - Fuzz testing (proptest): pool conservation, approval gate, rollback
//! - ABI freeze

use launchpad::config::LaunchpadConfig;
use launchpad::errors::{AssetError, LaunchpadError, SettlementError};
use launchpad::events::EventKind;
use launchpad::memory::{InMemoryAssets, InMemoryBank};
use launchpad::settlement::{AssetService, NativeCurrency};
use launchpad::{Launchpad, TokenParams, LAUNCHPAD_ABI_VERSION};
use types::ids::{AccountId, AssetId};
use types::numeric::{Units, Wei};

type Pad = Launchpad<InMemoryAssets, InMemoryBank>;

// ═══════════════════════════════════════════════════════════════════
// Rollback Tests
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_buy_rolls_back_when_refund_fails() {
    let (mut pad, creator, token) = setup_token(1000, 10, 1_000);
    let buyer = funded(&mut pad, 1_000);
    let root = pad.state_root();

    // buyer's account refuses inbound payments, so the refund cannot be paid
    pad.reject_payments_to(buyer);
    let err = pad.buy(token, buyer, Wei::from_wei(55)).unwrap_err();
    assert!(matches!(err, LaunchpadError::Settlement(SettlementError::Rejected { .. })));

    assert_eq!(pad.state_root(), root);
    assert_eq!(pad.bank().balance_of(buyer), Wei::from_wei(1_000));
    assert_eq!(pad.assets().balance_of(token, buyer).unwrap(), 0);
    assert_eq!(pad.assets().balance_of(token, creator).unwrap(), 1000);
    assert_eq!(pad.bank().balance_of(pad.account()), Wei::from_wei(1_000));
    assert_eq!(pad.events().query(EventKind::TokensPurchased).count(), 0);
}

#[test]
fn test_buy_rolls_back_when_asset_transfer_fails() {
    let (mut pad, _, token) = setup_token(1000, 10, 1_000);
    let buyer = funded(&mut pad, 1_000);
    let root = pad.state_root();

    pad.reject_transfers_to(buyer);
    let err = pad.buy(token, buyer, Wei::from_wei(50)).unwrap_err();
    assert!(matches!(err, LaunchpadError::Asset(AssetError::Rejected { .. })));

    assert_eq!(pad.state_root(), root);
    assert_eq!(pad.bank().balance_of(buyer), Wei::from_wei(1_000));
}

#[test]
fn test_buy_with_exact_payment_needs_no_refund_path() {
    let (mut pad, _, token) = setup_token(1000, 10, 1_000);
    let buyer = funded(&mut pad, 1_000);

    // no refund is owed, so a payee that refuses payments can still buy
    pad.reject_payments_to(buyer);
    let receipt = pad.buy(token, buyer, Wei::from_wei(50)).unwrap();
    assert_eq!(receipt.units, 5);
    assert_eq!(receipt.refund, Wei::ZERO);
}

#[test]
fn test_buyer_without_funds_changes_nothing() {
    let (mut pad, _, token) = setup_token(1000, 10, 1_000);
    let broke = AccountId::new();
    let root = pad.state_root();

    let err = pad.buy(token, broke, Wei::from_wei(50)).unwrap_err();
    assert!(matches!(
        err,
        LaunchpadError::Settlement(SettlementError::InsufficientFunds { .. })
    ));
    assert_eq!(pad.state_root(), root);
    assert_eq!(pad.available_units(token).unwrap(), 1000);
}

#[test]
fn test_sell_rolls_back_when_payout_fails() {
    let (mut pad, creator, token) = setup_token(1000, 10, 1_000);
    let seller = funded(&mut pad, 1_000);
    pad.buy(token, seller, Wei::from_wei(100)).unwrap();
    approve(&mut pad, token, seller, Units::MAX);
    let root = pad.state_root();

    pad.reject_payments_to(seller);
    let err = pad.sell(token, seller, 10).unwrap_err();
    assert!(matches!(err, LaunchpadError::Settlement(_)));

    assert_eq!(pad.state_root(), root);
    assert_eq!(pad.assets().balance_of(token, seller).unwrap(), 10);
    assert_eq!(pad.assets().balance_of(token, creator).unwrap(), 990);
}

#[test]
fn test_withdraw_rolls_back_when_payout_fails() {
    let (mut pad, creator, token) = setup_token(1000, 10, 1_000);
    let root = pad.state_root();

    pad.reject_payments_to(creator);
    assert!(pad.withdraw(token, creator, Wei::from_wei(500)).is_err());
    assert_eq!(pad.state_root(), root);
    assert_eq!(pad.bank().balance_of(pad.account()), Wei::from_wei(1_000));
}

// ═══════════════════════════════════════════════════════════════════
// Overflow Tests
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_sell_overflowing_payout_rejected() {
    let mut pad = Launchpad::with_defaults();
    let creator = AccountId::new();
    let token = pad
        .create_token(
            creator,
            TokenParams::new("Whale", "WHL", Units::MAX, Wei::from_wei(u128::MAX), Wei::ZERO),
        )
        .unwrap();

    let result = pad.sell(token, creator, 2);
    assert_eq!(result, Err(LaunchpadError::Overflow));
}

#[test]
fn test_pool_credit_overflow_rejected() {
    let mut pad = Launchpad::with_defaults();
    let creator = AccountId::new();
    let buyer = AccountId::new();
    pad.fund(creator, Wei::from_wei(u128::MAX - 10)).unwrap();
    pad.fund(buyer, Wei::from_wei(11)).unwrap();
    let token = pad
        .create_token(
            creator,
            TokenParams::new("Deep", "DEEP", 100, Wei::from_wei(1), Wei::from_wei(u128::MAX - 10)),
        )
        .unwrap();
    approve(&mut pad, token, creator, Units::MAX);
    let root = pad.state_root();

    // the pool can absorb 10 more wei but not 11
    assert_eq!(pad.buy(token, buyer, Wei::from_wei(11)), Err(LaunchpadError::Overflow));
    assert_eq!(pad.state_root(), root);
    assert_eq!(pad.bank().balance_of(buyer), Wei::from_wei(11));

    let receipt = pad.buy(token, buyer, Wei::from_wei(10)).unwrap();
    assert_eq!(receipt.units, 10);
    assert_eq!(pad.get_token_info(token).unwrap().eth_pool(), Wei::from_wei(u128::MAX));
}

// ═══════════════════════════════════════════════════════════════════
// Permission Tests
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_non_creator_cannot_withdraw() {
    let (mut pad, _, token) = setup_token(1000, 10, 1_000);
    let attacker = funded(&mut pad, 1);
    let root = pad.state_root();

    assert_eq!(
        pad.withdraw(token, attacker, Wei::from_wei(1)),
        Err(LaunchpadError::NotCreator)
    );
    assert_eq!(pad.state_root(), root);
    assert_eq!(pad.bank().balance_of(attacker), Wei::from_wei(1));
}

#[test]
fn test_creator_of_other_token_cannot_withdraw() {
    let (mut pad, _, token) = setup_token(1000, 10, 1_000);
    let rival = funded(&mut pad, 1_000);
    pad.create_token(
        rival,
        TokenParams::new("Rival", "RVL", 10, Wei::from_wei(1), Wei::from_wei(100)),
    )
    .unwrap();

    assert_eq!(
        pad.withdraw(token, rival, Wei::from_wei(1)),
        Err(LaunchpadError::NotCreator)
    );
}

#[test]
fn test_launchpad_cannot_move_unapproved_holder_units() {
    let (mut pad, _, token) = setup_token(1000, 10, 1_000);
    let holder = funded(&mut pad, 1_000);
    pad.buy(token, holder, Wei::from_wei(100)).unwrap();

    // holder approves fewer units than they try to sell
    approve(&mut pad, token, holder, 3);
    let err = pad.sell(token, holder, 4).unwrap_err();
    assert!(matches!(
        err,
        LaunchpadError::Asset(AssetError::InsufficientAllowance { allowed: 3, requested: 4, .. })
    ));
}

#[test]
fn test_custody_account_moves_only_through_operations() {
    let (mut pad, creator, token) = setup_token(1000, 10, 1_000);
    let custody = pad.account();

    assert_eq!(
        pad.fund(custody, Wei::from_wei(1)),
        Err(LaunchpadError::CustodyFunding)
    );
    // the creator drains the pool exactly; custody holds nothing beyond it
    pad.withdraw(token, creator, Wei::from_wei(1_000)).unwrap();
    assert!(pad.bank().balance_of(custody).is_zero());
    assert_eq!(pad.total_pooled().unwrap(), pad.bank().balance_of(custody));
}

#[test]
fn test_zero_withdrawal_by_creator_is_noop() {
    let (mut pad, creator, token) = setup_token(1000, 10, 10);
    let root = pad.state_root();

    assert_eq!(pad.withdraw(token, creator, Wei::ZERO), Ok(()));
    assert_eq!(pad.state_root(), root);
    assert_eq!(pad.get_token_info(token).unwrap().eth_pool(), Wei::from_wei(10));
    // zero is still creator-only
    assert_eq!(
        pad.withdraw(token, AccountId::new(), Wei::ZERO),
        Err(LaunchpadError::NotCreator)
    );
}

// ═══════════════════════════════════════════════════════════════════
// Unknown Tokens
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_token_issued_elsewhere_is_not_tradable() {
    let creator = AccountId::new();
    // issued directly on the asset service, never registered with the launchpad
    let mut assets = InMemoryAssets::new();
    let foreign = assets.issue("Scam", "SCAM", 1_000_000, creator).unwrap();

    let mut pad = Launchpad::new(LaunchpadConfig::default(), assets, InMemoryBank::new());
    let buyer = funded(&mut pad, 1_000);
    approve(&mut pad, foreign, creator, Units::MAX);

    assert_eq!(
        pad.buy(foreign, buyer, Wei::from_wei(100)),
        Err(LaunchpadError::NotFound { asset_id: foreign })
    );
    assert_eq!(
        pad.sell(foreign, buyer, 1),
        Err(LaunchpadError::NotFound { asset_id: foreign })
    );
    assert!(pad.get_token_info(foreign).is_err());
}

#[test]
fn test_each_creation_yields_distinct_token() {
    let (mut pad, creator, first) = setup_token(1000, 10, 1_000);
    let second = pad
        .create_token(
            creator,
            TokenParams::new("ShikharCoin", "SHC", 1000, Wei::from_wei(10), Wei::ZERO),
        )
        .unwrap();
    assert_ne!(first, second);
    assert_eq!(pad.registry().len(), 2);
}

// ═══════════════════════════════════════════════════════════════════
// ABI Freeze
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_launchpad_abi_version_frozen() {
    assert_eq!(LAUNCHPAD_ABI_VERSION, "1.0.0");
}

// ═══════════════════════════════════════════════════════════════════
// Fuzz Tests (Proptest)
// ═══════════════════════════════════════════════════════════════════

mod fuzz {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Buy { trader: usize, payment: u128 },
        Sell { trader: usize, units: u128 },
        Withdraw { by_creator: bool, amount: u128 },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..3, 0u128..=5_000).prop_map(|(trader, payment)| Op::Buy { trader, payment }),
            (0usize..3, 0u128..=60).prop_map(|(trader, units)| Op::Sell { trader, units }),
            (any::<bool>(), 0u128..=3_000)
                .prop_map(|(by_creator, amount)| Op::Withdraw { by_creator, amount }),
        ]
    }

    proptest! {
        /// Invariant: the pool always equals seed + buys - sells - withdrawals,
        /// never goes negative, and matches the launchpad's custody balance.
        #[test]
        fn fuzz_pool_conservation(
            price in 1u128..=200,
            seed in 0u128..=2_000,
            supply in 1u128..=200,
            ops in prop::collection::vec(op(), 1..40),
        ) {
            let mut pad = Launchpad::with_defaults();
            let creator = AccountId::new();
            pad.fund(creator, Wei::from_wei(seed)).unwrap();
            let token = pad
                .create_token(creator, TokenParams::new("Fuzz", "FZ", supply, Wei::from_wei(price), Wei::from_wei(seed)))
                .unwrap();
            approve(&mut pad, token, creator, Units::MAX);

            let traders: Vec<AccountId> = (0..3).map(|_| funded(&mut pad, 1_000_000)).collect();
            for t in &traders {
                approve(&mut pad, token, *t, Units::MAX);
            }

            let mut expected = seed;
            for op in ops {
                let root = pad.state_root();
                let failed = match op {
                    Op::Buy { trader, payment } => {
                        match pad.buy(token, traders[trader], Wei::from_wei(payment)) {
                            Ok(r) => {
                                prop_assert_eq!(r.units * price + r.refund.as_wei(), payment);
                                expected += r.cost.as_wei();
                                false
                            }
                            Err(_) => true,
                        }
                    }
                    Op::Sell { trader, units } => match pad.sell(token, traders[trader], units) {
                        Ok(payout) => {
                            expected -= payout.as_wei();
                            false
                        }
                        Err(_) => true,
                    },
                    Op::Withdraw { by_creator, amount } => {
                        let caller = if by_creator { creator } else { traders[0] };
                        match pad.withdraw(token, caller, Wei::from_wei(amount)) {
                            Ok(()) => {
                                expected -= amount;
                                false
                            }
                            Err(_) => true,
                        }
                    }
                };
                if failed {
                    prop_assert_eq!(pad.state_root(), root);
                }

                let pool = pad.get_token_info(token).unwrap().eth_pool();
                prop_assert_eq!(pool.as_wei(), expected);
                prop_assert_eq!(pad.bank().balance_of(pad.account()), pool);
                prop_assert_eq!(pad.assets().circulating(token), Some(supply));
            }
        }

        /// Invariant: without creator approval every buy fails with
        /// NotApproved and nothing changes.
        #[test]
        fn fuzz_approval_gate(
            price in 1u128..=1_000,
            payment in 0u128..=1_000_000,
        ) {
            let mut pad = Launchpad::with_defaults();
            let creator = AccountId::new();
            let token = pad
                .create_token(creator, TokenParams::new("Gate", "GT", 1_000, Wei::from_wei(price), Wei::ZERO))
                .unwrap();
            let buyer = funded(&mut pad, 1_000_000);
            let root = pad.state_root();

            prop_assert_eq!(pad.buy(token, buyer, Wei::from_wei(payment)), Err(LaunchpadError::NotApproved));
            prop_assert_eq!(pad.state_root(), root);
            prop_assert_eq!(pad.bank().balance_of(buyer), Wei::from_wei(1_000_000));
        }

        /// Invariant: withdrawal by any non-creator fails with NotCreator.
        #[test]
        fn fuzz_creator_only_withdrawal(amount in 0u128..=10_000) {
            let (mut pad, _, token) = setup_token(100, 1, 5_000);
            let stranger = AccountId::new();
            let root = pad.state_root();

            prop_assert_eq!(
                pad.withdraw(token, stranger, Wei::from_wei(amount)),
                Err(LaunchpadError::NotCreator)
            );
            prop_assert_eq!(pad.state_root(), root);
        }

        /// Invariant: a zero price never creates a record.
        #[test]
        fn fuzz_zero_price_never_creates(supply in 0u128..=1_000_000, seed in 0u128..=1_000) {
            let mut pad = Launchpad::with_defaults();
            let creator = funded(&mut pad, 1_000);
            let result = pad.create_token(creator, TokenParams::new("Zero", "ZR", supply, Wei::ZERO, Wei::from_wei(seed)));
            prop_assert_eq!(result, Err(LaunchpadError::InvalidPrice));
            prop_assert!(pad.registry().is_empty());
            prop_assert_eq!(pad.bank().balance_of(creator), Wei::from_wei(1_000));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

/// A launchpad with one token whose creator has approved every unit.
fn setup_token(supply: Units, price: u128, seed: u128) -> (Pad, AccountId, AssetId) {
    let mut pad = Launchpad::with_defaults();
    let creator = funded(&mut pad, seed);
    let token = pad
        .create_token(
            creator,
            TokenParams::new("ShikharCoin", "SHC", supply, Wei::from_wei(price), Wei::from_wei(seed)),
        )
        .unwrap();
    approve(&mut pad, token, creator, Units::MAX);
    (pad, creator, token)
}

fn funded(pad: &mut Pad, wei: u128) -> AccountId {
    let account = AccountId::new();
    pad.fund(account, Wei::from_wei(wei)).unwrap();
    account
}

fn approve(pad: &mut Pad, token: AssetId, holder: AccountId, units: Units) {
    pad.approve(token, holder, units).unwrap();
}
