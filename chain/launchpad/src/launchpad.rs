//! Launchpad — token creation and fixed-price trading against per-token pools
//!
//! Every state-changing operation follows the same shape:
//! 1. Read the sale record and validate (nothing has moved yet)
//! 2. Price the operation with `ledger`
//! 3. Open a journal on both collaborators and apply every effect, writing
//!    the new sale record last
//! 4. Commit on success, roll both collaborators back on any failure
//! 5. Emit the event only after commit

use tracing::{debug, info, warn};
use types::ids::{AccountId, AssetId};
use types::numeric::{Units, Wei};

use crate::config::LaunchpadConfig;
use crate::digest;
use crate::errors::LaunchpadError;
use crate::events::{
    ContractEvent, EventLog, PoolWithdrawn, TokenCreated, TokensPurchased, TokensSold,
};
use crate::ledger::{self, BuyQuote};
use crate::memory::{InMemoryAssets, InMemoryBank};
use crate::registry::{AssetRegistry, SaleRecord};
use crate::security;
use crate::settlement::{AssetService, Journaled, NativeCurrency};

/// Parameters of a new token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParams {
    pub name: String,
    pub symbol: String,
    pub total_supply: Units,
    pub price_per_unit: Wei,
    /// Native currency the creator moves into the pool at creation.
    pub seed_liquidity: Wei,
}

impl TokenParams {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        total_supply: Units,
        price_per_unit: Wei,
        seed_liquidity: Wei,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            total_supply,
            price_per_unit,
            seed_liquidity,
        }
    }
}

/// Result of a committed buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyReceipt {
    pub units: Units,
    /// Added to the pool.
    pub cost: Wei,
    /// Returned to the buyer in the same operation.
    pub refund: Wei,
}

/// The launchpad core.
///
/// `account` is the launchpad's own identity: it is the spender on every
/// delegated asset transfer and the native account that holds all pools.
#[derive(Debug)]
pub struct Launchpad<A, N> {
    account: AccountId,
    config: LaunchpadConfig,
    registry: AssetRegistry,
    assets: A,
    bank: N,
    events: EventLog,
}

impl Launchpad<InMemoryAssets, InMemoryBank> {
    /// Launchpad over in-memory collaborators with default limits.
    pub fn with_defaults() -> Self {
        Self::new(
            LaunchpadConfig::default(),
            InMemoryAssets::new(),
            InMemoryBank::new(),
        )
    }

    /// Credit native currency to `account` from outside the system.
    ///
    /// Funding the launchpad's own account is refused: every wei it holds
    /// must belong to a pool.
    pub fn fund(&mut self, account: AccountId, amount: Wei) -> Result<(), LaunchpadError> {
        if account == self.account {
            return Err(LaunchpadError::CustodyFunding);
        }
        self.bank.fund(account, amount)?;
        Ok(())
    }

    /// Make every later asset transfer to `account` fail.
    pub fn reject_transfers_to(&mut self, account: AccountId) {
        self.assets.reject_transfers_to(account);
    }

    /// Make every later native payment to `account` fail.
    pub fn reject_payments_to(&mut self, account: AccountId) {
        self.bank.reject_payments_to(account);
    }
}

impl<A: AssetService, N: NativeCurrency> Launchpad<A, N> {
    pub fn new(config: LaunchpadConfig, assets: A, bank: N) -> Self {
        let account = AccountId::new();
        info!(
            account = %account,
            max_name_len = ?config.max_name_len,
            max_symbol_len = ?config.max_symbol_len,
            require_metadata = config.require_metadata,
            min_seed_liquidity = %config.min_seed_liquidity,
            "Launchpad initialized"
        );
        Self {
            account,
            config,
            registry: AssetRegistry::new(),
            assets,
            bank,
            events: EventLog::new(),
        }
    }

    // ───────────────────────── Create ─────────────────────────

    /// Issue a new token to `creator` and open its pool.
    ///
    /// The full supply is minted to the creator; the launchpad can sell only
    /// what the creator later approves it to move. `seed_liquidity` is taken
    /// from the creator's native balance into the pool.
    pub fn create_token(
        &mut self,
        creator: AccountId,
        params: TokenParams,
    ) -> Result<AssetId, LaunchpadError> {
        if params.price_per_unit.is_zero() {
            warn!(creator = %creator, symbol = %params.symbol, "Rejected token with zero price");
            return Err(LaunchpadError::InvalidPrice);
        }
        self.validate_metadata(&params)?;
        if params.seed_liquidity < self.config.min_seed_liquidity {
            return Err(LaunchpadError::InsufficientLiquidity {
                required: self.config.min_seed_liquidity,
                provided: params.seed_liquidity,
            });
        }

        let account = self.account;
        let registry = &mut self.registry;
        let asset_id = atomically(&mut self.assets, &mut self.bank, |assets, bank| {
            let asset_id =
                assets.issue(&params.name, &params.symbol, params.total_supply, creator)?;
            bank.transfer(creator, account, params.seed_liquidity)?;
            let record = SaleRecord::new(
                asset_id,
                creator,
                params.name.clone(),
                params.symbol.clone(),
                params.total_supply,
                params.price_per_unit,
                params.seed_liquidity,
            )?;
            registry.insert(record)?;
            Ok(asset_id)
        })?;

        info!(
            asset_id = %asset_id,
            creator = %creator,
            symbol = %params.symbol,
            total_supply = params.total_supply,
            price_per_unit = %params.price_per_unit,
            eth_pool = %params.seed_liquidity,
            "Token created"
        );

        self.events.emit(ContractEvent::TokenCreated(TokenCreated {
            asset_id,
            creator,
            name: params.name,
            symbol: params.symbol,
            total_supply: params.total_supply,
            price_per_unit: params.price_per_unit,
            eth_pool: params.seed_liquidity,
        }));
        Ok(asset_id)
    }

    // ───────────────────────── Buy ─────────────────────────

    /// Buy as many whole units as `payment` affords, up to what the creator
    /// has made available. The unspent remainder is refunded immediately.
    pub fn buy(
        &mut self,
        asset_id: AssetId,
        buyer: AccountId,
        payment: Wei,
    ) -> Result<BuyReceipt, LaunchpadError> {
        let record = self.registry.get(asset_id)?.clone();
        let quote = self.quote_buy(&record, payment)?;
        let pool_after = ledger::credit_pool(record.eth_pool(), quote.cost)?;

        let account = self.account;
        let creator = record.creator();
        let registry = &mut self.registry;
        atomically(&mut self.assets, &mut self.bank, |assets, bank| {
            bank.transfer(buyer, account, payment)?;
            assets.transfer_from(asset_id, account, creator, buyer, quote.units)?;
            if !quote.refund.is_zero() {
                bank.transfer(account, buyer, quote.refund)?;
            }
            registry.replace(record.with_eth_pool(pool_after))
        })?;

        info!(
            asset_id = %asset_id,
            buyer = %buyer,
            units = quote.units,
            cost = %quote.cost,
            refund = %quote.refund,
            eth_pool = %pool_after,
            "Tokens purchased"
        );

        self.events.emit(ContractEvent::TokensPurchased(TokensPurchased {
            asset_id,
            buyer,
            units: quote.units,
            cost: quote.cost,
            refund: quote.refund,
        }));
        Ok(BuyReceipt {
            units: quote.units,
            cost: quote.cost,
            refund: quote.refund,
        })
    }

    fn quote_buy(&self, record: &SaleRecord, payment: Wei) -> Result<BuyQuote, LaunchpadError> {
        let asset_id = record.asset_id();
        let creator = record.creator();

        let allowance = self.assets.allowance(asset_id, creator, self.account)?;
        if allowance == 0 {
            warn!(asset_id = %asset_id, creator = %creator, "Buy rejected: creator hasn't approved tokens");
            return Err(LaunchpadError::NotApproved);
        }
        let balance = self.assets.balance_of(asset_id, creator)?;
        let available = ledger::available_units(allowance, balance);

        let quote = ledger::quote_buy(record.price_per_unit(), payment, available)
            .inspect_err(|err| {
                warn!(asset_id = %asset_id, payment = %payment, available, error = %err, "Buy rejected");
            })?;
        debug!(
            asset_id = %asset_id,
            payment = %payment,
            available,
            requested = quote.requested_units,
            units = quote.units,
            "Buy quoted"
        );
        Ok(quote)
    }

    // ───────────────────────── Sell ─────────────────────────

    /// Sell `units` back to the creator at the fixed price, paid from the pool.
    ///
    /// The seller must have approved the launchpad to move `units`.
    pub fn sell(
        &mut self,
        asset_id: AssetId,
        seller: AccountId,
        units: Units,
    ) -> Result<Wei, LaunchpadError> {
        let record = self.registry.get(asset_id)?.clone();
        let quote = ledger::quote_sell(record.price_per_unit(), units, record.eth_pool())
            .inspect_err(|err| {
                warn!(asset_id = %asset_id, seller = %seller, units, error = %err, "Sell rejected");
            })?;

        let account = self.account;
        let creator = record.creator();
        let registry = &mut self.registry;
        atomically(&mut self.assets, &mut self.bank, |assets, bank| {
            assets.transfer_from(asset_id, account, seller, creator, units)?;
            bank.transfer(account, seller, quote.payout)?;
            registry.replace(record.with_eth_pool(quote.pool_after))
        })?;

        info!(
            asset_id = %asset_id,
            seller = %seller,
            units,
            payout = %quote.payout,
            eth_pool = %quote.pool_after,
            "Tokens sold"
        );

        self.events.emit(ContractEvent::TokensSold(TokensSold {
            asset_id,
            seller,
            units,
            payout: quote.payout,
        }));
        Ok(quote.payout)
    }

    // ───────────────────────── Withdraw ─────────────────────────

    /// Pay `amount` from the pool to the token's creator. Creator-only.
    ///
    /// A zero amount is accepted and leaves the pool unchanged.
    pub fn withdraw(
        &mut self,
        asset_id: AssetId,
        caller: AccountId,
        amount: Wei,
    ) -> Result<(), LaunchpadError> {
        let record = self.registry.get(asset_id)?.clone();
        security::ensure_creator(&record, caller)?;
        let pool_after = ledger::debit_pool(record.eth_pool(), amount).inspect_err(|err| {
            warn!(asset_id = %asset_id, amount = %amount, error = %err, "Withdrawal rejected");
        })?;

        let account = self.account;
        let registry = &mut self.registry;
        atomically(&mut self.assets, &mut self.bank, |_, bank| {
            bank.transfer(account, caller, amount)?;
            registry.replace(record.with_eth_pool(pool_after))
        })?;

        info!(
            asset_id = %asset_id,
            creator = %caller,
            amount = %amount,
            eth_pool = %pool_after,
            "Pool withdrawn"
        );

        self.events.emit(ContractEvent::PoolWithdrawn(PoolWithdrawn {
            asset_id,
            creator: caller,
            amount,
        }));
        Ok(())
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Sale record of a token.
    pub fn get_token_info(&self, asset_id: AssetId) -> Result<&SaleRecord, LaunchpadError> {
        self.registry.get(asset_id)
    }

    /// Units a buy could receive right now, read through from the asset service.
    pub fn available_units(&self, asset_id: AssetId) -> Result<Units, LaunchpadError> {
        let creator = self.registry.get(asset_id)?.creator();
        let allowance = self.assets.allowance(asset_id, creator, self.account)?;
        let balance = self.assets.balance_of(asset_id, creator)?;
        Ok(ledger::available_units(allowance, balance))
    }

    /// Sum of every pool. Equals the launchpad's native balance.
    pub fn total_pooled(&self) -> Result<Wei, LaunchpadError> {
        self.registry
            .records()
            .try_fold(Wei::ZERO, |acc, r| ledger::credit_pool(acc, r.eth_pool()))
    }

    /// SHA-256 root over every sale record in creation order.
    pub fn state_root(&self) -> [u8; 32] {
        digest::state_root(self.registry.records())
    }

    /// The launchpad's own account: delegated spender and pool custodian.
    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn config(&self) -> &LaunchpadConfig {
        &self.config
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    pub fn bank(&self) -> &N {
        &self.bank
    }

    // ───────────────────────── Approvals ─────────────────────────

    /// `holder` lets the launchpad move up to `units` of their balance.
    ///
    /// A creator approves to put units on sale; a holder approves before
    /// selling. The launchpad is always the spender, so no other allowance
    /// can be set through here.
    pub fn approve(
        &mut self,
        asset_id: AssetId,
        holder: AccountId,
        units: Units,
    ) -> Result<(), LaunchpadError> {
        self.assets.approve(asset_id, holder, self.account, units)?;
        debug!(asset_id = %asset_id, holder = %holder, units, "Launchpad approved");
        Ok(())
    }

    // ───────────────────────── Internal ─────────────────────────

    /// Apply the configured metadata limits. With the default config every
    /// name and symbol passes.
    fn validate_metadata(&self, params: &TokenParams) -> Result<(), LaunchpadError> {
        let check = |field: &str, value: &str, max: Option<usize>| {
            if self.config.require_metadata && value.trim().is_empty() {
                return Err(LaunchpadError::InvalidMetadata {
                    reason: format!("{field} must not be empty"),
                });
            }
            let len = value.chars().count();
            match max {
                Some(max) if len > max => Err(LaunchpadError::InvalidMetadata {
                    reason: format!("{field} is {len} characters, limit is {max}"),
                }),
                _ => Ok(()),
            }
        };
        check("name", &params.name, self.config.max_name_len)?;
        check("symbol", &params.symbol, self.config.max_symbol_len)
    }
}

/// Run `op` against both collaborators as one unit.
///
/// Commits both journals when `op` succeeds; rolls both back when it fails.
fn atomically<A, N, T>(
    assets: &mut A,
    bank: &mut N,
    op: impl FnOnce(&mut A, &mut N) -> Result<T, LaunchpadError>,
) -> Result<T, LaunchpadError>
where
    A: Journaled,
    N: Journaled,
{
    assets.begin();
    bank.begin();
    match op(assets, bank) {
        Ok(value) => {
            assets.commit();
            bank.commit();
            Ok(value)
        }
        Err(err) => {
            assets.rollback();
            bank.rollback();
            warn!(error = %err, "Operation rolled back");
            Err(err)
        }
    }
}
