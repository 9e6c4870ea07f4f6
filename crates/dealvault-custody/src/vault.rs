//! In-memory host: native balances, token registry, and escrow custody.
//!
//! The [`Vault`] stands in for the execution environment the ledger runs
//! on. It owns every account's balances, the registry of fungible tokens
//! with their allowances, and the custody account whose holdings back open
//! deals and pending fees.

use std::collections::{HashMap, HashSet};

use dealvault_types::{Address, AssetId, DealvaultError, Result, constants};

use crate::adapter::TransferAdapter;
use crate::balances::BalanceBook;
use crate::token::{Token, TokenInfo, TransferBehavior};

/// Simulated host holding all balances, with escrow custody at `custody`.
#[derive(Debug)]
pub struct Vault {
    /// The account that holds escrowed funds.
    custody: Address,
    /// Every account's holdings, custody included.
    book: BalanceBook,
    /// Registered fungible tokens by contract address.
    tokens: HashMap<Address, Token>,
    /// Accounts whose native receive hook rejects incoming value.
    rejects_native: HashSet<Address>,
}

impl Vault {
    /// Create a host whose escrow custody lives at `custody`.
    #[must_use]
    pub fn new(custody: Address) -> Self {
        Self {
            custody,
            book: BalanceBook::new(),
            tokens: HashMap::new(),
            rejects_native: HashSet::new(),
        }
    }

    /// The custody account address.
    #[must_use]
    pub fn custody_address(&self) -> Address {
        self.custody
    }

    /// Register a fungible token at `contract`. Re-registering replaces
    /// metadata but keeps balances.
    pub fn register_token(&mut self, contract: Address, info: TokenInfo) -> AssetId {
        self.tokens.insert(contract, Token::new(info));
        AssetId::Token(contract)
    }

    /// Create `amount` of `asset` out of thin air for `owner`.
    ///
    /// # Errors
    /// `UnknownAsset` for unregistered tokens, `BalanceOverflow`.
    pub fn mint(&mut self, asset: AssetId, owner: Address, amount: u128) -> Result<()> {
        self.ensure_known(&asset)?;
        self.book.credit(owner, asset, amount)
    }

    /// Approve custody to pull up to `amount` of `token` from `owner`.
    ///
    /// # Errors
    /// `UnknownAsset` if `token` is native or unregistered.
    pub fn approve(&mut self, token: AssetId, owner: Address, amount: u128) -> Result<()> {
        self.token_mut(&token)?.approve(owner, amount);
        Ok(())
    }

    /// Remaining allowance of `owner` toward custody for `token`.
    #[must_use]
    pub fn allowance(&self, token: AssetId, owner: Address) -> u128 {
        match token {
            AssetId::Token(addr) => self.tokens.get(&addr).map_or(0, |t| t.allowance(owner)),
            AssetId::Native => 0,
        }
    }

    /// Change how `token` responds to transfers.
    ///
    /// # Errors
    /// `UnknownAsset` if `token` is native or unregistered.
    pub fn set_token_behavior(&mut self, token: AssetId, behavior: TransferBehavior) -> Result<()> {
        self.token_mut(&token)?.behavior = behavior;
        Ok(())
    }

    /// Make `account` reject (or accept again) incoming native value.
    pub fn set_rejects_native(&mut self, account: Address, rejects: bool) {
        if rejects {
            self.rejects_native.insert(account);
        } else {
            self.rejects_native.remove(&account);
        }
    }

    /// Balance of `owner` in `asset`.
    #[must_use]
    pub fn balance_of(&self, owner: Address, asset: AssetId) -> u128 {
        self.book.balance(owner, asset)
    }

    /// Total supply of `asset` across all accounts, custody included.
    #[must_use]
    pub fn total_supply(&self, asset: AssetId) -> u128 {
        self.book.total_supply(asset)
    }

    /// Metadata of a registered token.
    #[must_use]
    pub fn token_info(&self, asset: &AssetId) -> Option<&TokenInfo> {
        match asset {
            AssetId::Token(addr) => self.tokens.get(addr).map(|t| &t.info),
            AssetId::Native => None,
        }
    }

    fn ensure_known(&self, asset: &AssetId) -> Result<()> {
        match asset {
            AssetId::Native => Ok(()),
            AssetId::Token(addr) if self.tokens.contains_key(addr) => Ok(()),
            AssetId::Token(_) => Err(DealvaultError::UnknownAsset(*asset)),
        }
    }

    fn token_mut(&mut self, asset: &AssetId) -> Result<&mut Token> {
        match asset {
            AssetId::Token(addr) => self
                .tokens
                .get_mut(addr)
                .ok_or(DealvaultError::UnknownAsset(*asset)),
            AssetId::Native => Err(DealvaultError::UnknownAsset(*asset)),
        }
    }

    /// Custody moving value to itself would record a flow that never happened.
    fn ensure_not_custody(&self, asset: AssetId, counterparty: Address) -> Result<()> {
        if counterparty == self.custody {
            return Err(DealvaultError::TransferRejected {
                asset,
                reason: "custody cannot transfer to itself".into(),
            });
        }
        Ok(())
    }

    fn check_behavior(asset: AssetId, behavior: TransferBehavior) -> Result<()> {
        match behavior {
            TransferBehavior::Standard => Ok(()),
            TransferBehavior::ReturnsFalse => Err(DealvaultError::TransferRejected {
                asset,
                reason: "token transfer returned false".into(),
            }),
            TransferBehavior::Reverts => Err(DealvaultError::TransferRejected {
                asset,
                reason: "token transfer reverted".into(),
            }),
        }
    }
}

impl TransferAdapter for Vault {
    fn deposit(
        &mut self,
        asset: &AssetId,
        payer: Address,
        amount: u128,
        attached_value: u128,
    ) -> Result<()> {
        self.ensure_not_custody(*asset, payer)?;
        match *asset {
            AssetId::Native => {
                if attached_value != amount {
                    return Err(DealvaultError::ValueMismatch {
                        attached: attached_value,
                        required: amount,
                    });
                }
                self.book.transfer(payer, self.custody, *asset, amount)?;
            }
            AssetId::Token(addr) => {
                if attached_value != 0 {
                    return Err(DealvaultError::ValueMismatch {
                        attached: attached_value,
                        required: 0,
                    });
                }
                let custody = self.custody;
                let token = self
                    .tokens
                    .get_mut(&addr)
                    .ok_or(DealvaultError::UnknownAsset(*asset))?;
                let approved = token.allowance(payer);
                if approved < amount {
                    return Err(DealvaultError::InsufficientAllowance {
                        asset: *asset,
                        needed: amount,
                        approved,
                    });
                }
                Self::check_behavior(*asset, token.behavior)?;
                self.book.transfer(payer, custody, *asset, amount)?;
                token.spend_allowance(payer, amount);
            }
        }
        tracing::debug!(asset = %asset, payer = %payer, amount = %amount, "Deposit into custody");
        Ok(())
    }

    fn payout(&mut self, asset: &AssetId, recipient: Address, amount: u128) -> Result<()> {
        self.ensure_not_custody(*asset, recipient)?;
        match *asset {
            AssetId::Native => {
                if self.rejects_native.contains(&recipient) {
                    return Err(DealvaultError::TransferRejected {
                        asset: *asset,
                        reason: format!("recipient {recipient} rejected native transfer"),
                    });
                }
            }
            AssetId::Token(addr) => {
                let token = self
                    .tokens
                    .get(&addr)
                    .ok_or(DealvaultError::UnknownAsset(*asset))?;
                Self::check_behavior(*asset, token.behavior)?;
            }
        }
        self.book.transfer(self.custody, recipient, *asset, amount)?;
        tracing::debug!(asset = %asset, recipient = %recipient, amount = %amount, "Payout from custody");
        Ok(())
    }

    fn custody_account(&self) -> Address {
        self.custody
    }

    fn custody_balance(&self, asset: &AssetId) -> u128 {
        self.book.balance(self.custody, *asset)
    }

    fn decimals(&self, asset: &AssetId) -> Option<u32> {
        match asset {
            AssetId::Native => Some(constants::NATIVE_DECIMALS),
            AssetId::Token(_) => self.token_info(asset).map(|i| i.decimals),
        }
    }
}
