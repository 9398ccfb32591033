//! In-memory coin store keyed by coin reference and owner.
//!
//! The store keeps two maps that must agree with each other:
//! - `coins`: every tracked coin by its reference.
//! - `accounts`: every tracked account with the references it owns.
//!
//! A reference is present in an account's set if and only if the coin record exists
//! and is owned by that account.

use crate::types::{AccountId, AssetId, Coin, CoinReference, CoinState, TransactionOutput};
use crate::{Error, Result};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct CoinStore {
    coins: HashMap<CoinReference, Coin>,
    accounts: HashMap<AccountId, HashSet<CoinReference>>,
}

impl CoinStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `account`. Returns `false` if it was already tracked.
    pub fn track_account(&mut self, account: AccountId) -> bool {
        if self.accounts.contains_key(&account) {
            return false;
        }
        self.accounts.insert(account, HashSet::new());
        true
    }

    /// Stops tracking `account` and drops every coin it owns.
    ///
    /// Returns the number of dropped coins, or `None` if the account was not tracked.
    pub fn untrack_account(&mut self, account: &AccountId) -> Option<usize> {
        let references = self.accounts.remove(account)?;
        for reference in &references {
            self.coins.remove(reference);
        }
        Some(references.len())
    }

    pub fn is_tracked(&self, account: &AccountId) -> bool {
        self.accounts.contains_key(account)
    }

    pub fn tracked_accounts(&self) -> impl Iterator<Item = &AccountId> {
        self.accounts.keys()
    }

    pub fn tracked_count(&self) -> usize {
        self.accounts.len()
    }

    /// Records `output` as confirmed.
    ///
    /// Unknown references become new coins in state `CONFIRMED`. Known references only
    /// gain the `CONFIRMED` flag. The owner must be tracked, otherwise this is a no-op
    /// and `false` is returned.
    pub fn confirm_output(&mut self, reference: CoinReference, output: TransactionOutput) -> bool {
        if let Some(coin) = self.coins.get_mut(&reference) {
            coin.state |= CoinState::CONFIRMED;
            return true;
        }

        let Some(owned) = self.accounts.get_mut(&output.account) else {
            return false;
        };
        owned.insert(reference);
        self.coins.insert(
            reference,
            Coin {
                reference,
                output,
                state: CoinState::CONFIRMED,
            },
        );
        true
    }

    /// Flags an existing coin as spent while keeping it in the store.
    pub fn mark_spent(&mut self, reference: &CoinReference) -> Option<AccountId> {
        let coin = self.coins.get_mut(reference)?;
        coin.state |= CoinState::SPENT | CoinState::CONFIRMED;
        Some(coin.account())
    }

    /// Applies the spend policy to `reference`.
    ///
    /// Coins of the governing asset stay in the store flagged `SPENT` so they remain
    /// claimable. Any other coin is removed. Returns the owner of the spent coin.
    pub fn spend(
        &mut self,
        reference: &CoinReference,
        governing_asset: &AssetId,
    ) -> Option<AccountId> {
        let coin = self.coins.get(reference)?;
        if coin.output.asset_id == *governing_asset {
            self.mark_spent(reference)
        } else {
            self.remove(reference).map(|coin| coin.account())
        }
    }

    /// Deletes the coin and its membership in the owner's set.
    pub fn remove(&mut self, reference: &CoinReference) -> Option<Coin> {
        let coin = self.coins.remove(reference)?;
        if let Some(owned) = self.accounts.get_mut(&coin.account()) {
            owned.remove(reference);
        }
        Some(coin)
    }

    pub fn get(&self, reference: &CoinReference) -> Option<&Coin> {
        self.coins.get(reference)
    }

    /// Returns the coins owned by each of `accounts`.
    ///
    /// Repeated accounts are visited once. Fails if any account is not tracked, in
    /// which case nothing is returned.
    pub fn coins_of<'a, 'b, I>(
        &'a self,
        accounts: I,
    ) -> Result<impl Iterator<Item = &'a Coin> + 'a>
    where
        I: IntoIterator<Item = &'b AccountId>,
    {
        let mut seen = HashSet::new();
        let mut owned_sets = Vec::new();
        for account in accounts {
            let owned = self
                .accounts
                .get(account)
                .ok_or(Error::UnknownAccount(*account))?;
            if seen.insert(*account) {
                owned_sets.push(owned);
            }
        }

        Ok(owned_sets
            .into_iter()
            .flat_map(|owned| owned.iter())
            .filter_map(move |reference| self.coins.get(reference)))
    }

    /// Drops every coin while keeping all accounts tracked.
    pub fn clear_coins(&mut self) {
        self.coins.clear();
        self.accounts.values_mut().for_each(HashSet::clear);
    }

    /// Total number of coins in the store.
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }
}
