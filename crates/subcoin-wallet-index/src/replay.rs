//! Block replay against the coin store.

use crate::coin_store::CoinStore;
use crate::notification::BalanceChanged;
use crate::types::{AccountId, AssetId, Block, Transaction};
use std::collections::{BTreeSet, HashSet};

/// Applies `block` to `coins` on behalf of the accounts due at its height.
///
/// Only coins owned by `due_accounts` are touched, accounts pending at other heights
/// catch up when their own height is replayed. Returns one notification per
/// transaction that changed at least one account, in block order.
pub fn apply_block(
    coins: &mut CoinStore,
    block: &Block,
    due_accounts: &HashSet<AccountId>,
    governing_asset: &AssetId,
) -> Vec<BalanceChanged> {
    block
        .transactions
        .iter()
        .filter_map(|tx| {
            let changed = apply_transaction(coins, tx, due_accounts, governing_asset);

            (!changed.is_empty()).then(|| BalanceChanged {
                transaction: tx.clone(),
                accounts: changed.into_iter().collect(),
                height: block.height,
                timestamp: block.timestamp,
            })
        })
        .collect()
}

fn apply_transaction(
    coins: &mut CoinStore,
    tx: &Transaction,
    due_accounts: &HashSet<AccountId>,
    governing_asset: &AssetId,
) -> BTreeSet<AccountId> {
    let mut changed = BTreeSet::new();

    // Outputs go first so that an output spent by its own transaction is created
    // before the spend is applied.
    for (vout, output) in tx.outputs.iter().enumerate() {
        if !due_accounts.contains(&output.account) {
            continue;
        }

        let Ok(vout) = u16::try_from(vout) else {
            tracing::warn!(txid = %tx.txid, vout, "Output index out of range, skipping");
            continue;
        };

        if coins.confirm_output(tx.output_reference(vout), output.clone()) {
            changed.insert(output.account);
        }
    }

    for input in &tx.inputs {
        let Some(owner) = coins.get(input).map(|coin| coin.account()) else {
            continue;
        };
        if !due_accounts.contains(&owner) {
            continue;
        }

        if let Some(owner) = coins.spend(input, governing_asset) {
            changed.insert(owner);
        }
    }

    for claim in &tx.claims {
        let Some(owner) = coins.get(claim).map(|coin| coin.account()) else {
            continue;
        };
        if !due_accounts.contains(&owner) {
            continue;
        }

        if coins.remove(claim).is_some() {
            changed.insert(owner);
        }
    }

    changed
}
