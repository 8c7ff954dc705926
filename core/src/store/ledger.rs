//! Ledger writes and reads. Every balance change flows through
//! `apply_ledger_entry`, inside a transaction owned by the caller.

use super::{new_id, read_timestamp, timestamp, EconomyStore};
use crate::error::{EconomyError, EconomyResult};
use crate::ledger::{LedgerUpdate, TokenTransaction, TransactionKind};
use crate::redemption::PurchaseReceipt;
use crate::types::TokenAmount;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

impl EconomyStore {
    pub fn balance(&self, user_id: &str) -> EconomyResult<TokenAmount> {
        let balance = self
            .conn
            .query_row(
                "SELECT token_balance FROM user_account WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        balance.ok_or_else(|| EconomyError::UserNotFound {
            user_id: user_id.to_string(),
        })
    }

    /// Record one ledger entry and move the cached balance with it, as a
    /// single transaction. A debit that would take the balance below zero
    /// is rejected before anything is written, as is a credit the balance
    /// column cannot hold.
    pub fn append_transaction(
        &mut self,
        user_id: &str,
        amount: TokenAmount,
        kind: TransactionKind,
        description: &str,
        actor_id: Option<&str>,
    ) -> EconomyResult<LedgerUpdate> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let update = apply_ledger_entry(&tx, user_id, amount, kind, description, actor_id)?;
        tx.commit()?;
        Ok(update)
    }

    /// Ledger rows for a user, newest first. `limit` caps the page size.
    pub fn transactions_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> EconomyResult<Vec<TokenTransaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT txn_id, user_id, amount, kind, description, actor_id, created_at
             FROM token_transaction WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![user_id, limit as i64], token_transaction_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn transaction_count(&self, user_id: &str) -> EconomyResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM token_transaction WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    /// Ledger rows across every user, for run summaries.
    pub fn transaction_count_total(&self) -> EconomyResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM token_transaction", [], |row| row.get(0))?;
        Ok(n)
    }

    // ── Purchases ──────────────────────────────────────────────

    /// Look up the item, verify the buyer does not already own it, debit
    /// the price and record ownership, all in one immediate transaction.
    /// Any failure along the way rolls the whole purchase back.
    pub fn purchase_reward(
        &mut self,
        user_id: &str,
        item_id: &str,
    ) -> EconomyResult<PurchaseReceipt> {
        self.purchase_reward_inner(user_id, item_id, None)
    }

    fn purchase_reward_inner(
        &mut self,
        user_id: &str,
        item_id: &str,
        fail: Option<PurchaseFailpoint>,
    ) -> EconomyResult<PurchaseReceipt> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let item = tx
            .query_row(
                "SELECT item_id, name, description, reward_type, price, config, is_active
                 FROM reward_item WHERE item_id = ?1 AND is_active = 1",
                params![item_id],
                super::catalog::reward_item_row,
            )
            .optional()?;
        let Some(item) = item else {
            return Err(EconomyError::ItemNotFound {
                item_id: item_id.to_string(),
            });
        };

        let owned: i64 = tx.query_row(
            "SELECT COUNT(*) FROM reward_ownership WHERE user_id = ?1 AND item_id = ?2",
            params![user_id, item_id],
            |row| row.get(0),
        )?;
        if owned > 0 {
            return Err(EconomyError::AlreadyOwned {
                user_id: user_id.to_string(),
                item_id: item_id.to_string(),
            });
        }

        let description = format!("Purchased: {}", item.name);
        let update = apply_ledger_entry(
            &tx,
            user_id,
            -item.price,
            TransactionKind::Spent,
            &description,
            None,
        )?;

        if fail == Some(PurchaseFailpoint::BeforeOwnershipWrite) {
            return Err(
                anyhow::anyhow!("injected storage failure between debit and ownership write")
                    .into(),
            );
        }

        tx.execute(
            "INSERT INTO reward_ownership (purchase_id, user_id, item_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                new_id("pur"),
                user_id,
                item_id,
                timestamp(&update.transaction.created_at),
            ],
        )?;

        tx.commit()?;
        Ok(PurchaseReceipt {
            item,
            transaction: update.transaction,
            new_balance: update.new_balance,
        })
    }

    // ── Test support ───────────────────────────────────────────

    /// Run a purchase but abort it at the given point. The aborted
    /// transaction must leave no trace: no debit, no ledger row, no
    /// ownership.
    pub fn purchase_reward_with_failpoint(
        &mut self,
        user_id: &str,
        item_id: &str,
        fail: PurchaseFailpoint,
    ) -> EconomyResult<PurchaseReceipt> {
        self.purchase_reward_inner(user_id, item_id, Some(fail))
    }
}

/// Where a purchase is aborted mid-flight by the test-support entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseFailpoint {
    /// Fail after the debit has been applied, before ownership is recorded.
    BeforeOwnershipWrite,
}

/// Balance check, balance update, and ledger insert against whatever
/// connection or open transaction the caller holds. The caller owns
/// commit and rollback.
fn apply_ledger_entry(
    conn: &Connection,
    user_id: &str,
    amount: TokenAmount,
    kind: TransactionKind,
    description: &str,
    actor_id: Option<&str>,
) -> EconomyResult<LedgerUpdate> {
    let balance: Option<TokenAmount> = conn
        .query_row(
            "SELECT token_balance FROM user_account WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )
        .optional()?;
    let Some(balance) = balance else {
        return Err(EconomyError::UserNotFound {
            user_id: user_id.to_string(),
        });
    };

    let Some(new_balance) = balance.checked_add(amount) else {
        return Err(EconomyError::BalanceOverflow {
            user_id: user_id.to_string(),
        });
    };
    if new_balance < 0 {
        return Err(EconomyError::InsufficientBalance {
            balance,
            required: -amount,
        });
    }

    conn.execute(
        "UPDATE user_account SET token_balance = ?1 WHERE user_id = ?2",
        params![new_balance, user_id],
    )?;

    let transaction = TokenTransaction {
        txn_id: new_id("txn"),
        user_id: user_id.to_string(),
        amount,
        kind,
        description: description.to_string(),
        actor_id: actor_id.map(str::to_string),
        created_at: Utc::now(),
    };
    conn.execute(
        "INSERT INTO token_transaction
            (txn_id, user_id, amount, kind, description, actor_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            transaction.txn_id,
            transaction.user_id,
            transaction.amount,
            transaction.kind.as_str(),
            transaction.description,
            transaction.actor_id,
            timestamp(&transaction.created_at),
        ],
    )?;

    Ok(LedgerUpdate {
        transaction,
        new_balance,
    })
}

fn token_transaction_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TokenTransaction> {
    let raw_kind: String = row.get(3)?;
    let kind = TransactionKind::parse(&raw_kind).ok_or_else(|| {
        super::conversion_failure(3, format!("unknown transaction kind '{raw_kind}'"))
    })?;
    Ok(TokenTransaction {
        txn_id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        kind,
        description: row.get(4)?,
        actor_id: row.get(5)?,
        created_at: read_timestamp(row, 6)?,
    })
}
