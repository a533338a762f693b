use crate::error::{AppError, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Wallet ledger port. The real ledger lives in another system; this core
/// only checks balances and debits confirmed purchases.
#[async_trait::async_trait]
pub trait WalletGateway: Send + Sync {
    async fn balance(&self, user_id: &str) -> Result<f64>;

    async fn debit(&self, user_id: &str, amount: f64, memo: &str) -> Result<()>;
}

/// In-memory ledger used in development and tests. Unknown users start at
/// the configured opening balance.
pub struct InMemoryWallet {
    balances: RwLock<HashMap<String, f64>>,
    opening_balance: f64,
}

impl InMemoryWallet {
    pub fn new(opening_balance: f64) -> Self {
        Self {
            balances: RwLock::new(HashMap::new()),
            opening_balance,
        }
    }

    pub async fn credit(&self, user_id: &str, amount: f64) {
        let mut balances = self.balances.write().await;
        let balance = balances
            .entry(user_id.to_string())
            .or_insert(self.opening_balance);
        *balance += amount;
    }
}

#[async_trait::async_trait]
impl WalletGateway for InMemoryWallet {
    async fn balance(&self, user_id: &str) -> Result<f64> {
        let balances = self.balances.read().await;
        Ok(balances
            .get(user_id)
            .copied()
            .unwrap_or(self.opening_balance))
    }

    async fn debit(&self, user_id: &str, amount: f64, memo: &str) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::BadRequest(
                "debit amount must be positive".to_string(),
            ));
        }

        let mut balances = self.balances.write().await;
        let balance = balances
            .entry(user_id.to_string())
            .or_insert(self.opening_balance);
        if *balance < amount {
            return Err(AppError::InsufficientBalance);
        }
        *balance -= amount;
        tracing::info!(
            "Wallet debit: user={} amount={} memo={} balance={}",
            user_id,
            amount,
            memo,
            *balance
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_user_starts_at_opening_balance() {
        let wallet = InMemoryWallet::new(5_000.0);
        assert!((wallet.balance("fresh").await.unwrap() - 5_000.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn debit_reduces_balance_and_enforces_funds() {
        let wallet = InMemoryWallet::new(1_000.0);

        wallet.debit("user", 400.0, "airtime").await.unwrap();
        assert!((wallet.balance("user").await.unwrap() - 600.0).abs() < f64::EPSILON);

        let err = wallet.debit("user", 601.0, "airtime").await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientBalance));
    }

    #[tokio::test]
    async fn credit_tops_the_ledger_up() {
        let wallet = InMemoryWallet::new(0.0);
        wallet.credit("user", 250.0).await;
        assert!((wallet.balance("user").await.unwrap() - 250.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn debit_rejects_non_positive_amounts() {
        let wallet = InMemoryWallet::new(1_000.0);
        assert!(wallet.debit("user", 0.0, "noop").await.is_err());
        assert!(wallet.debit("user", -5.0, "noop").await.is_err());
    }
}
