use crate::errors::EconomyError;
use tracing::debug;

/// Point balance. The only writer of the session's points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    balance: u64,
}

impl Ledger {
    pub fn new(starting_balance: u64) -> Self {
        Self {
            balance: starting_balance,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn can_afford(&self, amount: u64) -> bool {
        amount <= self.balance
    }

    /// Take `amount` from the balance. Leaves the balance untouched on failure.
    pub fn debit(&mut self, amount: u64) -> Result<u64, EconomyError> {
        if !self.can_afford(amount) {
            return Err(EconomyError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        debug!(amount, balance = self.balance, "ledger debit");
        Ok(self.balance)
    }

    pub fn credit(&mut self, amount: u64) -> u64 {
        self.balance = self.balance.saturating_add(amount);
        debug!(amount, balance = self.balance, "ledger credit");
        self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_debit_and_credit() {
        let mut ledger = Ledger::new(10_000);
        assert_eq!(ledger.debit(100), Ok(9_900));
        assert_eq!(ledger.credit(202), 10_102);
        assert_eq!(ledger.balance(), 10_102);
    }

    #[test]
    fn test_overdraw_is_rejected() {
        let mut ledger = Ledger::new(50);
        assert!(ledger.can_afford(50));
        assert!(!ledger.can_afford(51));
        assert_eq!(
            ledger.debit(51),
            Err(EconomyError::InsufficientFunds {
                requested: 51,
                available: 50
            })
        );
        assert_eq!(ledger.balance(), 50);
        assert_eq!(ledger.debit(50), Ok(0));
    }

    #[test]
    fn test_credit_saturates() {
        let mut ledger = Ledger::new(u64::MAX - 1);
        assert_eq!(ledger.credit(10), u64::MAX);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Debit(u64),
        Credit(u64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u64..20_000).prop_map(Op::Debit),
            (0u64..20_000).prop_map(Op::Credit),
        ]
    }

    proptest! {
        #[test]
        fn prop_balance_tracks_operations(start in 0u64..50_000, ops in prop::collection::vec(op(), 0..64)) {
            let mut ledger = Ledger::new(start);
            let mut expected = start;
            for op in ops {
                match op {
                    Op::Debit(amount) => {
                        let before = ledger.balance();
                        match ledger.debit(amount) {
                            Ok(_) => expected -= amount,
                            Err(EconomyError::InsufficientFunds { .. }) => {
                                prop_assert!(amount > before);
                                prop_assert_eq!(ledger.balance(), before);
                            }
                        }
                    }
                    Op::Credit(amount) => {
                        ledger.credit(amount);
                        expected += amount;
                    }
                }
                prop_assert_eq!(ledger.balance(), expected);
            }
        }
    }
}
