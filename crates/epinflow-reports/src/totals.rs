//! Signed accumulation and emission of report totals.
//!
//! Aggregation is a two-pass fold: rows flatten to signed leaf
//! contributions, levels sum the signed values, and only at emission time
//! is the net reconstructed as an absolute amount plus CR/DB sign. Summing
//! signed values keeps the fold associative, so replaying a file as
//! several smaller files yields the same report tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use epinflow_core::models::{AmountSign, Vss120Tcr1Record};

/// Running signed totals carried through the fold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignedTotals {
    pub count: u64,
    pub clearing: Decimal,
    pub credits: Decimal,
    pub debits: Decimal,
}

impl SignedTotals {
    /// Fold another contribution into this one.
    pub fn merge(&mut self, other: &SignedTotals) {
        self.count += other.count;
        self.clearing += other.clearing;
        self.credits += other.credits;
        self.debits += other.debits;
    }

    /// The signed net of this accumulation.
    pub fn net(&self) -> Decimal {
        self.credits - self.debits
    }

    /// Reconstruct the emission form: absolute net plus CR/DB sign.
    ///
    /// A non-negative net is CR and a negative net is DB; unlike the
    /// VSS-110 statistics rule, this path never emits a blank sign.
    pub fn emit(&self) -> ReportTotals {
        let net = self.net();
        let net_sign = if net.is_sign_negative() && !net.is_zero() {
            AmountSign::Debit
        } else {
            AmountSign::Credit
        };
        ReportTotals {
            count: self.count,
            clearing_amount: self.clearing,
            credits_amount: self.credits,
            debits_amount: self.debits,
            net_amount: net.abs(),
            net_sign,
        }
    }
}

/// Aggregated amounts carried by every report tree level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTotals {
    pub count: u64,
    pub clearing_amount: Decimal,
    pub credits_amount: Decimal,
    pub debits_amount: Decimal,
    /// Absolute value of the summed signed net
    pub net_amount: Decimal,
    /// CR when the summed net is non-negative, DB when negative
    pub net_sign: AmountSign,
}

/// Per-TCR1 derivation shared by the three subgroup-4 reports:
///
/// - count        = first count
/// - clearing     = first amount with its own sign applied
/// - credits      = second amount, negated only when marked DB
/// - debits       = third amount, negated only when marked CR
pub fn tcr1_totals(tcr1: &Vss120Tcr1Record) -> SignedTotals {
    let credits = match tcr1.second_amount_sign {
        AmountSign::Debit => -tcr1.second_amount,
        AmountSign::Credit | AmountSign::Empty => tcr1.second_amount,
    };
    let debits = match tcr1.third_amount_sign {
        AmountSign::Credit => -tcr1.third_amount,
        AmountSign::Debit | AmountSign::Empty => tcr1.third_amount,
    };
    SignedTotals {
        count: tcr1.first_count,
        clearing: tcr1.first_amount_sign.apply(tcr1.first_amount),
        credits,
        debits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_merge_is_componentwise() {
        let mut a = SignedTotals {
            count: 10,
            clearing: dec!(100.00),
            credits: dec!(50.00),
            debits: dec!(20.00),
        };
        let b = SignedTotals {
            count: 5,
            clearing: dec!(-40.00),
            credits: dec!(10.00),
            debits: dec!(30.00),
        };
        a.merge(&b);
        assert_eq!(a.count, 15);
        assert_eq!(a.clearing, dec!(60.00));
        assert_eq!(a.net(), dec!(10.00));
    }

    #[test]
    fn test_emit_reconstructs_sign() {
        let credit_side = SignedTotals {
            credits: dec!(30.00),
            debits: dec!(10.00),
            ..Default::default()
        };
        let emitted = credit_side.emit();
        assert_eq!(emitted.net_amount, dec!(20.00));
        assert_eq!(emitted.net_sign, AmountSign::Credit);

        let debit_side = SignedTotals {
            credits: dec!(10.00),
            debits: dec!(30.00),
            ..Default::default()
        };
        let emitted = debit_side.emit();
        assert_eq!(emitted.net_amount, dec!(20.00));
        assert_eq!(emitted.net_sign, AmountSign::Debit);

        // A zero net is emitted as CR; this path has no blank sign
        let flat = SignedTotals::default();
        assert_eq!(flat.emit().net_sign, AmountSign::Credit);
        assert_eq!(flat.emit().net_amount, dec!(0));
    }
}
