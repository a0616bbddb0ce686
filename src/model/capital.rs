use serde::Serialize;

use crate::types::PortfolioSnapshot;

/// Capital of one wallet at the start and end of its snapshot series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CapitalChange {
    pub before: f64,
    pub after: f64,
}

impl CapitalChange {
    /// `before` is the first snapshot, `after` the last; both 0 when the
    /// series is empty.
    pub fn from_snapshots(snapshots: &[PortfolioSnapshot]) -> CapitalChange {
        let before = snapshots
            .first()
            .map(|s| s.total_capital_usd)
            .unwrap_or(0.0);
        let after = snapshots
            .last()
            .map(|s| s.total_capital_usd)
            .unwrap_or(0.0);

        CapitalChange { before, after }
    }

    pub fn change(&self) -> f64 {
        self.after - self.before
    }

    pub fn change_percent(&self) -> f64 {
        if self.before > 0.0 {
            self.change() / self.before * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::snapshot;

    #[test]
    fn test_empty_series() {
        let capital = CapitalChange::from_snapshots(&[]);

        assert_eq!(capital.before, 0.0);
        assert_eq!(capital.after, 0.0);
        assert_eq!(capital.change(), 0.0);
        assert_eq!(capital.change_percent(), 0.0);
    }

    #[test]
    fn test_first_and_last_snapshot() {
        let series = vec![
            snapshot("exec-1", "0xabc", 0, 1000.0),
            snapshot("exec-1", "0xabc", 5, 1500.0),
            snapshot("exec-1", "0xabc", 10, 1100.0),
        ];
        let capital = CapitalChange::from_snapshots(&series);

        assert_eq!(capital.before, 1000.0);
        assert_eq!(capital.after, 1100.0);
        assert!((capital.change() - 100.0).abs() < 1e-9);
        assert!((capital.change_percent() - 10.0).abs() < 1e-9);

        assert_eq!(CapitalChange::from_snapshots(&series), capital);
    }

    #[test]
    fn test_single_snapshot_has_no_change() {
        let series = vec![snapshot("exec-1", "0xabc", 0, 730.5)];
        let capital = CapitalChange::from_snapshots(&series);

        assert_eq!(capital.before, capital.after);
        assert_eq!(capital.change_percent(), 0.0);
    }

    #[test]
    fn test_zero_starting_capital() {
        let series = vec![
            snapshot("exec-1", "0xabc", 0, 0.0),
            snapshot("exec-1", "0xabc", 1, 250.0),
        ];
        let capital = CapitalChange::from_snapshots(&series);

        assert_eq!(capital.change(), 250.0);
        assert_eq!(capital.change_percent(), 0.0);
    }
}
