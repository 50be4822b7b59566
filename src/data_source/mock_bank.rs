//! In-memory bank used for demos and tests.
//!
//! A handful of PSNs have fixed figures, a few are wired to refuse consent or
//! to take the slow path, and every other PSN that reaches `fetch_data` gets
//! freshly randomized figures.

use std::collections::{HashMap, HashSet};

use log::info;
use rand::Rng;

use crate::data_source::data_source_trait::DataSource;
use crate::data_source::types::BankData;
use crate::error_handling::types::DataSourceError;

pub struct MockBankDataSource {
    known: HashMap<String, BankData>,
    denied: HashSet<String>,
    slow: HashSet<String>,
}

impl MockBankDataSource {
    pub fn new() -> Self {
        let known = HashMap::from([
            (
                "1234567890".to_string(),
                BankData::new(250000.0, 0.0, 45000.0, 5640.0),
            ),
            (
                "9876543210".to_string(),
                BankData::new(180000.0, 25000.0, 15000.0, 3200.0),
            ),
            ("5555555555".to_string(), BankData::new(0.0, 0.0, 0.0, 0.0)),
        ]);
        let denied = HashSet::from(["1111111111".to_string(), "2222222222".to_string()]);
        let slow = HashSet::from(["3333333333".to_string()]);

        Self {
            known,
            denied,
            slow,
        }
    }

    fn random_data() -> BankData {
        let mut rng = rand::rng();
        BankData::new(
            f64::from(rng.random_range(0..=500_000u32)),
            f64::from(rng.random_range(0..=100_000u32)),
            f64::from(rng.random_range(0..=100_000u32)),
            f64::from(rng.random_range(0..=50_000u32)),
        )
    }
}

impl Default for MockBankDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for MockBankDataSource {
    fn has_data(&self, psn: &str) -> bool {
        self.known.contains_key(psn) || self.denied.contains(psn) || self.slow.contains(psn)
    }

    fn will_deny_consent(&self, psn: &str) -> bool {
        self.denied.contains(psn)
    }

    fn requires_slow_processing(&self, psn: &str) -> bool {
        self.slow.contains(psn)
    }

    fn fetch_data(&self, psn: &str) -> Result<Option<BankData>, DataSourceError> {
        if let Some(data) = self.known.get(psn) {
            info!("Retrieved banking data for PSN {}", psn);
            return Ok(Some(*data));
        }

        if !self.denied.contains(psn) {
            info!("Generating mock data for PSN {}", psn);
            return Ok(Some(Self::random_data()));
        }

        info!("No data available for PSN {}", psn);
        Ok(None)
    }
}
