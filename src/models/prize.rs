//! Prize pool entries and computed awards.

use crate::models::participant::Participant;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    #[default]
    Coins,
    Gems,
}

/// Reward for finishing at a 1-based standings position.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PrizeEntry {
    pub position: usize,
    pub amount: u64,
    #[serde(default)]
    pub currency: Currency,
}

impl PrizeEntry {
    pub fn new(position: usize, amount: u64) -> Self {
        Self {
            position,
            amount,
            currency: Currency::Coins,
        }
    }

    pub fn in_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}

/// A participant paired with the prize they earned. Borrowed view over the tournament.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrizeAward<'a> {
    pub position: usize,
    pub participant: &'a Participant,
    pub prize: &'a PrizeEntry,
}
