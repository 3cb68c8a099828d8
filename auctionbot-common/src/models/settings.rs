// File: auctionbot-common/src/models/settings.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Names of the tunable auction parameters as they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingKey {
    /// Minutes between primary broadcasts.
    BroadcastInterval,
    WinnersPerItem,
    RewardPerWin,
    ReOfferCost,
    /// Minutes a re-offer stays open.
    ReOfferDuration,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::BroadcastInterval,
        SettingKey::WinnersPerItem,
        SettingKey::RewardPerWin,
        SettingKey::ReOfferCost,
        SettingKey::ReOfferDuration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::BroadcastInterval => "message_interval",
            SettingKey::WinnersPerItem => "winners_per_prize",
            SettingKey::RewardPerWin => "bonus_per_win",
            SettingKey::ReOfferCost => "re_auction_bonus_cost",
            SettingKey::ReOfferDuration => "re_auction_duration",
        }
    }

    pub fn default_value(&self) -> &'static str {
        match self {
            SettingKey::BroadcastInterval => "1",
            SettingKey::WinnersPerItem => "3",
            SettingKey::RewardPerWin => "10",
            SettingKey::ReOfferCost => "50",
            SettingKey::ReOfferDuration => "5",
        }
    }

    pub fn from_name(name: &str) -> Option<SettingKey> {
        SettingKey::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses one stored value, mapping failures to `Error::InvalidSetting`.
pub fn parse_setting<T: FromStr>(key: SettingKey, value: &str) -> Result<T, Error> {
    value.trim().parse::<T>().map_err(|_| Error::InvalidSetting {
        name: key.as_str().to_string(),
        value: value.to_string(),
    })
}

/// Typed view over all five settings, read at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSettings {
    pub broadcast_interval_minutes: i64,
    pub winners_per_item: i64,
    pub reward_per_win: i64,
    pub re_offer_cost: i64,
    pub re_offer_duration_minutes: i64,
}

impl Default for AuctionSettings {
    fn default() -> Self {
        Self {
            broadcast_interval_minutes: 1,
            winners_per_item: 3,
            reward_per_win: 10,
            re_offer_cost: 50,
            re_offer_duration_minutes: 5,
        }
    }
}

impl AuctionSettings {
    /// Builds a snapshot from stored (name, value) rows. Missing names keep their defaults,
    /// unknown names are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut settings = AuctionSettings::default();
        for (name, value) in pairs {
            let Some(key) = SettingKey::from_name(name) else {
                continue;
            };
            let parsed: i64 = parse_setting(key, value)?;
            match key {
                SettingKey::BroadcastInterval => settings.broadcast_interval_minutes = parsed,
                SettingKey::WinnersPerItem => settings.winners_per_item = parsed,
                SettingKey::RewardPerWin => settings.reward_per_win = parsed,
                SettingKey::ReOfferCost => settings.re_offer_cost = parsed,
                SettingKey::ReOfferDuration => settings.re_offer_duration_minutes = parsed,
            }
        }
        Ok(settings)
    }

    /// Interval between broadcasts, never shorter than one minute.
    pub fn broadcast_interval(&self) -> std::time::Duration {
        let minutes = self.broadcast_interval_minutes.max(1) as u64;
        std::time::Duration::from_secs(minutes * 60)
    }

    pub fn re_offer_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.re_offer_duration_minutes)
    }

    pub fn value_of(&self, key: SettingKey) -> i64 {
        match key {
            SettingKey::BroadcastInterval => self.broadcast_interval_minutes,
            SettingKey::WinnersPerItem => self.winners_per_item,
            SettingKey::RewardPerWin => self.reward_per_win,
            SettingKey::ReOfferCost => self.re_offer_cost,
            SettingKey::ReOfferDuration => self.re_offer_duration_minutes,
        }
    }
}
