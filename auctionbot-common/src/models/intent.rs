// File: auctionbot-common/src/models/intent.rs

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::action::ActionToken;
use crate::models::settings::SettingKey;

/// Privileged operations. Numeric arguments are range-checked when parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminCommand {
    /// Lists available admin commands.
    Help,
    ShowSettings,
    SetInterval(i64),
    SetWinnersPerItem(i64),
    SetReward(i64),
    SetReOfferCost(i64),
    SetReOfferDuration(i64),
    /// A photo the transport already stored in the image directory.
    AddItem { image: String },
    ListItems,
    DeleteItem(i64),
    GrantAdmin(i64),
}

impl AdminCommand {
    /// The setting this command writes, with its new value.
    pub fn setting_update(&self) -> Option<(SettingKey, i64)> {
        match self {
            AdminCommand::SetInterval(v) => Some((SettingKey::BroadcastInterval, *v)),
            AdminCommand::SetWinnersPerItem(v) => Some((SettingKey::WinnersPerItem, *v)),
            AdminCommand::SetReward(v) => Some((SettingKey::RewardPerWin, *v)),
            AdminCommand::SetReOfferCost(v) => Some((SettingKey::ReOfferCost, *v)),
            AdminCommand::SetReOfferDuration(v) => Some((SettingKey::ReOfferDuration, *v)),
            _ => None,
        }
    }

    /// Range checks for numeric arguments.
    pub fn validate(&self) -> Result<(), Error> {
        let (what, value, min) = match self {
            AdminCommand::SetInterval(v) => ("interval", *v, 1),
            AdminCommand::SetWinnersPerItem(v) => ("winners per prize", *v, 1),
            AdminCommand::SetReward(v) => ("reward", *v, 0),
            AdminCommand::SetReOfferCost(v) => ("re-offer cost", *v, 0),
            AdminCommand::SetReOfferDuration(v) => ("re-offer duration", *v, 1),
            AdminCommand::DeleteItem(v) => ("prize id", *v, 1),
            AdminCommand::AddItem { image } if image.trim().is_empty() => {
                return Err(Error::InvalidCommand("image name is empty".into()));
            }
            _ => return Ok(()),
        };
        if value < min {
            return Err(Error::InvalidCommand(format!("{what} must be at least {min}, got {value}")));
        }
        Ok(())
    }
}

fn numeric_arg(command: &str, arg: Option<&str>) -> Result<i64, Error> {
    let raw = arg.ok_or_else(|| Error::InvalidCommand(format!("{command} needs a number")))?;
    raw.parse()
        .map_err(|_| Error::InvalidCommand(format!("{command}: '{raw}' is not a number")))
}

impl FromStr for AdminCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(Error::InvalidCommand(format!("{command}: too many arguments")));
        }

        let parsed = match command {
            "/admin" => AdminCommand::Help,
            "/admin_settings" => AdminCommand::ShowSettings,
            "/admin_interval" => AdminCommand::SetInterval(numeric_arg(command, arg)?),
            "/admin_winners" => AdminCommand::SetWinnersPerItem(numeric_arg(command, arg)?),
            "/admin_bonus" => AdminCommand::SetReward(numeric_arg(command, arg)?),
            "/admin_re_cost" => AdminCommand::SetReOfferCost(numeric_arg(command, arg)?),
            "/admin_re_duration" => AdminCommand::SetReOfferDuration(numeric_arg(command, arg)?),
            "/admin_prizes" => AdminCommand::ListItems,
            "/admin_delete_prize" => AdminCommand::DeleteItem(numeric_arg(command, arg)?),
            "/admin_set_admin" => AdminCommand::GrantAdmin(numeric_arg(command, arg)?),
            "/admin_add_prize" => match arg {
                Some(image) => AdminCommand::AddItem { image: image.to_string() },
                None => {
                    return Err(Error::InvalidCommand("/admin_add_prize: send the photo to add".into()));
                }
            },
            other => return Err(Error::InvalidCommand(format!("unknown admin command '{other}'"))),
        };
        parsed.validate()?;
        Ok(parsed)
    }
}

/// A normalized inbound event from the chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Start { name: Option<String> },
    Action(ActionToken),
    Balance,
    Collection,
    ReOffers,
    Rating,
    Admin(AdminCommand),
}

impl Intent {
    /// Parses a slash command typed by a user.
    pub fn parse_command(text: &str) -> Result<Intent, Error> {
        let text = text.trim();
        let command = text.split_whitespace().next().unwrap_or_default();
        match command {
            "/start" => {
                let name = text[command.len()..].trim();
                Ok(Intent::Start {
                    name: (!name.is_empty()).then(|| name.to_string()),
                })
            }
            "/bonus" => Ok(Intent::Balance),
            "/get_my_score" => Ok(Intent::Collection),
            "/re_auctions" => Ok(Intent::ReOffers),
            "/rating" => Ok(Intent::Rating),
            c if c.starts_with("/admin") => Ok(Intent::Admin(text.parse()?)),
            other => Err(Error::InvalidCommand(format!("unknown command '{other}'"))),
        }
    }
}
