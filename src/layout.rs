//! Layout files
//!
//! A layout file overrides the desk counts, hourly rates and long-stay
//! discount. Every key is optional:
//!
//! ```yaml
//! desks:
//!   individual: 10
//!   team: 5
//! rates:
//!   basic: "10.00 USD"
//!   premium: "15.00 USD"
//!   executive: "20.00 USD"
//!   team: "25.00 USD"
//! discount:
//!   min_hours: 4
//!   percent: "10%"
//! ```

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    desks::{DeskType, Inventory, InventoryError},
    pricing::{PricingError, RateCard},
    tiers::MembershipTier,
};

/// Layout parsing errors
#[derive(Debug, Error)]
pub enum LayoutError {
    /// IO error reading the layout file
    #[error("Failed to read layout file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Desk counts that can't form an inventory
    #[error("Invalid desk count: {0}")]
    InvalidDeskCount(#[from] InventoryError),

    /// Rates quoted in more than one currency
    #[error(transparent)]
    Rates(#[from] PricingError),
}

/// Desk counts
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesksLayout {
    /// Number of individual desks
    pub individual: Option<u32>,

    /// Number of team spaces
    pub team: Option<u32>,
}

/// Hourly rates (e.g. "15.00 USD")
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RatesLayout {
    /// Basic tier rate on individual desks
    pub basic: Option<String>,

    /// Premium tier rate on individual desks
    pub premium: Option<String>,

    /// Executive tier rate on individual desks
    pub executive: Option<String>,

    /// Team space rate
    pub team: Option<String>,
}

/// Long-stay discount
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscountLayout {
    /// Minimum hours before the discount applies
    pub min_hours: Option<u32>,

    /// Discount, as "10%" or "0.1"
    pub percent: Option<String>,
}

/// Layout file contents
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layout {
    /// Desk counts
    #[serde(default)]
    pub desks: DesksLayout,

    /// Hourly rates
    #[serde(default)]
    pub rates: RatesLayout,

    /// Long-stay discount
    #[serde(default)]
    pub discount: DiscountLayout,
}

impl Layout {
    /// Read a layout file.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Parse layout YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the YAML is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self, LayoutError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Build the desk inventory, defaulting to 10 desks and 5 team spaces.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidDeskCount`] if the counts exceed
    /// [`Inventory::MAX_DESKS`].
    pub fn inventory(&self) -> Result<Inventory, LayoutError> {
        Ok(Inventory::with_counts(
            self.desks.individual.unwrap_or(Inventory::INDIVIDUAL_DESKS),
            self.desks.team.unwrap_or(Inventory::TEAM_SPACES),
        )?)
    }

    /// Build the rate card, filling gaps from the default card.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if a price or percentage is malformed, or if
    /// the rates don't share one currency.
    pub fn rate_card(&self) -> Result<RateCard, LayoutError> {
        let defaults = RateCard::default();

        let tiers = [
            (&self.rates.basic, DeskType::Individual, MembershipTier::Basic),
            (&self.rates.premium, DeskType::Individual, MembershipTier::Premium),
            (&self.rates.executive, DeskType::Individual, MembershipTier::Executive),
            (&self.rates.team, DeskType::Team, MembershipTier::Team),
        ];

        let mut overrides = [None; 4];

        for (slot, (rate, _, _)) in overrides.iter_mut().zip(&tiers) {
            *slot = rate.as_deref().map(parse_price).transpose()?;
        }

        let currency = overrides
            .iter()
            .flatten()
            .map(|&(_, currency)| currency)
            .next()
            .unwrap_or(defaults.currency());

        // Rates left out of the file keep their default amount, in the file's currency.
        let rates = tiers.map(|(_, desk_type, tier)| (desk_type, tier));
        let mut filled = [Money::from_minor(0, currency); 4];

        for ((slot, rate), (desk_type, tier)) in filled.iter_mut().zip(overrides).zip(rates) {
            *slot = match rate {
                Some((minor_units, rate_currency)) => Money::from_minor(minor_units, rate_currency),
                None => Money::from_decimal(*defaults.hourly_rate(desk_type, tier).amount(), currency),
            };
        }

        let discount = self
            .discount
            .percent
            .as_deref()
            .map(parse_percentage)
            .transpose()?
            .unwrap_or(defaults.discount());

        Ok(RateCard::new(
            currency,
            filled,
            self.discount
                .min_hours
                .unwrap_or(defaults.discount_min_hours()),
            discount,
        )?)
    }
}

/// Parse price string (e.g., "15.00 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), LayoutError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(LayoutError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| LayoutError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(LayoutError::InvalidPrice(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| LayoutError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(LayoutError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse percentage string (e.g., "10%" or "0.1") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or lies outside 0–100%.
pub fn parse_percentage(s: &str) -> Result<Percentage, LayoutError> {
    let trimmed = s.trim();

    let fraction = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<f64>()
            .map(|value| value / 100.0)
    } else {
        trimmed.parse::<f64>()
    }
    .map_err(|_err| LayoutError::InvalidPercentage(s.to_string()))?;

    if !(0.0..=1.0).contains(&fraction) {
        return Err(LayoutError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(fraction))
}
