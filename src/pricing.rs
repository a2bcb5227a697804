//! Pricing
//!
//! Hourly rates are looked up by desk type and membership tier, multiplied by
//! the booked hours, and discounted when the booking runs past the long-stay
//! threshold.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;
use tracing::warn;

use crate::{desks::DeskType, hours::Hours, tiers::MembershipTier};

/// Errors that can occur while pricing a booking.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Rate multiplication overflowed the representable range.
    #[error("price calculation overflowed")]
    Overflow,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Hourly rates plus the long-stay discount policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateCard {
    currency: &'static Currency,
    basic: Money<'static, Currency>,
    premium: Money<'static, Currency>,
    executive: Money<'static, Currency>,
    team: Money<'static, Currency>,
    discount_min_hours: u32,
    discount: Percentage,
}

impl RateCard {
    /// Creates a rate card from explicit rates.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] wrapped in [`PricingError::Money`]
    /// if any rate is not in `currency`.
    pub fn new(
        currency: &'static Currency,
        [basic, premium, executive, team]: [Money<'static, Currency>; 4],
        discount_min_hours: u32,
        discount: Percentage,
    ) -> Result<Self, PricingError> {
        for rate in [basic, premium, executive, team] {
            if rate.currency() != currency {
                return Err(PricingError::Money(MoneyError::CurrencyMismatch {
                    expected: currency.iso_alpha_code,
                    actual: rate.currency().iso_alpha_code,
                }));
            }
        }

        Ok(Self {
            currency,
            basic,
            premium,
            executive,
            team,
            discount_min_hours,
            discount,
        })
    }

    /// Currency every rate is quoted in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Minimum hours a booking needs before the discount applies.
    pub fn discount_min_hours(&self) -> u32 {
        self.discount_min_hours
    }

    /// Long-stay discount as a fraction.
    pub fn discount(&self) -> Percentage {
        self.discount
    }

    /// Hourly rate for a desk type and tier.
    ///
    /// Team spaces ignore the tier. On individual desks any tier without its
    /// own rate (i.e. `Team`) is charged the Basic rate.
    pub fn hourly_rate(&self, desk_type: DeskType, tier: MembershipTier) -> Money<'static, Currency> {
        match (desk_type, tier) {
            (DeskType::Team, _) => self.team,
            (DeskType::Individual, MembershipTier::Premium) => self.premium,
            (DeskType::Individual, MembershipTier::Executive) => self.executive,
            (DeskType::Individual, MembershipTier::Basic | MembershipTier::Team) => self.basic,
        }
    }

    /// Hourly rate for a free-form tier label.
    ///
    /// Labels that don't name a tier are charged the Basic rate instead of
    /// failing.
    pub fn hourly_rate_for_label(&self, desk_type: DeskType, label: &str) -> Money<'static, Currency> {
        self.hourly_rate(desk_type, tier_or_basic(label))
    }

    /// Whether a booking of this length earns the long-stay discount.
    pub fn discount_applies(&self, hours: Hours) -> bool {
        *hours >= self.discount_min_hours
    }

    /// Price a booking.
    ///
    /// # Errors
    ///
    /// - [`PricingError::Overflow`]: the subtotal does not fit in minor units.
    /// - [`PricingError::PercentConversion`]: the discount cannot be represented.
    pub fn quote(
        &self,
        desk_type: DeskType,
        tier: MembershipTier,
        hours: Hours,
    ) -> Result<Quote, PricingError> {
        let rate = self.hourly_rate(desk_type, tier);

        let subtotal_minor = rate
            .to_minor_units()
            .checked_mul(i64::from(*hours))
            .ok_or(PricingError::Overflow)?;

        let discount_applied = self.discount_applies(hours);

        let discount_minor = if discount_applied {
            percent_of_minor(&self.discount, subtotal_minor)?
        } else {
            0
        };

        let total_minor = subtotal_minor
            .checked_sub(discount_minor)
            .ok_or(PricingError::Overflow)?;

        Ok(Quote {
            rate,
            hours,
            subtotal: Money::from_minor(subtotal_minor, self.currency),
            discount: Money::from_minor(discount_minor, self.currency),
            total: Money::from_minor(total_minor, self.currency),
            discount_applied,
        })
    }
}

impl Default for RateCard {
    /// USD 10/15/20 per hour for Basic/Premium/Executive, 25 for team spaces,
    /// and 10% off bookings longer than three hours.
    fn default() -> Self {
        Self {
            currency: iso::USD,
            basic: Money::from_minor(1_000, iso::USD),
            premium: Money::from_minor(1_500, iso::USD),
            executive: Money::from_minor(2_000, iso::USD),
            team: Money::from_minor(2_500, iso::USD),
            discount_min_hours: 4,
            discount: Percentage::from(0.1),
        }
    }
}

/// A priced booking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    rate: Money<'static, Currency>,
    hours: Hours,
    subtotal: Money<'static, Currency>,
    discount: Money<'static, Currency>,
    total: Money<'static, Currency>,
    discount_applied: bool,
}

impl Quote {
    /// Hourly rate charged
    pub fn rate(&self) -> Money<'static, Currency> {
        self.rate
    }

    /// Hours priced
    pub fn hours(&self) -> Hours {
        self.hours
    }

    /// Rate multiplied by hours, before any discount
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Amount taken off by the long-stay discount
    pub fn discount(&self) -> Money<'static, Currency> {
        self.discount
    }

    /// Amount payable
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Whether the long-stay discount was applied
    pub fn discount_applied(&self) -> bool {
        self.discount_applied
    }
}

/// The tier named by `label`, or Basic when it names none.
pub fn tier_or_basic(label: &str) -> MembershipTier {
    label.parse().unwrap_or_else(|err| {
        warn!("{err}; charging the basic rate");

        MembershipTier::Basic
    })
}

/// Price a booking with the default rate card.
///
/// # Errors
///
/// See [`RateCard::quote`].
pub fn calculate_price(
    desk_type: DeskType,
    tier: MembershipTier,
    hours: Hours,
) -> Result<Money<'static, Currency>, PricingError> {
    Ok(RateCard::default().quote(desk_type, tier, hours)?.total())
}

/// Sums a sequence of prices, starting from zero in `currency`.
///
/// # Errors
///
/// Returns a [`MoneyError`] if any price is in a different currency.
pub fn total_price<'a>(
    prices: impl IntoIterator<Item = Money<'a, Currency>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, MoneyError> {
    prices
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, price| acc.add(price))
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(PricingError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::PercentConversion)
}
