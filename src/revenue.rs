//! Revenue

use rusty_money::{Money, MoneyError, iso::Currency};

use crate::{bookings::Booking, pricing::total_price, tiers::MembershipTier};

/// Revenue earned from one membership tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierRevenue {
    /// The tier
    pub tier: MembershipTier,

    /// Sum of booking prices carrying this tier
    pub revenue: Money<'static, Currency>,

    /// Number of bookings carrying this tier
    pub bookings: usize,
}

/// Revenue per membership tier plus the grand total, derived from a ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueSummary {
    tiers: [TierRevenue; 4],
    total: Money<'static, Currency>,
}

impl RevenueSummary {
    /// Aggregate a sequence of bookings.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if a booking is priced in a currency other than `currency`.
    pub fn from_bookings<'b>(
        bookings: impl IntoIterator<Item = &'b Booking>,
        currency: &'static Currency,
    ) -> Result<Self, MoneyError> {
        let mut tiers = MembershipTier::ALL.map(|tier| TierRevenue {
            tier,
            revenue: Money::from_minor(0, currency),
            bookings: 0,
        });

        for booking in bookings {
            if let Some(bucket) = tiers.iter_mut().find(|bucket| bucket.tier == booking.tier()) {
                bucket.revenue = bucket.revenue.add(booking.price())?;
                bucket.bookings += 1;
            }
        }

        let total = total_price(tiers.iter().map(|bucket| bucket.revenue), currency)?;

        Ok(Self { tiers, total })
    }

    /// Revenue for one tier.
    pub fn for_tier(&self, tier: MembershipTier) -> Option<&TierRevenue> {
        self.tiers.iter().find(|bucket| bucket.tier == tier)
    }

    /// Per-tier revenue in Basic, Premium, Executive, Team order.
    pub fn tiers(&self) -> &[TierRevenue] {
        &self.tiers
    }

    /// Revenue across every tier.
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Number of bookings aggregated.
    pub fn bookings(&self) -> usize {
        self.tiers.iter().map(|bucket| bucket.bookings).sum()
    }

    /// Whether there is nothing to report.
    pub fn is_empty(&self) -> bool {
        self.bookings() == 0
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;
    use crate::{
        bookings::{Ledger, NewBooking},
        desks::DeskId,
        hours::Hours,
    };

    fn ledger(entries: &[(u32, MembershipTier, i64)]) -> TestResult<Ledger> {
        let mut ledger = Ledger::new();
        let at = Timestamp::from_second(1_700_000_000)?;

        for &(desk, tier, minor) in entries {
            ledger.record(
                NewBooking {
                    desk_id: DeskId(desk),
                    hours: Hours::one(),
                    tier,
                    price: Money::from_minor(minor, iso::USD),
                },
                at,
            );
        }

        Ok(ledger)
    }

    fn revenue_for(summary: &RevenueSummary, tier: MembershipTier) -> Option<Money<'static, Currency>> {
        summary.for_tier(tier).map(|bucket| bucket.revenue)
    }

    #[test]
    fn empty_ledger_reports_zero() -> TestResult {
        let summary = RevenueSummary::from_bookings(&Ledger::new(), iso::USD)?;

        assert!(summary.is_empty());
        assert_eq!(summary.total(), Money::from_minor(0, iso::USD));
        assert_eq!(summary.tiers().len(), 4);

        Ok(())
    }

    #[test]
    fn buckets_by_tier_and_totals() -> TestResult {
        let ledger = ledger(&[
            (2, MembershipTier::Premium, 3_000),
            (5, MembershipTier::Executive, 9_000),
            (11, MembershipTier::Team, 9_000),
        ])?;

        let summary = RevenueSummary::from_bookings(&ledger, iso::USD)?;

        assert_eq!(
            revenue_for(&summary, MembershipTier::Basic),
            Some(Money::from_minor(0, iso::USD))
        );
        assert_eq!(
            revenue_for(&summary, MembershipTier::Premium),
            Some(Money::from_minor(3_000, iso::USD))
        );
        assert_eq!(
            revenue_for(&summary, MembershipTier::Executive),
            Some(Money::from_minor(9_000, iso::USD))
        );
        assert_eq!(
            revenue_for(&summary, MembershipTier::Team),
            Some(Money::from_minor(9_000, iso::USD))
        );
        assert_eq!(summary.total(), Money::from_minor(21_000, iso::USD));
        assert_eq!(summary.bookings(), 3);

        Ok(())
    }

    #[test]
    fn repeated_tiers_accumulate() -> TestResult {
        let ledger = ledger(&[
            (1, MembershipTier::Basic, 1_000),
            (2, MembershipTier::Basic, 3_600),
        ])?;

        let summary = RevenueSummary::from_bookings(&ledger, iso::USD)?;

        let basic = summary.for_tier(MembershipTier::Basic);

        assert_eq!(basic.map(|bucket| bucket.bookings), Some(2));
        assert_eq!(
            basic.map(|bucket| bucket.revenue),
            Some(Money::from_minor(4_600, iso::USD))
        );

        Ok(())
    }

    #[test]
    fn tiers_are_in_fixed_order() -> TestResult {
        let summary = RevenueSummary::from_bookings(&Ledger::new(), iso::USD)?;
        let order: Vec<MembershipTier> = summary.tiers().iter().map(|bucket| bucket.tier).collect();

        assert_eq!(order, MembershipTier::ALL.to_vec());

        Ok(())
    }

    #[test]
    fn currency_mismatch_errors() -> TestResult {
        let ledger = ledger(&[(1, MembershipTier::Basic, 1_000)])?;

        assert!(RevenueSummary::from_bookings(&ledger, iso::GBP).is_err());

        Ok(())
    }
}
