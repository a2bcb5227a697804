//! Bookings

use std::fmt;

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};

use crate::{desks::DeskId, hours::Hours, tiers::MembershipTier};

/// Booking identifier, derived from the creation time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookingId(pub i64);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable record of a completed reservation.
///
/// The desk is referenced by id only; its name and booked state are looked
/// up in the inventory when needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    id: BookingId,
    desk_id: DeskId,
    hours: Hours,
    tier: MembershipTier,
    price: Money<'static, Currency>,
    timestamp: Timestamp,
}

impl Booking {
    /// Identifier
    pub fn id(&self) -> BookingId {
        self.id
    }

    /// Desk this booking reserved
    pub fn desk_id(&self) -> DeskId {
        self.desk_id
    }

    /// Booked duration
    pub fn hours(&self) -> Hours {
        self.hours
    }

    /// Membership tier charged
    pub fn tier(&self) -> MembershipTier {
        self.tier
    }

    /// Price paid
    pub fn price(&self) -> Money<'static, Currency> {
        self.price
    }

    /// When the booking was made
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Details of a booking about to be recorded.
#[derive(Debug, Clone, Copy)]
pub struct NewBooking {
    /// Desk being reserved
    pub desk_id: DeskId,

    /// Booked duration
    pub hours: Hours,

    /// Membership tier charged
    pub tier: MembershipTier,

    /// Price paid
    pub price: Money<'static, Currency>,
}

/// Append-only, insertion-ordered record of every booking in a session.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    bookings: Vec<Booking>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a booking made at `timestamp` and return it.
    ///
    /// The id is the timestamp in milliseconds, bumped past the previous id
    /// when two bookings land in the same millisecond.
    pub fn record(&mut self, booking: NewBooking, timestamp: Timestamp) -> Booking {
        let millis = timestamp.as_millisecond();

        let id = match self.bookings.last() {
            Some(last) if last.id.0 >= millis => BookingId(last.id.0.saturating_add(1)),
            _ => BookingId(millis),
        };

        let NewBooking {
            desk_id,
            hours,
            tier,
            price,
        } = booking;

        let booking = Booking {
            id,
            desk_id,
            hours,
            tier,
            price,
            timestamp,
        };

        self.bookings.push(booking.clone());

        booking
    }

    /// Look up a booking by id.
    pub fn get(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|booking| booking.id == id)
    }

    /// Every booking, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.iter()
    }

    /// Every booking, oldest first.
    pub fn as_slice(&self) -> &[Booking] {
        &self.bookings
    }

    /// Number of bookings recorded.
    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    /// Whether no bookings have been made.
    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Booking;
    type IntoIter = std::slice::Iter<'a, Booking>;

    fn into_iter(self) -> Self::IntoIter {
        self.bookings.iter()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    fn new_booking(desk: u32, hours: u32, tier: MembershipTier, minor: i64) -> TestResult<NewBooking> {
        Ok(NewBooking {
            desk_id: DeskId(desk),
            hours: Hours::new(hours)?,
            tier,
            price: Money::from_minor(minor, iso::USD),
        })
    }

    #[test]
    fn record_appends_in_order() -> TestResult {
        let mut ledger = Ledger::new();
        let t0 = Timestamp::from_millisecond(1_700_000_000_000)?;
        let t1 = Timestamp::from_millisecond(1_700_000_060_000)?;

        ledger.record(new_booking(2, 2, MembershipTier::Premium, 3_000)?, t0);
        ledger.record(new_booking(11, 4, MembershipTier::Team, 9_000)?, t1);

        let desks: Vec<DeskId> = ledger.iter().map(Booking::desk_id).collect();

        assert_eq!(ledger.len(), 2);
        assert_eq!(desks, vec![DeskId(2), DeskId(11)]);

        Ok(())
    }

    #[test]
    fn ids_derive_from_timestamp() -> TestResult {
        let mut ledger = Ledger::new();
        let t0 = Timestamp::from_millisecond(1_700_000_000_000)?;

        let booking = ledger.record(new_booking(1, 1, MembershipTier::Basic, 1_000)?, t0);

        assert_eq!(booking.id(), BookingId(1_700_000_000_000));
        assert_eq!(booking.timestamp(), t0);

        Ok(())
    }

    #[test]
    fn ids_stay_unique_within_a_millisecond() -> TestResult {
        let mut ledger = Ledger::new();
        let t0 = Timestamp::from_millisecond(1_700_000_000_000)?;

        ledger.record(new_booking(1, 1, MembershipTier::Basic, 1_000)?, t0);
        ledger.record(new_booking(2, 1, MembershipTier::Basic, 1_000)?, t0);
        let third = ledger.record(new_booking(3, 1, MembershipTier::Basic, 1_000)?, t0).id();

        assert_eq!(third, BookingId(1_700_000_000_002));
        assert!(ledger.get(BookingId(1_700_000_000_001)).is_some());

        Ok(())
    }
}
