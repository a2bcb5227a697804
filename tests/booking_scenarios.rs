//! End-to-end booking flows through the public session API.
//!
//! Prices use the default rate card: USD 10/15/20 per hour for
//! Basic/Premium/Executive individual desks, 25 per hour for team spaces,
//! and 10% off bookings of four hours or more.

use jiff::{SignedDuration, Timestamp};
use rusty_money::{Money, iso};
use testresult::TestResult;

use bukola::prelude::*;

fn session() -> TestResult<Session<ManualClock>> {
    let clock = ManualClock::new(Timestamp::from_second(1_700_000_000)?);

    Ok(Session::new(Inventory::default(), RateCard::default(), clock))
}

fn usd(minor: i64) -> Money<'static, iso::Currency> {
    Money::from_minor(minor, iso::USD)
}

fn book(
    session: &mut Session<ManualClock>,
    desk: u32,
    tier: Option<MembershipTier>,
    hours: u32,
) -> TestResult<Confirmation> {
    session.apply(Action::SelectDesk(DeskId(desk)))?;

    if let Some(tier) = tier {
        session.apply(Action::SetTier(tier))?;
    }

    session.apply(Action::SetHours(Hours::new(hours)?))?;
    session.apply(Action::Submit)?;

    let confirmation = session
        .confirmation()
        .cloned()
        .ok_or("submit should open a confirmation")?;

    session.apply(Action::Dismiss)?;

    Ok(confirmation)
}

#[test]
fn quoted_prices_match_the_rate_card() -> TestResult {
    let cases = [
        (DeskType::Individual, MembershipTier::Premium, 2, 3_000),
        (DeskType::Individual, MembershipTier::Executive, 5, 9_000),
        (DeskType::Team, MembershipTier::Team, 4, 9_000),
    ];

    for (desk_type, tier, hours, expected) in cases {
        assert_eq!(
            calculate_price(desk_type, tier, Hours::new(hours)?)?,
            usd(expected),
            "{desk_type} {tier} for {hours}h"
        );
    }

    Ok(())
}

#[test]
fn booking_flips_only_the_booked_desk() -> TestResult {
    let mut session = session()?;

    let confirmation = book(&mut session, 3, Some(MembershipTier::Premium), 2)?;

    assert_eq!(confirmation.desk.name(), "Desk 3");
    assert_eq!(confirmation.quote.total(), usd(3_000));

    let booked: Vec<DeskId> = session
        .inventory()
        .iter()
        .filter(|desk| desk.is_booked())
        .map(Desk::id)
        .collect();

    assert_eq!(booked, vec![DeskId(3)]);
    assert_eq!(session.inventory().available(), 14);

    Ok(())
}

#[test]
fn booked_desks_cannot_be_selected_again() -> TestResult {
    let mut session = session()?;
    book(&mut session, 3, Some(MembershipTier::Premium), 2)?;

    let before = session.state().clone();
    let result = session.apply(Action::SelectDesk(DeskId(3)));

    assert_eq!(result, Err(SessionError::DeskBooked("Desk 3".to_string())));
    assert_eq!(session.state(), &before);
    assert_eq!(session.ledger().len(), 1);

    Ok(())
}

#[test]
fn ledger_grows_in_submission_order() -> TestResult {
    let mut session = session()?;

    book(&mut session, 3, Some(MembershipTier::Premium), 2)?;
    session.clock().advance(SignedDuration::from_mins(5));
    book(&mut session, 1, Some(MembershipTier::Executive), 5)?;
    session.clock().advance(SignedDuration::from_mins(5));
    book(&mut session, 11, None, 4)?;

    let desks: Vec<DeskId> = session.ledger().iter().map(Booking::desk_id).collect();
    assert_eq!(desks, vec![DeskId(3), DeskId(1), DeskId(11)]);

    let times: Vec<Timestamp> = session.ledger().iter().map(Booking::timestamp).collect();
    assert!(times.windows(2).all(|pair| pair.first() < pair.get(1)));

    Ok(())
}

#[test]
fn revenue_is_bucketed_by_tier() -> TestResult {
    let mut session = session()?;

    book(&mut session, 3, Some(MembershipTier::Premium), 2)?;
    book(&mut session, 1, Some(MembershipTier::Executive), 5)?;
    book(&mut session, 11, None, 4)?;

    let revenue = session.revenue()?;

    let expected = [
        (MembershipTier::Basic, 0),
        (MembershipTier::Premium, 3_000),
        (MembershipTier::Executive, 9_000),
        (MembershipTier::Team, 9_000),
    ];

    for (tier, minor) in expected {
        let bucket = revenue.for_tier(tier).ok_or("every tier has a bucket")?;

        assert_eq!(bucket.revenue, usd(minor), "{tier}");
    }

    assert_eq!(revenue.total(), usd(21_000));
    assert_eq!(revenue.bookings(), 3);

    Ok(())
}

#[test]
fn confirmation_blocks_further_selection_until_dismissed() -> TestResult {
    let mut session = session()?;

    session.apply(Action::SelectDesk(DeskId(4)))?;
    session.apply(Action::Submit)?;

    assert_eq!(
        session.apply(Action::SelectDesk(DeskId(5))),
        Err(SessionError::ConfirmationPending)
    );

    session.apply(Action::Dismiss)?;
    session.apply(Action::SelectDesk(DeskId(5)))?;

    assert!(matches!(session.state(), SessionState::DeskSelected { .. }));

    Ok(())
}

#[test]
fn submit_without_selection_is_rejected() -> TestResult {
    let mut session = session()?;

    assert_eq!(session.apply(Action::Submit), Err(SessionError::NoDeskSelected));
    assert!(session.ledger().is_empty());

    Ok(())
}

#[test]
fn custom_layout_drives_the_session() -> TestResult {
    let layout = Layout::from_yaml(
        r#"
desks:
  individual: 2
  team: 1
rates:
  team: "40.00 USD"
"#,
    )?;

    let clock = ManualClock::new(Timestamp::from_second(1_700_000_000)?);
    let mut session = Session::new(layout.inventory()?, layout.rate_card()?, clock);

    assert_eq!(session.inventory().len(), 3);

    let confirmation = book(&mut session, 3, None, 2)?;

    assert_eq!(confirmation.desk.desk_type(), DeskType::Team);
    assert_eq!(confirmation.quote.total(), usd(8_000));

    Ok(())
}
