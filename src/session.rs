//! Session
//!
//! A [`Session`] owns everything a single user touches: the desk inventory,
//! the booking ledger, the rate card and the current selection. All changes
//! go through [`Session::apply`], which either performs a whole transition or
//! rejects the action and leaves the session exactly as it was.
//!
//! ```text
//!   NoSelection ──SelectDesk──▶ DeskSelected ──Submit──▶ ConfirmationShown
//!        ▲                        │    ▲  │                     │
//!        └──────ClearSelection────┘    └──┘ SelectDesk,         │
//!        ▲                                  SetHours, SetTier   │
//!        └──────────────────────────Dismiss─────────────────────┘
//! ```

use rusty_money::MoneyError;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    bookings::{BookingId, Ledger, NewBooking},
    clock::{Clock, SystemClock},
    desks::{Desk, DeskId, DeskType, Inventory, InventoryError},
    hours::Hours,
    pricing::{PricingError, Quote, RateCard},
    revenue::RevenueSummary,
    tiers::MembershipTier,
};

/// Reasons an action was rejected.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// The desk is already booked and can't be selected.
    #[error("{0} is already booked")]
    DeskBooked(String),

    /// The action needs a selected desk.
    #[error("no desk selected")]
    NoDeskSelected,

    /// A booking confirmation must be dismissed first.
    #[error("a booking confirmation is still open")]
    ConfirmationPending,

    /// There is no confirmation to dismiss.
    #[error("there is no booking confirmation to dismiss")]
    NoConfirmation,

    /// The tier cannot be used on this kind of desk.
    #[error("{tier} membership is not available for a {desk_type} desk")]
    TierNotAllowed {
        /// Requested tier
        tier: MembershipTier,

        /// Kind of desk selected
        desk_type: DeskType,
    },

    /// Inventory lookup or update failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// The booking could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// User actions that drive the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Select an available desk, replacing any current selection.
    SelectDesk(DeskId),

    /// Drop the current selection.
    ClearSelection,

    /// Change the booking duration on the form.
    SetHours(Hours),

    /// Change the membership tier on the form.
    SetTier(MembershipTier),

    /// Book the selected desk with the current form values.
    Submit,

    /// Close the booking confirmation.
    Dismiss,
}

/// Booking form values for the selected desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingForm {
    hours: Hours,
    tier: MembershipTier,
}

impl BookingForm {
    /// A fresh form for a desk type: one hour at the type's default tier.
    pub fn for_desk_type(desk_type: DeskType) -> Self {
        Self {
            hours: Hours::one(),
            tier: MembershipTier::default_for(desk_type),
        }
    }

    /// Booking duration
    pub fn hours(&self) -> Hours {
        self.hours
    }

    /// Membership tier
    pub fn tier(&self) -> MembershipTier {
        self.tier
    }
}

/// What the confirmation dialog shows after a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    /// The booking just recorded
    pub booking_id: BookingId,

    /// The desk just booked
    pub desk: Desk,

    /// Tier charged
    pub tier: MembershipTier,

    /// Price breakdown
    pub quote: Quote,
}

/// Where the session is in the booking flow.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Nothing selected, no dialog open.
    #[default]
    NoSelection,

    /// A desk is selected and its booking form is open.
    DeskSelected {
        /// The selected desk
        desk_id: DeskId,

        /// Form values
        form: BookingForm,
    },

    /// A booking was just made and its confirmation is open.
    ConfirmationShown(Confirmation),
}

/// In-memory state for one user's booking session.
#[derive(Debug)]
pub struct Session<C = SystemClock> {
    inventory: Inventory,
    ledger: Ledger,
    rates: RateCard,
    state: SessionState,
    clock: C,
}

impl Session<SystemClock> {
    /// The standard desk layout and rates on the wall clock.
    pub fn standard() -> Self {
        Self::new(Inventory::default(), RateCard::default(), SystemClock)
    }
}

impl Default for Session<SystemClock> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<C: Clock> Session<C> {
    /// Creates a session with no selection and an empty ledger.
    pub fn new(inventory: Inventory, rates: RateCard, clock: C) -> Self {
        Self {
            inventory,
            ledger: Ledger::new(),
            rates,
            state: SessionState::NoSelection,
            clock,
        }
    }

    /// Desk inventory
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Bookings made so far
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Rate card used for quotes
    pub fn rates(&self) -> &RateCard {
        &self.rates
    }

    /// Clock stamping new bookings
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The selected desk and its form, if any.
    pub fn selection(&self) -> Option<(&Desk, BookingForm)> {
        match &self.state {
            SessionState::DeskSelected { desk_id, form } => {
                self.inventory.get(*desk_id).map(|desk| (desk, *form))
            }
            _ => None,
        }
    }

    /// The open confirmation, if any.
    pub fn confirmation(&self) -> Option<&Confirmation> {
        match &self.state {
            SessionState::ConfirmationShown(confirmation) => Some(confirmation),
            _ => None,
        }
    }

    /// Live price for the selected desk's form.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the form cannot be priced.
    pub fn current_quote(&self) -> Result<Option<Quote>, PricingError> {
        self.selection()
            .map(|(desk, form)| self.rates.quote(desk.desk_type(), form.tier, form.hours))
            .transpose()
    }

    /// Revenue derived from the ledger.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if a booking is not in the rate card currency.
    pub fn revenue(&self) -> Result<RevenueSummary, MoneyError> {
        RevenueSummary::from_bookings(&self.ledger, self.rates.currency())
    }

    /// Apply an action.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] describing why the action was rejected; the
    /// session is unchanged in that case.
    pub fn apply(&mut self, action: Action) -> Result<&SessionState, SessionError> {
        let next = match action {
            Action::SelectDesk(desk_id) => self.select_desk(desk_id)?,
            Action::ClearSelection => self.clear_selection()?,
            Action::SetHours(hours) => self.edit_form(|form| form.hours = hours)?,
            Action::SetTier(tier) => self.edit_form(|form| form.tier = tier)?,
            Action::Submit => self.submit()?,
            Action::Dismiss => self.dismiss()?,
        };

        debug!(?action, "applied session action");

        self.state = next;

        Ok(&self.state)
    }

    fn select_desk(&self, desk_id: DeskId) -> Result<SessionState, SessionError> {
        if matches!(self.state, SessionState::ConfirmationShown(_)) {
            return Err(SessionError::ConfirmationPending);
        }

        let desk = self.inventory.require(desk_id)?;

        if desk.is_booked() {
            return Err(SessionError::DeskBooked(desk.name().to_string()));
        }

        Ok(SessionState::DeskSelected {
            desk_id,
            form: BookingForm::for_desk_type(desk.desk_type()),
        })
    }

    fn clear_selection(&self) -> Result<SessionState, SessionError> {
        match self.state {
            SessionState::DeskSelected { .. } => Ok(SessionState::NoSelection),
            SessionState::ConfirmationShown(_) => Err(SessionError::ConfirmationPending),
            SessionState::NoSelection => Err(SessionError::NoDeskSelected),
        }
    }

    fn edit_form(&self, edit: impl FnOnce(&mut BookingForm)) -> Result<SessionState, SessionError> {
        let (desk, mut form) = self.selection().ok_or(SessionError::NoDeskSelected)?;

        edit(&mut form);

        if !form.tier.allowed_for(desk.desk_type()) {
            return Err(SessionError::TierNotAllowed {
                tier: form.tier,
                desk_type: desk.desk_type(),
            });
        }

        Ok(SessionState::DeskSelected {
            desk_id: desk.id(),
            form,
        })
    }

    fn submit(&mut self) -> Result<SessionState, SessionError> {
        let (desk, form) = self.selection().ok_or(SessionError::NoDeskSelected)?;
        let desk_id = desk.id();

        let quote = self
            .rates
            .quote(desk.desk_type(), form.tier, form.hours)?;

        self.inventory.mark_booked(desk_id)?;
        let desk = self.inventory.require(desk_id)?.clone();

        let booking = self.ledger.record(
            NewBooking {
                desk_id: desk.id(),
                hours: form.hours,
                tier: form.tier,
                price: quote.total(),
            },
            self.clock.now(),
        );

        info!(
            booking = %booking.id(),
            desk = desk.name(),
            hours = *form.hours,
            tier = %form.tier,
            price = %booking.price(),
            "booking recorded"
        );

        Ok(SessionState::ConfirmationShown(Confirmation {
            booking_id: booking.id(),
            desk,
            tier: form.tier,
            quote,
        }))
    }

    fn dismiss(&self) -> Result<SessionState, SessionError> {
        match self.state {
            SessionState::ConfirmationShown(_) => Ok(SessionState::NoSelection),
            _ => Err(SessionError::NoConfirmation),
        }
    }
}
