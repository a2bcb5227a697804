//! Bukola prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bookings::{Booking, BookingId, Ledger, NewBooking},
    clock::{Clock, ManualClock, SystemClock},
    desks::{Desk, DeskId, DeskType, DeskTypeError, Inventory, InventoryError},
    hours::{Hours, HoursError},
    layout::{Layout, LayoutError},
    pricing::{PricingError, Quote, RateCard, calculate_price, total_price},
    render::{RenderError, Renderer},
    revenue::{RevenueSummary, TierRevenue},
    session::{Action, BookingForm, Confirmation, Session, SessionError, SessionState},
    shell::{Command, CommandError, Shell, ShellError},
    tiers::{MembershipTier, TierError},
};
