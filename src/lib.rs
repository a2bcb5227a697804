//! Bukola
//!
//! Bukola is a desk booking engine for a small coworking space: a fixed layout
//! of individual desks and team spaces, tiered hourly pricing with a long-stay
//! discount, an in-memory booking ledger and per-tier revenue reporting.

pub mod bookings;
pub mod clock;
pub mod config;
pub mod desks;
pub mod hours;
pub mod layout;
pub mod prelude;
pub mod pricing;
pub mod render;
pub mod revenue;
pub mod session;
pub mod shell;
pub mod tiers;
