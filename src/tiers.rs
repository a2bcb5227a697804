//! Membership tiers

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::desks::DeskType;

/// Errors that can occur while parsing a membership tier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TierError {
    /// The label does not name any known tier.
    #[error("unknown membership tier: {0}")]
    Unknown(String),
}

/// Pricing category chosen at booking time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MembershipTier {
    /// Entry level individual membership
    Basic,

    /// Mid level individual membership
    Premium,

    /// Top level individual membership
    Executive,

    /// Membership for team spaces
    Team,
}

impl MembershipTier {
    /// Every tier, in revenue bucket order.
    pub const ALL: [MembershipTier; 4] = [
        MembershipTier::Basic,
        MembershipTier::Premium,
        MembershipTier::Executive,
        MembershipTier::Team,
    ];

    /// Tiers that can be chosen for an individual desk.
    pub const INDIVIDUAL: [MembershipTier; 3] = [
        MembershipTier::Basic,
        MembershipTier::Premium,
        MembershipTier::Executive,
    ];

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            MembershipTier::Basic => "Basic",
            MembershipTier::Premium => "Premium",
            MembershipTier::Executive => "Executive",
            MembershipTier::Team => "Team",
        }
    }

    /// The tier a fresh booking form starts with for the given desk type.
    pub fn default_for(desk_type: DeskType) -> Self {
        match desk_type {
            DeskType::Individual => MembershipTier::Basic,
            DeskType::Team => MembershipTier::Team,
        }
    }

    /// Whether this tier may be booked on a desk of the given type.
    pub fn allowed_for(self, desk_type: DeskType) -> bool {
        match desk_type {
            DeskType::Individual => self != MembershipTier::Team,
            DeskType::Team => self == MembershipTier::Team,
        }
    }
}

impl fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MembershipTier {
    type Err = TierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MembershipTier::ALL
            .into_iter()
            .find(|tier| tier.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TierError::Unknown(s.to_string()))
    }
}
