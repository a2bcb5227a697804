//! Desks
//!
//! The desk inventory is created once per session and only ever changes by
//! flipping a desk's booked flag from `false` to `true`.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Errors raised by inventory operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// No desk has this identifier.
    #[error("no desk with id {0}")]
    UnknownDesk(DeskId),

    /// The desk already carries a booking.
    #[error("desk {0} is already booked")]
    AlreadyBooked(DeskId),

    /// The requested layout is larger than an inventory may hold.
    #[error(
        "{individual} desks and {team} team spaces exceed the limit of {max} workspaces",
        max = Inventory::MAX_DESKS
    )]
    TooManyDesks {
        /// Requested individual desks
        individual: u32,

        /// Requested team spaces
        team: u32,
    },
}

/// Errors parsing a desk type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeskTypeError {
    /// The label does not name a desk type.
    #[error("unknown desk type: {0}")]
    Unknown(String),
}

/// Stable desk identifier, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeskId(pub u32);

impl fmt::Display for DeskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(DeskId)
    }
}

/// Kind of workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeskType {
    /// A single-person desk
    Individual,

    /// A shared team space
    Team,
}

impl DeskType {
    /// Lowercase label
    pub fn label(self) -> &'static str {
        match self {
            DeskType::Individual => "individual",
            DeskType::Team => "team",
        }
    }

    /// Heading used when describing a desk of this kind.
    pub fn title(self) -> &'static str {
        match self {
            DeskType::Individual => "Individual Desk",
            DeskType::Team => "Team Space",
        }
    }
}

impl fmt::Display for DeskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeskType {
    type Err = DeskTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(DeskType::Individual),
            "team" => Ok(DeskType::Team),
            _ => Err(DeskTypeError::Unknown(s.to_string())),
        }
    }
}

/// A bookable workspace unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Desk {
    id: DeskId,
    desk_type: DeskType,
    name: String,
    booked: bool,
}

impl Desk {
    /// Creates a new, unbooked desk.
    pub fn new(id: DeskId, desk_type: DeskType, name: impl Into<String>) -> Self {
        Self {
            id,
            desk_type,
            name: name.into(),
            booked: false,
        }
    }

    /// Identifier
    pub fn id(&self) -> DeskId {
        self.id
    }

    /// Kind of desk
    pub fn desk_type(&self) -> DeskType {
        self.desk_type
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the desk has been booked this session.
    pub fn is_booked(&self) -> bool {
        self.booked
    }
}

/// The fixed set of desks for a session, ordered by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    desks: Vec<Desk>,
}

impl Inventory {
    /// Number of individual desks in the standard layout
    pub const INDIVIDUAL_DESKS: u32 = 10;

    /// Number of team spaces in the standard layout
    pub const TEAM_SPACES: u32 = 5;

    /// Most workspaces a single inventory may hold
    pub const MAX_DESKS: u32 = 1_000;

    /// Builds an inventory of `individual` desks followed by `team` spaces.
    ///
    /// Ids run from 1 upwards; individual desks are named "Desk N" and team
    /// spaces "Team Space N", each numbered from 1 within its kind.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::TooManyDesks`] if the two counts together
    /// exceed [`Inventory::MAX_DESKS`].
    pub fn with_counts(individual: u32, team: u32) -> Result<Self, InventoryError> {
        individual
            .checked_add(team)
            .filter(|total| *total <= Self::MAX_DESKS)
            .ok_or(InventoryError::TooManyDesks { individual, team })?;

        Ok(Self::build(individual, team))
    }

    fn build(individual: u32, team: u32) -> Self {
        let individual_desks = (1..=individual)
            .map(|n| Desk::new(DeskId(n), DeskType::Individual, format!("Desk {n}")));

        let team_spaces = (1..=team).filter_map(|n| {
            let id = individual.checked_add(n)?;

            Some(Desk::new(DeskId(id), DeskType::Team, format!("Team Space {n}")))
        });

        Self {
            desks: individual_desks.chain(team_spaces).collect(),
        }
    }

    /// Look up a desk by id.
    pub fn get(&self, id: DeskId) -> Option<&Desk> {
        self.position(id).and_then(|idx| self.desks.get(idx))
    }

    /// Look up a desk by id, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::UnknownDesk`] if no desk has this id.
    pub fn require(&self, id: DeskId) -> Result<&Desk, InventoryError> {
        self.get(id).ok_or(InventoryError::UnknownDesk(id))
    }

    /// Flag a desk as booked.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::UnknownDesk`]: no desk has this id.
    /// - [`InventoryError::AlreadyBooked`]: the desk is already booked.
    pub fn mark_booked(&mut self, id: DeskId) -> Result<(), InventoryError> {
        let desk = self
            .position(id)
            .and_then(|idx| self.desks.get_mut(idx))
            .ok_or(InventoryError::UnknownDesk(id))?;

        if desk.booked {
            return Err(InventoryError::AlreadyBooked(id));
        }

        desk.booked = true;

        Ok(())
    }

    /// Iterate over every desk in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Desk> {
        self.desks.iter()
    }

    /// Iterate over desks of one kind in id order.
    pub fn of_type(&self, desk_type: DeskType) -> impl Iterator<Item = &Desk> {
        self.desks
            .iter()
            .filter(move |desk| desk.desk_type == desk_type)
    }

    /// Number of desks not yet booked.
    pub fn available(&self) -> usize {
        self.desks.iter().filter(|desk| !desk.booked).count()
    }

    /// Total number of desks.
    pub fn len(&self) -> usize {
        self.desks.len()
    }

    /// Whether the inventory has no desks.
    pub fn is_empty(&self) -> bool {
        self.desks.is_empty()
    }

    // Ids are assigned contiguously from 1, so a desk's slot is `id - 1`.
    fn position(&self, id: DeskId) -> Option<usize> {
        let idx = usize::try_from(id.0.checked_sub(1)?).ok()?;

        (idx < self.desks.len()).then_some(idx)
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::build(Self::INDIVIDUAL_DESKS, Self::TEAM_SPACES)
    }
}
