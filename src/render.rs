//! Terminal views
//!
//! Every view writes to an [`io::Write`] so the shell can target stdout and
//! tests can target a buffer.

use std::{fmt::Write as _, io};

use decimal_percentage::Percentage;
use jiff::tz::TimeZone;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    Table,
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    clock::Clock,
    desks::{Desk, DeskType},
    hours::Hours,
    pricing::{PricingError, Quote},
    session::{Session, SessionState},
    tiers::MembershipTier,
};

/// Desks per row in the desk grid
const GRID_COLUMNS: usize = 5;

/// Width of the longest revenue bar
const BAR_WIDTH: u32 = 30;

const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const BOLD_GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

/// Errors that can occur while rendering a view.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the output failed.
    #[error("failed to write view: {0}")]
    Io(#[from] io::Error),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// The selected desk could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Writes session views as tables.
#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    time_zone: TimeZone,
}

impl Renderer {
    /// Creates a renderer; booking times are shown in `time_zone`.
    pub fn new(color: bool, time_zone: TimeZone) -> Self {
        Self { color, time_zone }
    }

    /// Plain output in UTC.
    pub fn plain() -> Self {
        Self::new(false, TimeZone::UTC)
    }

    /// Render whatever the current state puts in front of the user: the
    /// confirmation when one is open, otherwise the desk grid followed by the
    /// booking form or a prompt to pick a desk.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the output cannot be written.
    pub fn current<C: Clock>(
        &self,
        out: &mut impl io::Write,
        session: &Session<C>,
    ) -> Result<(), RenderError> {
        match session.state() {
            SessionState::ConfirmationShown(_) => self.confirmation(out, session),
            SessionState::DeskSelected { .. } => {
                self.desks(out, session)?;
                self.form(out, session)
            }
            SessionState::NoSelection => {
                self.desks(out, session)?;
                writeln!(out, "\nPlease select a desk from the layout")?;

                Ok(())
            }
        }
    }

    /// The desk grid, individual desks first, then team spaces.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the output cannot be written.
    pub fn desks<C: Clock>(
        &self,
        out: &mut impl io::Write,
        session: &Session<C>,
    ) -> Result<(), RenderError> {
        let selected = session.selection().map(|(desk, _)| desk.id());

        for (heading, desk_type) in [
            ("Individual Desks", DeskType::Individual),
            ("Team Spaces", DeskType::Team),
        ] {
            let desks: Vec<&Desk> = session.inventory().of_type(desk_type).collect();

            if desks.is_empty() {
                continue;
            }

            writeln!(out, "\n{}", self.bold(heading))?;

            let mut builder = Builder::default();
            let mut color_ops: Vec<(usize, usize, Color)> = Vec::new();

            for (row, chunk) in desks.chunks(GRID_COLUMNS).enumerate() {
                let mut cells: Vec<String> = Vec::with_capacity(GRID_COLUMNS);

                for (col, desk) in chunk.iter().enumerate() {
                    let (status, color) = if desk.is_booked() {
                        ("booked", Color::FG_RED)
                    } else if Some(desk.id()) == selected {
                        ("selected", Color::FG_MAGENTA | Color::BOLD)
                    } else {
                        ("available", Color::FG_GREEN)
                    };

                    cells.push(format!("[{}] {}\n{status}", desk.id(), desk.name()));
                    color_ops.push((row, col, color));
                }

                cells.resize(GRID_COLUMNS, String::new());
                builder.push_record(cells);
            }

            let mut table = builder.build();
            table.with(Style::rounded());

            if self.color {
                for (row, col, color) in color_ops {
                    table.modify((row, col), color);
                }
            }

            self.write_table(out, &table)?;
        }

        Ok(())
    }

    /// The booking form for the selected desk, with a live price.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the form cannot be priced or written.
    pub fn form<C: Clock>(
        &self,
        out: &mut impl io::Write,
        session: &Session<C>,
    ) -> Result<(), RenderError> {
        let (Some((desk, form)), Some(quote)) = (session.selection(), session.current_quote()?)
        else {
            writeln!(out, "\nPlease select a desk from the layout")?;
            return Ok(());
        };

        writeln!(out, "\n{}", self.bold("Book a Desk"))?;
        writeln!(out, "{} ({})", desk.name(), desk.desk_type().title())?;

        let rates = session.rates();
        let mut builder = Builder::default();

        match desk.desk_type() {
            DeskType::Individual => {
                builder.push_record(["", "Membership Tier", "Rate"]);

                for tier in MembershipTier::INDIVIDUAL {
                    let marker = if tier == form.tier() { "●" } else { "○" };
                    let rate = rates.hourly_rate(DeskType::Individual, tier);

                    builder.push_record([marker.to_string(), tier.to_string(), per_hour(rate)]);
                }
            }
            DeskType::Team => {
                builder.push_record(["", "Team Space", "Rate"]);
                builder.push_record([
                    "●".to_string(),
                    MembershipTier::Team.to_string(),
                    per_hour(rates.hourly_rate(DeskType::Team, MembershipTier::Team)),
                ]);
            }
        }

        let mut table = builder.build();
        self.style_header_table(&mut table);
        table.modify(Columns::last(), Alignment::right());
        self.write_table(out, &table)?;

        writeln!(out, "Hours: {} ({}-{})", *form.hours(), Hours::MIN, Hours::MAX)?;

        if quote.discount_applied() {
            let note = format!(
                "{}% Discount Applied",
                percent_points(session.rates().discount())
            );
            writeln!(out, "{}", self.paint(&note, GREEN))?;
        }

        writeln!(out, "Total Price: {}", self.bold(&quote.total().to_string()))?;

        Ok(())
    }

    /// The confirmation for the booking just made.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the output cannot be written.
    pub fn confirmation<C: Clock>(
        &self,
        out: &mut impl io::Write,
        session: &Session<C>,
    ) -> Result<(), RenderError> {
        let Some(confirmation) = session.confirmation() else {
            return Ok(());
        };

        let quote = &confirmation.quote;

        writeln!(out, "\n{}", self.paint("Booking Confirmed!", BOLD_GREEN))?;
        writeln!(out, "Your workspace has been reserved")?;

        let mut builder = Builder::default();
        builder.push_record(["Workspace:".to_string(), confirmation.desk.name().to_string()]);
        builder.push_record(["Type:".to_string(), confirmation.desk.desk_type().to_string()]);
        builder.push_record(["Membership:".to_string(), confirmation.tier.to_string()]);
        builder.push_record(["Duration:".to_string(), quote.hours().to_string()]);
        builder.push_record(["Total Price:".to_string(), quote.total().to_string()]);

        let mut table = builder.build();
        table.with(Style::rounded());
        table.modify(Columns::last(), Alignment::right());
        self.write_table(out, &table)?;

        if quote.discount_applied() {
            let note = format!(
                "{}% discount applied for booking over {} hours",
                percent_points(session.rates().discount()),
                session.rates().discount_min_hours().saturating_sub(1),
            );
            writeln!(out, "{}", self.paint(&note, GREEN))?;
        }

        writeln!(out, "Type `dismiss` to continue")?;

        Ok(())
    }

    /// Every booking made this session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the output cannot be written.
    pub fn bookings<C: Clock>(
        &self,
        out: &mut impl io::Write,
        session: &Session<C>,
    ) -> Result<(), RenderError> {
        writeln!(out, "\n{}", self.bold("Current Bookings"))?;

        if session.ledger().is_empty() {
            writeln!(out, "No bookings yet")?;
            return Ok(());
        }

        let mut builder = Builder::default();
        builder.push_record(["Desk", "Hours", "Membership", "Price", "Time"]);

        for booking in session.ledger() {
            let desk_name = session
                .inventory()
                .get(booking.desk_id())
                .map_or_else(|| format!("#{}", booking.desk_id()), |desk| desk.name().to_string());

            let time = booking
                .timestamp()
                .to_zoned(self.time_zone.clone())
                .strftime("%H:%M:%S")
                .to_string();

            builder.push_record([
                desk_name,
                booking.hours().to_string(),
                booking.tier().to_string(),
                booking.price().to_string(),
                time,
            ]);
        }

        let mut table = builder.build();
        self.style_header_table(&mut table);
        table.modify(Columns::new(3..4), Alignment::right());
        self.write_table(out, &table)?;

        Ok(())
    }

    /// Revenue per membership tier, the grand total and a bar per tier.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the revenue can't be summed or written.
    pub fn revenue<C: Clock>(
        &self,
        out: &mut impl io::Write,
        session: &Session<C>,
    ) -> Result<(), RenderError> {
        writeln!(out, "\n{}", self.bold("Revenue Dashboard"))?;

        let summary = session.revenue()?;

        if summary.is_empty() {
            writeln!(out, "No revenue data available yet")?;
            return Ok(());
        }

        let peak = summary
            .tiers()
            .iter()
            .map(|bucket| *bucket.revenue.amount())
            .max()
            .unwrap_or(Decimal::ZERO);

        let mut builder = Builder::default();
        builder.push_record(["Tier", "Bookings", "Revenue", ""]);

        for bucket in summary.tiers() {
            builder.push_record([
                bucket.tier.to_string(),
                bucket.bookings.to_string(),
                bucket.revenue.to_string(),
                bar(bucket.revenue, peak),
            ]);
        }

        let mut table = builder.build();
        self.style_header_table(&mut table);
        table.modify(Columns::new(1..3), Alignment::right());

        if self.color {
            table.modify(Columns::last(), Color::FG_BLUE);
        }

        self.write_table(out, &table)?;

        writeln!(
            out,
            " {} {}",
            self.bold("Total Revenue:"),
            self.bold(&summary.total().to_string())
        )?;

        Ok(())
    }

    /// A standalone price breakdown, outside any session.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the output cannot be written.
    pub fn quote(
        &self,
        out: &mut impl io::Write,
        desk_type: DeskType,
        tier: MembershipTier,
        quote: &Quote,
    ) -> Result<(), RenderError> {
        let mut builder = Builder::default();
        builder.push_record(["Type:".to_string(), desk_type.title().to_string()]);
        builder.push_record(["Membership:".to_string(), tier.to_string()]);
        builder.push_record(["Rate:".to_string(), per_hour(quote.rate())]);
        builder.push_record(["Duration:".to_string(), quote.hours().to_string()]);
        builder.push_record(["Subtotal:".to_string(), quote.subtotal().to_string()]);
        builder.push_record(["Discount:".to_string(), format!("-{}", quote.discount())]);
        builder.push_record(["Total Price:".to_string(), quote.total().to_string()]);

        let mut table = builder.build();
        table.with(Style::rounded());
        table.modify(Columns::last(), Alignment::right());

        self.write_table(out, &table)
    }

    fn style_header_table(&self, table: &mut Table) {
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);

        table.with(theme);

        if self.color {
            table.modify(Rows::first(), Color::BOLD);
        }
    }

    fn write_table(&self, out: &mut impl io::Write, table: &Table) -> Result<(), RenderError> {
        let rendered = table.to_string();

        if self.color {
            writeln!(out, "{}", colorize_borders(&rendered))?;
        } else {
            writeln!(out, "{rendered}")?;
        }

        Ok(())
    }

    fn bold(&self, text: &str) -> String {
        self.paint(text, BOLD)
    }

    fn paint(&self, text: &str, escape: &str) -> String {
        if self.color {
            format!("{escape}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(true, TimeZone::system())
    }
}

fn per_hour(rate: Money<'_, Currency>) -> String {
    format!("{rate}/hr")
}

/// Converts a fractional percentage to percent points for display.
fn percent_points(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.1), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED)
        .round_dp(2)
        .normalize()
}

/// A bar proportional to `value`, where `peak` fills [`BAR_WIDTH`].
fn bar(value: Money<'_, Currency>, peak: Decimal) -> String {
    if peak.is_zero() {
        return String::new();
    }

    let width = (*value.amount() / peak * Decimal::from(BAR_WIDTH))
        .round()
        .to_usize()
        .unwrap_or(0);

    "█".repeat(width)
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;
    use crate::{
        clock::ManualClock,
        desks::{DeskId, Inventory},
        pricing::RateCard,
        session::Action,
    };

    fn session() -> TestResult<Session<ManualClock>> {
        // 2023-11-14T22:13:20Z
        let clock = ManualClock::new(Timestamp::from_second(1_700_000_000)?);

        Ok(Session::new(Inventory::default(), RateCard::default(), clock))
    }

    fn render(
        view: impl FnOnce(&Renderer, &mut Vec<u8>) -> Result<(), RenderError>,
    ) -> TestResult<String> {
        let mut out = Vec::new();
        view(&Renderer::plain(), &mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn desk_grid_shows_every_desk_and_its_state() -> TestResult {
        let mut session = session()?;
        session.apply(Action::SelectDesk(DeskId(2)))?;
        session.apply(Action::Submit)?;
        session.apply(Action::Dismiss)?;
        session.apply(Action::SelectDesk(DeskId(12)))?;

        let text = render(|r, out| r.desks(out, &session))?;

        assert!(text.contains("Individual Desks"));
        assert!(text.contains("Team Spaces"));
        assert!(text.contains("[1] Desk 1"));
        assert!(text.contains("[15] Team Space 5"));
        assert_eq!(text.matches("booked").count(), 1);
        assert_eq!(text.matches("selected").count(), 1);
        assert_eq!(text.matches("available").count(), 13);

        Ok(())
    }

    #[test]
    fn form_lists_individual_tiers_and_discount() -> TestResult {
        let mut session = session()?;
        session.apply(Action::SelectDesk(DeskId(1)))?;
        session.apply(Action::SetTier(MembershipTier::Executive))?;
        session.apply(Action::SetHours(Hours::new(5)?))?;

        let text = render(|r, out| r.form(out, &session))?;

        assert!(text.contains("Desk 1 (Individual Desk)"));
        assert!(text.contains("Basic"));
        assert!(text.contains("Premium"));
        assert!(text.contains("Executive"));
        assert!(text.contains("Hours: 5 (1-8)"));
        assert!(text.contains("10% Discount Applied"));
        assert!(text.contains("90.00"));

        Ok(())
    }

    #[test]
    fn form_for_team_space_shows_team_rate_only() -> TestResult {
        let mut session = session()?;
        session.apply(Action::SelectDesk(DeskId(11)))?;

        let text = render(|r, out| r.form(out, &session))?;

        assert!(text.contains("Team Space 1 (Team Space)"));
        assert!(text.contains("25.00"));
        assert!(!text.contains("Premium"));
        assert!(!text.contains("Discount Applied"));

        Ok(())
    }

    #[test]
    fn confirmation_summarises_the_booking() -> TestResult {
        let mut session = session()?;
        session.apply(Action::SelectDesk(DeskId(11)))?;
        session.apply(Action::SetHours(Hours::new(4)?))?;
        session.apply(Action::Submit)?;

        let text = render(|r, out| r.current(out, &session))?;

        assert!(text.contains("Booking Confirmed!"));
        assert!(text.contains("Team Space 1"));
        assert!(text.contains("team"));
        assert!(text.contains("4 hours"));
        assert!(text.contains("90.00"));
        assert!(text.contains("10% discount applied for booking over 3 hours"));

        Ok(())
    }

    #[test]
    fn empty_views_say_so() -> TestResult {
        let session = session()?;

        assert!(render(|r, out| r.bookings(out, &session))?.contains("No bookings yet"));
        assert!(
            render(|r, out| r.revenue(out, &session))?.contains("No revenue data available yet")
        );
        assert!(
            render(|r, out| r.current(out, &session))?
                .contains("Please select a desk from the layout")
        );

        Ok(())
    }

    #[test]
    fn booking_table_resolves_desk_names() -> TestResult {
        let mut session = session()?;
        session.apply(Action::SelectDesk(DeskId(3)))?;
        session.apply(Action::SetTier(MembershipTier::Premium))?;
        session.apply(Action::SetHours(Hours::new(2)?))?;
        session.apply(Action::Submit)?;

        let text = render(|r, out| r.bookings(out, &session))?;

        assert!(text.contains("Desk 3"));
        assert!(text.contains("Premium"));
        assert!(text.contains("30.00"));
        assert!(text.contains("22:13:20"));

        Ok(())
    }

    #[test]
    fn revenue_view_lists_tiers_and_total() -> TestResult {
        let mut session = session()?;

        for (desk, tier, hours) in [
            (1, Some(MembershipTier::Premium), 2),
            (2, Some(MembershipTier::Executive), 5),
            (11, None, 4),
        ] {
            session.apply(Action::SelectDesk(DeskId(desk)))?;
            if let Some(tier) = tier {
                session.apply(Action::SetTier(tier))?;
            }
            session.apply(Action::SetHours(Hours::new(hours)?))?;
            session.apply(Action::Submit)?;
            session.apply(Action::Dismiss)?;
        }

        let text = render(|r, out| r.revenue(out, &session))?;

        assert!(text.contains("Total Revenue:"));
        assert!(text.contains("210.00"));
        assert!(text.contains(&"█".repeat(30)));

        Ok(())
    }

    #[test]
    fn quote_shows_the_breakdown() -> TestResult {
        let quote = RateCard::default().quote(
            DeskType::Individual,
            MembershipTier::Executive,
            Hours::new(5)?,
        )?;

        let text = render(|r, out| {
            r.quote(out, DeskType::Individual, MembershipTier::Executive, &quote)
        })?;

        assert!(text.contains("Individual Desk"));
        assert!(text.contains("20.00/hr"));
        assert!(text.contains("5 hours"));
        assert!(text.contains("100.00"));
        assert!(text.contains("Discount:"));
        assert!(text.contains("90.00"));

        Ok(())
    }

    #[test]
    fn bars_scale_to_the_peak() {
        let peak = Decimal::from(90);

        assert_eq!(bar(Money::from_minor(9_000, iso::USD), peak).chars().count(), 30);
        assert_eq!(bar(Money::from_minor(3_000, iso::USD), peak).chars().count(), 10);
        assert_eq!(bar(Money::from_minor(0, iso::USD), peak), "");
        assert_eq!(bar(Money::from_minor(0, iso::USD), Decimal::ZERO), "");
    }

    #[test]
    fn percent_points_for_display() {
        assert_eq!(percent_points(Percentage::from(0.1)).to_string(), "10");
        assert_eq!(percent_points(Percentage::from(0.125)).to_string(), "12.5");
    }

    #[test]
    fn colorize_borders_wraps_box_runs() {
        assert_eq!(colorize_borders("╭─╮ x"), "\x1b[90m╭─╮\x1b[0m x");
    }
}
