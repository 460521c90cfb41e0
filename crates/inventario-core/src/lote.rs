//! # Lote Wizard
//!
//! In-memory state of the two-step "add lote" screen. Pure: the quote fetch
//! and the store writes are done by the app's `LoteWorkflow`, which drives
//! this state machine.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────────┐  check_can_advance()    ┌──────────────┐            │
//! │   │    Header    │  + quote fetched OK      │    Lines     │            │
//! │   │  detail      │ ───────────────────────► │  draft       │            │
//! │   │  end date    │   advance_with_quote()   │  staged[]    │            │
//! │   │              │ ◄─────────────────────── │  quote       │            │
//! │   └──────────────┘     previous_step()      └──────┬───────┘            │
//! │          ▲                                         │                    │
//! │          │              commit_plan() + store OK   │                    │
//! │          └──────────────── reset() ◄───────────────┘                    │
//! │                                                                         │
//! │   Fetch failure: stays on Header.  Store failure: state kept.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{ExchangeRate, Money, Quantity};
use crate::types::{NewLote, NewLoteLine};
use crate::validation::{
    parse_amount, parse_date, parse_exchange_rate, parse_quantity, validate_positive,
    ValidationResult,
};

// =============================================================================
// Step
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum WizardStep {
    #[default]
    Header,
    Lines,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardStep::Header => write!(f, "header"),
            WizardStep::Lines => write!(f, "lines"),
        }
    }
}

// =============================================================================
// Header, Draft, Staged Line
// =============================================================================

/// Step-one fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoteHeader {
    pub detail: String,
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,
}

/// The line being typed on step two. Raw text, parsed on staging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineDraft {
    pub product_id: Option<i64>,
    pub quantity: String,
    pub purchase_price: String,
    /// Blank means "use the quote".
    pub rate_override: String,
}

/// A validated line waiting for commit.
///
/// Only an explicit override is stored; lines without one take the quote
/// fetched at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StagedLine {
    pub product_id: i64,
    pub quantity: Quantity,
    pub purchase_price: Money,
    pub rate_override: Option<ExchangeRate>,
}

// =============================================================================
// Commit Plan
// =============================================================================

/// Snapshot of a wizard that passed commit validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPlan {
    pub detail: String,
    pub ends_on: NaiveDate,
    pub lines: Vec<StagedLine>,
}

impl CommitPlan {
    /// Resolves every line's rate against the fresh quote and attaches the
    /// committing user and registration day.
    pub fn into_records(
        self,
        user_id: i64,
        registered_on: NaiveDate,
        quote: ExchangeRate,
    ) -> (NewLote, Vec<NewLoteLine>) {
        let lote = NewLote {
            detail: self.detail,
            registered_on,
            ends_on: self.ends_on,
            user_id,
        };

        let lines = self
            .lines
            .into_iter()
            .map(|line| NewLoteLine {
                product_id: line.product_id,
                quantity: line.quantity,
                purchase_price: line.purchase_price,
                exchange_rate: line.rate_override.unwrap_or(quote),
            })
            .collect();

        (lote, lines)
    }
}

// =============================================================================
// Wizard
// =============================================================================

/// State of one "add lote" session.
#[derive(Debug, Clone, Default)]
pub struct LoteWizard {
    step: WizardStep,
    header: LoteHeader,
    quote: Option<ExchangeRate>,
    draft: LineDraft,
    lines: Vec<StagedLine>,
}

impl LoteWizard {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn header(&self) -> &LoteHeader {
        &self.header
    }

    /// Quote captured when entering the lines step.
    pub fn quote(&self) -> Option<ExchangeRate> {
        self.quote
    }

    pub fn draft(&self) -> &LineDraft {
        &self.draft
    }

    pub fn lines(&self) -> &[StagedLine] {
        &self.lines
    }

    // -------------------------------------------------------------------------
    // Header step
    // -------------------------------------------------------------------------

    pub fn set_detail(&mut self, detail: &str) {
        self.header.detail = detail.to_string();
    }

    /// Sets the end date from `YYYY-MM-DD` text. Blank clears it.
    ///
    /// Invalid text leaves the previous value untouched.
    pub fn set_end_date(&mut self, input: &str) -> ValidationResult<()> {
        if input.trim().is_empty() {
            self.header.end_date = None;
            return Ok(());
        }
        self.header.end_date = Some(parse_date("end date", input)?);
        Ok(())
    }

    fn validated_end_date(&self) -> ValidationResult<NaiveDate> {
        self.header.end_date.ok_or_else(|| ValidationError::Required {
            field: "end date".to_string(),
        })
    }

    /// Checks everything `next_step` needs before the quote is fetched.
    pub fn check_can_advance(&self) -> CoreResult<()> {
        self.require_step(WizardStep::Header)?;
        self.validated_end_date()?;
        Ok(())
    }

    /// Moves to the lines step with the quote just fetched.
    pub fn advance_with_quote(&mut self, quote: ExchangeRate) -> CoreResult<()> {
        self.check_can_advance()?;
        self.quote = Some(quote);
        self.step = WizardStep::Lines;
        Ok(())
    }

    /// Back to the header. Header fields and staged lines are kept.
    pub fn previous_step(&mut self) {
        self.step = WizardStep::Header;
    }

    // -------------------------------------------------------------------------
    // Lines step
    // -------------------------------------------------------------------------

    pub fn set_draft_product(&mut self, product_id: Option<i64>) {
        self.draft.product_id = product_id;
    }

    pub fn set_draft_quantity(&mut self, quantity: &str) {
        self.draft.quantity = quantity.to_string();
    }

    pub fn set_draft_purchase_price(&mut self, price: &str) {
        self.draft.purchase_price = price.to_string();
    }

    pub fn set_draft_rate(&mut self, rate: &str) {
        self.draft.rate_override = rate.to_string();
    }

    /// Rate the draft would get: the override if it parses, else the quote.
    pub fn draft_rate(&self) -> Option<ExchangeRate> {
        ExchangeRate::from_decimal_str(&self.draft.rate_override)
            .filter(|rate| rate.is_positive())
            .or(self.quote)
    }

    /// Validates the draft, appends it and clears the draft.
    pub fn stage_line(&mut self) -> CoreResult<&StagedLine> {
        self.require_step(WizardStep::Lines)?;

        let product_id = self.draft.product_id.ok_or_else(|| ValidationError::Required {
            field: "product".to_string(),
        })?;

        let quantity = parse_quantity("quantity", &self.draft.quantity)?;
        validate_positive("quantity", quantity.hundredths())?;

        let purchase_price = parse_amount("purchase price", &self.draft.purchase_price)?;
        validate_positive("purchase price", purchase_price.cents())?;

        let rate_override = if self.draft.rate_override.trim().is_empty() {
            None
        } else {
            Some(parse_exchange_rate("exchange rate", &self.draft.rate_override)?)
        };

        self.lines.push(StagedLine {
            product_id,
            quantity,
            purchase_price,
            rate_override,
        });
        self.draft = LineDraft::default();

        let idx = self.lines.len() - 1;
        Ok(&self.lines[idx])
    }

    /// Removes a staged line by position.
    pub fn remove_line(&mut self, index: usize) -> ValidationResult<StagedLine> {
        if index >= self.lines.len() {
            return Err(ValidationError::IndexOutOfRange {
                field: "line".to_string(),
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    // -------------------------------------------------------------------------
    // Commit
    // -------------------------------------------------------------------------

    /// Validates the whole wizard for commit.
    ///
    /// Needs an end date and at least one staged line.
    pub fn commit_plan(&self) -> CoreResult<CommitPlan> {
        let ends_on = self.validated_end_date()?;

        if self.lines.is_empty() {
            return Err(ValidationError::Required {
                field: "lines".to_string(),
            }
            .into());
        }

        Ok(CommitPlan {
            detail: self.header.detail.trim().to_string(),
            ends_on,
            lines: self.lines.clone(),
        })
    }

    /// Drops all state and returns to an empty header step.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn require_step(&self, expected: WizardStep) -> CoreResult<()> {
        if self.step != expected {
            return Err(CoreError::WrongStep {
                expected: expected.to_string(),
                current: self.step.to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(h: i64) -> ExchangeRate {
        ExchangeRate::from_hundredths(h)
    }

    fn wizard_on_lines() -> LoteWizard {
        let mut wizard = LoteWizard::new();
        wizard.set_end_date("2025-01-01").unwrap();
        wizard.advance_with_quote(rate(1357)).unwrap();
        wizard
    }

    fn stage(wizard: &mut LoteWizard, product: i64, qty: &str, price: &str, rate: &str) {
        wizard.set_draft_product(Some(product));
        wizard.set_draft_quantity(qty);
        wizard.set_draft_purchase_price(price);
        wizard.set_draft_rate(rate);
        wizard.stage_line().unwrap();
    }

    #[test]
    fn test_cannot_advance_without_end_date() {
        let mut wizard = LoteWizard::new();
        wizard.set_detail("Pedido semanal");

        let err = wizard.check_can_advance().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { .. })
        ));
        assert!(wizard.advance_with_quote(rate(100)).is_err());
        assert_eq!(wizard.step(), WizardStep::Header);
        assert_eq!(wizard.quote(), None);
    }

    #[test]
    fn test_invalid_end_date_keeps_previous() {
        let mut wizard = LoteWizard::new();
        wizard.set_end_date("2025-01-01").unwrap();
        assert!(wizard.set_end_date("31/12/2025").is_err());
        assert_eq!(
            wizard.header().end_date,
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );

        wizard.set_end_date("").unwrap();
        assert_eq!(wizard.header().end_date, None);
    }

    #[test]
    fn test_advance_stores_quote() {
        let wizard = wizard_on_lines();
        assert_eq!(wizard.step(), WizardStep::Lines);
        assert_eq!(wizard.quote(), Some(rate(1357)));
        assert_eq!(wizard.draft_rate(), Some(rate(1357)));
    }

    #[test]
    fn test_stage_line_requires_lines_step() {
        let mut wizard = LoteWizard::new();
        wizard.set_draft_product(Some(1));
        wizard.set_draft_quantity("2");
        wizard.set_draft_purchase_price("3");

        assert!(matches!(
            wizard.stage_line(),
            Err(CoreError::WrongStep { .. })
        ));
        assert!(wizard.lines().is_empty());
    }

    #[test]
    fn test_stage_line_validates_draft() {
        let mut wizard = wizard_on_lines();

        wizard.set_draft_quantity("2");
        wizard.set_draft_purchase_price("3");
        assert!(wizard.stage_line().is_err(), "product missing");

        wizard.set_draft_product(Some(1));
        wizard.set_draft_quantity("0");
        assert!(wizard.stage_line().is_err(), "zero quantity");

        wizard.set_draft_quantity("2");
        wizard.set_draft_purchase_price("0");
        assert!(wizard.stage_line().is_err(), "zero price");

        wizard.set_draft_purchase_price("3");
        wizard.set_draft_rate("abc");
        assert!(wizard.stage_line().is_err(), "bad override");

        assert!(wizard.lines().is_empty());
        assert_eq!(wizard.draft().product_id, Some(1));
    }

    #[test]
    fn test_stage_line_appends_in_order_and_clears_draft() {
        let mut wizard = wizard_on_lines();
        stage(&mut wizard, 1, "2", "3.50", "");
        stage(&mut wizard, 2, "5", "1", "6,96");

        let lines = wizard.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, 1);
        assert_eq!(lines[0].quantity, Quantity::from_units(2));
        assert_eq!(lines[0].purchase_price, Money::from_cents(350));
        assert_eq!(lines[0].rate_override, None);
        assert_eq!(lines[1].rate_override, Some(rate(696)));
        assert_eq!(wizard.draft(), &LineDraft::default());
    }

    #[test]
    fn test_stage_line_accepts_fractional_quantities() {
        let mut wizard = wizard_on_lines();
        stage(&mut wizard, 1, "2.5", "3.50", "");
        stage(&mut wizard, 2, "0,75", "12", "");

        let quantities: Vec<i64> = wizard.lines().iter().map(|l| l.quantity.hundredths()).collect();
        assert_eq!(quantities, vec![250, 75]);

        wizard.set_draft_product(Some(3));
        wizard.set_draft_quantity("0,001");
        wizard.set_draft_purchase_price("1");
        assert!(matches!(
            wizard.stage_line(),
            Err(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));
        wizard.set_draft_quantity("0.00");
        assert!(matches!(
            wizard.stage_line(),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert_eq!(wizard.lines().len(), 2);
    }

    #[test]
    fn test_draft_rate_prefers_override() {
        let mut wizard = wizard_on_lines();
        wizard.set_draft_rate("7");
        assert_eq!(wizard.draft_rate(), Some(rate(700)));
        wizard.set_draft_rate("");
        assert_eq!(wizard.draft_rate(), Some(rate(1357)));
    }

    #[test]
    fn test_remove_line() {
        let mut wizard = wizard_on_lines();
        stage(&mut wizard, 1, "1", "1", "");
        stage(&mut wizard, 2, "1", "1", "");
        stage(&mut wizard, 3, "1", "1", "");

        let removed = wizard.remove_line(1).unwrap();
        assert_eq!(removed.product_id, 2);
        let ids: Vec<i64> = wizard.lines().iter().map(|l| l.product_id).collect();
        assert_eq!(ids, vec![1, 3]);

        assert!(matches!(
            wizard.remove_line(2),
            Err(ValidationError::IndexOutOfRange { index: 2, len: 2, .. })
        ));
    }

    #[test]
    fn test_previous_step_keeps_data() {
        let mut wizard = wizard_on_lines();
        wizard.set_detail("Proveedor A");
        stage(&mut wizard, 1, "1", "1", "");

        wizard.previous_step();
        assert_eq!(wizard.step(), WizardStep::Header);
        assert_eq!(wizard.header().detail, "Proveedor A");
        assert_eq!(wizard.lines().len(), 1);

        wizard.advance_with_quote(rate(1400)).unwrap();
        assert_eq!(wizard.quote(), Some(rate(1400)));
        assert_eq!(wizard.lines().len(), 1);
    }

    #[test]
    fn test_commit_plan_requires_lines() {
        let wizard = wizard_on_lines();
        assert!(matches!(
            wizard.commit_plan(),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[test]
    fn test_commit_plan_resolves_rates() {
        let mut wizard = wizard_on_lines();
        stage(&mut wizard, 1, "2", "3", "");
        stage(&mut wizard, 2, "4", "5", "7");

        let today = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let (lote, lines) = wizard
            .commit_plan()
            .unwrap()
            .into_records(9, today, rate(1500));

        assert_eq!(lote.user_id, 9);
        assert_eq!(lote.detail, "");
        assert_eq!(lote.registered_on, today);
        assert_eq!(lote.ends_on, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(lines[0].exchange_rate, rate(1500));
        assert_eq!(lines[1].exchange_rate, rate(700));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut wizard = wizard_on_lines();
        wizard.set_detail("x");
        stage(&mut wizard, 1, "1", "1", "");

        wizard.reset();
        assert_eq!(wizard.step(), WizardStep::Header);
        assert_eq!(wizard.header(), &LoteHeader::default());
        assert!(wizard.lines().is_empty());
        assert_eq!(wizard.quote(), None);
    }
}
