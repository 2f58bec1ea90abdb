use serde::{Deserialize, Serialize};

use crate::backend::{ExchangeRequest, SimulatedBackend};
use crate::currency::{Amount, CurrencyCatalog};
use crate::errors::{WalletError, WalletResult};
use crate::notify::Notification;
use crate::validation::InputValidator;
use crate::wizard::{StepDef, WizardEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeStep {
    SelectFrom,
    SelectTo,
    AmountEntry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeFields {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: String,
}

/// Conversion preview for the amount-entry step; recomputed per keystroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeQuote {
    pub from: String,
    pub to: String,
    /// Units of `to` per 1 unit of `from`, at 8 decimals
    pub cross_rate: Amount,
    pub converted: Amount,
}

fn require_from(fields: &ExchangeFields) -> WalletResult<()> {
    if fields.from.is_none() {
        return Err(WalletError::ValidationError(
            "Select a source currency first".to_string(),
        ));
    }
    Ok(())
}

fn require_distinct_to(fields: &ExchangeFields) -> WalletResult<()> {
    match &fields.to {
        None => Err(WalletError::ValidationError(
            "Select a target currency first".to_string(),
        )),
        Some(to) if fields.from.as_deref() == Some(to.as_str()) => {
            Err(WalletError::SameCurrencySelected)
        }
        Some(_) => Ok(()),
    }
}

fn validate_amount(fields: &ExchangeFields) -> WalletResult<()> {
    InputValidator::default().validate_amount(&fields.amount)?;
    Ok(())
}

fn clear_to(fields: &mut ExchangeFields) {
    fields.to = None;
}

fn clear_amount(fields: &mut ExchangeFields) {
    fields.amount.clear();
}

fn keep(_fields: &mut ExchangeFields) {}

static EXCHANGE_STEPS: [StepDef<ExchangeFields>; 3] = [
    StepDef {
        name: "SelectFrom",
        validate: require_from,
        clear: keep,
    },
    StepDef {
        name: "SelectTo",
        validate: require_distinct_to,
        clear: clear_to,
    },
    StepDef {
        name: "AmountEntry",
        validate: validate_amount,
        clear: clear_amount,
    },
];

/// The exchange dialog: pick a source, pick a distinct target, enter an
/// amount, settle. No PIN step and no balance check, matching the product.
pub struct ExchangeFlow {
    engine: WizardEngine<ExchangeFields>,
}

impl ExchangeFlow {
    pub fn new() -> Self {
        Self {
            engine: WizardEngine::new(&EXCHANGE_STEPS, ExchangeFields::default()),
        }
    }

    pub fn step(&self) -> ExchangeStep {
        match self.engine.step_index() {
            0 => ExchangeStep::SelectFrom,
            1 => ExchangeStep::SelectTo,
            _ => ExchangeStep::AmountEntry,
        }
    }

    pub fn fields(&self) -> &ExchangeFields {
        self.engine.fields()
    }

    /// Choose a currency for whichever selection step is active. Picking the
    /// source currency again as the target fails with SameCurrencySelected
    /// and stays on the target step.
    pub fn select_currency(
        &mut self,
        symbol: &str,
        catalog: &CurrencyCatalog,
    ) -> WalletResult<()> {
        let symbol = catalog.require(symbol)?.symbol.clone();
        match self.step() {
            ExchangeStep::SelectFrom => {
                self.engine.update(|mut fields| {
                    fields.from = Some(symbol);
                    fields
                });
                self.engine.advance()
            }
            ExchangeStep::SelectTo => {
                if self.fields().from.as_deref() == Some(symbol.as_str()) {
                    return Err(WalletError::SameCurrencySelected);
                }
                self.engine.update(|mut fields| {
                    fields.to = Some(symbol);
                    fields
                });
                self.engine.advance()
            }
            ExchangeStep::AmountEntry => Err(WalletError::Unknown(
                "Both currencies are already selected".to_string(),
            )),
        }
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        let amount = amount.into();
        self.engine.update(|mut fields| {
            fields.amount = amount;
            fields
        });
    }

    /// The conversion preview: `converted = amount x rate_from / rate_to`.
    /// An empty or unparsable amount previews as zero, as the form does.
    pub fn quote(&self, catalog: &CurrencyCatalog) -> WalletResult<ExchangeQuote> {
        let fields = self.fields();
        let from = fields
            .from
            .as_deref()
            .ok_or_else(|| WalletError::ValidationError("Source currency not selected".to_string()))?;
        let to = fields
            .to
            .as_deref()
            .ok_or_else(|| WalletError::ValidationError("Target currency not selected".to_string()))?;

        let amount = Amount::from_string(&fields.amount).unwrap_or(Amount::ZERO);
        Ok(ExchangeQuote {
            from: from.to_string(),
            to: to.to_string(),
            cross_rate: catalog.cross_rate(from, to)?,
            converted: catalog.convert(amount, from, to)?,
        })
    }

    /// Validate the amount and settle the exchange. On success the flow
    /// resets and the notification carries the executed conversion.
    pub async fn submit(
        &mut self,
        catalog: &CurrencyCatalog,
        backend: &SimulatedBackend,
    ) -> WalletResult<Notification> {
        if self.step() != ExchangeStep::AmountEntry {
            return Err(WalletError::Unknown(
                "Nothing to submit at this step".to_string(),
            ));
        }
        self.engine.validate_current()?;

        let quote = self.quote(catalog)?;
        let amount = Amount::from_string(&self.fields().amount)?;
        let request = ExchangeRequest {
            from_currency: quote.from.clone(),
            to_currency: quote.to.clone(),
            amount,
            converted_amount: quote.converted,
        };
        backend.submit_exchange(&request).await?;

        self.close();
        Ok(Notification::success(
            "Exchange completed",
            format!(
                "{} {} -> {} {}",
                amount.as_string(),
                quote.from,
                quote.converted.to_fixed_string(),
                quote.to
            ),
        ))
    }

    pub fn back(&mut self) {
        self.engine.back();
    }

    /// Reset everything to initial; called on dialog close and completion.
    pub fn close(&mut self) {
        self.engine.reset();
    }
}

impl Default for ExchangeFlow {
    fn default() -> Self {
        Self::new()
    }
}
