use serde::{Deserialize, Serialize};

use crate::backend::{SimulatedBackend, WithdrawalRequest};
use crate::currency::{Amount, CurrencyCatalog, Network};
use crate::errors::{WalletError, WalletResult};
use crate::notify::Notification;
use crate::pin::{PinChallenge, PinPhase};
use crate::validation::InputValidator;
use crate::wizard::{StepDef, WizardEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawStep {
    SelectCurrency,
    DetailsEntry,
    PinConfirmation,
}

/// Quick-fill buttons under the amount field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickFill {
    Half,
    All,
    Clear,
}

/// The currency chosen in the first step, with its withdrawal ceiling
/// (denominated in the reference currency) captured at selection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencySelection {
    pub symbol: String,
    pub network: Network,
    pub available: Amount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WithdrawFields {
    pub selection: Option<CurrencySelection>,
    pub address: String,
    pub amount: String,
}

fn require_selection(fields: &WithdrawFields) -> WalletResult<()> {
    if fields.selection.is_none() {
        return Err(WalletError::ValidationError(
            "Select a currency first".to_string(),
        ));
    }
    Ok(())
}

/// Submit gate: address, then amount syntax, then funds.
fn validate_details(fields: &WithdrawFields) -> WalletResult<()> {
    let selection = fields
        .selection
        .as_ref()
        .ok_or_else(|| WalletError::ValidationError("Select a currency first".to_string()))?;

    let validator = InputValidator::default();
    if fields.address.is_empty() {
        return Err(WalletError::ValidationError(
            "Wallet address is required".to_string(),
        ));
    }
    validator.validate_address(&fields.address)?;

    let amount = validator.validate_amount(&fields.amount)?;
    if amount > selection.available {
        return Err(WalletError::InsufficientFunds {
            requested: amount.as_string(),
            available: selection.available.as_string(),
        });
    }

    Ok(())
}

fn clear_details(fields: &mut WithdrawFields) {
    fields.address.clear();
    fields.amount.clear();
}

fn keep(_fields: &mut WithdrawFields) {}

static WITHDRAW_STEPS: [StepDef<WithdrawFields>; 3] = [
    StepDef {
        name: "SelectCurrency",
        validate: require_selection,
        clear: keep,
    },
    StepDef {
        name: "DetailsEntry",
        validate: validate_details,
        clear: clear_details,
    },
    StepDef::passthrough("PinConfirmation"),
];

/// The withdraw dialog: currency selection, details entry with quick-fill and
/// address-book lookup, PIN confirmation, simulated submission.
///
/// Closing the dialog at any step resets every field; no draft is retained.
pub struct WithdrawFlow {
    engine: WizardEngine<WithdrawFields>,
    pin: PinChallenge,
    address_book_open: bool,
}

impl WithdrawFlow {
    pub fn new() -> Self {
        Self {
            engine: WizardEngine::new(&WITHDRAW_STEPS, WithdrawFields::default()),
            pin: PinChallenge::new(),
            address_book_open: false,
        }
    }

    pub fn step(&self) -> WithdrawStep {
        match self.engine.step_index() {
            0 => WithdrawStep::SelectCurrency,
            1 => WithdrawStep::DetailsEntry,
            _ => WithdrawStep::PinConfirmation,
        }
    }

    pub fn fields(&self) -> &WithdrawFields {
        self.engine.fields()
    }

    /// Choose the asset to withdraw; choices are exhaustive so this advances
    /// straight to details entry.
    pub fn select_currency(
        &mut self,
        symbol: &str,
        catalog: &CurrencyCatalog,
    ) -> WalletResult<()> {
        if self.step() != WithdrawStep::SelectCurrency {
            return Err(WalletError::Unknown(
                "Currency already selected".to_string(),
            ));
        }

        let info = catalog.require(symbol)?;
        let selection = CurrencySelection {
            symbol: info.symbol.clone(),
            network: info.default_network(),
            available: info.reference_balance()?,
        };
        self.engine.update(|mut fields| {
            fields.selection = Some(selection);
            fields
        });
        self.engine.advance()
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        let address = address.into();
        self.engine.update(|mut fields| {
            fields.address = address;
            fields
        });
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        let amount = amount.into();
        self.engine.update(|mut fields| {
            fields.amount = amount;
            fields
        });
    }

    /// Amount shortcuts; a no-op until a currency is selected.
    pub fn quick_fill(&mut self, fill: QuickFill) {
        let Some(available) = self.fields().selection.as_ref().map(|s| s.available) else {
            return;
        };
        let amount = match fill {
            QuickFill::Half => available.halved().as_string(),
            QuickFill::All => available.as_string(),
            QuickFill::Clear => String::new(),
        };
        self.set_amount(amount);
    }

    /// Open the address-book sub-dialog. The current step is suspended; no
    /// entered data is discarded.
    pub fn open_address_book(&mut self) {
        self.address_book_open = true;
    }

    pub fn close_address_book(&mut self) {
        self.address_book_open = false;
    }

    pub fn is_address_book_open(&self) -> bool {
        self.address_book_open
    }

    /// Fill the address from an address-book selection and close the book.
    pub fn choose_address(&mut self, address: impl Into<String>) {
        self.set_address(address);
        self.address_book_open = false;
    }

    /// Validate the details and move to PIN confirmation. On failure the
    /// wizard stays in details entry with no field cleared.
    pub fn submit(&mut self) -> WalletResult<()> {
        if self.step() != WithdrawStep::DetailsEntry {
            return Err(WalletError::Unknown(
                "Nothing to submit at this step".to_string(),
            ));
        }
        self.engine.advance()?;
        self.pin = PinChallenge::new();
        Ok(())
    }

    pub fn pin_phase(&self) -> PinPhase {
        PinPhase::Verify
    }

    pub fn pin(&self) -> &PinChallenge {
        &self.pin
    }

    pub fn pin_press(&mut self, digit: u8) -> WalletResult<()> {
        self.pin.press_digit(digit)
    }

    pub fn pin_delete(&mut self) {
        self.pin.delete_last();
    }

    pub fn pin_clear(&mut self) {
        self.pin.clear();
    }

    /// Confirm the entered PIN and submit the withdrawal. On success the
    /// flow reaches its terminal state: a notification is returned and every
    /// field resets to initial.
    pub async fn confirm_pin(
        &mut self,
        backend: &SimulatedBackend,
    ) -> WalletResult<Notification> {
        if self.step() != WithdrawStep::PinConfirmation {
            return Err(WalletError::Unknown(
                "No PIN confirmation is pending".to_string(),
            ));
        }

        let code = self.pin.code()?;
        backend.verify_pin(&code).await?;

        let fields = self.engine.fields();
        let selection = fields
            .selection
            .as_ref()
            .ok_or_else(|| WalletError::Unknown("Currency selection lost".to_string()))?;
        let request = WithdrawalRequest {
            currency: selection.symbol.clone(),
            network: selection.network,
            address: fields.address.clone(),
            amount: Amount::from_string(&fields.amount)?,
        };
        backend.submit_withdrawal(&request).await?;

        self.close();
        Ok(Notification::success(
            "Request accepted",
            "Your withdrawal is being processed",
        ))
    }

    /// Step backward; leaving PIN confirmation discards the entered digits.
    pub fn back(&mut self) {
        if self.step() == WithdrawStep::PinConfirmation {
            self.pin.clear();
        }
        self.engine.back();
    }

    /// Reset everything to initial; called on dialog close and completion.
    pub fn close(&mut self) {
        self.engine.reset();
        self.pin = PinChallenge::new();
        self.address_book_open = false;
    }
}

impl Default for WithdrawFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyInfo;
    use std::time::Duration;

    fn catalog() -> CurrencyCatalog {
        CurrencyCatalog::seeded()
    }

    fn backend() -> SimulatedBackend {
        SimulatedBackend::new(Duration::ZERO, Duration::from_secs(5))
    }

    const ADDRESS: &str = "TQn9Y2khEsLJW1ChVWFMSMeRDow5KcbLSE";

    fn flow_at_details(symbol: &str) -> WithdrawFlow {
        let mut flow = WithdrawFlow::new();
        flow.select_currency(symbol, &catalog()).unwrap();
        flow
    }

    #[test]
    fn selecting_a_currency_advances_and_captures_availability() {
        let flow = flow_at_details("USDT");
        assert_eq!(flow.step(), WithdrawStep::DetailsEntry);

        let selection = flow.fields().selection.as_ref().unwrap();
        assert_eq!(selection.symbol, "USDT");
        assert_eq!(selection.network, Network::Trc20);
        // 1250 USDT x 90 in the reference currency
        assert_eq!(selection.available, Amount::from_whole(112_500).unwrap());
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let mut flow = WithdrawFlow::new();
        assert!(matches!(
            flow.select_currency("DOGE", &catalog()),
            Err(WalletError::NotFound(_))
        ));
        assert_eq!(flow.step(), WithdrawStep::SelectCurrency);
    }

    #[test]
    fn submit_requires_address_then_amount_then_funds() {
        let mut flow = flow_at_details("USDT");

        let err = flow.submit().unwrap_err();
        assert!(matches!(err, WalletError::ValidationError(_)));

        flow.set_address(ADDRESS);
        let err = flow.submit().unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount(_)));

        flow.set_amount("150000");
        let err = flow.submit().unwrap_err();
        assert!(matches!(err, WalletError::InsufficientFunds { .. }));

        // Every failure kept the wizard in details entry with fields intact
        assert_eq!(flow.step(), WithdrawStep::DetailsEntry);
        assert_eq!(flow.fields().address, ADDRESS);
        assert_eq!(flow.fields().amount, "150000");
    }

    #[test]
    fn quick_fill_all_never_exceeds_available() {
        let mut flow = flow_at_details("USDT");
        flow.set_address(ADDRESS);
        flow.quick_fill(QuickFill::All);
        assert!(flow.submit().is_ok());
        assert_eq!(flow.step(), WithdrawStep::PinConfirmation);
    }

    #[test]
    fn quick_fill_half_and_clear() {
        let mut flow = flow_at_details("USDT");
        flow.quick_fill(QuickFill::Half);
        assert_eq!(flow.fields().amount, "56250");
        flow.quick_fill(QuickFill::Clear);
        assert_eq!(flow.fields().amount, "");
    }

    #[test]
    fn quick_fill_is_noop_before_selection() {
        let mut flow = WithdrawFlow::new();
        flow.quick_fill(QuickFill::All);
        assert_eq!(flow.fields().amount, "");
    }

    #[test]
    fn address_book_suspends_without_discarding() {
        let mut flow = flow_at_details("USDT");
        flow.set_amount("100");
        flow.open_address_book();
        assert!(flow.is_address_book_open());
        assert_eq!(flow.fields().amount, "100");

        flow.choose_address(ADDRESS);
        assert!(!flow.is_address_book_open());
        assert_eq!(flow.fields().address, ADDRESS);
        assert_eq!(flow.fields().amount, "100");
    }

    #[test]
    fn back_from_details_clears_forward_fields() {
        let mut flow = flow_at_details("USDT");
        flow.set_address(ADDRESS);
        flow.set_amount("100");
        flow.back();
        assert_eq!(flow.step(), WithdrawStep::SelectCurrency);
        assert_eq!(flow.fields().address, "");
        assert_eq!(flow.fields().amount, "");
    }

    #[tokio::test]
    async fn incomplete_pin_never_confirms() {
        let mut flow = flow_at_details("USDT");
        flow.set_address(ADDRESS);
        flow.set_amount("100");
        flow.submit().unwrap();

        for digit in [1, 2, 3] {
            flow.pin_press(digit).unwrap();
            let err = flow.confirm_pin(&backend()).await.unwrap_err();
            assert_eq!(err, WalletError::IncompletePin);
        }
        assert_eq!(flow.step(), WithdrawStep::PinConfirmation);
    }

    #[tokio::test]
    async fn full_withdrawal_completes_and_resets() {
        let mut flow = WithdrawFlow::new();
        let custom = CurrencyCatalog::new(vec![CurrencyInfo::new(
            "USDT",
            "Tether",
            "150000",
            "1",
            vec![Network::Trc20],
        )
        .unwrap()])
        .unwrap();

        flow.select_currency("USDT", &custom).unwrap();
        flow.set_address(ADDRESS);
        flow.set_amount("50000");
        flow.submit().unwrap();

        for digit in [1, 2, 3, 4] {
            flow.pin_press(digit).unwrap();
        }
        let notification = flow.confirm_pin(&backend()).await.unwrap();
        assert_eq!(notification.title, "Request accepted");

        // Terminal state resets the whole wizard
        assert_eq!(flow.step(), WithdrawStep::SelectCurrency);
        assert_eq!(flow.fields(), &WithdrawFields::default());
        assert_eq!(flow.pin().filled(), 0);
    }

    #[test]
    fn close_resets_at_any_step() {
        let mut flow = flow_at_details("BTC");
        flow.set_address(ADDRESS);
        flow.set_amount("1");
        flow.open_address_book();

        flow.close();
        assert_eq!(flow.step(), WithdrawStep::SelectCurrency);
        assert_eq!(flow.fields(), &WithdrawFields::default());
        assert!(!flow.is_address_book_open());
    }
}
