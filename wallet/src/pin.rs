use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::backend::SimulatedBackend;
use crate::errors::{WalletError, WalletResult};

/// Number of digits in a wallet PIN code.
pub const PIN_LENGTH: usize = 4;

/// A fully entered PIN code.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PinCode([u8; PIN_LENGTH]);

impl PinCode {
    pub fn digits(&self) -> &[u8; PIN_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for PinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PinCode").field(&"<redacted>").finish()
    }
}

/// Keypad entry state: 0-4 filled digit slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinChallenge {
    digits: ArrayVec<u8, PIN_LENGTH>,
}

impl PinChallenge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the first empty slot; no-op once all slots are full.
    pub fn press_digit(&mut self, digit: u8) -> WalletResult<()> {
        if digit > 9 {
            return Err(WalletError::ValidationError(format!(
                "Not a decimal digit: {}",
                digit
            )));
        }
        if !self.digits.is_full() {
            self.digits.push(digit);
        }
        Ok(())
    }

    /// Clear the most recently filled slot; no-op when empty.
    pub fn delete_last(&mut self) {
        self.digits.pop();
    }

    /// Empty all slots.
    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn filled(&self) -> usize {
        self.digits.len()
    }

    pub fn is_complete(&self) -> bool {
        self.digits.is_full()
    }

    /// The entered code, or IncompletePin if any slot is empty.
    pub fn code(&self) -> WalletResult<PinCode> {
        let digits: [u8; PIN_LENGTH] = self
            .digits
            .as_slice()
            .try_into()
            .map_err(|_| WalletError::IncompletePin)?;
        Ok(PinCode(digits))
    }
}

/// Sub-state of the PIN dialog: verification of an existing code versus the
/// three-step process of changing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinPhase {
    Verify,
    OldPin,
    NewPin,
    ConfirmNewPin,
}

/// What a change-PIN confirmation step produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangePinProgress {
    AwaitingNewPin,
    AwaitingConfirmation,
    Completed,
}

/// The change-PIN dialog: old code, new code, confirmation.
///
/// Created when the dialog opens, destroyed on close or success. A
/// confirmation mismatch discards the captured new code and returns to the
/// NewPin phase with the entry cleared.
#[derive(Debug, Clone)]
pub struct ChangePinFlow {
    phase: PinPhase,
    entry: PinChallenge,
    captured_new: Option<PinCode>,
}

impl ChangePinFlow {
    pub fn new() -> Self {
        Self {
            phase: PinPhase::OldPin,
            entry: PinChallenge::new(),
            captured_new: None,
        }
    }

    pub fn phase(&self) -> PinPhase {
        self.phase
    }

    pub fn entry(&self) -> &PinChallenge {
        &self.entry
    }

    pub fn press_digit(&mut self, digit: u8) -> WalletResult<()> {
        self.entry.press_digit(digit)
    }

    pub fn delete_last(&mut self) {
        self.entry.delete_last();
    }

    pub fn clear_entry(&mut self) {
        self.entry.clear();
    }

    /// Advance the sub-protocol with the currently entered code.
    pub async fn confirm(
        &mut self,
        backend: &SimulatedBackend,
    ) -> WalletResult<ChangePinProgress> {
        let code = self.entry.code()?;

        match self.phase {
            PinPhase::OldPin => {
                backend.verify_pin(&code).await?;
                self.entry.clear();
                self.phase = PinPhase::NewPin;
                Ok(ChangePinProgress::AwaitingNewPin)
            }
            PinPhase::NewPin => {
                self.captured_new = Some(code);
                self.entry.clear();
                self.phase = PinPhase::ConfirmNewPin;
                Ok(ChangePinProgress::AwaitingConfirmation)
            }
            PinPhase::ConfirmNewPin => {
                if self.captured_new == Some(code) {
                    log::info!("PIN code changed");
                    Ok(ChangePinProgress::Completed)
                } else {
                    self.entry.clear();
                    self.captured_new = None;
                    self.phase = PinPhase::NewPin;
                    Err(WalletError::PinMismatch)
                }
            }
            PinPhase::Verify => Err(WalletError::Unknown(
                "Verify phase is not part of the change-PIN protocol".to_string(),
            )),
        }
    }
}

impl Default for ChangePinFlow {
    fn default() -> Self {
        Self::new()
    }
}
