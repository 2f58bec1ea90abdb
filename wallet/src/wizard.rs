//! Generic step engine shared by the transaction wizards.
//!
//! Deposit, Withdraw, and Exchange are instances of one engine driven by a
//! step-definition table. The engine holds a single snapshot of the flow's
//! fields, replaced wholesale on every transition, so "reset on close" is
//! exactly "replace with the initial constant".

use crate::errors::{WalletError, WalletResult};

/// One row of a flow's step table.
pub struct StepDef<F> {
    pub name: &'static str,
    /// Gate for advancing out of this step
    pub validate: fn(&F) -> WalletResult<()>,
    /// Clears the fields owned by this step; run when stepping back over it
    pub clear: fn(&mut F),
}

fn accept<F>(_fields: &F) -> WalletResult<()> {
    Ok(())
}

fn keep<F>(_fields: &mut F) {}

impl<F> StepDef<F> {
    /// A step with no gate and no owned fields.
    pub const fn passthrough(name: &'static str) -> Self {
        Self {
            name,
            validate: accept::<F>,
            clear: keep::<F>,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot<F> {
    step: usize,
    fields: F,
}

/// Linear wizard over a static step table.
pub struct WizardEngine<F: Clone + 'static> {
    steps: &'static [StepDef<F>],
    initial: F,
    snapshot: Snapshot<F>,
}

impl<F: Clone> WizardEngine<F> {
    pub fn new(steps: &'static [StepDef<F>], initial: F) -> Self {
        assert!(!steps.is_empty(), "wizard requires at least one step");
        let snapshot = Snapshot {
            step: 0,
            fields: initial.clone(),
        };
        Self {
            steps,
            initial,
            snapshot,
        }
    }

    pub fn step_index(&self) -> usize {
        self.snapshot.step
    }

    pub fn step_name(&self) -> &'static str {
        self.steps[self.snapshot.step].name
    }

    pub fn is_first_step(&self) -> bool {
        self.snapshot.step == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.snapshot.step + 1 == self.steps.len()
    }

    pub fn fields(&self) -> &F {
        &self.snapshot.fields
    }

    /// Replace the snapshot's fields wholesale.
    pub fn update(&mut self, edit: impl FnOnce(F) -> F) {
        let fields = edit(self.snapshot.fields.clone());
        self.snapshot = Snapshot {
            step: self.snapshot.step,
            fields,
        };
    }

    /// Run the current step's gate without moving.
    pub fn validate_current(&self) -> WalletResult<()> {
        (self.steps[self.snapshot.step].validate)(&self.snapshot.fields)
    }

    /// Validate the current step and move forward. On error the snapshot is
    /// left untouched.
    pub fn advance(&mut self) -> WalletResult<()> {
        if self.is_last_step() {
            return Err(WalletError::Unknown(format!(
                "Cannot advance past terminal step {}",
                self.step_name()
            )));
        }
        self.validate_current()?;
        self.snapshot = Snapshot {
            step: self.snapshot.step + 1,
            fields: self.snapshot.fields.clone(),
        };
        Ok(())
    }

    /// Step backward, clearing the fields owned by the abandoned step.
    /// Always allowed; no-op at the first step.
    pub fn back(&mut self) {
        if self.snapshot.step == 0 {
            return;
        }
        let mut fields = self.snapshot.fields.clone();
        (self.steps[self.snapshot.step].clear)(&mut fields);
        self.snapshot = Snapshot {
            step: self.snapshot.step - 1,
            fields,
        };
    }

    /// Restore the initial step and fields.
    pub fn reset(&mut self) {
        self.snapshot = Snapshot {
            step: 0,
            fields: self.initial.clone(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct Fields {
        choice: Option<String>,
        note: String,
    }

    fn require_choice(fields: &Fields) -> WalletResult<()> {
        if fields.choice.is_none() {
            return Err(WalletError::ValidationError("choice required".to_string()));
        }
        Ok(())
    }

    fn clear_note(fields: &mut Fields) {
        fields.note.clear();
    }

    static STEPS: [StepDef<Fields>; 3] = [
        StepDef {
            name: "Choose",
            validate: require_choice,
            clear: super::keep::<Fields>,
        },
        StepDef {
            name: "Annotate",
            validate: super::accept::<Fields>,
            clear: clear_note,
        },
        StepDef::passthrough("Done"),
    ];

    fn engine() -> WizardEngine<Fields> {
        WizardEngine::new(&STEPS, Fields::default())
    }

    #[test]
    fn advance_is_gated_by_the_current_step() {
        let mut wizard = engine();
        assert!(wizard.advance().is_err());
        assert_eq!(wizard.step_name(), "Choose");

        wizard.update(|mut f| {
            f.choice = Some("BTC".to_string());
            f
        });
        wizard.advance().unwrap();
        assert_eq!(wizard.step_name(), "Annotate");
    }

    #[test]
    fn back_clears_fields_owned_by_the_abandoned_step() {
        let mut wizard = engine();
        wizard.update(|mut f| {
            f.choice = Some("BTC".to_string());
            f
        });
        wizard.advance().unwrap();
        wizard.update(|mut f| {
            f.note = "draft".to_string();
            f
        });

        wizard.back();
        assert_eq!(wizard.step_name(), "Choose");
        assert_eq!(wizard.fields().note, "");
        // Fields owned by earlier steps survive
        assert_eq!(wizard.fields().choice.as_deref(), Some("BTC"));

        wizard.back(); // no-op at the first step
        assert_eq!(wizard.step_index(), 0);
    }

    #[test]
    fn reset_restores_the_initial_snapshot() {
        let mut wizard = engine();
        wizard.update(|mut f| {
            f.choice = Some("ETH".to_string());
            f.note = "scratch".to_string();
            f
        });
        wizard.advance().unwrap();

        wizard.reset();
        assert_eq!(wizard.step_index(), 0);
        assert_eq!(wizard.fields(), &Fields::default());
    }

    #[test]
    fn failed_advance_leaves_the_snapshot_untouched() {
        let mut wizard = engine();
        wizard.update(|mut f| {
            f.note = "kept".to_string();
            f
        });
        assert!(wizard.advance().is_err());
        assert_eq!(wizard.fields().note, "kept");
        assert_eq!(wizard.step_index(), 0);
    }

    #[test]
    fn terminal_step_rejects_advance() {
        let mut wizard = engine();
        wizard.update(|mut f| {
            f.choice = Some("BTC".to_string());
            f
        });
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        assert!(wizard.is_last_step());
        assert!(wizard.advance().is_err());
    }
}
