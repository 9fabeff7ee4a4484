//! Required-field validation
//!
//! The verdict is a two-state machine ([`ValidationState`]). A fresh
//! controller is always `Valid`: the verdict only changes when it is
//! evaluated, either through an explicit [`ValidationController::validate`]
//! or, in auto-validate mode, at the render tick following a list mutation.

/// Observable validation verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValidationState {
    /// No failed evaluation (initial state)
    #[default]
    Valid,
    /// Last evaluation found a required list empty
    Invalid,
}

impl ValidationState {
    /// Verdict for a list given whether it is required
    #[inline]
    #[must_use]
    pub fn evaluate(required: bool, list_is_empty: bool) -> Self {
        if required && list_is_empty {
            Self::Invalid
        } else {
            Self::Valid
        }
    }

    /// Check if this is the invalid state
    #[inline]
    #[must_use]
    pub fn is_invalid(self) -> bool {
        matches!(self, Self::Invalid)
    }
}

/// Computes and holds the `invalid` verdict
#[derive(Debug, Clone, Default)]
pub struct ValidationController {
    required: bool,
    auto_validate: bool,
    state: ValidationState,
    /// Evaluation requested by a mutation, waiting for the next tick
    scheduled: bool,
}

impl ValidationController {
    /// Create a controller in the `Valid` state
    #[inline]
    #[must_use]
    pub fn new(required: bool, auto_validate: bool) -> Self {
        Self {
            required,
            auto_validate,
            ..Self::default()
        }
    }

    /// Whether an empty list fails validation
    #[inline]
    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// Set whether an empty list fails validation
    ///
    /// Does not re-evaluate.
    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// Whether list mutations schedule an evaluation
    #[inline]
    #[must_use]
    pub fn auto_validate(&self) -> bool {
        self.auto_validate
    }

    /// Enable or disable auto-validation
    ///
    /// Disabling drops an evaluation that is still waiting for its tick.
    pub fn set_auto_validate(&mut self, auto_validate: bool) {
        self.auto_validate = auto_validate;
        if !auto_validate {
            self.scheduled = false;
        }
    }

    /// Current verdict
    #[inline]
    #[must_use]
    pub fn state(&self) -> ValidationState {
        self.state
    }

    /// Current verdict as a flag
    #[inline]
    #[must_use]
    pub fn invalid(&self) -> bool {
        self.state.is_invalid()
    }

    /// Whether an evaluation is waiting for the next tick
    #[inline]
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Evaluate now, returning `true` when the list is valid
    ///
    /// Any scheduled evaluation is satisfied by this one.
    pub fn validate(&mut self, list_is_empty: bool) -> bool {
        self.scheduled = false;
        self.state = ValidationState::evaluate(self.required, list_is_empty);
        !self.state.is_invalid()
    }

    /// Note a list mutation
    ///
    /// Schedules an evaluation in auto-validate mode; otherwise the verdict
    /// is left for the next explicit `validate`. Returns whether anything
    /// was scheduled.
    pub fn on_mutation(&mut self) -> bool {
        if self.auto_validate {
            self.scheduled = true;
        }
        self.scheduled
    }

    /// Run the scheduled evaluation, if any
    ///
    /// Returns the new verdict when an evaluation ran.
    pub fn flush(&mut self, list_is_empty: bool) -> Option<ValidationState> {
        if !self.scheduled {
            return None;
        }
        self.validate(list_is_empty);
        Some(self.state)
    }
}
