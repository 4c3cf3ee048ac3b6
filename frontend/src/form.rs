//! Validate-then-submit state for record forms.
//!
//! `Editing -> begin_submit -> (Editing + field errors) | Submitting`
//! `Submitting -> finish_submit -> Closed | (Editing + submit error)`
//!
//! Validation only runs inside `begin_submit` and never touches the network.
//! While `Submitting`, further submit attempts are rejected.

use crate::validation::FieldErrors;

/// String-backed draft of a record, one entry per form input.
pub trait Draft: Clone + Default + PartialEq + 'static {
    fn field(&self, name: &str) -> &str;
    fn set_field(&mut self, name: &str, value: String);
}

/// Declares a draft struct whose fields are all `String` inputs.
#[macro_export]
macro_rules! draft {
    ($(#[$meta:meta])* $name:ident { $($field:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name {
            $(pub $field: String,)+
        }

        impl $crate::form::Draft for $name {
            fn field(&self, name: &str) -> &str {
                match name {
                    $(stringify!($field) => &self.$field,)+
                    _ => "",
                }
            }

            fn set_field(&mut self, name: &str, value: String) {
                match name {
                    $(stringify!($field) => self.$field = value,)+
                    _ => log::warn!("{} has no field `{}`", stringify!($name), name),
                }
            }
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Closed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitRejected {
    Busy,
    Invalid,
    Closed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormState<D: Draft> {
    draft: D,
    errors: FieldErrors,
    submit_error: Option<String>,
    phase: FormPhase,
}

impl<D: Draft> FormState<D> {
    pub fn new(draft: D) -> Self {
        Self {
            draft,
            errors: FieldErrors::new(),
            submit_error: None,
            phase: FormPhase::Editing,
        }
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Updates one input and clears that input's error only.
    pub fn edit(&mut self, field: &str, value: String) {
        if self.phase != FormPhase::Editing {
            return;
        }
        self.draft.set_field(field, value);
        self.errors.remove(field);
    }

    pub fn begin_submit<P>(
        &mut self,
        validate: impl FnOnce(&D) -> Result<P, FieldErrors>,
    ) -> Result<P, SubmitRejected> {
        match self.phase {
            FormPhase::Submitting => return Err(SubmitRejected::Busy),
            FormPhase::Closed => return Err(SubmitRejected::Closed),
            FormPhase::Editing => {}
        }
        match validate(&self.draft) {
            Ok(payload) => {
                self.errors = FieldErrors::new();
                self.submit_error = None;
                self.phase = FormPhase::Submitting;
                Ok(payload)
            }
            Err(errors) => {
                self.errors = errors;
                Err(SubmitRejected::Invalid)
            }
        }
    }

    pub fn finish_submit(&mut self, outcome: Result<(), String>) {
        if self.phase != FormPhase::Submitting {
            return;
        }
        match outcome {
            Ok(()) => self.phase = FormPhase::Closed,
            Err(message) => {
                self.submit_error = Some(message);
                self.phase = FormPhase::Editing;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{positive_amount, required};

    crate::draft!(NoteDraft { title, amount });

    fn validate(draft: &NoteDraft) -> Result<(String, f64), FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = required(&mut errors, "title", &draft.title);
        let amount = positive_amount(&mut errors, "amount", &draft.amount);
        errors.finish(|| (title, amount))
    }

    fn filled() -> NoteDraft {
        NoteDraft {
            title: "Obra".into(),
            amount: "10".into(),
        }
    }

    #[test]
    fn invalid_draft_stays_editing_with_errors() {
        let mut form = FormState::new(NoteDraft::default());
        assert_eq!(form.begin_submit(validate), Err(SubmitRejected::Invalid));
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.errors().len(), 2);
    }

    #[test]
    fn editing_clears_only_that_field() {
        let mut form = FormState::new(NoteDraft::default());
        let _ = form.begin_submit(validate);
        form.edit("title", "Praça".into());
        assert_eq!(form.errors().get("title"), None);
        assert!(form.errors().get("amount").is_some());
        assert_eq!(form.draft().field("title"), "Praça");
    }

    #[test]
    fn second_submit_while_busy_is_rejected() {
        let mut form = FormState::new(filled());
        assert_eq!(form.begin_submit(validate), Ok(("Obra".to_string(), 10.0)));
        assert!(form.is_busy());
        assert_eq!(form.begin_submit(validate), Err(SubmitRejected::Busy));
    }

    #[test]
    fn failure_returns_to_editing_and_keeps_draft() {
        let mut form = FormState::new(filled());
        let _ = form.begin_submit(validate);
        form.finish_submit(Err("Server unavailable".into()));
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.submit_error(), Some("Server unavailable"));
        assert_eq!(form.draft(), &filled());

        assert!(form.begin_submit(validate).is_ok());
        assert_eq!(form.submit_error(), None);
    }

    #[test]
    fn success_closes_form() {
        let mut form = FormState::new(filled());
        let _ = form.begin_submit(validate);
        form.finish_submit(Ok(()));
        assert_eq!(form.phase(), FormPhase::Closed);
        assert_eq!(form.begin_submit(validate), Err(SubmitRejected::Closed));
    }

    #[test]
    fn validation_depends_only_on_draft() {
        let mut first = FormState::new(NoteDraft {
            title: " ".into(),
            amount: "-1".into(),
        });
        let _ = first.begin_submit(validate);
        let _ = first.begin_submit(validate);

        let mut fresh = FormState::new(first.draft().clone());
        let _ = fresh.begin_submit(validate);
        assert_eq!(first.errors(), fresh.errors());
    }

    #[test]
    fn unknown_field_is_ignored() {
        let mut draft = filled();
        draft.set_field("missing", "x".into());
        assert_eq!(draft, filled());
        assert_eq!(draft.field("missing"), "");
    }
}
