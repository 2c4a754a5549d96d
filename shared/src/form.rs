//! Caller-side state for birthday mutations.
//!
//! Every create, update or delete goes `idle → submitting → (succeeded | failed)`.
//! A second submit while one is in flight is refused, which is what keeps a
//! double click from creating the same birthday twice. Delete adds a
//! confirmation step in front of `submitting`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{BirthdayPayload, BirthdayRecord, MutationResponse};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// Raw text currently typed into the birthday form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BirthdayFormValues {
    pub utaite_name: String,
    pub birthday_date: String,
    pub twitter_link: String,
}

impl BirthdayFormValues {
    pub fn from_record(record: &BirthdayRecord) -> Self {
        Self {
            utaite_name: record.utaite_name.clone(),
            birthday_date: record.birthday_date.clone(),
            twitter_link: record.twitter_link.clone().unwrap_or_default(),
        }
    }

    pub fn to_payload(&self) -> BirthdayPayload {
        let twitter_link = if self.twitter_link.trim().is_empty() {
            None
        } else {
            Some(self.twitter_link.clone())
        };
        BirthdayPayload {
            utaite_name: self.utaite_name.clone(),
            birthday_date: self.birthday_date.clone(),
            twitter_link,
        }
    }
}

/// A request the caller should now send
#[derive(Debug, Clone, PartialEq)]
pub enum PendingSubmission {
    Create(BirthdayPayload),
    Update { id: String, payload: BirthdayPayload },
}

/// What the caller should do once a mutation has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationEffect {
    /// Re-fetch the snapshot; the create form has been cleared
    RefreshAndResetForm,
    /// Re-fetch the snapshot and close the edit surface
    RefreshAndCloseForm,
    /// Re-fetch the snapshot (delete)
    RefreshSnapshot,
    /// Leave everything as typed and show `message` / field errors
    ShowErrors,
    /// No submission was in flight; the response is stale
    Ignored,
}

/// State of the add/edit birthday form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthdayFormState {
    pub mode: FormMode,
    pub values: BirthdayFormValues,
    pub phase: SubmissionPhase,
    pub message: Option<String>,
    pub field_errors: BTreeMap<String, String>,
}

impl BirthdayFormState {
    pub fn for_create() -> Self {
        Self {
            mode: FormMode::Create,
            values: BirthdayFormValues::default(),
            phase: SubmissionPhase::Idle,
            message: None,
            field_errors: BTreeMap::new(),
        }
    }

    pub fn for_edit(record: &BirthdayRecord) -> Self {
        Self {
            mode: FormMode::Edit { id: record.id.clone() },
            values: BirthdayFormValues::from_record(record),
            phase: SubmissionPhase::Idle,
            message: None,
            field_errors: BTreeMap::new(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    /// Submit button label, matching the disabled state
    pub fn submit_label(&self) -> &'static str {
        match (&self.mode, self.is_submitting()) {
            (_, true) => "Saving...",
            (FormMode::Create, false) => "Create Birthday",
            (FormMode::Edit { .. }, false) => "Save Changes",
        }
    }

    /// Move to `Submitting` and hand back the request to send.
    ///
    /// Returns `None` when a submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        if self.is_submitting() {
            return None;
        }
        self.phase = SubmissionPhase::Submitting;
        self.message = None;
        self.field_errors.clear();

        let payload = self.values.to_payload();
        Some(match &self.mode {
            FormMode::Create => PendingSubmission::Create(payload),
            FormMode::Edit { id } => PendingSubmission::Update { id: id.clone(), payload },
        })
    }

    /// Apply the gateway's answer to the in-flight submission
    pub fn complete(&mut self, response: &MutationResponse) -> MutationEffect {
        if !self.is_submitting() {
            return MutationEffect::Ignored;
        }
        self.message = Some(response.message.clone());

        if response.is_success() {
            self.phase = SubmissionPhase::Succeeded;
            self.field_errors.clear();
            match self.mode {
                FormMode::Create => {
                    self.values = BirthdayFormValues::default();
                    MutationEffect::RefreshAndResetForm
                }
                FormMode::Edit { .. } => MutationEffect::RefreshAndCloseForm,
            }
        } else {
            self.phase = SubmissionPhase::Failed;
            self.field_errors = response.field_errors.clone().unwrap_or_default();
            MutationEffect::ShowErrors
        }
    }

    /// Transport-level failure (no response body); values stay for a retry
    pub fn fail(&mut self, message: impl Into<String>) -> MutationEffect {
        if !self.is_submitting() {
            return MutationEffect::Ignored;
        }
        self.phase = SubmissionPhase::Failed;
        self.message = Some(message.into());
        MutationEffect::ShowErrors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteState {
    #[default]
    Idle,
    AwaitingConfirmation { id: String },
    Submitting { id: String },
    Succeeded { message: String },
    Failed { message: String },
}

/// Confirm-then-delete flow for a single row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFlow {
    pub state: DeleteState,
}

impl DeleteFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for confirmation before deleting `id`; ignored while a delete is in flight
    pub fn request(&mut self, id: impl Into<String>) {
        if !matches!(self.state, DeleteState::Submitting { .. }) {
            self.state = DeleteState::AwaitingConfirmation { id: id.into() };
        }
    }

    pub fn cancel(&mut self) {
        if matches!(self.state, DeleteState::AwaitingConfirmation { .. }) {
            self.state = DeleteState::Idle;
        }
    }

    /// Returns the id to delete, or `None` if nothing was awaiting confirmation
    pub fn confirm(&mut self) -> Option<String> {
        match std::mem::take(&mut self.state) {
            DeleteState::AwaitingConfirmation { id } => {
                self.state = DeleteState::Submitting { id: id.clone() };
                Some(id)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    pub fn complete(&mut self, response: &MutationResponse) -> MutationEffect {
        if !matches!(self.state, DeleteState::Submitting { .. }) {
            return MutationEffect::Ignored;
        }
        if response.is_success() {
            self.state = DeleteState::Succeeded { message: response.message.clone() };
            MutationEffect::RefreshSnapshot
        } else {
            self.state = DeleteState::Failed { message: response.message.clone() };
            MutationEffect::ShowErrors
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BirthdayRecord {
        BirthdayRecord {
            id: "b-1".to_string(),
            utaite_name: "Soraru".to_string(),
            birthday_date: "07-21".to_string(),
            twitter_link: None,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_second_submit_is_refused_while_in_flight() {
        let mut form = BirthdayFormState::for_create();
        form.values.utaite_name = "Mafumafu".to_string();
        form.values.birthday_date = "1989-11-19".to_string();

        let first = form.begin_submit();
        assert!(matches!(first, Some(PendingSubmission::Create(_))));
        assert_eq!(form.submit_label(), "Saving...");
        assert_eq!(form.begin_submit(), None);
    }

    #[test]
    fn test_create_success_resets_values() {
        let mut form = BirthdayFormState::for_create();
        form.values.utaite_name = "Mafumafu".to_string();
        form.begin_submit();

        let effect = form.complete(&MutationResponse::success("Birthday created successfully", None));
        assert_eq!(effect, MutationEffect::RefreshAndResetForm);
        assert_eq!(form.values, BirthdayFormValues::default());
        assert_eq!(form.phase, SubmissionPhase::Succeeded);
        assert!(form.begin_submit().is_some());
    }

    #[test]
    fn test_failure_keeps_values_and_field_errors() {
        let mut form = BirthdayFormState::for_create();
        form.values.birthday_date = "April 10".to_string();
        form.begin_submit();

        let mut errors = BTreeMap::new();
        errors.insert("utaiteName".to_string(), "Name is required.".to_string());
        let effect = form.complete(&MutationResponse::validation_failure("Invalid fields", errors));

        assert_eq!(effect, MutationEffect::ShowErrors);
        assert_eq!(form.phase, SubmissionPhase::Failed);
        assert_eq!(form.values.birthday_date, "April 10");
        assert_eq!(form.field_errors.get("utaiteName").map(String::as_str), Some("Name is required."));
    }

    #[test]
    fn test_edit_submission_carries_id() {
        let mut form = BirthdayFormState::for_edit(&record());
        assert_eq!(form.submit_label(), "Save Changes");
        form.values.twitter_link = "https://twitter.com/soraruru".to_string();

        match form.begin_submit() {
            Some(PendingSubmission::Update { id, payload }) => {
                assert_eq!(id, "b-1");
                assert_eq!(payload.twitter_link.as_deref(), Some("https://twitter.com/soraruru"));
            }
            other => panic!("unexpected submission: {:?}", other),
        }

        let effect = form.complete(&MutationResponse::success("Birthday updated successfully", None));
        assert_eq!(effect, MutationEffect::RefreshAndCloseForm);
    }

    #[test]
    fn test_blank_twitter_link_becomes_absent() {
        let values = BirthdayFormValues {
            utaite_name: "Kashitaro Ito".to_string(),
            birthday_date: "03-03".to_string(),
            twitter_link: "   ".to_string(),
        };
        assert_eq!(values.to_payload().twitter_link, None);
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut form = BirthdayFormState::for_create();
        let effect = form.complete(&MutationResponse::success("Birthday created successfully", None));
        assert_eq!(effect, MutationEffect::Ignored);
        assert_eq!(form.phase, SubmissionPhase::Idle);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut flow = DeleteFlow::new();
        assert_eq!(flow.confirm(), None);

        flow.request("b-1");
        flow.cancel();
        assert_eq!(flow.state, DeleteState::Idle);

        flow.request("b-1");
        assert_eq!(flow.confirm(), Some("b-1".to_string()));
        assert_eq!(flow.confirm(), None);

        flow.request("b-2");
        assert_eq!(flow.state, DeleteState::Submitting { id: "b-1".to_string() });

        let effect = flow.complete(&MutationResponse::success("Birthday deleted successfully", None));
        assert_eq!(effect, MutationEffect::RefreshSnapshot);
    }

    #[test]
    fn test_delete_failure_surfaces_message() {
        let mut flow = DeleteFlow::new();
        flow.request("gone");
        flow.confirm();
        let effect = flow.complete(&MutationResponse::failure("Birthday not found"));
        assert_eq!(effect, MutationEffect::ShowErrors);
        assert_eq!(flow.state, DeleteState::Failed { message: "Birthday not found".to_string() });
    }
}
