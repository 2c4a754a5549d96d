use std::sync::Arc;
use tracing::{info, warn};

use super::commands::birthdays::{
    BirthdayResult, CreateBirthdayCommand, DeleteBirthdayCommand, DeleteBirthdayResult, UpdateBirthdayCommand,
};
use super::models::Birthday;
use super::validation::{validate_birthday_input, FieldErrors};
use crate::storage::BirthdayStorage;

pub const CREATED_MESSAGE: &str = "Birthday created successfully";
pub const UPDATED_MESSAGE: &str = "Birthday updated successfully";
pub const DELETED_MESSAGE: &str = "Birthday deleted successfully";

/// Everything that can go wrong in a birthday operation
#[derive(Debug, thiserror::Error)]
pub enum BirthdayError {
    /// Input broke a field rule; storage was not touched
    #[error("Invalid birthday fields: {0}")]
    Validation(FieldErrors),
    #[error("Birthday not found: {0}")]
    NotFound(String),
    /// The repository could not be read or written
    #[error("Birthday storage failed: {0:#}")]
    Transport(#[from] anyhow::Error),
}

/// Service for reading and mutating birthday records
#[derive(Clone)]
pub struct BirthdayService {
    repository: Arc<dyn BirthdayStorage>,
}

impl BirthdayService {
    pub fn new(repository: Arc<dyn BirthdayStorage>) -> Self {
        Self { repository }
    }

    /// Full snapshot of all birthdays
    pub async fn list_birthdays(&self) -> Result<Vec<Birthday>, BirthdayError> {
        let birthdays = self.repository.list_birthdays().await?;
        info!("Found {} birthdays", birthdays.len());
        Ok(birthdays)
    }

    pub async fn get_birthday(&self, id: &str) -> Result<Birthday, BirthdayError> {
        match self.repository.get_birthday(id).await? {
            Some(birthday) => Ok(birthday),
            None => {
                warn!("Birthday not found: {}", id);
                Err(BirthdayError::NotFound(id.to_string()))
            }
        }
    }

    pub async fn create_birthday(&self, command: CreateBirthdayCommand) -> Result<BirthdayResult, BirthdayError> {
        info!("Creating birthday: name={:?}, date={:?}", command.input.utaite_name, command.input.birthday_date);

        let fields = validate_birthday_input(&command.input).map_err(|errors| {
            info!("Rejected new birthday: {}", errors);
            BirthdayError::Validation(errors)
        })?;

        let birthday = self.repository.create_birthday(&fields).await?;

        info!("Created birthday: {} with ID: {}", birthday.utaite_name, birthday.id);
        Ok(BirthdayResult {
            birthday,
            success_message: CREATED_MESSAGE.to_string(),
        })
    }

    /// Replace the editable fields of an existing birthday.
    ///
    /// A missing id is reported as `NotFound` even when the input is also invalid.
    pub async fn update_birthday(&self, command: UpdateBirthdayCommand) -> Result<BirthdayResult, BirthdayError> {
        info!("Updating birthday: {}", command.id);

        if self.repository.get_birthday(&command.id).await?.is_none() {
            warn!("Birthday not found: {}", command.id);
            return Err(BirthdayError::NotFound(command.id));
        }

        let fields = validate_birthday_input(&command.input).map_err(|errors| {
            info!("Rejected update for {}: {}", command.id, errors);
            BirthdayError::Validation(errors)
        })?;

        // The record may have been deleted since the lookup above
        let birthday = self
            .repository
            .update_birthday(&command.id, &fields)
            .await?
            .ok_or_else(|| BirthdayError::NotFound(command.id.clone()))?;

        info!("Updated birthday: {} with ID: {}", birthday.utaite_name, birthday.id);
        Ok(BirthdayResult {
            birthday,
            success_message: UPDATED_MESSAGE.to_string(),
        })
    }

    pub async fn delete_birthday(&self, command: DeleteBirthdayCommand) -> Result<DeleteBirthdayResult, BirthdayError> {
        info!("Deleting birthday: {}", command.id);

        if !self.repository.delete_birthday(&command.id).await? {
            warn!("Birthday not found: {}", command.id);
            return Err(BirthdayError::NotFound(command.id));
        }

        info!("Deleted birthday with ID: {}", command.id);
        Ok(DeleteBirthdayResult {
            deleted_id: command.id,
            success_message: DELETED_MESSAGE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::birthdays::BirthdayInput;
    use crate::domain::models::BirthdayFields;
    use crate::domain::validation::{FIELD_BIRTHDAY_DATE, FIELD_UTAITE_NAME};
    use crate::storage::csv::test_utils::TestEnvironment;
    use async_trait::async_trait;

    fn input(name: &str, date: &str, link: Option<&str>) -> BirthdayInput {
        BirthdayInput {
            utaite_name: name.to_string(),
            birthday_date: date.to_string(),
            twitter_link: link.map(str::to_string),
        }
    }

    async fn setup_test() -> (TestEnvironment, BirthdayService) {
        let env = TestEnvironment::new().await.expect("Failed to create test environment");
        let service = BirthdayService::new(env.repository());
        (env, service)
    }

    #[tokio::test]
    async fn test_create_then_list_round_trip() {
        let (_env, service) = setup_test().await;

        let result = service
            .create_birthday(CreateBirthdayCommand {
                input: input("Mafumafu", "1989-11-19", Some("https://twitter.com/uni_mafumafu")),
            })
            .await
            .expect("Failed to create birthday");
        assert_eq!(result.success_message, "Birthday created successfully");

        let listed = service.list_birthdays().await.unwrap();
        assert_eq!(listed.len(), 1);
        let stored = &listed[0];
        assert_eq!(stored.id, result.birthday.id);
        assert_eq!(stored.utaite_name, "Mafumafu");
        assert_eq!(stored.birthday_date.as_str(), "1989-11-19");
        assert_eq!(stored.twitter_link.as_deref(), Some("https://twitter.com/uni_mafumafu"));
    }

    #[tokio::test]
    async fn test_create_with_empty_name_does_not_write() {
        let (_env, service) = setup_test().await;

        let err = service
            .create_birthday(CreateBirthdayCommand { input: input("", "04-10", None) })
            .await
            .unwrap_err();

        match err {
            BirthdayError::Validation(errors) => {
                assert_eq!(errors.get(FIELD_UTAITE_NAME), Some("Name is required."));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(service.list_birthdays().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_preserves_id_and_created_at() {
        let (_env, service) = setup_test().await;
        let created = service
            .create_birthday(CreateBirthdayCommand { input: input("Soraru", "07-21", None) })
            .await
            .unwrap()
            .birthday;

        let updated = service
            .update_birthday(UpdateBirthdayCommand {
                id: created.id.clone(),
                input: input("Soraru", "1988-07-21", Some("https://twitter.com/soraruru")),
            })
            .await
            .unwrap();

        assert_eq!(updated.success_message, "Birthday updated successfully");
        let fetched = service.get_birthday(&created.id).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.created_at, created.created_at);
        assert_eq!(fetched.birthday_date.as_str(), "1988-07-21");
        assert_eq!(fetched.twitter_link.as_deref(), Some("https://twitter.com/soraruru"));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found_even_with_invalid_input() {
        let (_env, service) = setup_test().await;

        let err = service
            .update_birthday(UpdateBirthdayCommand {
                id: "missing-id".to_string(),
                input: input("Valid Name", "04-10", None),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BirthdayError::NotFound(ref id) if id == "missing-id"));

        let err = service
            .update_birthday(UpdateBirthdayCommand {
                id: "missing-id".to_string(),
                input: input("", "nope", None),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BirthdayError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_with_invalid_input_leaves_record() {
        let (_env, service) = setup_test().await;
        let created = service
            .create_birthday(CreateBirthdayCommand { input: input("Eve", "05-23", None) })
            .await
            .unwrap()
            .birthday;

        let err = service
            .update_birthday(UpdateBirthdayCommand {
                id: created.id.clone(),
                input: input("Eve", "May 23", None),
            })
            .await
            .unwrap_err();
        match err {
            BirthdayError::Validation(errors) => assert!(errors.get(FIELD_BIRTHDAY_DATE).is_some()),
            other => panic!("expected validation error, got {:?}", other),
        }

        let fetched = service.get_birthday(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_delete() {
        let (_env, service) = setup_test().await;
        let created = service
            .create_birthday(CreateBirthdayCommand { input: input("Eve", "05-23", None) })
            .await
            .unwrap()
            .birthday;

        let result = service
            .delete_birthday(DeleteBirthdayCommand { id: created.id.clone() })
            .await
            .unwrap();
        assert_eq!(result.deleted_id, created.id);
        assert_eq!(result.success_message, "Birthday deleted successfully");

        assert!(service.list_birthdays().await.unwrap().is_empty());
        assert!(matches!(
            service.get_birthday(&created.id).await,
            Err(BirthdayError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let (_env, service) = setup_test().await;
        let err = service
            .delete_birthday(DeleteBirthdayCommand { id: "missing-id".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, BirthdayError::NotFound(_)));
    }

    struct UnreachableStorage;

    #[async_trait]
    impl BirthdayStorage for UnreachableStorage {
        async fn list_birthdays(&self) -> anyhow::Result<Vec<Birthday>> {
            anyhow::bail!("disk unavailable")
        }

        async fn get_birthday(&self, _id: &str) -> anyhow::Result<Option<Birthday>> {
            anyhow::bail!("disk unavailable")
        }

        async fn create_birthday(&self, _fields: &BirthdayFields) -> anyhow::Result<Birthday> {
            anyhow::bail!("disk unavailable")
        }

        async fn update_birthday(&self, _id: &str, _fields: &BirthdayFields) -> anyhow::Result<Option<Birthday>> {
            anyhow::bail!("disk unavailable")
        }

        async fn delete_birthday(&self, _id: &str) -> anyhow::Result<bool> {
            anyhow::bail!("disk unavailable")
        }
    }

    #[tokio::test]
    async fn test_storage_failures_are_transport_errors() {
        let service = BirthdayService::new(Arc::new(UnreachableStorage));

        assert!(matches!(service.list_birthdays().await, Err(BirthdayError::Transport(_))));
        let err = service
            .create_birthday(CreateBirthdayCommand { input: input("Eve", "05-23", None) })
            .await
            .unwrap_err();
        assert!(matches!(err, BirthdayError::Transport(_)));
    }

    #[tokio::test]
    async fn test_validation_runs_before_storage() {
        let service = BirthdayService::new(Arc::new(UnreachableStorage));
        let err = service
            .create_birthday(CreateBirthdayCommand { input: input("", "04-10", None) })
            .await
            .unwrap_err();
        assert!(matches!(err, BirthdayError::Validation(_)));
    }
}
