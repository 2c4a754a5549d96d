//! Domain-level command and result types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the DTOs from the
//! `shared` crate to these internal types.

pub mod birthdays {
    use super::super::models::Birthday;

    /// Unvalidated birthday fields as submitted by the caller.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct BirthdayInput {
        pub utaite_name: String,
        pub birthday_date: String,
        pub twitter_link: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct CreateBirthdayCommand {
        pub input: BirthdayInput,
    }

    #[derive(Debug, Clone)]
    pub struct UpdateBirthdayCommand {
        pub id: String,
        pub input: BirthdayInput,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteBirthdayCommand {
        pub id: String,
    }

    /// Result of a create or update.
    #[derive(Debug, Clone)]
    pub struct BirthdayResult {
        pub birthday: Birthday,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteBirthdayResult {
        pub deleted_id: String,
        pub success_message: String,
    }
}
