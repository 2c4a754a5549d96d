pub mod birthday;

pub use birthday::{Birthday, BirthdayDate, BirthdayDateError, BirthdayFields};
