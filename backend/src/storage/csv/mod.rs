pub mod birthday_repository;
pub mod connection;

#[cfg(test)]
pub mod test_utils;

pub use birthday_repository::CsvBirthdayRepository;
pub use connection::CsvConnection;
