use crate::domain::birthday_table::DerivedTable;
use crate::domain::commands::birthdays::{BirthdayInput, BirthdayResult};
use crate::domain::models::Birthday;
use shared::{BirthdayListResponse, BirthdayPayload, BirthdayRecord, BirthdayTableResponse, MutationResponse};

/// Mapper between shared birthday DTOs and domain birthdays.
pub struct BirthdayMapper;

impl BirthdayMapper {
    pub fn to_dto(domain: Birthday) -> BirthdayRecord {
        BirthdayRecord {
            id: domain.id,
            utaite_name: domain.utaite_name,
            birthday_date: domain.birthday_date.as_str().to_string(),
            twitter_link: domain.twitter_link,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    /// Request bodies stay unvalidated until the service checks them
    pub fn to_input(payload: BirthdayPayload) -> BirthdayInput {
        BirthdayInput {
            utaite_name: payload.utaite_name,
            birthday_date: payload.birthday_date,
            twitter_link: payload.twitter_link,
        }
    }

    pub fn to_list_response(birthdays: Vec<Birthday>) -> BirthdayListResponse {
        BirthdayListResponse {
            birthdays: birthdays.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_table_response(table: DerivedTable) -> BirthdayTableResponse {
        BirthdayTableResponse {
            rows: table.rows.into_iter().map(Self::to_dto).collect(),
            total_matched: table.total_matched,
            current_page: table.page.current_page(),
            rows_per_page: table.page.rows_per_page(),
            page_count: table.page_count,
        }
    }

    pub fn to_mutation_response(result: BirthdayResult) -> MutationResponse {
        MutationResponse::success(result.success_message, Some(Self::to_dto(result.birthday)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{BirthdayDate, BirthdayFields};
    use chrono::{TimeZone, Utc};
    use shared::PageSpec;

    fn domain_birthday() -> Birthday {
        Birthday::new(
            "id-1".to_string(),
            BirthdayFields {
                utaite_name: "Mafumafu".to_string(),
                birthday_date: BirthdayDate::parse("1989-11-19").unwrap(),
                twitter_link: Some("https://twitter.com/uni_mafumafu".to_string()),
            },
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        )
    }

    #[test]
    fn test_to_dto() {
        let dto = BirthdayMapper::to_dto(domain_birthday());
        assert_eq!(dto.id, "id-1");
        assert_eq!(dto.birthday_date, "1989-11-19");
        assert_eq!(dto.created_at, "2024-01-02T03:04:05+00:00");
        assert_eq!(dto.twitter_link.as_deref(), Some("https://twitter.com/uni_mafumafu"));
    }

    #[test]
    fn test_to_table_response_copies_paging() {
        let table = DerivedTable {
            rows: vec![domain_birthday()],
            total_matched: 11,
            page: PageSpec::new(2, 10).unwrap(),
            page_count: 2,
        };
        let response = BirthdayMapper::to_table_response(table);
        assert_eq!(response.rows.len(), 1);
        assert_eq!(response.total_matched, 11);
        assert_eq!(response.current_page, 2);
        assert_eq!(response.rows_per_page, 10);
        assert_eq!(response.page_count, 2);
    }

    #[test]
    fn test_to_mutation_response() {
        let response = BirthdayMapper::to_mutation_response(BirthdayResult {
            birthday: domain_birthday(),
            success_message: "Birthday created successfully".to_string(),
        });
        assert!(response.is_success());
        assert_eq!(response.message, "Birthday created successfully");
        assert_eq!(response.birthday.map(|b| b.id), Some("id-1".to_string()));
    }
}
