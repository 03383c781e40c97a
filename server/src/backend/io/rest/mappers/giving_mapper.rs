use chrono::SecondsFormat;
use shared::{CreateGivingRecordRequest, GivingRecord};

use crate::backend::domain::models::giving_record::{DomainGivingRecord, NewGivingRecord};

pub struct GivingMapper;

impl GivingMapper {
    /// Convert a create request DTO into the domain's new-record fields
    pub fn to_new_record(request: CreateGivingRecordRequest) -> NewGivingRecord {
        NewGivingRecord {
            amount: request.amount,
            giving_type: request.giving_type,
            recipient: request.recipient,
            date: request.date,
            notes: request.notes,
        }
    }

    /// Convert a domain record to the shared DTO
    pub fn to_dto(domain: DomainGivingRecord) -> GivingRecord {
        GivingRecord {
            id: domain.id,
            amount: domain.amount,
            giving_type: domain.giving_type,
            recipient: domain.recipient,
            date: domain.date,
            notes: domain.notes,
            created_at: domain.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            user_id: domain.user_id,
        }
    }

    pub fn to_dto_list(domain_records: Vec<DomainGivingRecord>) -> Vec<GivingRecord> {
        domain_records.into_iter().map(Self::to_dto).collect()
    }
}
