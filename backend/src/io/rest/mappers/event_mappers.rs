use chrono::{DateTime, Utc};
use shared::{
    BathRecord, CreateBathRequest, CreateDiaperRequest, CreateFeedingRequest,
    CreateMedicationRequest, DiaperChange as SharedDiaperChange,
    FeedingSession as SharedFeedingSession, Medication,
};

use super::{format_instant, instant_or_now, resolve_event_id};
use crate::domain::models::{Bath, DiaperChange, FeedingSession, MedicationDose};
use crate::domain::{DomainError, DomainResult};

const MAX_NOTE_LENGTH: usize = 500;

/// Mapper between medication DTOs and domain doses
pub struct MedicationMapper;

impl MedicationMapper {
    pub fn to_dto(domain: MedicationDose) -> Medication {
        Medication {
            id: domain.id,
            name: domain.name,
            timestamp: Some(format_instant(domain.taken_at)),
            updated_at: Some(format_instant(domain.updated_at)),
        }
    }

    pub fn to_domain(
        baby_id: &str,
        request: CreateMedicationRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<MedicationDose> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Medication name cannot be empty"));
        }
        Ok(MedicationDose {
            id: resolve_event_id(request.id)?,
            baby_id: baby_id.to_string(),
            name: name.to_string(),
            taken_at: instant_or_now(request.timestamp.as_deref(), now)?,
            updated_at: now,
        })
    }
}

/// Mapper between feeding DTOs and domain sessions
pub struct FeedingMapper;

impl FeedingMapper {
    pub fn to_dto(domain: FeedingSession) -> SharedFeedingSession {
        SharedFeedingSession {
            id: domain.id,
            timestamp: Some(format_instant(domain.taken_at)),
            side: domain.side,
            note: domain.note,
            updated_at: Some(format_instant(domain.updated_at)),
        }
    }

    pub fn to_domain(
        baby_id: &str,
        request: CreateFeedingRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<FeedingSession> {
        Ok(FeedingSession {
            id: resolve_event_id(request.id)?,
            baby_id: baby_id.to_string(),
            taken_at: instant_or_now(request.timestamp.as_deref(), now)?,
            side: request.side,
            note: Self::clean_note(request.note)?,
            updated_at: now,
        })
    }

    /// Trim the note; blank notes are stored as absent
    pub fn clean_note(note: Option<String>) -> DomainResult<Option<String>> {
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if note.as_ref().is_some_and(|n| n.chars().count() > MAX_NOTE_LENGTH) {
            return Err(DomainError::validation(format!(
                "Note cannot exceed {MAX_NOTE_LENGTH} characters"
            )));
        }
        Ok(note)
    }
}

/// Mapper between bath DTOs and domain baths
pub struct BathMapper;

impl BathMapper {
    pub fn to_dto(domain: Bath) -> BathRecord {
        BathRecord {
            id: domain.id,
            timestamp: Some(format_instant(domain.taken_at)),
            updated_at: Some(format_instant(domain.updated_at)),
        }
    }

    pub fn to_domain(
        baby_id: &str,
        request: CreateBathRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<Bath> {
        Ok(Bath {
            id: resolve_event_id(request.id)?,
            baby_id: baby_id.to_string(),
            taken_at: instant_or_now(request.timestamp.as_deref(), now)?,
            updated_at: now,
        })
    }
}

/// Mapper between diaper DTOs and domain diaper changes
pub struct DiaperMapper;

impl DiaperMapper {
    pub fn to_dto(domain: DiaperChange) -> SharedDiaperChange {
        SharedDiaperChange {
            id: domain.id,
            timestamp: Some(format_instant(domain.taken_at)),
            diaper_type: domain.diaper_type,
            updated_at: Some(format_instant(domain.updated_at)),
        }
    }

    pub fn to_domain(
        baby_id: &str,
        request: CreateDiaperRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<DiaperChange> {
        Ok(DiaperChange {
            id: resolve_event_id(request.id)?,
            baby_id: baby_id.to_string(),
            taken_at: instant_or_now(request.timestamp.as_deref(), now)?,
            diaper_type: request.diaper_type,
            updated_at: now,
        })
    }
}
