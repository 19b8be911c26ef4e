use chrono::{DateTime, Utc};
use shared::{
    day_key, BellyButtonRecord, SleepRecord, UpsertBellyButtonRequest, UpsertSleepRequest,
    UpsertVitaminDRequest, VitaminDRecord,
};

use super::{format_instant, parse_date, parse_optional_instant};
use crate::domain::models::{BellyButtonDay, SleepNight, VitaminDDay};
use crate::domain::{DomainError, DomainResult};

const MAX_COMMENT_LENGTH: usize = 500;

pub struct VitaminDMapper;

impl VitaminDMapper {
    pub fn to_dto(domain: VitaminDDay) -> VitaminDRecord {
        VitaminDRecord {
            date: Some(day_key(domain.date)),
            taken: domain.taken,
            updated_at: Some(format_instant(domain.updated_at)),
        }
    }

    pub fn to_domain(
        baby_id: &str,
        request: UpsertVitaminDRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<VitaminDDay> {
        Ok(VitaminDDay {
            baby_id: baby_id.to_string(),
            date: parse_date(&request.date)?,
            taken: request.taken,
            updated_at: now,
        })
    }
}

pub struct BellyButtonMapper;

impl BellyButtonMapper {
    pub fn to_dto(domain: BellyButtonDay) -> BellyButtonRecord {
        BellyButtonRecord {
            date: Some(day_key(domain.date)),
            morning: domain.morning,
            evening: domain.evening,
            updated_at: Some(format_instant(domain.updated_at)),
        }
    }

    pub fn to_domain(
        baby_id: &str,
        request: UpsertBellyButtonRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<BellyButtonDay> {
        Ok(BellyButtonDay {
            baby_id: baby_id.to_string(),
            date: parse_date(&request.date)?,
            morning: request.morning,
            evening: request.evening,
            updated_at: now,
        })
    }
}

/// Parsed sleep endpoints and comment, shared by the upsert and update paths
#[derive(Debug, Clone, PartialEq)]
pub struct SleepFields {
    pub bed_time: Option<DateTime<Utc>>,
    pub wake_time: Option<DateTime<Utc>>,
    pub comment: Option<String>,
}

pub struct SleepMapper;

impl SleepMapper {
    pub fn to_dto(domain: SleepNight) -> SleepRecord {
        SleepRecord {
            date: Some(day_key(domain.date)),
            bed_time: domain.bed_time.map(format_instant),
            wake_time: domain.wake_time.map(format_instant),
            comment: domain.comment,
            updated_at: Some(format_instant(domain.updated_at)),
        }
    }

    pub fn to_domain(
        baby_id: &str,
        request: UpsertSleepRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<SleepNight> {
        let fields = Self::parse_fields(
            request.bed_time.as_deref(),
            request.wake_time.as_deref(),
            request.comment,
        )?;
        Ok(SleepNight {
            baby_id: baby_id.to_string(),
            date: parse_date(&request.date)?,
            bed_time: fields.bed_time,
            wake_time: fields.wake_time,
            comment: fields.comment,
            updated_at: now,
        })
    }

    /// Endpoints are independent and either may be absent. Wake before bed is
    /// accepted as stored; the duration is simply not computed for it.
    pub fn parse_fields(
        bed_time: Option<&str>,
        wake_time: Option<&str>,
        comment: Option<String>,
    ) -> DomainResult<SleepFields> {
        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if comment.as_ref().is_some_and(|c| c.chars().count() > MAX_COMMENT_LENGTH) {
            return Err(DomainError::validation(format!(
                "Comment cannot exceed {MAX_COMMENT_LENGTH} characters"
            )));
        }
        Ok(SleepFields {
            bed_time: parse_optional_instant("bedTime", bed_time)?,
            wake_time: parse_optional_instant("wakeTime", wake_time)?,
            comment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_sleep_with_only_bed_time() {
        let night = SleepMapper::to_domain(
            "b1",
            UpsertSleepRequest {
                date: "2024-03-01".to_string(),
                bed_time: Some("2024-03-01T19:00:00Z".to_string()),
                wake_time: None,
                comment: Some("  ".to_string()),
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(night.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(night.bed_time.is_some());
        assert!(night.wake_time.is_none());
        assert!(night.comment.is_none());

        let dto = SleepMapper::to_dto(night);
        assert_eq!(dto.bed_time.as_deref(), Some("2024-03-01T19:00:00.000Z"));
        assert_eq!(dto.wake_time, None);
    }

    #[test]
    fn test_bad_day_key_is_rejected() {
        let result = VitaminDMapper::to_domain(
            "b1",
            UpsertVitaminDRequest {
                date: "tomorrow".to_string(),
                taken: true,
            },
            Utc::now(),
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_belly_button_dto_uses_day_key() {
        let dto = BellyButtonMapper::to_dto(BellyButtonDay {
            baby_id: "b1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            morning: true,
            evening: false,
            updated_at: Utc.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).unwrap(),
        });
        assert_eq!(dto.date.as_deref(), Some("2024-03-09"));
        assert!(dto.morning);
    }
}
