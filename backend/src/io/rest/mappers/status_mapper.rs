use shared::StatusSnapshot;

use super::{
    BathMapper, BellyButtonMapper, DiaperMapper, FeedingMapper, MedicationMapper, SleepMapper,
    VitaminDMapper,
};
use crate::domain::BabyStatus;

pub struct StatusMapper;

impl StatusMapper {
    pub fn to_dto(domain: BabyStatus) -> StatusSnapshot {
        StatusSnapshot {
            medications: domain.medications.into_iter().map(MedicationMapper::to_dto).collect(),
            feedings: domain.feedings.into_iter().map(FeedingMapper::to_dto).collect(),
            vitamin_d: domain.vitamin_d.into_iter().map(VitaminDMapper::to_dto).collect(),
            baths: domain.baths.into_iter().map(BathMapper::to_dto).collect(),
            belly_button: domain
                .belly_button
                .into_iter()
                .map(BellyButtonMapper::to_dto)
                .collect(),
            diapers: domain.diapers.into_iter().map(DiaperMapper::to_dto).collect(),
            sleep: domain.sleep.into_iter().map(SleepMapper::to_dto).collect(),
        }
    }
}
