use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Job titles are an open set in the upstream system; known titles drive
/// role-requirement checks (§4.2), anything else is accepted verbatim.
#[derive(
    Encode, Decode, EnumString, Display, AsRefStr, Clone, Debug, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum JobTitle {
    #[strum(serialize = "Event Specialist")]
    EventSpecialist,
    #[strum(serialize = "Lead Event Specialist")]
    LeadEventSpecialist,
    #[strum(serialize = "Club Supervisor")]
    ClubSupervisor,
    #[strum(serialize = "Juicer Barista")]
    JuicerBarista,
    #[strum(default)]
    Other(String),
}

impl JobTitle {
    pub fn may_work_juicer(&self) -> bool {
        matches!(self, Self::JuicerBarista)
    }

    pub fn may_work_lead_role(&self) -> bool {
        matches!(self, Self::LeadEventSpecialist | Self::ClubSupervisor)
    }

    pub fn is_lead_event_specialist(&self) -> bool {
        matches!(self, Self::LeadEventSpecialist)
    }

    pub fn is_club_supervisor(&self) -> bool {
        matches!(self, Self::ClubSupervisor)
    }
}

#[derive(Encode, Decode, EnumString, Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationType {
    PrimaryJuicer,
    PrimaryLead,
}
