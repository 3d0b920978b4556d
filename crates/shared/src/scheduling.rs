use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
    Encode, Decode, EnumString, Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum EventType {
    Core,
    Supervisor,
    Juicer,
    #[strum(serialize = "Digital Setup")]
    DigitalSetup,
    #[strum(serialize = "Digital Refresh")]
    DigitalRefresh,
    #[strum(serialize = "Digital Teardown")]
    DigitalTeardown,
    Digitals,
    Freeosk,
    Other,
}

impl EventType {
    /// Phase-1 scheduling priority, ascending (§4.4). Lower runs first.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Juicer => 1,
            Self::DigitalSetup => 2,
            Self::DigitalRefresh => 3,
            Self::Freeosk => 4,
            Self::DigitalTeardown => 5,
            Self::Core => 6,
            Self::Supervisor => 7,
            Self::Digitals => 8,
            Self::Other => 9,
        }
    }

    pub fn requires_juicer_barista(&self) -> bool {
        matches!(self, Self::Juicer)
    }

    pub fn requires_lead_or_supervisor(&self) -> bool {
        matches!(
            self,
            Self::Supervisor
                | Self::DigitalSetup
                | Self::DigitalRefresh
                | Self::DigitalTeardown
                | Self::Digitals
                | Self::Freeosk
        )
    }
}

#[derive(Encode, Decode, EnumString, Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunType {
    Manual,
    Periodic,
}

#[derive(Encode, Decode, EnumString, Display, AsRefStr, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Running,
    Success,
    Failed,
}

#[derive(Encode, Decode, EnumString, Display, AsRefStr, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingStatus {
    #[default]
    Proposed,
    Edited,
    Approved,
    Rejected,
    ApiSubmitted,
    ApiFailed,
}

#[derive(Encode, Decode, EnumString, Display, AsRefStr, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleSyncStatus {
    #[default]
    Pending,
    Synced,
    Failed,
}

/// Event-sourced aggregate for a single scheduler batch run. One row in
/// `scheduler_run_history` is the read-model projection of this stream.
#[evento::aggregator]
pub enum SchedulerRunHistory {
    Started {
        run_type: RunType,
        started_at: i64,
    },
    Succeeded {
        ended_at: i64,
        total_processed: u32,
        scheduled: u32,
        requiring_swaps: u32,
        failed: u32,
    },
    Failed {
        ended_at: i64,
        error_message: String,
    },
}

/// Event-sourced aggregate for one proposed assignment awaiting review (§4.5).
#[evento::aggregator]
pub enum PendingSchedule {
    Proposed {
        run_id: String,
        event_ref_num: i64,
        employee_id: Option<String>,
        schedule_datetime: Option<i64>,
        is_swap: bool,
        swap_reason: Option<String>,
        failure_reason: Option<String>,
    },
    Edited {
        employee_id: Option<String>,
        schedule_datetime: Option<i64>,
    },
    Approved,
    Rejected,
    ApiSubmitted {
        schedule_id: String,
    },
    ApiFailed {
        reason: String,
    },
}

/// Event-sourced aggregate for a committed assignment (§3 Schedule).
#[evento::aggregator]
pub enum Schedule {
    Created {
        event_ref_num: i64,
        employee_id: String,
        schedule_datetime: i64,
    },
    Rescheduled {
        schedule_datetime: i64,
    },
    Traded {
        employee_id: String,
    },
    EmployeeChanged {
        employee_id: String,
    },
    Unscheduled,
    Synced {
        external_id: Option<String>,
    },
    SyncFailed {
        api_error_details: String,
    },
    SyncRetryRequested,
}
