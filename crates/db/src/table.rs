use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Employee {
    Table,
    Id,
    ExternalId,
    Name,
    JobTitle,
    IsActive,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum EmployeeWeeklyAvailability {
    Table,
    EmployeeId,
    Weekday,
    Available,
    WindowStart,
    WindowEnd,
}

#[derive(Iden, Clone)]
pub enum EmployeeAvailabilityOverride {
    Table,
    EmployeeId,
    Date,
    Available,
    WindowStart,
    WindowEnd,
}

#[derive(Iden, Clone)]
pub enum EmployeeTimeOff {
    Table,
    Id,
    EmployeeId,
    StartDate,
    EndDate,
}

#[derive(Iden, Clone)]
pub enum RetailEvent {
    Table,
    ProjectRefNum,
    ExternalId,
    LocationMvid,
    ProjectName,
    EventNumber,
    EventType,
    StartDatetime,
    DueDatetime,
    EstimatedMinutes,
    IsScheduled,
    Condition,
}

#[derive(Iden, Clone)]
pub enum DailyRotation {
    Table,
    RotationType,
    Weekday,
    EmployeeId,
}

#[derive(Iden, Clone)]
pub enum RotationException {
    Table,
    Id,
    RotationType,
    Date,
    EmployeeId,
    Reason,
}

#[derive(Iden, Clone)]
pub enum Schedule {
    Table,
    Id,
    EventRefNum,
    EmployeeId,
    ScheduleDatetime,
    SyncStatus,
    ExternalId,
    LastSynced,
    ApiErrorDetails,
    Version,
}

#[derive(Iden, Clone)]
pub enum PendingSchedule {
    Table,
    Id,
    RunId,
    EventRefNum,
    EmployeeId,
    ScheduleDatetime,
    Status,
    IsSwap,
    SwapReason,
    FailureReason,
    Version,
}

#[derive(Iden, Clone)]
pub enum SchedulerRunHistory {
    Table,
    Id,
    RunType,
    State,
    StartedAt,
    EndedAt,
    TotalProcessed,
    Scheduled,
    RequiringSwaps,
    Failed,
    ErrorMessage,
    Version,
}

#[derive(Iden, Clone)]
pub enum SyncTask {
    Table,
    Id,
    TaskType,
    Payload,
    Status,
    Attempts,
    NotBefore,
    LastError,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum SchedulerLock {
    Table,
    Id,
    Locked,
    RunId,
    LockedAt,
}
