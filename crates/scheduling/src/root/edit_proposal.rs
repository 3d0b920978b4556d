use evento::{Aggregator, Executor};
use schedcore_shared::scheduling::{Edited, PendingSchedule};
use schedcore_shared::{not_found, user};
use time::OffsetDateTime;

use crate::constraint;

const EDITOR_ACTOR: &str = "scheduler";

pub struct ProposalEdit {
    pub employee_id: Option<String>,
    pub schedule_datetime: Option<i64>,
}

impl<E: Executor> super::Command<E> {
    /// C6: edits a single proposed/edited PendingSchedule, re-validating
    /// the new (employee, datetime) against the hard constraints (§4.2, §4.5).
    pub async fn edit_proposal(
        &self,
        pending_id: &str,
        edit: ProposalEdit,
    ) -> schedcore_shared::Result<()> {
        let Some(pending) = crate::query::get_pending(&self.read_db, pending_id).await? else {
            not_found!("pending schedule not found");
        };

        if !matches!(pending.status.as_str(), "Proposed" | "Edited") {
            user!("proposal is no longer editable");
        }

        let Some(employee_id) = edit.employee_id.or(pending.employee_id) else {
            user!("an employee is required to edit a proposal");
        };
        let Some(schedule_datetime) = edit.schedule_datetime.or(pending.schedule_datetime) else {
            user!("a schedule datetime is required to edit a proposal");
        };

        let Some(event) = schedcore_events::event::get(&self.read_db, pending.event_ref_num).await? else {
            not_found!("event not found");
        };
        let Some(employee) = schedcore_roster::employee::get(&self.read_db, &employee_id).await? else {
            not_found!("employee not found");
        };
        let datetime = OffsetDateTime::from_unix_timestamp(schedule_datetime)?;

        let violations = constraint::hard_violations(&self.read_db, &event, &employee, datetime).await?;
        if let Some(violation) = violations.first() {
            user!("proposed edit violates a hard constraint: {}", violation.description());
        }

        let version = self
            .current_version(PendingSchedule::aggregator_type(), pending_id)
            .await?;

        evento::aggregator(pending_id)
            .original_version(version)
            .requested_by(EDITOR_ACTOR)
            .event(&Edited {
                employee_id,
                schedule_datetime,
            })
            .commit(&self.executor)
            .await?;

        Ok(())
    }
}
