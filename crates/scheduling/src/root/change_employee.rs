use evento::{Aggregator, Executor};
use schedcore_shared::scheduling::{EmployeeChanged, Schedule};

use crate::tasks;

const ACTOR: &str = "scheduler";

impl<E: Executor> super::Command<E> {
    /// C6: reassigns a Schedule to a different employee, distinct from
    /// `trade` in intent only — both mutate the same field (§6).
    pub async fn change_employee(
        &self,
        schedule_id: &str,
        employee_id: &str,
    ) -> schedcore_shared::Result<()> {
        let version = self.current_version(Schedule::aggregator_type(), schedule_id).await?;

        evento::aggregator(schedule_id)
            .original_version(version)
            .requested_by(ACTOR)
            .event(&EmployeeChanged { employee_id: employee_id.to_string() })
            .commit(&self.executor)
            .await?;
        tasks::enqueue_push_update(&self.write_db, schedule_id).await?;

        Ok(())
    }
}
