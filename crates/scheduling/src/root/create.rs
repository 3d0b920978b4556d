use evento::Executor;
use schedcore_shared::scheduling::Created;
use ulid::Ulid;

use crate::tasks;

const ACTOR: &str = "scheduler";

impl<E: Executor> super::Command<E> {
    pub(crate) async fn create_schedule(
        &self,
        schedule_id: &str,
        event_ref_num: i64,
        employee_id: &str,
        schedule_datetime: i64,
    ) -> schedcore_shared::Result<()> {
        evento::aggregator(schedule_id)
            .original_version(0)
            .requested_by(ACTOR)
            .event(&Created {
                event_ref_num,
                employee_id: employee_id.to_string(),
                schedule_datetime,
            })
            .commit(&self.executor)
            .await?;
        schedcore_events::event::set_condition(
            &self.write_db,
            event_ref_num,
            schedcore_events::event::Condition::Scheduled,
            true,
        )
        .await?;

        Ok(())
    }

    /// C6: directly schedules an employee to an event outside the
    /// proposal/approval workflow (§6).
    pub async fn create(
        &self,
        event_ref_num: i64,
        employee_id: &str,
        schedule_datetime: i64,
    ) -> schedcore_shared::Result<String> {
        let schedule_id = Ulid::new().to_string();
        self.create_schedule(&schedule_id, event_ref_num, employee_id, schedule_datetime)
            .await?;
        tasks::enqueue_push_new(&self.write_db, &schedule_id).await?;

        Ok(schedule_id)
    }
}
