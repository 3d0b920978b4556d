use evento::{Aggregator, Executor};
use schedcore_shared::scheduling::{Schedule, Unscheduled};

use crate::tasks;

const ACTOR: &str = "scheduler";

impl<E: Executor> super::Command<E> {
    /// C6: removes a Schedule and pushes the deletion upstream if it had
    /// already been synced (§6, §4.7).
    pub async fn unschedule(&self, schedule_id: &str) -> schedcore_shared::Result<()> {
        let version = self.current_version(Schedule::aggregator_type(), schedule_id).await?;
        let existing = crate::query::get_schedule(&self.read_db, schedule_id).await?;

        evento::aggregator(schedule_id)
            .original_version(version)
            .requested_by(ACTOR)
            .event(&Unscheduled)
            .commit(&self.executor)
            .await?;

        if let Some(schedule) = existing {
            schedcore_events::event::set_condition(
                &self.write_db,
                schedule.event_ref_num,
                schedcore_events::event::Condition::Unstaffed,
                false,
            )
            .await?;

            if let Some(external_id) = schedule.external_id {
                tasks::enqueue_push_delete(&self.write_db, &external_id).await?;
            }
        }

        Ok(())
    }
}
