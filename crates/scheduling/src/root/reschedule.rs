use evento::{Aggregator, Executor};
use schedcore_shared::scheduling::{Rescheduled, Schedule};

use crate::tasks;

const ACTOR: &str = "scheduler";

impl<E: Executor> super::Command<E> {
    /// C6: moves a Schedule to a new datetime and re-queues the upstream
    /// push (§6, §4.7).
    pub async fn reschedule(
        &self,
        schedule_id: &str,
        schedule_datetime: i64,
    ) -> schedcore_shared::Result<()> {
        let version = self.current_version(Schedule::aggregator_type(), schedule_id).await?;

        evento::aggregator(schedule_id)
            .original_version(version)
            .requested_by(ACTOR)
            .event(&Rescheduled { schedule_datetime })
            .commit(&self.executor)
            .await?;
        tasks::enqueue_push_update(&self.write_db, schedule_id).await?;

        Ok(())
    }
}
