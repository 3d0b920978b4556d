use evento::{Aggregator, Executor};
use schedcore_shared::scheduling::{Schedule, Traded};

use crate::tasks;

const ACTOR: &str = "scheduler";

impl<E: Executor> super::Command<E> {
    /// C6: swaps the employee assigned to a Schedule (§6, §4.7).
    pub async fn trade(&self, schedule_id: &str, employee_id: &str) -> schedcore_shared::Result<()> {
        let version = self.current_version(Schedule::aggregator_type(), schedule_id).await?;

        evento::aggregator(schedule_id)
            .original_version(version)
            .requested_by(ACTOR)
            .event(&Traded { employee_id: employee_id.to_string() })
            .commit(&self.executor)
            .await?;
        tasks::enqueue_push_update(&self.write_db, schedule_id).await?;

        Ok(())
    }
}
