use evento::{Aggregator, Executor};
use schedcore_shared::scheduling::{PendingSchedule, Rejected};

const REJECTOR_ACTOR: &str = "scheduler";

impl<E: Executor> super::Command<E> {
    /// C6: rejects every proposed/edited PendingSchedule for a run, with no
    /// further side effects (§4.5).
    pub async fn reject_run(&self, run_id: &str) -> schedcore_shared::Result<()> {
        let proposals = crate::query::pending_for_run(&self.read_db, run_id).await?;

        for row in proposals {
            if !matches!(row.status.as_str(), "Proposed" | "Edited") {
                continue;
            }

            let version = self
                .current_version(PendingSchedule::aggregator_type(), &row.id)
                .await?;

            evento::aggregator(&row.id)
                .original_version(version)
                .requested_by(REJECTOR_ACTOR)
                .event(&Rejected)
                .commit(&self.executor)
                .await?;
        }

        Ok(())
    }
}
