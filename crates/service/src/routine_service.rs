use std::sync::Arc;

use chrono::Utc;
use liftlog_core::{
    NewPrescription, NewRoutine, PaginatedResult, PrescriptionPatch, Routine, RoutinePatch,
    RoutineSummary,
};
use liftlog_storage::StorageBackend;
use liftlog_storage::traits::RoutineStore;

use crate::exercise_service::resolve_exercise;
use crate::{Result, ServiceError, new_id};

pub struct RoutineService {
    storage: Arc<StorageBackend>,
}

impl RoutineService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    pub async fn list_routines(
        &self,
        owner: &str,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<PaginatedResult<RoutineSummary>> {
        let routines = self.storage.list_routines(owner).await?;
        let summaries = routines.iter().map(Routine::summary).collect();
        Ok(PaginatedResult::from_all(summaries, offset, limit))
    }

    pub async fn get_routine(&self, owner: &str, id: &str) -> Result<Routine> {
        self.storage
            .get_routine(owner, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("routine", id))
    }

    pub async fn create_routine(&self, owner: &str, input: NewRoutine) -> Result<Routine> {
        let routine = Routine::new(new_id(), owner.to_owned(), input, Utc::now())?;
        self.storage.insert_routine(&routine).await?;
        tracing::info!(routine_id = %routine.id, owner, "routine created");
        self.get_routine(owner, &routine.id).await
    }

    pub async fn update_routine(
        &self,
        owner: &str,
        id: &str,
        patch: RoutinePatch,
    ) -> Result<Routine> {
        let current = self.get_routine(owner, id).await?;
        let updated = patch.apply(&current, Utc::now())?;
        self.storage.update_routine_header(&updated).await?;
        tracing::debug!(routine_id = id, "routine header updated");
        self.get_routine(owner, id).await
    }

    pub async fn delete_routine(&self, owner: &str, id: &str) -> Result<()> {
        if !self.storage.delete_routine(owner, id).await? {
            return Err(ServiceError::not_found("routine", id));
        }
        tracing::info!(routine_id = id, "routine deleted");
        Ok(())
    }

    pub async fn add_prescription(
        &self,
        owner: &str,
        routine_id: &str,
        input: NewPrescription,
    ) -> Result<Routine> {
        let routine = self.get_routine(owner, routine_id).await?;
        input.validate()?;
        let exercise = resolve_exercise(&self.storage, input.exercise_id).await?;
        let prescription = routine.plan_prescription(new_id(), &input, exercise, Utc::now())?;
        self.storage.insert_prescription(routine_id, &prescription).await?;
        tracing::debug!(
            routine_id,
            prescription_id = %prescription.id,
            exercise_id = input.exercise_id,
            "prescription added"
        );
        self.get_routine(owner, routine_id).await
    }

    pub async fn update_prescription(
        &self,
        owner: &str,
        routine_id: &str,
        prescription_id: &str,
        patch: PrescriptionPatch,
    ) -> Result<Routine> {
        let routine = self.get_routine(owner, routine_id).await?;
        let updated = routine.plan_prescription_update(prescription_id, &patch)?;
        self.storage.update_prescription(routine_id, &updated).await?;
        tracing::debug!(routine_id, prescription_id, "prescription updated");
        self.get_routine(owner, routine_id).await
    }

    pub async fn remove_prescription(
        &self,
        owner: &str,
        routine_id: &str,
        prescription_id: &str,
    ) -> Result<Routine> {
        let routine = self.get_routine(owner, routine_id).await?;
        routine.prescription(prescription_id)?;
        self.storage.delete_prescription(routine_id, prescription_id).await?;
        tracing::debug!(routine_id, prescription_id, "prescription removed");
        self.get_routine(owner, routine_id).await
    }
}
