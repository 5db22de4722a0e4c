use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use liftlog_core::{DashboardStats, WorkoutSummary};
use liftlog_storage::StorageBackend;
use liftlog_storage::traits::{RoutineStore, WorkoutStore};

use crate::Result;

pub struct StatsService {
    storage: Arc<StorageBackend>,
}

impl StatsService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    pub async fn dashboard(&self, owner: &str) -> Result<DashboardStats> {
        self.dashboard_on(owner, Utc::now().date_naive()).await
    }

    /// Dashboard as seen on `today`.
    pub async fn dashboard_on(&self, owner: &str, today: NaiveDate) -> Result<DashboardStats> {
        let workouts = self.storage.list_workouts(owner).await?;
        let summaries: Vec<WorkoutSummary> = workouts.iter().map(WorkoutSummary::from).collect();
        let active_routines = self.storage.count_active_routines(owner).await?;
        Ok(DashboardStats::compute(&summaries, active_routines, today))
    }
}
