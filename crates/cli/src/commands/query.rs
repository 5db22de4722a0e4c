//! One-shot commands that talk to storage directly, without the HTTP layer.

use std::sync::Arc;

use anyhow::Result;
use liftlog_core::AppConfig;
use liftlog_service::{ExerciseService, RoutineService, StatsService, WorkoutService};
use liftlog_storage::StorageBackend;
use serde::Serialize;

async fn open_storage(config: &AppConfig) -> Result<Arc<StorageBackend>> {
    let storage = StorageBackend::from_config(config).await?;
    if matches!(storage, StorageBackend::Memory(_)) {
        tracing::warn!("in-memory storage is empty for one-shot commands; set a database URL");
    }
    Ok(Arc::new(storage))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn run_seed(config: &AppConfig) -> Result<()> {
    let storage = open_storage(config).await?;
    let count = ExerciseService::new(storage).seed_builtin().await?;
    println!("Seeded {count} built-in exercises.");
    Ok(())
}

pub(crate) async fn run_routines(config: &AppConfig, owner: &str, limit: usize) -> Result<()> {
    let service = RoutineService::new(open_storage(config).await?);
    print_json(&service.list_routines(owner, 0, Some(limit)).await?)
}

pub(crate) async fn run_workouts(config: &AppConfig, owner: &str, limit: usize) -> Result<()> {
    let service = WorkoutService::new(open_storage(config).await?);
    print_json(&service.list_workouts(owner, 0, Some(limit)).await?)
}

pub(crate) async fn run_show(config: &AppConfig, owner: &str, id: &str) -> Result<()> {
    let service = WorkoutService::new(open_storage(config).await?);
    match service.get_workout(owner, id).await {
        Ok(workout) => print_json(&workout),
        Err(e) if e.is_not_found() => {
            println!("Workout not found: {id}");
            Ok(())
        },
        Err(e) => Err(e.into()),
    }
}

pub(crate) async fn run_stats(config: &AppConfig, owner: &str) -> Result<()> {
    let service = StatsService::new(open_storage(config).await?);
    print_json(&service.dashboard(owner).await?)
}
