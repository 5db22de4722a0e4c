//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by aggregate.

mod exercises;
mod routines;
mod workouts;

use crate::error::StorageError;
use chrono::{DateTime, Utc};
use liftlog_core::{
    ExerciseSummary, MuscleGroup, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS,
    PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};

use super::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }

    /// Read-only transaction whose queries all see one snapshot, so an
    /// aggregate's header and children cannot straddle a concurrent write.
    pub(crate) async fn begin_snapshot(
        &self,
    ) -> Result<Transaction<'static, Postgres>, StorageError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(SNAPSHOT_ISOLATION).execute(&mut *tx).await?;
        Ok(tx)
    }

    /// Re-run the idempotent schema migrations.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        run_pg_migrations(&self.pool).await.map_err(|e| StorageError::Migration(e.to_string()))
    }
}

pub(crate) const SNAPSHOT_ISOLATION: &str =
    "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

/// Columns selected for an embedded exercise reference; expects the catalog
/// joined as `e` and the child row exposing `exercise_id`.
pub(crate) const EXERCISE_REF_COLUMNS: &str = "e.name AS exercise_name, \
     e.muscle_group AS exercise_muscle_group, e.is_global AS exercise_is_global";

/// Parse `MuscleGroup` from a PostgreSQL text column.
pub(crate) fn parse_pg_muscle_group(s: Option<&str>) -> MuscleGroup {
    match s {
        Some(s) => s.parse::<MuscleGroup>().unwrap_or_else(|_| {
            tracing::warn!(invalid_group = %s, "corrupt muscle_group in DB, defaulting");
            MuscleGroup::default()
        }),
        None => MuscleGroup::default(),
    }
}

/// Exercise reference from a child row joined against the catalog.
/// A missing catalog row yields a placeholder instead of failing the read.
pub(crate) fn row_to_exercise_ref(row: &PgRow) -> Result<ExerciseSummary, StorageError> {
    let id: i64 = row.try_get("exercise_id")?;
    let Some(name) = row.try_get::<Option<String>, _>("exercise_name")? else {
        return Ok(ExerciseSummary::unresolved(id));
    };
    Ok(ExerciseSummary {
        id,
        name,
        muscle_group: parse_pg_muscle_group(
            row.try_get::<Option<String>, _>("exercise_muscle_group")?.as_deref(),
        ),
        is_global: row.try_get::<Option<bool>, _>("exercise_is_global")?.unwrap_or(false),
    })
}

pub(crate) fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Convert `usize` to `i64` for SQL LIMIT binds.
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

pub(crate) fn u32_to_i32(val: u32, field: &str) -> Result<i32, StorageError> {
    i32::try_from(val).map_err(|e| StorageError::DataCorruption {
        context: format!("{field} exceeds i32::MAX"),
        source: Box::new(e),
    })
}

pub(crate) fn i32_to_u32(val: i32, field: &str) -> Result<u32, StorageError> {
    u32::try_from(val).map_err(|e| StorageError::DataCorruption {
        context: format!("negative {field} in DB"),
        source: Box::new(e),
    })
}

/// Lock the workout row for the rest of the transaction and require it open.
pub(crate) async fn lock_open_workout(
    tx: &mut Transaction<'_, Postgres>,
    workout_id: &str,
) -> Result<(), StorageError> {
    let row = sqlx::query("SELECT end_time FROM workouts WHERE id = $1 FOR UPDATE")
        .bind(workout_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| StorageError::not_found("workout", workout_id))?;
    let end_time: Option<DateTime<Utc>> = row.try_get("end_time")?;
    if end_time.is_some() {
        return Err(StorageError::finished(workout_id));
    }
    Ok(())
}

pub(crate) async fn touch_workout(
    tx: &mut Transaction<'_, Postgres>,
    workout_id: &str,
) -> Result<(), StorageError> {
    sqlx::query("UPDATE workouts SET updated_at = NOW() WHERE id = $1")
        .bind(workout_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn test_muscle_group_fallback() {
        assert_eq!(parse_pg_muscle_group(Some("legs")), MuscleGroup::Legs);
        assert_eq!(parse_pg_muscle_group(Some("tail")), MuscleGroup::Other);
        assert_eq!(parse_pg_muscle_group(None), MuscleGroup::Other);
    }

    #[test]
    fn test_int_conversions() {
        assert_eq!(u32_to_i32(7, "reps").ok(), Some(7));
        assert!(u32_to_i32(u32::MAX, "reps").is_err());
        assert!(i32_to_u32(-1, "ord").is_err());
    }

    fn set(set_number: u32) -> liftlog_core::LoggedSet {
        liftlog_core::LoggedSet {
            id: format!("test-set-{}", uuid::Uuid::new_v4()),
            set_number,
            weight: Some(60.0),
            reps: 5,
            completed: true,
            rpe: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    #[ignore]
    async fn pg_snapshot_hides_concurrent_writes() {
        use crate::traits::WorkoutStore;
        use liftlog_core::{Workout, WorkoutExercise, builtin_exercises};

        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let storage = PgStorage::new(&url).await.unwrap();
        let owner = format!("owner-{}", uuid::Uuid::new_v4());
        let workout = Workout::new(
            format!("test-{}", uuid::Uuid::new_v4()),
            owner.clone(),
            None,
            None,
            Utc::now(),
        );
        storage.insert_workout(&workout).await.unwrap();
        let exercise = WorkoutExercise {
            id: format!("test-we-{}", uuid::Uuid::new_v4()),
            exercise: builtin_exercises()[0].summary(),
            order: 0,
            notes: String::new(),
            sets: Vec::new(),
            created_at: Utc::now(),
        };
        storage.insert_exercise(&workout.id, &exercise).await.unwrap();
        storage.insert_set(&workout.id, &exercise.id, &set(1)).await.unwrap();

        let count_sql = "SELECT COUNT(*) FROM workout_sets WHERE workout_exercise_id = $1";
        let mut tx = storage.begin_snapshot().await.unwrap();
        let before: i64 =
            sqlx::query_scalar(count_sql).bind(&exercise.id).fetch_one(&mut *tx).await.unwrap();

        // Committed on another connection while the snapshot is open.
        storage.insert_set(&workout.id, &exercise.id, &set(2)).await.unwrap();

        let during: i64 =
            sqlx::query_scalar(count_sql).bind(&exercise.id).fetch_one(&mut *tx).await.unwrap();
        assert_eq!(before, 1);
        assert_eq!(during, before);

        let write = sqlx::query("UPDATE workouts SET notes = 'x' WHERE id = $1")
            .bind(&workout.id)
            .execute(&mut *tx)
            .await;
        assert!(write.is_err(), "snapshot transactions are read-only");
        drop(tx);

        let stored = storage.get_workout(&owner, &workout.id).await.unwrap().unwrap();
        assert_eq!(stored.exercises[0].sets.len(), 2);
        assert!(storage.delete_workout(&owner, &workout.id).await.unwrap());
    }
}
