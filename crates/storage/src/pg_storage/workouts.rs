//! WorkoutStore implementation for PgStorage.
//!
//! Structural writes lock the parent workout row first, so the open/finished
//! check and the write commit together.

use std::collections::HashMap;

use super::*;

use crate::traits::WorkoutStore;
use async_trait::async_trait;
use liftlog_core::{LoggedSet, Workout, WorkoutExercise};

const WORKOUT_COLUMNS: &str = "id, owner, routine_id, routine_name, date, start_time, end_time, \
     notes, created_at, updated_at";

fn row_to_workout(row: &PgRow) -> Result<Workout, StorageError> {
    Ok(Workout {
        id: row.try_get("id")?,
        owner: row.try_get("owner")?,
        routine_id: row.try_get("routine_id")?,
        routine_name: row.try_get("routine_name")?,
        date: row.try_get("date")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        notes: row.try_get("notes")?,
        exercises: Vec::new(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_workout_exercise(row: &PgRow) -> Result<WorkoutExercise, StorageError> {
    Ok(WorkoutExercise {
        id: row.try_get("id")?,
        exercise: row_to_exercise_ref(row)?,
        order: i32_to_u32(row.try_get("ord")?, "ord")?,
        notes: row.try_get("notes")?,
        sets: Vec::new(),
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_set(row: &PgRow) -> Result<LoggedSet, StorageError> {
    let rpe = row
        .try_get::<Option<i16>, _>("rpe")?
        .map(|v| {
            u8::try_from(v).map_err(|e| StorageError::DataCorruption {
                context: format!("rpe {v} out of range"),
                source: Box::new(e),
            })
        })
        .transpose()?;
    Ok(LoggedSet {
        id: row.try_get("id")?,
        set_number: i32_to_u32(row.try_get("set_number")?, "set_number")?,
        weight: row.try_get("weight")?,
        reps: i32_to_u32(row.try_get("reps")?, "reps")?,
        completed: row.try_get("completed")?,
        rpe,
        created_at: row.try_get("created_at")?,
    })
}

async fn insert_exercise_row(
    tx: &mut Transaction<'_, Postgres>,
    workout_id: &str,
    exercise: &WorkoutExercise,
) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT INTO workout_exercises (id, workout_id, exercise_id, ord, notes, created_at)
         VALUES ($1,$2,$3,$4,$5,$6)",
    )
    .bind(&exercise.id)
    .bind(workout_id)
    .bind(exercise.exercise.id)
    .bind(u32_to_i32(exercise.order, "order")?)
    .bind(&exercise.notes)
    .bind(exercise.created_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Require `exercise_id` to belong to `workout_id`.
async fn ensure_exercise_in_workout(
    tx: &mut Transaction<'_, Postgres>,
    workout_id: &str,
    exercise_id: &str,
) -> Result<(), StorageError> {
    sqlx::query("SELECT id FROM workout_exercises WHERE id = $1 AND workout_id = $2")
        .bind(exercise_id)
        .bind(workout_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| StorageError::not_found("workout exercise", exercise_id))?;
    Ok(())
}

/// Attach exercises (sorted by order) and their sets to workout headers.
async fn attach_exercises(
    tx: &mut Transaction<'_, Postgres>,
    workouts: &mut [Workout],
) -> Result<(), StorageError> {
    if workouts.is_empty() {
        return Ok(());
    }
    let ids: Vec<String> = workouts.iter().map(|w| w.id.clone()).collect();
    let exercise_rows = sqlx::query(&format!(
        "SELECT we.id, we.workout_id, we.exercise_id, we.ord, we.notes, we.created_at,
                {EXERCISE_REF_COLUMNS}
         FROM workout_exercises we
         LEFT JOIN exercises e ON e.id = we.exercise_id
         WHERE we.workout_id = ANY($1)
         ORDER BY we.ord, we.seq"
    ))
    .bind(&ids)
    .fetch_all(&mut **tx)
    .await?;

    let set_rows = sqlx::query(
        "SELECT s.id, s.workout_exercise_id, s.set_number, s.weight, s.reps, s.completed,
                s.rpe, s.created_at
         FROM workout_sets s
         JOIN workout_exercises we ON we.id = s.workout_exercise_id
         WHERE we.workout_id = ANY($1)
         ORDER BY s.seq",
    )
    .bind(&ids)
    .fetch_all(&mut **tx)
    .await?;

    let mut sets_by_exercise: HashMap<String, Vec<LoggedSet>> = HashMap::new();
    for row in &set_rows {
        let exercise_id: String = row.try_get("workout_exercise_id")?;
        sets_by_exercise.entry(exercise_id).or_default().push(row_to_set(row)?);
    }

    let mut by_workout: HashMap<String, Vec<WorkoutExercise>> = HashMap::new();
    for row in &exercise_rows {
        let workout_id: String = row.try_get("workout_id")?;
        let mut exercise = row_to_workout_exercise(row)?;
        exercise.sets = sets_by_exercise.remove(&exercise.id).unwrap_or_default();
        by_workout.entry(workout_id).or_default().push(exercise);
    }
    for workout in workouts {
        workout.exercises = by_workout.remove(&workout.id).unwrap_or_default();
    }
    Ok(())
}

#[async_trait]
impl WorkoutStore for PgStorage {
    async fn list_workouts(&self, owner: &str) -> Result<Vec<Workout>, StorageError> {
        let mut tx = self.begin_snapshot().await?;
        let rows = sqlx::query(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE owner = $1
             ORDER BY date DESC, created_at DESC"
        ))
        .bind(owner)
        .fetch_all(&mut *tx)
        .await?;
        let mut workouts = rows.iter().map(row_to_workout).collect::<Result<Vec<_>, _>>()?;
        attach_exercises(&mut tx, &mut workouts).await?;
        tx.commit().await?;
        Ok(workouts)
    }

    async fn get_workout(&self, owner: &str, id: &str) -> Result<Option<Workout>, StorageError> {
        let mut tx = self.begin_snapshot().await?;
        let row = sqlx::query(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND owner = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut workout = [row_to_workout(&row)?];
        attach_exercises(&mut tx, &mut workout).await?;
        tx.commit().await?;
        let [workout] = workout;
        Ok(Some(workout))
    }

    async fn insert_workout(&self, workout: &Workout) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(&format!(
            "INSERT INTO workouts ({WORKOUT_COLUMNS}) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)"
        ))
        .bind(&workout.id)
        .bind(&workout.owner)
        .bind(&workout.routine_id)
        .bind(&workout.routine_name)
        .bind(workout.date)
        .bind(workout.start_time)
        .bind(workout.end_time)
        .bind(&workout.notes)
        .bind(workout.created_at)
        .bind(workout.updated_at)
        .execute(&mut *tx)
        .await?;
        for exercise in &workout.exercises {
            insert_exercise_row(&mut tx, &workout.id, exercise).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn update_workout_header(&self, workout: &Workout) -> Result<(), StorageError> {
        let result =
            sqlx::query("UPDATE workouts SET date = $2, notes = $3, updated_at = $4 WHERE id = $1")
                .bind(&workout.id)
                .bind(workout.date)
                .bind(&workout.notes)
                .bind(workout.updated_at)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("workout", &workout.id));
        }
        Ok(())
    }

    async fn delete_workout(&self, owner: &str, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_exercise(
        &self,
        workout_id: &str,
        exercise: &WorkoutExercise,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        lock_open_workout(&mut tx, workout_id).await?;
        insert_exercise_row(&mut tx, workout_id, exercise).await?;
        touch_workout(&mut tx, workout_id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_exercise(
        &self,
        workout_id: &str,
        exercise_id: &str,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        lock_open_workout(&mut tx, workout_id).await?;
        let result =
            sqlx::query("DELETE FROM workout_exercises WHERE id = $1 AND workout_id = $2")
                .bind(exercise_id)
                .bind(workout_id)
                .execute(&mut *tx)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("workout exercise", exercise_id));
        }
        touch_workout(&mut tx, workout_id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn insert_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        set: &LoggedSet,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        lock_open_workout(&mut tx, workout_id).await?;
        ensure_exercise_in_workout(&mut tx, workout_id, exercise_id).await?;
        sqlx::query(
            "INSERT INTO workout_sets
               (id, workout_exercise_id, set_number, weight, reps, completed, rpe, created_at)
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8)",
        )
        .bind(&set.id)
        .bind(exercise_id)
        .bind(u32_to_i32(set.set_number, "set_number")?)
        .bind(set.weight)
        .bind(u32_to_i32(set.reps, "reps")?)
        .bind(set.completed)
        .bind(set.rpe.map(i16::from))
        .bind(set.created_at)
        .execute(&mut *tx)
        .await?;
        touch_workout(&mut tx, workout_id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        set: &LoggedSet,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        lock_open_workout(&mut tx, workout_id).await?;
        ensure_exercise_in_workout(&mut tx, workout_id, exercise_id).await?;
        let result = sqlx::query(
            "UPDATE workout_sets
             SET set_number = $3, weight = $4, reps = $5, completed = $6, rpe = $7
             WHERE id = $1 AND workout_exercise_id = $2",
        )
        .bind(&set.id)
        .bind(exercise_id)
        .bind(u32_to_i32(set.set_number, "set_number")?)
        .bind(set.weight)
        .bind(u32_to_i32(set.reps, "reps")?)
        .bind(set.completed)
        .bind(set.rpe.map(i16::from))
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("set", &set.id));
        }
        touch_workout(&mut tx, workout_id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        set_id: &str,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        lock_open_workout(&mut tx, workout_id).await?;
        ensure_exercise_in_workout(&mut tx, workout_id, exercise_id).await?;
        let result =
            sqlx::query("DELETE FROM workout_sets WHERE id = $1 AND workout_exercise_id = $2")
                .bind(set_id)
                .bind(exercise_id)
                .execute(&mut *tx)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("set", set_id));
        }
        touch_workout(&mut tx, workout_id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn finish_workout(
        &self,
        workout_id: &str,
        end_time: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        lock_open_workout(&mut tx, workout_id).await?;
        sqlx::query("UPDATE workouts SET end_time = $2, updated_at = $2 WHERE id = $1")
            .bind(workout_id)
            .bind(end_time)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::debug!(workout_id, "workout finished");
        Ok(())
    }
}
