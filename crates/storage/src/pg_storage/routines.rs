//! RoutineStore implementation for PgStorage.

use std::collections::HashMap;

use super::*;

use crate::traits::RoutineStore;
use async_trait::async_trait;
use liftlog_core::{Routine, RoutineExercise};

const ROUTINE_COLUMNS: &str = "id, owner, name, description, is_active, created_at, updated_at";

fn row_to_routine(row: &PgRow) -> Result<Routine, StorageError> {
    Ok(Routine {
        id: row.try_get("id")?,
        owner: row.try_get("owner")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        is_active: row.try_get("is_active")?,
        exercises: Vec::new(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_prescription(row: &PgRow) -> Result<RoutineExercise, StorageError> {
    Ok(RoutineExercise {
        id: row.try_get("id")?,
        exercise: row_to_exercise_ref(row)?,
        order: i32_to_u32(row.try_get("ord")?, "ord")?,
        target_sets: i32_to_u32(row.try_get("target_sets")?, "target_sets")?,
        target_reps: i32_to_u32(row.try_get("target_reps")?, "target_reps")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
    })
}

impl PgStorage {
    /// Attach prescriptions (sorted by order) to already-loaded routine headers.
    async fn attach_prescriptions(
        tx: &mut Transaction<'_, Postgres>,
        routines: &mut [Routine],
    ) -> Result<(), StorageError> {
        if routines.is_empty() {
            return Ok(());
        }
        let ids: Vec<String> = routines.iter().map(|r| r.id.clone()).collect();
        let rows = sqlx::query(&format!(
            "SELECT re.id, re.routine_id, re.exercise_id, re.ord, re.target_sets, re.target_reps,
                    re.notes, re.created_at, {EXERCISE_REF_COLUMNS}
             FROM routine_exercises re
             LEFT JOIN exercises e ON e.id = re.exercise_id
             WHERE re.routine_id = ANY($1)
             ORDER BY re.ord, re.seq"
        ))
        .bind(&ids)
        .fetch_all(&mut **tx)
        .await?;

        let mut by_routine: HashMap<String, Vec<RoutineExercise>> = HashMap::new();
        for row in &rows {
            let routine_id: String = row.try_get("routine_id")?;
            by_routine.entry(routine_id).or_default().push(row_to_prescription(row)?);
        }
        for routine in routines {
            routine.exercises = by_routine.remove(&routine.id).unwrap_or_default();
        }
        Ok(())
    }

    async fn lock_routine(
        tx: &mut Transaction<'_, Postgres>,
        routine_id: &str,
    ) -> Result<(), StorageError> {
        sqlx::query("SELECT id FROM routines WHERE id = $1 FOR UPDATE")
            .bind(routine_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| StorageError::not_found("routine", routine_id))?;
        Ok(())
    }

    async fn touch_routine(
        tx: &mut Transaction<'_, Postgres>,
        routine_id: &str,
    ) -> Result<(), StorageError> {
        sqlx::query("UPDATE routines SET updated_at = NOW() WHERE id = $1")
            .bind(routine_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RoutineStore for PgStorage {
    async fn list_routines(&self, owner: &str) -> Result<Vec<Routine>, StorageError> {
        let mut tx = self.begin_snapshot().await?;
        let rows = sqlx::query(&format!(
            "SELECT {ROUTINE_COLUMNS} FROM routines WHERE owner = $1 ORDER BY created_at DESC, id"
        ))
        .bind(owner)
        .fetch_all(&mut *tx)
        .await?;
        let mut routines = rows.iter().map(row_to_routine).collect::<Result<Vec<_>, _>>()?;
        Self::attach_prescriptions(&mut tx, &mut routines).await?;
        tx.commit().await?;
        Ok(routines)
    }

    async fn get_routine(&self, owner: &str, id: &str) -> Result<Option<Routine>, StorageError> {
        let mut tx = self.begin_snapshot().await?;
        let row = sqlx::query(&format!(
            "SELECT {ROUTINE_COLUMNS} FROM routines WHERE id = $1 AND owner = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut routine = [row_to_routine(&row)?];
        Self::attach_prescriptions(&mut tx, &mut routine).await?;
        tx.commit().await?;
        let [routine] = routine;
        Ok(Some(routine))
    }

    async fn insert_routine(&self, routine: &Routine) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO routines ({ROUTINE_COLUMNS}) VALUES ($1,$2,$3,$4,$5,$6,$7)"
        ))
        .bind(&routine.id)
        .bind(&routine.owner)
        .bind(&routine.name)
        .bind(&routine.description)
        .bind(routine.is_active)
        .bind(routine.created_at)
        .bind(routine.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_routine_header(&self, routine: &Routine) -> Result<(), StorageError> {
        let result = sqlx::query(
            "UPDATE routines SET name = $2, description = $3, is_active = $4, updated_at = $5
             WHERE id = $1",
        )
        .bind(&routine.id)
        .bind(&routine.name)
        .bind(&routine.description)
        .bind(routine.is_active)
        .bind(routine.updated_at)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("routine", &routine.id));
        }
        Ok(())
    }

    async fn delete_routine(&self, owner: &str, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM routines WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_prescription(
        &self,
        routine_id: &str,
        prescription: &RoutineExercise,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_routine(&mut tx, routine_id).await?;
        sqlx::query(
            "INSERT INTO routine_exercises
               (id, routine_id, exercise_id, ord, target_sets, target_reps, notes, created_at)
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8)",
        )
        .bind(&prescription.id)
        .bind(routine_id)
        .bind(prescription.exercise.id)
        .bind(u32_to_i32(prescription.order, "order")?)
        .bind(u32_to_i32(prescription.target_sets, "target_sets")?)
        .bind(u32_to_i32(prescription.target_reps, "target_reps")?)
        .bind(&prescription.notes)
        .bind(prescription.created_at)
        .execute(&mut *tx)
        .await?;
        Self::touch_routine(&mut tx, routine_id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_prescription(
        &self,
        routine_id: &str,
        prescription: &RoutineExercise,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_routine(&mut tx, routine_id).await?;
        let result = sqlx::query(
            "UPDATE routine_exercises
             SET ord = $3, target_sets = $4, target_reps = $5, notes = $6
             WHERE id = $1 AND routine_id = $2",
        )
        .bind(&prescription.id)
        .bind(routine_id)
        .bind(u32_to_i32(prescription.order, "order")?)
        .bind(u32_to_i32(prescription.target_sets, "target_sets")?)
        .bind(u32_to_i32(prescription.target_reps, "target_reps")?)
        .bind(&prescription.notes)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("routine exercise", &prescription.id));
        }
        Self::touch_routine(&mut tx, routine_id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_prescription(
        &self,
        routine_id: &str,
        prescription_id: &str,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_routine(&mut tx, routine_id).await?;
        let result =
            sqlx::query("DELETE FROM routine_exercises WHERE id = $1 AND routine_id = $2")
                .bind(prescription_id)
                .bind(routine_id)
                .execute(&mut *tx)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("routine exercise", prescription_id));
        }
        Self::touch_routine(&mut tx, routine_id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn count_active_routines(&self, owner: &str) -> Result<usize, StorageError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM routines WHERE owner = $1 AND is_active")
                .bind(owner)
                .fetch_one(&self.pool)
                .await?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
