//! ExerciseStore implementation for PgStorage.

use super::*;

use crate::traits::ExerciseStore;
use async_trait::async_trait;
use liftlog_core::{Exercise, ExerciseFilter, ExerciseId, capped_limit};

const EXERCISE_COLUMNS: &str = "id, name, description, muscle_group, is_global, owner";

fn row_to_exercise(row: &PgRow) -> Result<Exercise, StorageError> {
    Ok(Exercise {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        muscle_group: parse_pg_muscle_group(
            row.try_get::<Option<String>, _>("muscle_group")?.as_deref(),
        ),
        is_global: row.try_get("is_global")?,
        owner: row.try_get("owner")?,
    })
}

#[async_trait]
impl ExerciseStore for PgStorage {
    async fn save_exercise(&self, exercise: &Exercise) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO exercises ({EXERCISE_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6)
             ON CONFLICT (id) DO UPDATE SET
               name = EXCLUDED.name,
               description = EXCLUDED.description,
               muscle_group = EXCLUDED.muscle_group,
               is_global = EXCLUDED.is_global,
               owner = EXCLUDED.owner"
        ))
        .bind(exercise.id)
        .bind(&exercise.name)
        .bind(&exercise.description)
        .bind(exercise.muscle_group.as_str())
        .bind(exercise.is_global)
        .bind(&exercise.owner)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_exercise(&self, id: ExerciseId) -> Result<Option<Exercise>, StorageError> {
        let row = sqlx::query(&format!("SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_exercise(&r)).transpose()
    }

    async fn search_exercises(
        &self,
        filter: &ExerciseFilter,
    ) -> Result<Vec<Exercise>, StorageError> {
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));
        let rows = sqlx::query(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises
             WHERE ($1::TEXT IS NULL OR name ILIKE $1 ESCAPE '\\')
               AND ($2::TEXT IS NULL OR muscle_group = $2)
               AND ($3::BOOLEAN IS NULL OR is_global = $3)
             ORDER BY LOWER(name), id
             LIMIT $4"
        ))
        .bind(pattern)
        .bind(filter.muscle_group.map(|g| g.as_str()))
        .bind(filter.is_global)
        .bind(usize_to_i64(capped_limit(filter.limit)))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_exercise).collect()
    }
}
