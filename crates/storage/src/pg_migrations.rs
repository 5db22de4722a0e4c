//! PostgreSQL schema migrations for liftlog storage.

use sqlx::PgPool;

/// Unique index: one prescription per exercise within a routine.
pub(crate) const ROUTINE_EXERCISE_UNIQUE: &str = "idx_routine_exercises_exercise";
/// Unique index: one prescription per order slot within a routine.
pub(crate) const ROUTINE_ORDER_UNIQUE: &str = "idx_routine_exercises_ord";
/// Unique index: one workout exercise per order slot within a workout.
pub(crate) const WORKOUT_ORDER_UNIQUE: &str = "idx_workout_exercises_ord";

/// Run all PostgreSQL migrations. Every statement is idempotent.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS exercises (
            id BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            muscle_group TEXT NOT NULL DEFAULT 'other',
            is_global BOOLEAN NOT NULL DEFAULT TRUE,
            owner TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_exercises_name ON exercises (LOWER(name))")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS routines (
            id TEXT PRIMARY KEY,
            owner TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_routines_owner ON routines (owner, created_at DESC)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS routine_exercises (
            id TEXT PRIMARY KEY,
            seq BIGSERIAL,
            routine_id TEXT NOT NULL REFERENCES routines(id) ON DELETE CASCADE,
            exercise_id BIGINT NOT NULL,
            ord INTEGER NOT NULL CHECK (ord >= 0),
            target_sets INTEGER NOT NULL CHECK (target_sets > 0),
            target_reps INTEGER NOT NULL CHECK (target_reps > 0),
            notes TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {ROUTINE_EXERCISE_UNIQUE}
         ON routine_exercises (routine_id, exercise_id)"
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {ROUTINE_ORDER_UNIQUE}
         ON routine_exercises (routine_id, ord)"
    ))
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workouts (
            id TEXT PRIMARY KEY,
            owner TEXT NOT NULL,
            routine_id TEXT REFERENCES routines(id) ON DELETE SET NULL,
            routine_name TEXT,
            date DATE NOT NULL,
            start_time TIMESTAMPTZ,
            end_time TIMESTAMPTZ,
            notes TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CHECK (end_time IS NULL OR start_time IS NULL OR end_time >= start_time)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_workouts_owner_date
         ON workouts (owner, date DESC, created_at DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workout_exercises (
            id TEXT PRIMARY KEY,
            seq BIGSERIAL,
            workout_id TEXT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
            exercise_id BIGINT NOT NULL,
            ord INTEGER NOT NULL CHECK (ord >= 0),
            notes TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {WORKOUT_ORDER_UNIQUE}
         ON workout_exercises (workout_id, ord)"
    ))
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workout_sets (
            id TEXT PRIMARY KEY,
            seq BIGSERIAL,
            workout_exercise_id TEXT NOT NULL REFERENCES workout_exercises(id) ON DELETE CASCADE,
            set_number INTEGER NOT NULL CHECK (set_number > 0),
            weight DOUBLE PRECISION CHECK (weight IS NULL OR weight >= 0),
            reps INTEGER NOT NULL CHECK (reps > 0),
            completed BOOLEAN NOT NULL DEFAULT TRUE,
            rpe SMALLINT CHECK (rpe IS NULL OR rpe BETWEEN 1 AND 10),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_workout_sets_exercise
         ON workout_sets (workout_exercise_id, seq)",
    )
    .execute(pool)
    .await?;

    tracing::info!("PostgreSQL migrations completed");
    Ok(())
}
