//! In-process storage backend.
//!
//! Keeps every aggregate behind one `tokio::sync::Mutex`, so each trait call is
//! atomic with respect to the others. Used when no database URL is configured
//! and by the service and HTTP tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use liftlog_core::{
    Exercise, ExerciseFilter, ExerciseId, ExerciseSummary, LoggedSet, Routine, RoutineExercise,
    Workout, WorkoutExercise, capped_limit,
};
use tokio::sync::Mutex;

use crate::error::{DuplicateKey, StorageError};
use crate::traits::{ExerciseStore, RoutineStore, WorkoutStore};

#[derive(Debug, Default)]
struct MemoryState {
    exercises: BTreeMap<ExerciseId, Exercise>,
    routines: HashMap<String, Routine>,
    workouts: HashMap<String, Workout>,
}

impl MemoryState {
    fn resolve(&self, reference: &ExerciseSummary) -> ExerciseSummary {
        self.exercises
            .get(&reference.id)
            .map_or_else(|| reference.clone(), Exercise::summary)
    }

    fn routine_view(&self, routine: &Routine) -> Routine {
        let mut view = routine.clone();
        for p in &mut view.exercises {
            p.exercise = self.resolve(&p.exercise);
        }
        view.exercises.sort_by_key(|p| p.order);
        view
    }

    fn workout_view(&self, workout: &Workout) -> Workout {
        let mut view = workout.clone();
        for e in &mut view.exercises {
            e.exercise = self.resolve(&e.exercise);
        }
        view.exercises.sort_by_key(|e| e.order);
        view
    }

    fn routine_mut(&mut self, routine_id: &str) -> Result<&mut Routine, StorageError> {
        self.routines
            .get_mut(routine_id)
            .ok_or_else(|| StorageError::not_found("routine", routine_id))
    }

    /// Workout that is still open, or the matching error.
    fn open_workout_mut(&mut self, workout_id: &str) -> Result<&mut Workout, StorageError> {
        let workout = self
            .workouts
            .get_mut(workout_id)
            .ok_or_else(|| StorageError::not_found("workout", workout_id))?;
        if workout.end_time.is_some() {
            return Err(StorageError::finished(workout_id));
        }
        Ok(workout)
    }
}

fn exercise_mut<'a>(
    workout: &'a mut Workout,
    exercise_id: &str,
) -> Result<&'a mut WorkoutExercise, StorageError> {
    workout
        .exercises
        .iter_mut()
        .find(|e| e.id == exercise_id)
        .ok_or_else(|| StorageError::not_found("workout exercise", exercise_id))
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExerciseStore for MemoryStorage {
    async fn save_exercise(&self, exercise: &Exercise) -> Result<(), StorageError> {
        self.state.lock().await.exercises.insert(exercise.id, exercise.clone());
        Ok(())
    }

    async fn get_exercise(&self, id: ExerciseId) -> Result<Option<Exercise>, StorageError> {
        Ok(self.state.lock().await.exercises.get(&id).cloned())
    }

    async fn search_exercises(
        &self,
        filter: &ExerciseFilter,
    ) -> Result<Vec<Exercise>, StorageError> {
        let state = self.state.lock().await;
        let mut found: Vec<Exercise> =
            state.exercises.values().filter(|e| filter.matches(e)).cloned().collect();
        found.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        found.truncate(capped_limit(filter.limit));
        Ok(found)
    }
}

#[async_trait]
impl RoutineStore for MemoryStorage {
    async fn list_routines(&self, owner: &str) -> Result<Vec<Routine>, StorageError> {
        let state = self.state.lock().await;
        let mut routines: Vec<Routine> = state
            .routines
            .values()
            .filter(|r| r.owner == owner)
            .map(|r| state.routine_view(r))
            .collect();
        routines.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(routines)
    }

    async fn get_routine(&self, owner: &str, id: &str) -> Result<Option<Routine>, StorageError> {
        let state = self.state.lock().await;
        Ok(state.routines.get(id).filter(|r| r.owner == owner).map(|r| state.routine_view(r)))
    }

    async fn insert_routine(&self, routine: &Routine) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        if state.routines.contains_key(&routine.id) {
            let message = format!("routine '{}'", routine.id);
            return Err(StorageError::duplicate(DuplicateKey::Id, message));
        }
        let header = Routine { exercises: Vec::new(), ..routine.clone() };
        state.routines.insert(routine.id.clone(), header);
        Ok(())
    }

    async fn update_routine_header(&self, routine: &Routine) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        let stored = state.routine_mut(&routine.id)?;
        stored.name.clone_from(&routine.name);
        stored.description.clone_from(&routine.description);
        stored.is_active = routine.is_active;
        stored.updated_at = routine.updated_at;
        Ok(())
    }

    async fn delete_routine(&self, owner: &str, id: &str) -> Result<bool, StorageError> {
        let mut state = self.state.lock().await;
        let owned = state.routines.get(id).is_some_and(|r| r.owner == owner);
        if !owned {
            return Ok(false);
        }
        state.routines.remove(id);
        // Workouts keep their routine_name snapshot but lose the reference.
        for workout in state.workouts.values_mut() {
            if workout.routine_id.as_deref() == Some(id) {
                workout.routine_id = None;
            }
        }
        Ok(true)
    }

    async fn insert_prescription(
        &self,
        routine_id: &str,
        prescription: &RoutineExercise,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        let routine = state.routine_mut(routine_id)?;
        if routine.exercises.iter().any(|p| p.exercise.id == prescription.exercise.id) {
            return Err(StorageError::duplicate(
                DuplicateKey::ExerciseId,
                format!("exercise {} already in routine '{routine_id}'", prescription.exercise.id),
            ));
        }
        if routine.exercises.iter().any(|p| p.order == prescription.order) {
            return Err(StorageError::duplicate(
                DuplicateKey::Order,
                format!("order {} already used in routine '{routine_id}'", prescription.order),
            ));
        }
        routine.exercises.push(prescription.clone());
        routine.updated_at = Utc::now();
        Ok(())
    }

    async fn update_prescription(
        &self,
        routine_id: &str,
        prescription: &RoutineExercise,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        let routine = state.routine_mut(routine_id)?;
        if routine
            .exercises
            .iter()
            .any(|p| p.id != prescription.id && p.order == prescription.order)
        {
            return Err(StorageError::duplicate(
                DuplicateKey::Order,
                format!("order {} already used in routine '{routine_id}'", prescription.order),
            ));
        }
        let stored = routine
            .exercises
            .iter_mut()
            .find(|p| p.id == prescription.id)
            .ok_or_else(|| StorageError::not_found("routine exercise", &prescription.id))?;
        stored.order = prescription.order;
        stored.target_sets = prescription.target_sets;
        stored.target_reps = prescription.target_reps;
        stored.notes.clone_from(&prescription.notes);
        routine.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_prescription(
        &self,
        routine_id: &str,
        prescription_id: &str,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        let routine = state.routine_mut(routine_id)?;
        let before = routine.exercises.len();
        routine.exercises.retain(|p| p.id != prescription_id);
        if routine.exercises.len() == before {
            return Err(StorageError::not_found("routine exercise", prescription_id));
        }
        routine.updated_at = Utc::now();
        Ok(())
    }

    async fn count_active_routines(&self, owner: &str) -> Result<usize, StorageError> {
        let state = self.state.lock().await;
        Ok(state.routines.values().filter(|r| r.owner == owner && r.is_active).count())
    }
}

#[async_trait]
impl WorkoutStore for MemoryStorage {
    async fn list_workouts(&self, owner: &str) -> Result<Vec<Workout>, StorageError> {
        let state = self.state.lock().await;
        let mut workouts: Vec<Workout> = state
            .workouts
            .values()
            .filter(|w| w.owner == owner)
            .map(|w| state.workout_view(w))
            .collect();
        workouts.sort_by(|a, b| {
            b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(workouts)
    }

    async fn get_workout(&self, owner: &str, id: &str) -> Result<Option<Workout>, StorageError> {
        let state = self.state.lock().await;
        Ok(state.workouts.get(id).filter(|w| w.owner == owner).map(|w| state.workout_view(w)))
    }

    async fn insert_workout(&self, workout: &Workout) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        if state.workouts.contains_key(&workout.id) {
            let message = format!("workout '{}'", workout.id);
            return Err(StorageError::duplicate(DuplicateKey::Id, message));
        }
        state.workouts.insert(workout.id.clone(), workout.clone());
        Ok(())
    }

    async fn update_workout_header(&self, workout: &Workout) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        let stored = state
            .workouts
            .get_mut(&workout.id)
            .ok_or_else(|| StorageError::not_found("workout", &workout.id))?;
        stored.date = workout.date;
        stored.notes.clone_from(&workout.notes);
        stored.updated_at = workout.updated_at;
        Ok(())
    }

    async fn delete_workout(&self, owner: &str, id: &str) -> Result<bool, StorageError> {
        let mut state = self.state.lock().await;
        let owned = state.workouts.get(id).is_some_and(|w| w.owner == owner);
        if owned {
            state.workouts.remove(id);
        }
        Ok(owned)
    }

    async fn insert_exercise(
        &self,
        workout_id: &str,
        exercise: &WorkoutExercise,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        let workout = state.open_workout_mut(workout_id)?;
        if workout.exercises.iter().any(|e| e.order == exercise.order) {
            return Err(StorageError::duplicate(
                DuplicateKey::Order,
                format!("order {} already used in workout '{workout_id}'", exercise.order),
            ));
        }
        workout.exercises.push(exercise.clone());
        workout.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_exercise(
        &self,
        workout_id: &str,
        exercise_id: &str,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        let workout = state.open_workout_mut(workout_id)?;
        let before = workout.exercises.len();
        workout.exercises.retain(|e| e.id != exercise_id);
        if workout.exercises.len() == before {
            return Err(StorageError::not_found("workout exercise", exercise_id));
        }
        workout.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        set: &LoggedSet,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        let workout = state.open_workout_mut(workout_id)?;
        exercise_mut(workout, exercise_id)?.sets.push(set.clone());
        workout.updated_at = Utc::now();
        Ok(())
    }

    async fn update_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        set: &LoggedSet,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        let workout = state.open_workout_mut(workout_id)?;
        let stored = exercise_mut(workout, exercise_id)?
            .sets
            .iter_mut()
            .find(|s| s.id == set.id)
            .ok_or_else(|| StorageError::not_found("set", &set.id))?;
        *stored = LoggedSet { created_at: stored.created_at, ..set.clone() };
        workout.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        set_id: &str,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        let workout = state.open_workout_mut(workout_id)?;
        let sets = &mut exercise_mut(workout, exercise_id)?.sets;
        let before = sets.len();
        sets.retain(|s| s.id != set_id);
        if sets.len() == before {
            return Err(StorageError::not_found("set", set_id));
        }
        workout.updated_at = Utc::now();
        Ok(())
    }

    async fn finish_workout(
        &self,
        workout_id: &str,
        end_time: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        let workout = state.open_workout_mut(workout_id)?;
        workout.end_time = Some(end_time);
        workout.updated_at = end_time;
        Ok(())
    }
}
