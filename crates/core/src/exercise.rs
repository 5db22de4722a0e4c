//! Exercise catalog types.
//!
//! The catalog itself is an external collaborator: the aggregates only hold a
//! resolved [`ExerciseSummary`] per exercise reference.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog identifier of an exercise.
pub type ExerciseId = i64;

/// Primary muscle group an exercise trains.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
    Cardio,
    #[default]
    Other,
}

impl MuscleGroup {
    pub const ALL: [Self; 8] = [
        Self::Chest,
        Self::Back,
        Self::Legs,
        Self::Shoulders,
        Self::Arms,
        Self::Core,
        Self::Cardio,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Legs => "legs",
            Self::Shoulders => "shoulders",
            Self::Arms => "arms",
            Self::Core => "core",
            Self::Cardio => "cardio",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MuscleGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown muscle group: {s}"))
    }
}

/// Full catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub description: String,
    pub muscle_group: MuscleGroup,
    /// Global exercises belong to the shared library; others are user-defined.
    pub is_global: bool,
    /// Creator of a custom exercise; `None` for global entries.
    pub owner: Option<String>,
}

impl Exercise {
    pub fn summary(&self) -> ExerciseSummary {
        ExerciseSummary {
            id: self.id,
            name: self.name.clone(),
            muscle_group: self.muscle_group,
            is_global: self.is_global,
        }
    }
}

/// Display data an aggregate embeds for each exercise reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseSummary {
    pub id: ExerciseId,
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub is_global: bool,
}

impl ExerciseSummary {
    /// Placeholder for a reference whose catalog entry has disappeared.
    pub fn unresolved(id: ExerciseId) -> Self {
        Self {
            id,
            name: format!("Exercise #{id}"),
            muscle_group: MuscleGroup::Other,
            is_global: false,
        }
    }

    pub fn is_custom(&self) -> bool {
        !self.is_global
    }
}

/// Catalog search criteria. Every populated field must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseFilter {
    /// Case-insensitive substring of the exercise name.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub muscle_group: Option<MuscleGroup>,
    #[serde(default)]
    pub is_global: Option<bool>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ExerciseFilter {
    pub fn matches(&self, exercise: &Exercise) -> bool {
        let name_ok = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()).is_none_or(
            |needle| exercise.name.to_lowercase().contains(&needle.to_lowercase()),
        );
        name_ok
            && self.muscle_group.is_none_or(|g| g == exercise.muscle_group)
            && self.is_global.is_none_or(|g| g == exercise.is_global)
    }
}

/// Built-in global library used to seed an empty catalog.
pub fn builtin_exercises() -> Vec<Exercise> {
    const LIBRARY: &[(&str, MuscleGroup)] = &[
        ("Bench Press", MuscleGroup::Chest),
        ("Incline Dumbbell Press", MuscleGroup::Chest),
        ("Push-Up", MuscleGroup::Chest),
        ("Deadlift", MuscleGroup::Back),
        ("Barbell Row", MuscleGroup::Back),
        ("Pull-Up", MuscleGroup::Back),
        ("Lat Pulldown", MuscleGroup::Back),
        ("Back Squat", MuscleGroup::Legs),
        ("Romanian Deadlift", MuscleGroup::Legs),
        ("Leg Press", MuscleGroup::Legs),
        ("Walking Lunge", MuscleGroup::Legs),
        ("Overhead Press", MuscleGroup::Shoulders),
        ("Lateral Raise", MuscleGroup::Shoulders),
        ("Barbell Curl", MuscleGroup::Arms),
        ("Triceps Pushdown", MuscleGroup::Arms),
        ("Plank", MuscleGroup::Core),
        ("Hanging Leg Raise", MuscleGroup::Core),
        ("Rowing Machine", MuscleGroup::Cardio),
    ];
    LIBRARY
        .iter()
        .zip(1_i64..)
        .map(|((name, group), id)| Exercise {
            id,
            name: (*name).to_owned(),
            description: String::new(),
            muscle_group: *group,
            is_global: true,
            owner: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squat() -> Exercise {
        Exercise {
            id: 7,
            name: "Back Squat".to_owned(),
            description: String::new(),
            muscle_group: MuscleGroup::Legs,
            is_global: true,
            owner: None,
        }
    }

    #[test]
    fn test_muscle_group_parse_is_case_insensitive() {
        assert_eq!("Legs".parse::<MuscleGroup>(), Ok(MuscleGroup::Legs));
        assert!("wings".parse::<MuscleGroup>().is_err());
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(ExerciseFilter::default().matches(&squat()));
    }

    #[test]
    fn test_filter_combines_criteria() {
        let filter = ExerciseFilter {
            search: Some("squat".to_owned()),
            muscle_group: Some(MuscleGroup::Legs),
            is_global: Some(true),
            limit: None,
        };
        assert!(filter.matches(&squat()));

        let custom_only = ExerciseFilter { is_global: Some(false), ..filter };
        assert!(!custom_only.matches(&squat()));
    }

    #[test]
    fn test_builtin_library_has_unique_ids() {
        let library = builtin_exercises();
        let mut ids: Vec<_> = library.iter().map(|e| e.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), library.len());
        assert!(library.iter().all(|e| e.is_global && e.owner.is_none()));
    }
}
