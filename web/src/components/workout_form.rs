//! Add-workout form.

use maud::{html, Markup};

use crate::model::WorkoutForm;

const EXERCISE_TYPES: [&str; 6] = ["Run", "Ride", "Swim", "Walk", "Strength", "Yoga"];

/// The form, pre-filled with `values` (empty after a successful submit).
pub fn workout_form(values: &WorkoutForm) -> Markup {
    html! {
        form.workout-form #addWorkoutForm method="post" action="/workouts" {
            h2 { "Add Workout" }
            label for="date" { "Date" }
            input #date type="date" name="date" value=(values.date) required;

            label for="duration" { "Duration (minutes)" }
            input #duration type="number" name="duration" min="1" value=(values.duration) required;

            label for="exerciseType" { "Exercise type" }
            input #exerciseType type="text" name="exercise_type" list="exerciseTypes"
                value=(values.exercise_type) required;
            datalist #exerciseTypes {
                @for kind in EXERCISE_TYPES {
                    option value=(kind) {}
                }
            }

            button.btn.btn-primary type="submit" { "Add Workout" }
            p.error #formStatus role="alert" {}
        }
    }
}
