use log::{debug, info};
use crate::error::Result;
use crate::models::{Course, SelectedCourse};
use crate::utils::storage::{LocalStore, Slot};

/// The courses the student picked for the current semester, kept in sync
/// with the `selected_courses` slot after every change.
#[derive(Debug)]
pub struct SelectionStore {
    courses: Vec<SelectedCourse>,
    store: LocalStore,
}

impl SelectionStore {
    // Restores the selection saved in the store, or starts empty.
    pub fn load(store: LocalStore) -> Self {
        let courses = store.load(Slot::SelectedCourses);
        SelectionStore { courses, store }
    }

    pub fn courses(&self) -> &[SelectedCourse] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn is_selected(&self, course_id: u64) -> bool {
        self.courses.iter().any(|c| c.course.id == course_id)
    }

    // Adds the course ungraded. Returns false if it was already selected.
    pub fn add_course(&mut self, course: &Course) -> Result<bool> {
        if self.is_selected(course.id) {
            debug!("{} is already selected", course.code);
            return Ok(false);
        }

        let mut next = self.courses.clone();
        next.push(SelectedCourse::from(course.clone()));
        self.commit(next)?;
        info!("Selected {} ({} units)", course.code, course.credit_units);
        Ok(true)
    }

    // Removes the course at `position`. Out-of-range positions are ignored.
    pub fn remove_course(&mut self, position: usize) -> Result<Option<SelectedCourse>> {
        if position >= self.courses.len() {
            debug!("No selected course at position {}", position);
            return Ok(None);
        }

        let mut next = self.courses.clone();
        let removed = next.remove(position);
        self.commit(next)?;
        info!("Removed {} from the selection", removed.course.code);
        Ok(Some(removed))
    }

    /// Assigns a grade to the course at `position`.
    ///
    /// Symbols outside the grade scale are kept and count as zero points; a
    /// blank symbol clears the grade. Out-of-range positions are ignored.
    pub fn select_grade(&mut self, position: usize, symbol: &str) -> Result<bool> {
        if position >= self.courses.len() {
            debug!("No selected course at position {}", position);
            return Ok(false);
        }

        let symbol = symbol.trim();
        let grade = if symbol.is_empty() { None } else { Some(symbol.to_string()) };

        let mut next = self.courses.clone();
        next[position].grade = grade;
        self.commit(next)?;
        Ok(true)
    }

    pub fn ungraded_count(&self) -> usize {
        self.courses.iter().filter(|c| !c.is_graded()).count()
    }

    // Empties memory only. The caller has already written the empty slot.
    pub(crate) fn discard(&mut self) {
        self.courses.clear();
    }

    // Persists first; memory only changes once the write succeeded.
    fn commit(&mut self, next: Vec<SelectedCourse>) -> Result<()> {
        self.store.save(Slot::SelectedCourses, &next)?;
        self.courses = next;
        Ok(())
    }
}
