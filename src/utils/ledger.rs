use log::info;
use crate::error::{LedgerError, Result};
use crate::models::{SelectedCourse, SemesterResult, TermRef};
use crate::utils::gpa::{average, calculate_gpa, round2, total_credit_points, total_credit_units};
use crate::utils::storage::{LocalStore, Slot};

/// Finalized semesters in the order they were saved, persisted in the
/// `saved_semesters` slot.
#[derive(Debug)]
pub struct SemesterLedger {
    semesters: Vec<SemesterResult>,
    store: LocalStore,
}

impl SemesterLedger {
    pub fn load(store: LocalStore) -> Self {
        let semesters = store.load(Slot::SavedSemesters);
        SemesterLedger { semesters, store }
    }

    pub fn semesters(&self) -> &[SemesterResult] {
        &self.semesters
    }

    pub fn len(&self) -> usize {
        self.semesters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.semesters.is_empty()
    }

    pub fn append(&mut self, result: SemesterResult) -> Result<()> {
        let mut next = self.semesters.clone();
        next.push(result);
        self.commit(next)
    }

    // Removes a saved semester by position. Out-of-range positions are ignored.
    pub fn remove_saved_semester(&mut self, position: usize) -> Result<Option<SemesterResult>> {
        if position >= self.semesters.len() {
            return Ok(None);
        }

        let mut next = self.semesters.clone();
        let removed = next.remove(position);
        self.commit(next)?;
        info!("Removed saved semester {}", removed.label);
        Ok(Some(removed))
    }

    // Empties memory only. The caller has already written the empty slot.
    pub(crate) fn discard(&mut self) {
        self.semesters.clear();
    }

    pub fn cgpa_total_credit_units(&self) -> u32 {
        self.semesters.iter().map(|s| s.total_credit_units).sum()
    }

    pub fn cgpa_total_credit_points(&self) -> f64 {
        round2(self.semesters.iter().fold(0.0, |total, s| total + s.total_credit_points))
    }

    pub fn calculate_cgpa(&self) -> String {
        average(self.cgpa_total_credit_points(), self.cgpa_total_credit_units())
    }

    fn commit(&mut self, next: Vec<SemesterResult>) -> Result<()> {
        self.store.save(Slot::SavedSemesters, &next)?;
        self.semesters = next;
        Ok(())
    }
}

// Label shown for a saved semester, e.g. "100 Level - First Semester".
pub fn semester_label(level: &TermRef, semester: &TermRef) -> String {
    format!("{} - {}", level.display_name(), semester.display_name())
}

/// Builds the result of the current selection, checking that it can be
/// finalized: a level and semester are chosen, and every course is graded.
pub fn build_semester_result(
    courses: &[SelectedCourse],
    level: Option<&TermRef>,
    semester: Option<&TermRef>,
) -> Result<SemesterResult> {
    let (level, semester) = match (level, semester) {
        (Some(level), Some(semester)) => (level, semester),
        _ => return Err(LedgerError::TermNotSelected),
    };
    if courses.is_empty() {
        return Err(LedgerError::EmptySelection);
    }
    let ungraded = courses.iter().filter(|c| !c.is_graded()).count();
    if ungraded > 0 {
        return Err(LedgerError::UngradedCourses { ungraded });
    }

    Ok(SemesterResult {
        level_id: level.id.clone(),
        semester_id: semester.id.clone(),
        label: semester_label(level, semester),
        gpa: calculate_gpa(courses),
        total_credit_units: total_credit_units(courses),
        total_credit_points: total_credit_points(courses),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Course;

    fn graded(id: u64, units: u32, grade: Option<&str>) -> SelectedCourse {
        SelectedCourse {
            course: Course {
                id,
                code: format!("C{}", id),
                title: "Course".to_string(),
                credit_units: units,
            },
            grade: grade.map(str::to_string),
        }
    }

    fn saved(units: u32, points: f64) -> SemesterResult {
        SemesterResult {
            level_id: "1".to_string(),
            semester_id: "1".to_string(),
            label: "100 Level - First Semester".to_string(),
            gpa: average(points, units),
            total_credit_units: units,
            total_credit_points: points,
        }
    }

    #[test]
    fn cgpa_without_semesters_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = SemesterLedger::load(LocalStore::new(dir.path()));
        assert_eq!(ledger.calculate_cgpa(), "0.00");
        assert!(ledger.cgpa_total_credit_points().is_sign_positive());
        assert!(ledger.is_empty());
    }

    #[test]
    fn cgpa_weights_by_units() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = SemesterLedger::load(LocalStore::new(dir.path()));
        ledger.append(saved(5, 18.0)).unwrap();
        ledger.append(saved(3, 15.0)).unwrap();

        assert_eq!(ledger.cgpa_total_credit_units(), 8);
        assert_eq!(ledger.cgpa_total_credit_points(), 33.0);
        assert_eq!(ledger.calculate_cgpa(), "4.13");
    }

    #[test]
    fn remove_by_position_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = SemesterLedger::load(LocalStore::new(dir.path()));
        ledger.append(saved(5, 18.0)).unwrap();
        ledger.append(saved(3, 15.0)).unwrap();

        assert!(ledger.remove_saved_semester(7).unwrap().is_none());
        let removed = ledger.remove_saved_semester(0).unwrap().unwrap();
        assert_eq!(removed.total_credit_units, 5);

        let reloaded = SemesterLedger::load(LocalStore::new(dir.path()));
        assert_eq!(reloaded.semesters(), ledger.semesters());
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn result_is_built_from_graded_selection() {
        let level = TermRef::named("1", "100 Level");
        let semester = TermRef::named("2", "Second Semester");
        let courses = vec![graded(1, 3, Some("B")), graded(2, 2, Some("C"))];

        let result = build_semester_result(&courses, Some(&level), Some(&semester)).unwrap();

        assert_eq!(result.label, "100 Level - Second Semester");
        assert_eq!(result.level_id, "1");
        assert_eq!(result.semester_id, "2");
        assert_eq!(result.gpa, "3.60");
        assert_eq!(result.total_credit_units, 5);
        assert_eq!(result.total_credit_points, 18.0);
    }

    #[test]
    fn ungraded_selection_is_rejected() {
        let level = TermRef::new("1");
        let semester = TermRef::new("1");
        let courses = vec![graded(1, 3, Some("A")), graded(2, 2, None), graded(3, 1, None)];

        let err = build_semester_result(&courses, Some(&level), Some(&semester)).unwrap_err();
        assert!(matches!(err, LedgerError::UngradedCourses { ungraded: 2 }));
        assert_eq!(err.to_string(), "Please assign grades to all courses before saving.");
    }

    #[test]
    fn missing_term_or_courses_is_rejected() {
        let term = TermRef::new("1");
        let courses = vec![graded(1, 3, Some("A"))];
        assert!(matches!(
            build_semester_result(&courses, None, Some(&term)),
            Err(LedgerError::TermNotSelected)
        ));
        assert!(matches!(
            build_semester_result(&[], Some(&term), Some(&term)),
            Err(LedgerError::EmptySelection)
        ));
    }
}
