use crate::models::{CgpaAck, Course, SelectedCourse, SemesterAck, SemesterResult, GRADE_SCALE};
use crate::utils::gpa::{calculate_gpa, format_credit_points, total_credit_points, total_credit_units};
use crate::utils::ledger::SemesterLedger;
use crate::utils::sync::SyncOutcome;

// Lists the grade scale with its score ranges.
pub fn grade_scale_message() -> String {
    let mut message = String::from("📏 Grade scale\n\n");
    for band in GRADE_SCALE.iter() {
        message.push_str(&format!("{} ({:>7}) : {:.2}\n", band.symbol, band.range, band.points));
    }
    message
}

pub fn catalog_message(courses: &[&Course], selected: impl Fn(u64) -> bool) -> String {
    if courses.is_empty() {
        return String::from("No courses available.\n");
    }

    let mut message = String::new();
    for course in courses {
        let mark = if selected(course.id) { "✔" } else { " " };
        message.push_str(&format!(
            "{} [{}] {:<8} {:<40} {} CU\n",
            mark, course.id, course.code, course.title, course.credit_units
        ));
    }
    message
}

// The working selection with per-course points and the running GPA.
pub fn selection_message(courses: &[SelectedCourse]) -> String {
    if courses.is_empty() {
        return String::from("No courses selected.\n");
    }

    let mut message = String::from("📚 Selected courses\n\n");
    for (position, selected) in courses.iter().enumerate() {
        message.push_str(&format!(
            "{:>2}. {:<8} {:>2} CU  grade {:<2} points {}\n",
            position + 1,
            selected.course.code,
            selected.course.credit_units,
            selected.grade.as_deref().unwrap_or("-"),
            format_credit_points(selected)
        ));
    }
    message.push_str(&format!(
        "\nTotal credit units: {}\nTotal credit points: {:.2}\nGPA: {}\n",
        total_credit_units(courses),
        total_credit_points(courses),
        calculate_gpa(courses)
    ));
    message
}

pub fn ledger_message(ledger: &SemesterLedger) -> String {
    if ledger.is_empty() {
        return String::from("No saved semesters.\nCGPA: 0.00\n");
    }

    let mut message = String::from("🎓 Saved semesters\n\n");
    for (position, semester) in ledger.semesters().iter().enumerate() {
        message.push_str(&semester_line(position, semester));
    }
    message.push_str(&format!(
        "\nTotal credit units: {}\nTotal credit points: {:.2}\nCGPA: {}\n",
        ledger.cgpa_total_credit_units(),
        ledger.cgpa_total_credit_points(),
        ledger.calculate_cgpa()
    ));
    message
}

fn semester_line(position: usize, semester: &SemesterResult) -> String {
    format!(
        "{:>2}. {:<35} GPA {}  ({} CU, {:.2} points)\n",
        position + 1,
        semester.label,
        semester.gpa,
        semester.total_credit_units,
        semester.total_credit_points
    )
}

pub fn semester_saved_message(result: &SemesterResult, sync: &SyncOutcome<SemesterAck>) -> String {
    let saved = format!("Saved {} with GPA {}", result.label, result.gpa);
    match sync {
        SyncOutcome::Synced(ack) => match &ack.message {
            Some(server_message) => format!("{}. Server: {}", saved, server_message),
            None => format!("{}.", saved),
        },
        SyncOutcome::Offline { .. } => format!("{} (Offline mode).", saved),
    }
}

// Server-confirmed CGPA when the roster went through, the local one otherwise.
pub fn cgpa_message(local_cgpa: &str, sync: &SyncOutcome<CgpaAck>) -> String {
    match sync {
        SyncOutcome::Synced(ack) => format!("CGPA of {:.2} has been saved successfully!", ack.cgpa),
        SyncOutcome::Offline { .. } => format!("CGPA calculation complete: {} (Offline mode)", local_cgpa),
    }
}
