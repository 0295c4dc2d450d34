// Pure GPA arithmetic over a snapshot of the selection.
use crate::models::{grade_point, SelectedCourse};

// Rounds half away from zero to two decimal places. Zero always comes back
// as +0.0 so it never prints as "-0.00".
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

// Zero-guarded points/units ratio as a two-decimal string.
pub fn average(total_points: f64, total_units: u32) -> String {
    if total_units == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", round2(total_points / f64::from(total_units)))
}

// Counts every selected course, graded or not.
pub fn total_credit_units(courses: &[SelectedCourse]) -> u32 {
    courses.iter().map(|c| c.course.credit_units).sum()
}

// Credit points of a single course; None while the course is ungraded.
pub fn credit_points(course: &SelectedCourse) -> Option<f64> {
    course
        .grade
        .as_deref()
        .map(|grade| grade_point(grade) * f64::from(course.course.credit_units))
}

pub fn format_credit_points(course: &SelectedCourse) -> String {
    match credit_points(course) {
        Some(points) => format!("{:.2}", points),
        None => "—".to_string(),
    }
}

pub fn total_credit_points(courses: &[SelectedCourse]) -> f64 {
    round2(courses.iter().filter_map(credit_points).fold(0.0, |total, points| total + points))
}

pub fn calculate_gpa(courses: &[SelectedCourse]) -> String {
    average(total_credit_points(courses), total_credit_units(courses))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Course;

    fn course(id: u64, code: &str, units: u32, grade: Option<&str>) -> SelectedCourse {
        SelectedCourse {
            course: Course {
                id,
                code: code.to_string(),
                title: format!("{} title", code),
                credit_units: units,
            },
            grade: grade.map(str::to_string),
        }
    }

    #[test]
    fn single_a_course() {
        let courses = vec![course(1, "MTH101", 3, Some("A"))];
        assert_eq!(total_credit_points(&courses), 15.0);
        assert_eq!(total_credit_units(&courses), 3);
        assert_eq!(calculate_gpa(&courses), "5.00");
    }

    #[test]
    fn weighted_b_and_c() {
        let courses = vec![course(1, "PHY101", 3, Some("B")), course(2, "CHM101", 2, Some("C"))];
        assert_eq!(total_credit_points(&courses), 18.0);
        assert_eq!(total_credit_units(&courses), 5);
        assert_eq!(calculate_gpa(&courses), "3.60");
    }

    #[test]
    fn ungraded_courses_count_units_but_not_points() {
        let courses = vec![course(1, "MTH101", 3, Some("A")), course(2, "GST101", 2, None)];
        assert_eq!(total_credit_units(&courses), 5);
        assert_eq!(total_credit_points(&courses), 15.0);
        assert_eq!(calculate_gpa(&courses), "3.00");
    }

    #[test]
    fn empty_and_zero_unit_selections_are_zero() {
        assert_eq!(calculate_gpa(&[]), "0.00");
        let zero_units = vec![course(1, "SIW100", 0, Some("A"))];
        assert_eq!(calculate_gpa(&zero_units), "0.00");
    }

    #[test]
    fn all_ungraded_selection_is_positive_zero() {
        let courses = vec![course(1, "MTH101", 3, None), course(2, "PHY101", 2, None)];
        let points = total_credit_points(&courses);
        assert_eq!(points, 0.0);
        assert!(points.is_sign_positive());
        assert_eq!(format!("{:.2}", points), "0.00");
        assert_eq!(calculate_gpa(&courses), "0.00");
    }

    #[test]
    fn round2_never_returns_negative_zero() {
        assert!(round2(-0.0).is_sign_positive());
        assert!(round2(-0.001).is_sign_positive());
        assert_eq!(round2(4.125), 4.13);
    }

    #[test]
    fn unknown_grade_is_zero_points_not_ungraded() {
        let c = course(1, "MTH101", 3, Some("X"));
        assert_eq!(credit_points(&c), Some(0.0));
        assert_eq!(format_credit_points(&c), "0.00");
    }

    #[test]
    fn ungraded_course_shows_sentinel() {
        let c = course(1, "MTH101", 3, None);
        assert_eq!(credit_points(&c), None);
        assert_eq!(format_credit_points(&c), "—");
    }

    #[test]
    fn gpa_rounds_to_two_decimals() {
        // 5*3 + 4*3 + 2*1 = 29 points over 7 units
        let courses = vec![
            course(1, "A1", 3, Some("A")),
            course(2, "B1", 3, Some("B")),
            course(3, "D1", 1, Some("D")),
        ];
        assert_eq!(calculate_gpa(&courses), "4.14");
    }

    #[test]
    fn units_sum_regardless_of_grades() {
        let grades = [None, Some("A"), Some("F"), Some("??"), None];
        let courses: Vec<_> = grades
            .iter()
            .enumerate()
            .map(|(i, g)| course(i as u64, "X", i as u32 + 1, *g))
            .collect();
        assert_eq!(total_credit_units(&courses), 1 + 2 + 3 + 4 + 5);
    }
}
