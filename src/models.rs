use serde::{de, Deserialize, Deserializer, Serialize};

// One band of the five-point grade scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeBand {
    pub symbol: &'static str,
    pub points: f64,
    pub range: &'static str,
}

// The fixed grade scale, best grade first.
pub const GRADE_SCALE: [GradeBand; 6] = [
    GradeBand { symbol: "A", points: 5.00, range: "70-100%" },
    GradeBand { symbol: "B", points: 4.00, range: "60-69%" },
    GradeBand { symbol: "C", points: 3.00, range: "50-59%" },
    GradeBand { symbol: "D", points: 2.00, range: "45-49%" },
    GradeBand { symbol: "E", points: 1.00, range: "40-44%" },
    GradeBand { symbol: "F", points: 0.00, range: "0-39%" },
];

// Looks up the band for a grade symbol, exact match only.
pub fn grade_band(symbol: &str) -> Option<&'static GradeBand> {
    GRADE_SCALE.iter().find(|band| band.symbol == symbol)
}

// Point value of a grade symbol. Symbols outside the scale are worth zero.
pub fn grade_point(symbol: &str) -> f64 {
    grade_band(symbol).map_or(0.0, |band| band.points)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Course {
    pub id: u64,
    pub code: String,
    pub title: String,
    pub credit_units: u32,
}

/// A catalog course the student picked, with the grade assigned so far.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SelectedCourse {
    #[serde(flatten)]
    pub course: Course,
    #[serde(default)]
    pub grade: Option<String>,
}

impl SelectedCourse {
    pub fn is_graded(&self) -> bool {
        self.grade.is_some()
    }
}

impl From<Course> for SelectedCourse {
    fn from(course: Course) -> Self {
        SelectedCourse { course, grade: None }
    }
}

/// A finalized semester, as kept in the ledger and sent with the CGPA roster.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SemesterResult {
    pub level_id: String,
    pub semester_id: String,
    pub label: String,
    pub gpa: String,
    pub total_credit_units: u32,
    pub total_credit_points: f64,
}

// A level or semester choice: the identifier sent to the server and the
// human-readable name used in labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TermRef {
    pub id: String,
    pub name: Option<String>,
}

impl TermRef {
    pub fn new(id: impl Into<String>) -> Self {
        TermRef { id: id.into(), name: None }
    }

    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        TermRef { id: id.into(), name: Some(name.into()) }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    pub courses: Vec<Course>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SubmittedCourse {
    pub id: u64,
    pub code: String,
    pub credit_units: u32,
    pub grade: Option<String>,
    pub credit_points: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SemesterSubmission {
    pub level: String,
    pub semester: String,
    pub courses: Vec<SubmittedCourse>,
}

#[derive(Debug, Serialize)]
pub struct CgpaRoster<'a> {
    pub semesters: &'a [SemesterResult],
}

// What the server answers to a semester submission. Every field is optional.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SemesterAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "optional_number_or_string")]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub total_credit_units: Option<u32>,
    #[serde(default, deserialize_with = "optional_number_or_string")]
    pub total_credit_points: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CgpaAck {
    #[serde(deserialize_with = "number_or_string")]
    pub cgpa: f64,
    #[serde(default)]
    pub total_credit_units: Option<u32>,
    #[serde(default, deserialize_with = "optional_number_or_string")]
    pub total_credit_points: Option<f64>,
}

// The server sends decimals either as JSON numbers or as strings like "3.60".
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    fn into_f64<E: de::Error>(self) -> Result<f64, E> {
        match self {
            RawNumber::Number(value) => Ok(value),
            RawNumber::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected a number, got {:?}", text))),
        }
    }
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    RawNumber::deserialize(deserializer)?.into_f64()
}

fn optional_number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Option::<RawNumber>::deserialize(deserializer)?
        .map(RawNumber::into_f64)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_symbols_are_worth_zero() {
        assert_eq!(grade_point("A"), 5.0);
        assert_eq!(grade_point("C"), 3.0);
        assert_eq!(grade_point("Z"), 0.0);
        assert_eq!(grade_point("a"), 0.0);
    }

    #[test]
    fn selected_course_serializes_flat() {
        let selected = SelectedCourse::from(Course {
            id: 1,
            code: "MTH101".to_string(),
            title: "Elementary Mathematics".to_string(),
            credit_units: 3,
        });
        let value = serde_json::to_value(&selected).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "code": "MTH101",
                "title": "Elementary Mathematics",
                "credit_units": 3,
                "grade": null
            })
        );
    }

    #[test]
    fn cgpa_ack_accepts_numbers_and_strings() {
        let numeric: CgpaAck = serde_json::from_str(r#"{"cgpa": 3.6}"#).unwrap();
        let textual: CgpaAck = serde_json::from_str(r#"{"cgpa": "3.60", "total_credit_points": " 18.00 "}"#).unwrap();

        assert_eq!(numeric.cgpa, 3.6);
        assert_eq!(textual.cgpa, 3.6);
        assert_eq!(textual.total_credit_points, Some(18.0));
        assert!(serde_json::from_str::<CgpaAck>(r#"{"cgpa": "n/a"}"#).is_err());
    }

    #[test]
    fn semester_ack_accepts_string_gpa_or_nothing() {
        let ack: SemesterAck = serde_json::from_str(r#"{"gpa": "3.60", "total_credit_points": null}"#).unwrap();
        assert_eq!(ack.gpa, Some(3.6));
        assert_eq!(ack.total_credit_points, None);

        let empty: SemesterAck = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, SemesterAck::default());
    }

    #[test]
    fn term_label_falls_back_to_id() {
        assert_eq!(TermRef::new("2").display_name(), "2");
        assert_eq!(TermRef::named("2", "200 Level").display_name(), "200 Level");
    }
}
