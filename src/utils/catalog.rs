use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use anyhow::{Context, Result};
use log::{error, info};
use reqwest::Client;
use crate::config::Endpoints;
use crate::models::{CatalogResponse, Course};

// Requests the course list of a level/semester pair.
pub async fn fetch_courses(client: &Client, endpoints: &Endpoints, level: &str, semester: &str) -> Result<Vec<Course>> {
    let response = client.get(endpoints.courses.clone())
        .query(&[("level", level), ("semester", semester)])
        .send()
        .await
        .context("Failed to send courses request")?
        .error_for_status()
        .context("Courses request was rejected")?;

    let catalog: CatalogResponse = response.json()
        .await
        .context("Failed to parse courses response")?;

    Ok(catalog.courses)
}

/// The outcome of one catalog load, tagged with the generation it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFetch {
    pub generation: u64,
    pub courses: Vec<Course>,
}

/// Loads catalogs and keeps track of which load is the newest.
///
/// Clones share the generation counter, so loads issued from any clone
/// supersede each other.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    client: Client,
    endpoints: Endpoints,
    generation: Arc<AtomicU64>,
}

impl CatalogLoader {
    pub fn new(client: Client, endpoints: Endpoints) -> Self {
        CatalogLoader {
            client,
            endpoints,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    // Loads the catalog for the pair. Missing identifiers or any failure
    // give an empty list; failures are logged, never returned.
    pub async fn load(&self, level: Option<&str>, semester: Option<&str>) -> CatalogFetch {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let (level, semester) = match (level, semester) {
            (Some(level), Some(semester)) if !level.is_empty() && !semester.is_empty() => (level, semester),
            _ => return CatalogFetch { generation, courses: Vec::new() },
        };

        let courses = match fetch_courses(&self.client, &self.endpoints, level, semester).await {
            Ok(courses) => {
                info!("Loaded {} courses for level {} semester {}", courses.len(), level, semester);
                courses
            },
            Err(e) => {
                error!("Error fetching courses: {:#}", e);
                Vec::new()
            },
        };

        CatalogFetch { generation, courses }
    }

    pub fn is_current(&self, fetch: &CatalogFetch) -> bool {
        fetch.generation == self.generation.load(Ordering::SeqCst)
    }
}

// Case-insensitive substring match on code or title. A blank query keeps everything.
pub fn filter_courses<'a>(courses: &'a [Course], query: &str) -> Vec<&'a Course> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return courses.iter().collect();
    }

    courses
        .iter()
        .filter(|course| course.code.to_lowercase().contains(&query) || course.title.to_lowercase().contains(&query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Course> {
        vec![
            Course { id: 1, code: "MTH101".to_string(), title: "Elementary Mathematics I".to_string(), credit_units: 3 },
            Course { id: 2, code: "PHY101".to_string(), title: "General Physics I".to_string(), credit_units: 3 },
            Course { id: 3, code: "GST111".to_string(), title: "Communication in English".to_string(), credit_units: 2 },
        ]
    }

    #[test]
    fn blank_query_keeps_the_catalog() {
        let courses = catalog();
        assert_eq!(filter_courses(&courses, "").len(), 3);
        assert_eq!(filter_courses(&courses, "   ").len(), 3);
    }

    #[test]
    fn query_matches_code_or_title_ignoring_case() {
        let courses = catalog();
        let by_code: Vec<_> = filter_courses(&courses, "mth").iter().map(|c| c.id).collect();
        assert_eq!(by_code, [1]);
        let by_title: Vec<_> = filter_courses(&courses, " GENERAL ").iter().map(|c| c.id).collect();
        assert_eq!(by_title, [2]);
        let shared: Vec<_> = filter_courses(&courses, "i").iter().map(|c| c.id).collect();
        assert_eq!(shared, [1, 2, 3]);
        assert!(filter_courses(&courses, "biology").is_empty());
    }
}
