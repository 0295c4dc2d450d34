//! The GPA/CGPA calculator: one object owning the loaded catalog, the
//! working selection and the semester ledger.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use reqwest::Client;
use crate::config::Config;
use crate::error::{LedgerError, Result as LedgerResult};
use crate::models::{CgpaAck, CgpaRoster, Course, SelectedCourse, SemesterAck, SemesterResult, TermRef};
use crate::utils::catalog::{filter_courses, CatalogFetch, CatalogLoader};
use crate::utils::gpa;
use crate::utils::ledger::{build_semester_result, SemesterLedger};
use crate::utils::selection::SelectionStore;
use crate::utils::storage::{LocalStore, Slot};
use crate::utils::sync::{semester_submission, SyncClient, SyncOutcome};

/// What `finalize_semester` saved and how the remote copy went.
#[derive(Debug, Clone)]
pub struct FinalizeReport {
    pub result: SemesterResult,
    pub sync: SyncOutcome<SemesterAck>,
}

#[derive(Debug, Clone)]
pub struct CgpaReport {
    pub local_cgpa: String,
    pub sync: SyncOutcome<CgpaAck>,
}

impl CgpaReport {
    // The CGPA to show: the server's when it answered, the local one otherwise.
    pub fn cgpa(&self) -> String {
        match &self.sync {
            SyncOutcome::Synced(ack) => format!("{:.2}", ack.cgpa),
            SyncOutcome::Offline { .. } => self.local_cgpa.clone(),
        }
    }
}

pub struct GradeLedger {
    loader: CatalogLoader,
    sync: SyncClient,
    catalog: Vec<Course>,
    level: Option<TermRef>,
    semester: Option<TermRef>,
    search_query: String,
    selection: SelectionStore,
    ledger: SemesterLedger,
    store: LocalStore,
}

impl GradeLedger {
    // Builds the HTTP client and restores both local slots.
    pub fn open(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build the client")?;
        let endpoints = config.endpoints()?;
        let store = LocalStore::new(&config.data_dir);

        let calculator = GradeLedger {
            loader: CatalogLoader::new(client.clone(), endpoints.clone()),
            sync: SyncClient::new(client, endpoints),
            catalog: Vec::new(),
            level: None,
            semester: None,
            search_query: String::new(),
            selection: SelectionStore::load(store.clone()),
            ledger: SemesterLedger::load(store.clone()),
            store,
        };
        info!(
            "Restored {} selected courses and {} saved semesters from {}",
            calculator.selection.len(),
            calculator.ledger.len(),
            config.data_dir.display()
        );
        Ok(calculator)
    }

    pub fn loader(&self) -> &CatalogLoader {
        &self.loader
    }

    pub fn level(&self) -> Option<&TermRef> {
        self.level.as_ref()
    }

    pub fn semester(&self) -> Option<&TermRef> {
        self.semester.as_ref()
    }

    /// Switches level/semester and reloads the catalog for the new pair.
    ///
    /// Returns whether the loaded catalog was applied. It is not applied when
    /// a newer load was issued through a clone of the loader meanwhile.
    pub async fn select_term(&mut self, level: Option<TermRef>, semester: Option<TermRef>) -> bool {
        self.level = level;
        self.semester = semester;

        let fetch = self.loader
            .load(self.level.as_ref().map(|l| l.id.as_str()), self.semester.as_ref().map(|s| s.id.as_str()))
            .await;
        self.apply_catalog(fetch)
    }

    // Records the level/semester used for labels and submissions without
    // reloading the catalog.
    pub fn set_term(&mut self, level: Option<TermRef>, semester: Option<TermRef>) {
        self.level = level;
        self.semester = semester;
    }

    // Replaces the catalog unless the fetch has been superseded.
    pub fn apply_catalog(&mut self, fetch: CatalogFetch) -> bool {
        if !self.loader.is_current(&fetch) {
            debug!("Discarding superseded catalog load #{}", fetch.generation);
            return false;
        }
        self.catalog = fetch.courses;
        true
    }

    pub fn catalog(&self) -> &[Course] {
        &self.catalog
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn filtered_courses(&self) -> Vec<&Course> {
        filter_courses(&self.catalog, &self.search_query)
    }

    pub fn selection(&self) -> &[SelectedCourse] {
        self.selection.courses()
    }

    pub fn is_selected(&self, course_id: u64) -> bool {
        self.selection.is_selected(course_id)
    }

    pub fn add_course(&mut self, course: &Course) -> LedgerResult<bool> {
        self.selection.add_course(course)
    }

    // Adds a course of the loaded catalog by id. Unknown ids are ignored.
    pub fn add_course_by_id(&mut self, course_id: u64) -> LedgerResult<bool> {
        match self.catalog.iter().find(|c| c.id == course_id).cloned() {
            Some(course) => self.selection.add_course(&course),
            None => {
                warn!("Course {} is not in the loaded catalog", course_id);
                Ok(false)
            },
        }
    }

    pub fn remove_course(&mut self, position: usize) -> LedgerResult<Option<SelectedCourse>> {
        self.selection.remove_course(position)
    }

    pub fn select_grade(&mut self, position: usize, symbol: &str) -> LedgerResult<bool> {
        self.selection.select_grade(position, symbol)
    }

    pub fn total_credit_units(&self) -> u32 {
        gpa::total_credit_units(self.selection.courses())
    }

    pub fn total_credit_points(&self) -> f64 {
        gpa::total_credit_points(self.selection.courses())
    }

    pub fn calculate_gpa(&self) -> String {
        gpa::calculate_gpa(self.selection.courses())
    }

    pub fn ledger(&self) -> &SemesterLedger {
        &self.ledger
    }

    pub fn calculate_cgpa(&self) -> String {
        self.ledger.calculate_cgpa()
    }

    /// Saves the current semester.
    ///
    /// The result is appended to the ledger and written locally first; the
    /// remote submission only happens afterwards and its failure is reported
    /// in the returned [`FinalizeReport`] without undoing the local save.
    pub async fn finalize_semester(&mut self) -> LedgerResult<FinalizeReport> {
        let courses = self.selection.courses();
        let result = build_semester_result(courses, self.level.as_ref(), self.semester.as_ref())?;
        let submission = semester_submission(courses, &result);

        self.ledger.append(result.clone())?;
        info!("Saved {} with GPA {}", result.label, result.gpa);

        let sync = self.sync.sync_semester(&submission).await;
        Ok(FinalizeReport { result, sync })
    }

    pub fn remove_saved_semester(&mut self, position: usize) -> LedgerResult<Option<SemesterResult>> {
        self.ledger.remove_saved_semester(position)
    }

    // Sends the whole ledger for a server-side CGPA. The ledger is never
    // changed by this call.
    pub async fn save_cgpa(&self) -> LedgerResult<CgpaReport> {
        if self.ledger.is_empty() {
            return Err(LedgerError::NoSavedSemesters);
        }

        let roster = CgpaRoster { semesters: self.ledger.semesters() };
        let sync = self.sync.sync_cgpa(&roster).await;
        Ok(CgpaReport {
            local_cgpa: self.ledger.calculate_cgpa(),
            sync,
        })
    }

    /// Wipes the selection and every saved semester. Nothing happens unless
    /// `confirmed` is true; returns whether the reset took place. Both slots
    /// are emptied together or, on a storage error, not at all.
    pub fn reset_calculator(&mut self, confirmed: bool) -> LedgerResult<bool> {
        if !confirmed {
            debug!("Reset not confirmed");
            return Ok(false);
        }

        let no_courses: &[SelectedCourse] = &[];
        let no_semesters: &[SemesterResult] = &[];
        self.store.save_both((Slot::SelectedCourses, no_courses), (Slot::SavedSemesters, no_semesters))?;
        self.selection.discard();
        self.ledger.discard();
        info!("Calculator reset");
        Ok(true)
    }
}
