pub mod catalog;
pub mod gpa;
pub mod ledger;
pub mod report;
pub mod selection;
pub mod storage;
pub mod sync;
