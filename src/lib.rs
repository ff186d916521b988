//! School timetable core.
//!
//! Manages a school's weekly class timetable: teachers, subjects,
//! grades, rooms, discrete time blocks, and the assignments that tie
//! them together. Two pieces carry the weight: the conflict validator,
//! which checks one candidate assignment against the committed
//! timetable and the placement rules, and the automatic generator,
//! which fills a whole school level under the same rules using the
//! validator as its constraint oracle.
//!
//! Storage is consumed through a repository abstraction — the crate
//! never binds to a concrete database.
//!
//! # Modules
//!
//! - **`models`**: domain types — `Teacher`, `Subject`, `Grade`, `Room`,
//!   `TimeBlock`, `Assignment`, `Conflict`, `Roster`
//! - **`validation`**: roster integrity checks and candidate validation
//! - **`repository`**: storage abstraction + in-memory reference backend
//! - **`generator`**: greedy and backtracking timetable generation
//! - **`stats`**: aggregate timetable statistics
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Even, Itai & Shamir (1976), "On the Complexity of Timetable and
//!   Multicommodity Flow Problems"

pub mod generator;
pub mod models;
pub mod repository;
pub mod stats;
pub mod validation;
