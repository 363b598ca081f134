//! Source file loading for critique.
//!
//! Files are read on a dedicated `std::thread` fed by a crossbeam channel so the
//! event loop never blocks on disk. Results come back as `AppEvent::FileLoaded`.
pub mod types;
pub mod worker;
