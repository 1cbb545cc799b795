// src/progress.rs
/// Progress reporting for the multi-document pipeline.
/// Frontends implement this to surface status to users; every method is optional.
pub trait Progress {
    /// Called once with the number of schedule documents to parse.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One document was parsed (`events` may be zero).
    fn item_done(&mut self, _course: &str, _events: usize) {}

    /// One document could not be loaded.
    fn item_failed(&mut self, _course: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
