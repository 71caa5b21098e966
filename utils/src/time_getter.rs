use std::sync::Arc;

use crate::time::{self, Time};

pub trait TimeGetterFn: Send + Sync {
    fn get_time(&self) -> Time;
}

impl<F> TimeGetterFn for F
where
    F: Fn() -> Time + Send + Sync,
{
    fn get_time(&self) -> Time {
        self()
    }
}

/// The source of "now" for anything that measures age, e.g. cached query results
#[derive(Clone)]
pub struct TimeGetter {
    f: Arc<dyn TimeGetterFn>,
}

impl TimeGetter {
    #[must_use]
    pub fn new(f: Arc<dyn TimeGetterFn>) -> Self {
        Self { f }
    }

    #[must_use]
    pub fn get_time(&self) -> Time {
        self.f.get_time()
    }
}

impl Default for TimeGetter {
    fn default() -> Self {
        Self::new(Arc::new(time::get_time))
    }
}

impl std::fmt::Debug for TimeGetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeGetter").finish_non_exhaustive()
    }
}
