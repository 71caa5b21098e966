use std::{
    fmt::{Debug, Display},
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, SystemTime},
};

use chrono::TimeZone;

pub fn duration_to_int(d: &Duration) -> Result<u64, std::num::TryFromIntError> {
    let r = d.as_millis().try_into()?;
    Ok(r)
}

#[must_use]
pub fn duration_from_int(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Mocked time in milliseconds since the epoch; zero means "use the system clock"
static TIME_SOURCE: AtomicU64 = AtomicU64::new(0);

fn get_mocked_time() -> Option<Time> {
    let value = TIME_SOURCE.load(Ordering::SeqCst);
    if value != 0 {
        Some(Time::from_duration_since_epoch(duration_from_int(value)))
    } else {
        None
    }
}

/// Go back to the system clock
pub fn reset() {
    TIME_SOURCE.store(0, Ordering::SeqCst);
}

/// Freeze the current time at `now`, a duration since `SystemTime::UNIX_EPOCH`
pub fn set(now: Duration) -> Result<(), std::num::TryFromIntError> {
    TIME_SOURCE.store(duration_to_int(&now)?, Ordering::SeqCst);
    Ok(())
}

#[must_use]
pub fn get_time() -> Time {
    match get_mocked_time() {
        Some(mocked_time) => mocked_time,
        None => Time::from_duration_since_epoch(
            SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or(Duration::ZERO),
        ),
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time {
    /// Time, stored as duration since `SystemTime::UNIX_EPOCH`
    time: Duration,
}

impl Time {
    #[must_use]
    pub const fn as_duration_since_epoch(&self) -> Duration {
        self.time
    }

    #[must_use]
    pub const fn as_secs_since_epoch(&self) -> u64 {
        self.time.as_secs()
    }

    #[must_use]
    pub const fn from_duration_since_epoch(duration: Duration) -> Self {
        Self { time: duration }
    }

    #[must_use]
    pub const fn from_secs_since_epoch(seconds: u64) -> Self {
        Self {
            time: Duration::from_secs(seconds),
        }
    }

    #[must_use]
    pub const fn saturating_duration_add(&self, duration: Duration) -> Self {
        Self {
            time: self.time.saturating_add(duration),
        }
    }

    /// Elapsed time from `earlier` to `self`, zero if `earlier` is in the future
    #[must_use]
    pub const fn saturating_sub(&self, earlier: Self) -> Duration {
        self.time.saturating_sub(earlier.time)
    }

    #[must_use]
    pub fn as_absolute_time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        TryInto::<i64>::try_into(self.time.as_secs())
            .ok()
            .and_then(|secs| {
                chrono::Utc
                    .timestamp_opt(secs, self.time.subsec_nanos())
                    .single()
            })
    }
}

impl Debug for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_absolute_time() {
            Some(time) => write!(f, "{time:?}"),
            None => write!(f, "Time({:?})", self.time),
        }
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_absolute_time() {
            Some(time) => write!(f, "{time}"),
            None => write!(f, "{:?} since Unix epoch", self.time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn mocked_time_is_frozen() {
        set(Duration::from_secs(1337)).unwrap();

        assert_eq!(get_time().as_secs_since_epoch(), 1337);
        std::thread::sleep(Duration::from_millis(200));
        assert_eq!(get_time().as_secs_since_epoch(), 1337);

        reset();
        assert_ne!(get_time().as_secs_since_epoch(), 1337);
    }

    #[test]
    #[serial_test::serial]
    fn mocked_time_is_reported() {
        assert_eq!(get_mocked_time(), None);

        set(Duration::from_secs(1337)).unwrap();
        assert_eq!(get_mocked_time(), Some(Time::from_secs_since_epoch(1337)));

        reset();
        assert_eq!(get_mocked_time(), None);
    }

    #[test]
    fn saturating_arithmetic() {
        let t = Time::from_secs_since_epoch(100);
        let later = t.saturating_duration_add(Duration::from_secs(30));
        assert_eq!(later.saturating_sub(t), Duration::from_secs(30));
        assert_eq!(t.saturating_sub(later), Duration::ZERO);
    }

    #[test]
    fn debug_display() {
        let t = Time::from_secs_since_epoch(1705064092);
        assert_eq!(format!("{t:?}"), "2024-01-12T12:54:52Z");
        assert_eq!(format!("{t}"), "2024-01-12 12:54:52 UTC");

        let t = Time::from_duration_since_epoch(Duration::MAX);
        assert_eq!(format!("{t:?}"), "Time(18446744073709551615.999999999s)");
        assert_eq!(format!("{t}"), "18446744073709551615.999999999s since Unix epoch");
    }
}
