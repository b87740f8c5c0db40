//! Test fixtures for availability integration tests.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use slotwise_common::{BoxFuture, BusyInterval, BusyIntervalProvider, TimeWindow};
use slotwise_config::{AppConfig, SchedulingConfig};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("fake provider offline")]
pub struct FakeProviderError;

/// Provider returning a fixed busy list and recording the windows it was asked for.
#[derive(Default)]
pub struct FakeProvider {
    busy: Vec<BusyInterval>,
    fail: bool,
    requests: Mutex<Vec<TimeWindow>>,
}

impl FakeProvider {
    pub fn with_busy(busy: Vec<BusyInterval>) -> Self {
        Self {
            busy,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<TimeWindow> {
        self.requests.lock().unwrap().clone()
    }
}

impl BusyIntervalProvider for FakeProvider {
    type Error = FakeProviderError;

    fn fetch_busy(&self, window: TimeWindow) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(window);
            if self.fail {
                return Err(FakeProviderError);
            }
            Ok(self
                .busy
                .iter()
                .copied()
                .filter(|b| b.overlaps(window.start, window.end))
                .collect())
        })
    }
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Default configuration with the given scheduling section.
pub fn config_with(scheduling: SchedulingConfig) -> AppConfig {
    AppConfig {
        scheduling,
        ..AppConfig::default()
    }
}
