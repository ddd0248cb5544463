//! Command arguments for device settings.
//!
//! This module encodes the arguments of the display and night mode
//! commands sent by [`crate::AirQualityMonitor`].


use cleargrass_types::PropertyValue;

use crate::error::{Error, Result};

/// Last valid second of a day.
pub const MAX_DAY_SECONDS: i64 = 86_399;

/// On/off argument used by the toggle commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    /// `"on"`.
    On,
    /// `"off"`.
    Off,
}

impl Switch {
    /// Wire literal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Switch::On => "on",
            Switch::Off => "off",
        }
    }

    /// Single-element parameter list for the driver.
    pub fn to_params(self) -> Vec<PropertyValue> {
        vec![PropertyValue::from(self.as_str())]
    }
}

impl From<bool> for Switch {
    fn from(enabled: bool) -> Self {
        if enabled { Switch::On } else { Switch::Off }
    }
}

/// Daily night mode window, as seconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightSchedule {
    /// Begin offset in seconds.
    pub begin: u32,
    /// End offset in seconds.
    pub end: u32,
}

impl NightSchedule {
    /// Build a schedule from wall clock times.
    ///
    /// Offsets are computed as `hour * 3600 + minute * 60`. Both must fall in
    /// `0..=86399`, otherwise [`Error::InvalidSchedule`] is returned. The
    /// window may wrap past midnight (begin after end).
    ///
    /// # Example
    ///
    /// ```
    /// use cleargrass_core::NightSchedule;
    ///
    /// let schedule = NightSchedule::from_hm(23, 30, 6, 0).unwrap();
    /// assert_eq!(schedule.begin, 84600);
    /// assert_eq!(schedule.end, 21600);
    /// assert!(NightSchedule::from_hm(24, 0, 6, 0).is_err());
    /// ```
    pub fn from_hm(begin_hour: i32, begin_minute: i32, end_hour: i32, end_minute: i32) -> Result<Self> {
        let begin = i64::from(begin_hour) * 3600 + i64::from(begin_minute) * 60;
        let end = i64::from(end_hour) * 3600 + i64::from(end_minute) * 60;

        let in_day = |secs: i64| (0..=MAX_DAY_SECONDS).contains(&secs);
        if !in_day(begin) || !in_day(end) {
            return Err(Error::InvalidSchedule { begin, end });
        }

        // Both values are within 0..=86399 here.
        Ok(Self {
            begin: begin as u32,
            end: end as u32,
        })
    }

    /// Parameter list for the driver.
    pub fn to_params(self) -> Vec<PropertyValue> {
        vec![PropertyValue::from(self.begin), PropertyValue::from(self.end)]
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn schedule_accepts_exactly_in_day_offsets(
            bh in -30i32..30,
            bm in -120i32..120,
            eh in -30i32..30,
            em in -120i32..120,
        ) {
            let begin = i64::from(bh) * 3600 + i64::from(bm) * 60;
            let end = i64::from(eh) * 3600 + i64::from(em) * 60;
            let valid = (0..=MAX_DAY_SECONDS).contains(&begin) && (0..=MAX_DAY_SECONDS).contains(&end);

            match NightSchedule::from_hm(bh, bm, eh, em) {
                Ok(s) => {
                    prop_assert!(valid);
                    prop_assert_eq!(i64::from(s.begin), begin);
                    prop_assert_eq!(i64::from(s.end), end);
                }
                Err(_) => prop_assert!(!valid),
            }
        }
    }
}
