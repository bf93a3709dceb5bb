// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::problem::{
    err::{RecordError, UnitIntervalError},
    port::PortIdentifier,
};
use chrono::NaiveDate;

/// One historical port call: promised versus actual arrival, annotated
/// with the conditions observed at the time.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayRecord {
    port: PortIdentifier,
    eta: NaiveDate,
    arrival: NaiveDate,
    weather_severity: f64,
    congestion_level: f64,
}

impl DelayRecord {
    pub fn new(
        port: PortIdentifier,
        eta: NaiveDate,
        arrival: NaiveDate,
        weather_severity: f64,
        congestion_level: f64,
    ) -> Result<Self, RecordError> {
        if !weather_severity.is_finite() || !(0.0..=1.0).contains(&weather_severity) {
            return Err(UnitIntervalError::new("weather severity", weather_severity).into());
        }
        if !congestion_level.is_finite() || !(0.0..=1.0).contains(&congestion_level) {
            return Err(UnitIntervalError::new("congestion level", congestion_level).into());
        }
        Ok(Self {
            port,
            eta,
            arrival,
            weather_severity,
            congestion_level,
        })
    }

    #[inline]
    pub fn port(&self) -> PortIdentifier {
        self.port
    }

    #[inline]
    pub fn eta(&self) -> NaiveDate {
        self.eta
    }

    #[inline]
    pub fn arrival(&self) -> NaiveDate {
        self.arrival
    }

    #[inline]
    pub fn weather_severity(&self) -> f64 {
        self.weather_severity
    }

    #[inline]
    pub fn congestion_level(&self) -> f64 {
        self.congestion_level
    }

    /// Days lost against the promised arrival. Early calls count as zero.
    #[inline]
    pub fn delay_days(&self) -> f64 {
        (self.arrival - self.eta).num_days().max(0) as f64
    }
}

#[repr(transparent)]
#[derive(Debug, Clone, Default)]
pub struct DelayHistory(Vec<DelayRecord>);

impl DelayHistory {
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn push(&mut self, record: DelayRecord) {
        self.0.push(record);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &DelayRecord> {
        self.0.iter()
    }

    #[inline]
    pub fn for_port(&self, port: PortIdentifier) -> impl Iterator<Item = &DelayRecord> {
        self.0.iter().filter(move |r| r.port() == port)
    }

    /// Mean observed delay for `port`, or `None` without observations.
    pub fn mean_delay_for(&self, port: PortIdentifier) -> Option<f64> {
        let mut n = 0usize;
        let mut sum = 0.0;
        for r in self.for_port(port) {
            n += 1;
            sum += r.delay_days();
        }
        (n > 0).then(|| sum / n as f64)
    }
}

impl FromIterator<DelayRecord> for DelayHistory {
    #[inline]
    fn from_iter<I: IntoIterator<Item = DelayRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn pid(n: u32) -> PortIdentifier {
        PortIdentifier::new(n)
    }

    #[inline]
    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[inline]
    fn record(port: u32, eta_d: u32, arrival_d: u32) -> DelayRecord {
        DelayRecord::new(pid(port), date(6, eta_d), date(6, arrival_d), 0.3, 0.4).unwrap()
    }

    #[test]
    fn test_delay_days_positive() {
        let r = record(1, 10, 13);
        assert_eq!(r.delay_days(), 3.0);
    }

    #[test]
    fn test_early_arrival_counts_as_zero() {
        let r = record(1, 10, 8);
        assert_eq!(r.delay_days(), 0.0);
    }

    #[test]
    fn test_out_of_range_weather_rejected() {
        let err = DelayRecord::new(pid(1), date(6, 1), date(6, 2), 1.2, 0.5).unwrap_err();
        assert!(matches!(err, RecordError::UnitInterval(_)));
    }

    #[test]
    fn test_out_of_range_congestion_rejected() {
        let err = DelayRecord::new(pid(1), date(6, 1), date(6, 2), 0.2, -0.1).unwrap_err();
        assert!(matches!(err, RecordError::UnitInterval(_)));
    }

    #[test]
    fn test_for_port_filters() {
        let h: DelayHistory = vec![record(1, 1, 2), record(2, 1, 5), record(1, 3, 3)]
            .into_iter()
            .collect();
        assert_eq!(h.for_port(pid(1)).count(), 2);
        assert_eq!(h.for_port(pid(3)).count(), 0);
    }

    #[test]
    fn test_mean_delay_for() {
        let h: DelayHistory = vec![record(1, 1, 3), record(1, 5, 9), record(2, 1, 1)]
            .into_iter()
            .collect();
        assert_eq!(h.mean_delay_for(pid(1)), Some(3.0));
        assert_eq!(h.mean_delay_for(pid(2)), Some(0.0));
        assert_eq!(h.mean_delay_for(pid(9)), None);
    }
}
