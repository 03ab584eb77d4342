use crate::core::error::CostError;

/// Session time window in fractional hours, normalised for midnight wraparound.
///
/// The start is always within `0.0..24.0`; the end may exceed `24.0` when the
/// session crosses midnight. A session spans at most one midnight: the model
/// is a single contiguous charging window, never a multi-day one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SessionSpan {
    start: f64,
    end: f64,
}

/// One wall-clock hour touched by a session, with the fraction of that hour
/// actually covered.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HourBucket {
    /// Wall-clock hour, `0..24`.
    pub hour: u32,

    /// Covered fraction of the hour, `0.0..=1.0`.
    pub weight: f64,
}

impl SessionSpan {
    /// Parse `HH:MM` boundaries into a normalised span.
    ///
    /// An end time earlier than the start is taken to cross midnight and is
    /// shifted by 24 hours. Equal start and end times are a zero-duration
    /// session and are rejected.
    pub fn parse(start_time: &str, end_time: &str) -> Result<Self, CostError> {
        let start = parse_fractional_hour(start_time)?;
        let mut end = parse_fractional_hour(end_time)?;
        if end < start {
            end += 24.0;
        }
        let span = Self { start, end };
        if span.duration_hours() <= 0.0 {
            return Err(CostError::invalid_input("the end time must be after the start time"));
        }
        Ok(span)
    }

    pub fn duration_hours(self) -> f64 {
        self.end - self.start
    }

    /// Walk the integer hour buckets the session touches, in order.
    ///
    /// The first bucket carries the remaining fraction of its hour, the last
    /// one the consumed fraction. When the end lands exactly on an hour
    /// boundary, that hour is not touched and yields no bucket.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn hour_buckets(self) -> impl Iterator<Item = HourBucket> {
        let (first, last) = (self.start.floor() as i64, self.end.ceil() as i64);
        (first..last).filter_map(move |index| {
            let mut weight = 1.0;
            if index == first {
                weight = 1.0 - (self.start - self.start.floor());
            }
            if index == self.end.floor() as i64 {
                weight = self.end - self.end.floor();
                if weight == 0.0 {
                    return None;
                }
            }
            Some(HourBucket { hour: (index % 24) as u32, weight })
        })
    }

    /// Inclusive wall-clock hour range `(start, end)` consumed by the
    /// unweighted fallback. The end may be *smaller* than the start when the
    /// session wraps past midnight.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn wall_hour_range(self) -> (u32, u32) {
        (self.start.floor() as u32, (self.end.floor() as u32) % 24)
    }

    /// Whether the given wall-clock hour falls inside [`Self::wall_hour_range`].
    pub fn wall_hour_range_contains(self, hour: u32) -> bool {
        let (start, end) = self.wall_hour_range();
        if start <= end { (start..=end).contains(&hour) } else { hour >= start || hour <= end }
    }
}

fn parse_fractional_hour(time: &str) -> Result<f64, CostError> {
    const MALFORMED: CostError = CostError::invalid_input("times must be formatted as `HH:MM`");

    let (hour, minute) = time.split_once(':').ok_or(MALFORMED)?;
    let hour: u32 = hour.parse().map_err(|_| MALFORMED)?;
    let minute: u32 = minute.parse().map_err(|_| MALFORMED)?;
    if hour > 23 || minute > 59 {
        return Err(MALFORMED);
    }
    Ok(f64::from(hour) + f64::from(minute) / 60.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    use super::*;

    #[test]
    fn test_parse_plain() -> Result<(), CostError> {
        let span = SessionSpan::parse("10:00", "14:30")?;
        assert_abs_diff_eq!(span.duration_hours(), 4.5);
        Ok(())
    }

    #[test]
    fn test_parse_midnight_wrap() -> Result<(), CostError> {
        let span = SessionSpan::parse("23:30", "01:15")?;
        assert_abs_diff_eq!(span.duration_hours(), 1.75);
        Ok(())
    }

    #[test]
    fn test_parse_equal_times_is_zero_duration() {
        assert_eq!(
            SessionSpan::parse("10:15", "10:15"),
            Err(CostError::invalid_input("the end time must be after the start time")),
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert!(SessionSpan::parse("10", "11:00").is_err());
        assert!(SessionSpan::parse("10:60", "11:00").is_err());
        assert!(SessionSpan::parse("24:00", "11:00").is_err());
        assert!(SessionSpan::parse("ab:cd", "11:00").is_err());
    }

    #[test]
    fn test_full_hours_have_unit_weights() -> Result<(), CostError> {
        let buckets = SessionSpan::parse("02:00", "05:00")?.hour_buckets().collect_vec();
        assert_eq!(buckets, [
            HourBucket { hour: 2, weight: 1.0 },
            HourBucket { hour: 3, weight: 1.0 },
            HourBucket { hour: 4, weight: 1.0 },
        ]);
        Ok(())
    }

    #[test]
    fn test_boundary_fractions() -> Result<(), CostError> {
        let buckets = SessionSpan::parse("10:15", "12:45")?.hour_buckets().collect_vec();
        assert_eq!(buckets.iter().map(|bucket| bucket.hour).collect_vec(), [10, 11, 12]);
        assert_abs_diff_eq!(buckets[0].weight, 0.75);
        assert_abs_diff_eq!(buckets[1].weight, 1.0);
        assert_abs_diff_eq!(buckets[2].weight, 0.75);
        Ok(())
    }

    #[test]
    fn test_wrapping_buckets() -> Result<(), CostError> {
        let buckets = SessionSpan::parse("23:30", "01:15")?.hour_buckets().collect_vec();
        assert_eq!(buckets.iter().map(|bucket| bucket.hour).collect_vec(), [23, 0, 1]);
        assert_abs_diff_eq!(buckets[0].weight, 0.5);
        assert_abs_diff_eq!(buckets[1].weight, 1.0);
        assert_abs_diff_eq!(buckets[2].weight, 0.25);
        Ok(())
    }

    #[test]
    fn test_exact_end_boundary_excludes_the_hour() -> Result<(), CostError> {
        let buckets = SessionSpan::parse("01:00", "02:00")?.hour_buckets().collect_vec();
        assert_eq!(buckets, [HourBucket { hour: 1, weight: 1.0 }]);
        Ok(())
    }

    #[test]
    fn test_wall_hour_range_wraps() -> Result<(), CostError> {
        let span = SessionSpan::parse("23:30", "01:15")?;
        assert_eq!(span.wall_hour_range(), (23, 1));
        assert!(span.wall_hour_range_contains(23));
        assert!(span.wall_hour_range_contains(0));
        assert!(span.wall_hour_range_contains(1));
        assert!(!span.wall_hour_range_contains(2));
        Ok(())
    }
}
