//! Closed zone and time-slot domains with the zone capacity table.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Named physical campus area.
///
/// Declaration order is the enum order used for grouping and tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Zone {
    Academic,
    FoodCourt,
    Hostel,
    Library,
    Sports,
}

impl Zone {
    /// Every zone in enum order.
    pub const ALL: [Zone; 5] = [
        Zone::Academic,
        Zone::FoodCourt,
        Zone::Hostel,
        Zone::Library,
        Zone::Sports,
    ];

    /// Designed maximum occupancy of the zone.
    pub const fn capacity(self) -> u32 {
        match self {
            Zone::Academic => 250,
            Zone::FoodCourt => 150,
            Zone::Hostel => 300,
            Zone::Library => 200,
            Zone::Sports => 250,
        }
    }

    /// Stable label code: lexicographic rank of the name over the whole domain.
    pub const fn encoded(self) -> u8 {
        self as u8
    }

    /// Name as it appears in the source data.
    pub const fn as_str(self) -> &'static str {
        match self {
            Zone::Academic => "Academic",
            Zone::FoodCourt => "FoodCourt",
            Zone::Hostel => "Hostel",
            Zone::Library => "Library",
            Zone::Sports => "Sports",
        }
    }

    /// Position in [`Zone::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Zone::ALL
            .into_iter()
            .find(|z| z.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Named period of the day, declared in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeSlot {
    /// Every slot in enum (chronological) order.
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Morning,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
        TimeSlot::Night,
    ];

    /// Stable label code: lexicographic rank of the name over the whole domain.
    pub const fn encoded(self) -> u8 {
        match self {
            TimeSlot::Afternoon => 0,
            TimeSlot::Evening => 1,
            TimeSlot::Morning => 2,
            TimeSlot::Night => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning",
            TimeSlot::Afternoon => "Afternoon",
            TimeSlot::Evening => "Evening",
            TimeSlot::Night => "Night",
        }
    }

    /// Position in [`TimeSlot::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TimeSlot::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_zone_has_positive_capacity() {
        for zone in Zone::ALL {
            assert!(zone.capacity() > 0, "{zone} has zero capacity");
        }
        assert_eq!(Zone::Library.capacity(), 200);
        assert_eq!(Zone::FoodCourt.capacity(), 150);
        assert_eq!(Zone::Hostel.capacity(), 300);
    }

    #[test]
    fn encodings_are_lexicographic_bijections() {
        let mut names: Vec<&str> = Zone::ALL.iter().map(|z| z.as_str()).collect();
        names.sort_unstable();
        for (code, name) in names.iter().enumerate() {
            let zone: Zone = name.parse().unwrap();
            assert_eq!(zone.encoded() as usize, code);
        }

        let mut names: Vec<&str> = TimeSlot::ALL.iter().map(|t| t.as_str()).collect();
        names.sort_unstable();
        let codes: HashSet<u8> = TimeSlot::ALL.iter().map(|t| t.encoded()).collect();
        assert_eq!(codes.len(), TimeSlot::ALL.len());
        for (code, name) in names.iter().enumerate() {
            let slot: TimeSlot = name.parse().unwrap();
            assert_eq!(slot.encoded() as usize, code);
        }
    }

    #[test]
    fn parsing_is_case_insensitive_and_closed() {
        assert_eq!(" foodcourt ".parse::<Zone>(), Ok(Zone::FoodCourt));
        assert_eq!("EVENING".parse::<TimeSlot>(), Ok(TimeSlot::Evening));
        assert!("Parking".parse::<Zone>().is_err());
        assert!("Dawn".parse::<TimeSlot>().is_err());
    }
}
