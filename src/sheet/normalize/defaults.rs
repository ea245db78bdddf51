use std::sync::LazyLock;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use regex::Regex;

use crate::config::FallbackMode;
use crate::model::Status;

static FLOOR_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*([0-9]+)\.").unwrap());
static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

pub const DEFAULT_BEDROOMS: u8 = 2;
pub const OFFICE_FLOOR: i32 = 0;
pub const OFFICE_AREA: f64 = 50.0;
/// Area by bedroom count, 1..=4.
pub const AREA_BY_BEDROOMS: [f64; 4] = [45.0, 65.0, 85.0, 110.0];
pub const PLACEHOLDER_FLOORS: (i32, i32) = (1, 8);
pub const DEMO_STATUSES: [Status; 4] = [
    Status::Available,
    Status::Available,
    Status::Reserved,
    Status::Sold,
];

/// Supplies placeholders for floors and statuses a row does not carry.
/// `index` is the record's position in the sheet.
pub trait FallbackPolicy {
    fn floor(&mut self, index: usize) -> i32;
    fn status(&mut self, index: usize) -> Status;
}

/// Deterministic: walks the placeholder lists by record position.
#[derive(Debug, Default, Clone, Copy)]
pub struct Cycling;

impl FallbackPolicy for Cycling {
    fn floor(&mut self, index: usize) -> i32 {
        let (lo, hi) = PLACEHOLDER_FLOORS;
        lo + (index as i32).rem_euclid(hi - lo + 1)
    }

    fn status(&mut self, index: usize) -> Status {
        DEMO_STATUSES[index % DEMO_STATUSES.len()]
    }
}

pub struct Randomized {
    rng: StdRng,
}

impl Randomized {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl FallbackPolicy for Randomized {
    fn floor(&mut self, _index: usize) -> i32 {
        let (lo, hi) = PLACEHOLDER_FLOORS;
        self.rng.gen_range(lo..=hi)
    }

    fn status(&mut self, _index: usize) -> Status {
        *DEMO_STATUSES
            .choose(&mut self.rng)
            .unwrap_or(&Status::Available)
    }
}

pub fn policy_for(mode: FallbackMode, seed: Option<u64>) -> Box<dyn FallbackPolicy> {
    match (mode, seed) {
        (FallbackMode::Cycle, _) => Box::new(Cycling),
        (FallbackMode::Random, Some(seed)) => Box::new(Randomized::seeded(seed)),
        (FallbackMode::Random, None) => Box::new(Randomized::from_entropy()),
    }
}

/// Last digit run of the id, clamped to 1..=4.
pub fn bedrooms_from_id(id: &str) -> Option<u8> {
    let digits = DIGITS_RE.find_iter(id).last()?.as_str();
    let n: u64 = digits.parse().unwrap_or(u64::MAX);
    Some(n.clamp(1, 4) as u8)
}

/// Floor from a leading `N.` in the id (`3.2` is on floor 3).
pub fn floor_from_id(id: &str) -> Option<i32> {
    FLOOR_PREFIX_RE
        .captures(id)
        .and_then(|c| c[1].parse::<i32>().ok())
}

pub fn area_for(is_office_space: bool, bedrooms: Option<u8>) -> f64 {
    if is_office_space {
        return OFFICE_AREA;
    }
    let idx = bedrooms.unwrap_or(DEFAULT_BEDROOMS).clamp(1, 4) as usize - 1;
    AREA_BY_BEDROOMS[idx]
}
