//! Synthetic person records for seeding an index without real data
//!
//! Names are drawn from a small pool that deliberately mixes canonical names
//! with their nicknames (Liz and Beth, Robert and Bob), so a seeded index
//! exercises nickname matching straight away.

use chrono::{Days, NaiveDate};
use rand::Rng;

use crate::core::error::{Error, Result};
use crate::pipeline::NameRecord;

/// Largest batch a single call may generate
pub const MAX_SAMPLE_COUNT: usize = 5000;

/// Share of records that get a date of birth
const DOB_RATE: f64 = 0.7;

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Mike", "Emily", "Maha", "Mahantesh", "Liz", "Beth", "William", "Will",
    "Bill", "Robert", "Rob", "Bob", "Catherine", "Kate", "Katherine", "Kathy", "Kaitlyn",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Morrison", "Anderson", "Thomas", "Jackson",
];

const CITIES: &[&str] = &[
    "Seattle", "Austin", "San Francisco", "New York", "Chicago", "Miami", "Denver", "Boston",
];

const STATES: &[&str] = &["WA", "TX", "CA", "NY", "IL", "FL", "CO", "MA"];

/// Generate `count` records with fresh uuid ids
///
/// `count` must be between 1 and [`MAX_SAMPLE_COUNT`]. City and state are
/// drawn independently, as are the names.
pub fn generate<R: Rng>(count: usize, rng: &mut R) -> Result<Vec<NameRecord>> {
    validate_count(count)?;

    let records = (0..count)
        .map(|_| {
            let id = uuid::Uuid::new_v4().to_string();
            let mut record = NameRecord::new(id, pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
                .with_location(pick(rng, CITIES), pick(rng, STATES));

            if rng.gen_bool(DOB_RATE) {
                if let Some(dob) = random_dob(rng) {
                    record = record.with_dob(dob);
                }
            }
            record
        })
        .collect();

    Ok(records)
}

pub fn validate_count(count: usize) -> Result<()> {
    if count == 0 || count > MAX_SAMPLE_COUNT {
        return Err(Error::InvalidInput {
            message: format!("sample count must be 1..={}, got {}", MAX_SAMPLE_COUNT, count),
        });
    }
    Ok(())
}

fn pick<R: Rng>(rng: &mut R, pool: &[&'static str]) -> &'static str {
    pool[rng.gen_range(0..pool.len())]
}

/// A day between 1950-01-01 and 2004-12-31
fn random_dob<R: Rng>(rng: &mut R) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(1950, 1, 1)?;
    let last = NaiveDate::from_ymd_opt(2004, 12, 31)?;
    let span = u64::try_from((last - first).num_days()).ok()?;
    first.checked_add_days(Days::new(rng.gen_range(0..=span)))
}
