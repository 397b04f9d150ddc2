//! Identity generation for new entities.
//!
//! An identity embeds the entity type, its creation sequence number, a
//! punctuation-free timestamp and a random suffix, so ids are unique and
//! still readable in a database console:
//!
//! ```text
//! Item_3_8-47-PM_9-24-2025_vBK5XSeH6
//! ```

use crate::types::EntityType;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Length of the random suffix
pub const UUID_LEN: usize = 9;

/// Separator between identity segments
pub const ID_DELIMITER: char = '_';

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A freshly generated identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Database key: `{type}_{seq}_{stamp_no_spaces}_{uuid}`
    pub id: String,
    /// Random mixed-case alphanumeric suffix
    pub uuid: String,
    /// Human-readable creation time, e.g. `9/24/2025, 8:47:20 PM`
    pub date: String,
    /// Display title: `{type} {seq} {stamp} {uuid}`
    pub title: String,
    /// The instant every rendering above was taken from
    pub timestamp: DateTime<Utc>,
    pub entity_type: EntityType,
    pub sequence: u64,
}

/// Generate a random suffix, retrying until it is absent from `exclude`.
pub fn generate_uuid(exclude: Option<&HashSet<String>>) -> String {
    let mut rng = rand::rng();
    loop {
        let candidate = random_suffix(&mut rng);
        match exclude {
            Some(taken) if taken.contains(&candidate) => continue,
            _ => return candidate,
        }
    }
}

fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..UUID_LEN)
        .map(|_| {
            let c = BASE36[rng.random_range(0..BASE36.len())] as char;
            if rng.random_bool(0.5) {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

/// `h:mm AM 9-24-2025`
pub fn format_stamp(at: &DateTime<Utc>) -> String {
    at.format("%-I:%M %p %-m-%-d-%Y").to_string()
}

/// `h-mm-AM_9-24-2025`, safe as part of a document key
pub fn format_stamp_no_spaces(at: &DateTime<Utc>) -> String {
    at.format("%-I-%M-%p_%-m-%-d-%Y").to_string()
}

/// `9/24/2025, 8:47:20 PM`
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Produces identities for new entities
#[derive(Debug, Clone, Default)]
pub struct IdentityGenerator {
    taken: Option<HashSet<String>>,
}

impl IdentityGenerator {
    /// A generator with no exclusion set
    pub fn new() -> Self {
        Self::default()
    }

    /// Never hand out a suffix contained in `taken`
    pub fn excluding(taken: HashSet<String>) -> Self {
        Self { taken: Some(taken) }
    }

    /// Add one suffix to the exclusion set
    pub fn exclude(&mut self, uuid: impl Into<String>) {
        self.taken.get_or_insert_with(HashSet::new).insert(uuid.into());
    }

    /// Generate an identity stamped with the current time.
    /// A missing sequence number defaults to 1.
    pub fn generate(&self, entity_type: EntityType, sequence: Option<u64>) -> Identity {
        self.generate_at(entity_type, sequence, Utc::now())
    }

    /// Generate an identity stamped with `now`
    pub fn generate_at(
        &self,
        entity_type: EntityType,
        sequence: Option<u64>,
        now: DateTime<Utc>,
    ) -> Identity {
        let sequence = sequence.unwrap_or(1);
        let uuid = generate_uuid(self.taken.as_ref());
        let d = ID_DELIMITER;
        Identity {
            id: format!(
                "{entity_type}{d}{sequence}{d}{}{d}{uuid}",
                format_stamp_no_spaces(&now)
            ),
            title: format!("{entity_type} {sequence} {} {uuid}", format_stamp(&now)),
            date: format_date(&now),
            timestamp: now,
            entity_type,
            sequence,
            uuid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn evening() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 24, 20, 47, 20).unwrap()
    }

    #[test]
    fn test_uuid_shape() {
        for _ in 0..50 {
            let uuid = generate_uuid(None);
            assert_eq!(uuid.len(), UUID_LEN);
            assert!(uuid.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_uuid_avoids_exclusion_set() {
        let mut taken = HashSet::new();
        for _ in 0..200 {
            let uuid = generate_uuid(Some(&taken));
            assert!(taken.insert(uuid));
        }
    }

    #[test]
    fn test_generate_at_formats() {
        let identity = IdentityGenerator::new().generate_at(EntityType::Item, Some(3), evening());

        assert!(identity
            .id
            .starts_with("Item_3_8-47-PM_9-24-2025_"));
        assert!(identity.id.ends_with(&identity.uuid));
        assert!(!identity.id.contains(' '));
        assert!(!identity.id.contains('/'));
        assert!(!identity.id.contains(':'));
        assert_eq!(identity.date, "9/24/2025, 8:47:20 PM");
        assert_eq!(
            identity.title,
            format!("Item 3 8:47 PM 9-24-2025 {}", identity.uuid)
        );
    }

    #[test]
    fn test_missing_sequence_defaults_to_one() {
        let identity = IdentityGenerator::new().generate_at(EntityType::Task, None, evening());
        assert_eq!(identity.sequence, 1);
        assert!(identity.id.starts_with("Task_1_"));
    }

    #[test]
    fn test_morning_hours_are_twelve_hour_clock() {
        let midnight = Utc.with_ymd_and_hms(2025, 1, 5, 0, 5, 0).unwrap();
        assert_eq!(format_stamp(&midnight), "12:05 AM 1-5-2025");
        assert_eq!(format_stamp_no_spaces(&midnight), "12-05-AM_1-5-2025");
    }

    #[test]
    fn test_ids_are_unique() {
        let generator = IdentityGenerator::new();
        let a = generator.generate_at(EntityType::Board, Some(1), evening());
        let b = generator.generate_at(EntityType::Board, Some(1), evening());
        assert_ne!(a.id, b.id);
    }
}
