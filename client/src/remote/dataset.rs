//! Seeded generator for the simulated record set.

use listview_engine::{Record, Status};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use uuid::{Builder, Uuid};

/// Size of the reference dataset.
pub const DEFAULT_RECORD_COUNT: usize = 10_000;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Amara", "Bea", "Bruno", "Carla", "Chen", "Dmitri", "Elena", "Emeka", "Farah",
    "Gustavo", "Hana", "Ines", "Ivan", "Jamal", "Julia", "Kenji", "Lars", "Leila", "Marco",
    "Maya", "Nadia", "Noah", "Olga", "Omar", "Priya", "Quinn", "Rafael", "Rosa", "Sami", "Sofia",
    "Tariq", "Uma", "Viktor", "Wen", "Xavier", "Yara", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Baker", "Castillo", "Dubois", "Eriksson", "Fischer", "Garcia", "Haddad", "Ito",
    "Jensen", "Kowalski", "Lopez", "Moreau", "Nakamura", "Okafor", "Petrov", "Quinteros",
    "Rossi", "Schmidt", "Tanaka", "Usman", "Varga", "Weber", "Xu", "Yilmaz", "Zhang",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "mail.test", "corp.test"];

/// Generate `count` records.
///
/// The same non-zero `seed` always produces the same records; a zero seed
/// picks a random one.
pub fn generate_records(count: usize, seed: u64) -> Vec<Record> {
    let mut rng = SmallRng::seed_from_u64(resolve_seed(seed));
    (0..count).map(|_| generate_record(&mut rng)).collect()
}

/// Use a random seed when the caller provides zero.
pub(crate) fn resolve_seed(seed: u64) -> u64 {
    if seed == 0 {
        rand::thread_rng().gen()
    } else {
        seed
    }
}

fn generate_record(rng: &mut SmallRng) -> Record {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let domain = pick(rng, EMAIL_DOMAINS);
    let suffix: u16 = rng.gen_range(1..1000);

    let status = if rng.gen_bool(0.5) {
        Status::Active
    } else {
        Status::Inactive
    };

    Record::new(
        random_uuid(rng).to_string(),
        format!("{first} {last}"),
        format!("{first}.{last}{suffix}@{domain}").to_lowercase(),
        rng.gen_range(18..=80),
        status,
    )
}

fn pick<'a>(rng: &mut SmallRng, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

/// A v4 UUID drawn from the seeded RNG.
fn random_uuid(rng: &mut SmallRng) -> Uuid {
    Builder::from_random_bytes(rng.gen()).into_uuid()
}
