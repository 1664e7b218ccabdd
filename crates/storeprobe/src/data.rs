//! Test data: random ids, sample payloads and fake customer details.

use crate::api::{Pet, PetStatus, User};
use fake::faker::address::en::PostCode;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Range random entity ids are drawn from
pub const ENTITY_ID_RANGE: RangeInclusive<i64> = 1_000_000..=9_999_999;

/// Fresh RNG for one scenario.
///
/// `StdRng` rather than the thread-local generator so scenario futures can
/// hold it across `.await`.
#[must_use]
pub fn scenario_rng() -> StdRng {
    StdRng::seed_from_u64(rand::random())
}

/// Random id for a pet or user
pub fn random_entity_id<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    rng.random_range(ENTITY_ID_RANGE)
}

/// The pet the scenarios create: `TestPet_<id>`, available
#[must_use]
pub fn sample_pet(id: i64) -> Pet {
    Pet::new(id, format!("TestPet_{id}"), PetStatus::Available)
}

/// The user the scenarios create, every field derived from `id`
#[must_use]
pub fn sample_user(id: i64) -> User {
    User {
        id: Some(id),
        username: Some(format!("Test_Name_{id}")),
        first_name: Some(format!("Test_First_{id}")),
        last_name: Some(format!("Test_Second_{id}")),
        email: Some(format!("mail_{id}@test.com")),
        password: Some(id.to_string()),
        phone: Some(format!("093{id}")),
        user_status: Some(0),
    }
}

/// Replacement profile for an existing user, keeping id and username
#[must_use]
pub fn updated_user(id: i64, username: &str) -> User {
    User {
        id: Some(id),
        username: Some(username.to_string()),
        first_name: Some(format!("Updated_First_{id}")),
        last_name: Some(format!("Updated_Second_{id}")),
        email: Some(format!("Updated_mail_{id}@test.com")),
        password: Some(id.to_string()),
        phone: Some(format!("093{id}")),
        user_status: Some(0),
    }
}

/// Customer details typed into checkout step one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutInfo {
    pub first_name: String,
    pub last_name: String,
    pub postal_code: String,
}

impl CheckoutInfo {
    /// Fake but plausible details
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            first_name: FirstName().fake_with_rng(rng),
            last_name: LastName().fake_with_rng(rng),
            postal_code: PostCode().fake_with_rng(rng),
        }
    }

    /// Fake details with the postal code left empty
    pub fn random_without_postal_code<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            postal_code: String::new(),
            ..Self::random(rng)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sample_pet() {
        let pet = sample_pet(1234567);
        assert_eq!(pet.id, Some(1234567));
        assert_eq!(pet.name.as_deref(), Some("TestPet_1234567"));
        assert_eq!(pet.status, Some(PetStatus::Available));
    }

    #[test]
    fn test_sample_user() {
        let user = sample_user(42);
        assert_eq!(user.username.as_deref(), Some("Test_Name_42"));
        assert_eq!(user.password.as_deref(), Some("42"));
        assert_eq!(user.phone.as_deref(), Some("09342"));
        assert_eq!(user.user_status, Some(0));
    }

    #[test]
    fn test_updated_user_keeps_identity() {
        let user = updated_user(42, "Test_Name_42");
        assert_eq!(user.username.as_deref(), Some("Test_Name_42"));
        assert_eq!(user.first_name.as_deref(), Some("Updated_First_42"));
        assert_eq!(user.email.as_deref(), Some("Updated_mail_42@test.com"));
    }

    #[test]
    fn test_checkout_info_is_filled() {
        let mut rng = StdRng::seed_from_u64(7);
        let info = CheckoutInfo::random(&mut rng);
        assert!(!info.first_name.is_empty());
        assert!(!info.last_name.is_empty());
        assert!(!info.postal_code.is_empty());
    }

    #[test]
    fn test_checkout_info_without_postal_code() {
        let mut rng = StdRng::seed_from_u64(7);
        let info = CheckoutInfo::random_without_postal_code(&mut rng);
        assert!(!info.first_name.is_empty());
        assert!(info.postal_code.is_empty());
    }

    proptest! {
        #[test]
        fn prop_entity_id_in_range(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let id = random_entity_id(&mut rng);
            prop_assert!(ENTITY_ID_RANGE.contains(&id));
        }
    }
}
