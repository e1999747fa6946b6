//! Synthetic users and pets for seeding and demos.
//!
//! Generated pets may be `adopted` without an `owner`; seed data does not go
//! through the adoption workflow.

use crate::auth::hash_with_fixed_salt;
use crate::error::AppError;
use crate::model::{NewPet, NewUser, Role};
use chrono::{Duration, Utc};
use fake::faker::internet::en::FreeEmailProvider;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::Rng;

/// Plaintext behind every generated user's password hash.
pub const PLACEHOLDER_PASSWORD: &str = "coder123";
const PLACEHOLDER_SALT: &str = "bW9ja3NlZWRzYWx0";

pub const SPECIES: [&str; 6] = ["dog", "cat", "bird", "fish", "rabbit", "hamster"];

pub const PET_NAMES: [&str; 24] = [
    "Bella", "Max", "Luna", "Charlie", "Lucy", "Cooper", "Daisy", "Rocky", "Molly", "Buddy", "Sadie", "Tucker",
    "Maggie", "Bear", "Sophie", "Duke", "Chloe", "Jack", "Lola", "Harley", "Zoe", "Murphy", "Lily", "Bentley",
];

/// Birth dates fall within the last ten years.
const MAX_AGE_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Hashes the placeholder once, then builds `count` users around it.
pub async fn generate_users(count: usize) -> Result<Vec<NewUser>, AppError> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let password = hash_with_fixed_salt(PLACEHOLDER_PASSWORD, PLACEHOLDER_SALT).await?;
    let users = {
        let mut rng = rand::rng();
        generate_users_with(&mut rng, count, &password)
    };
    Ok(users)
}

pub fn generate_users_with<R: Rng + ?Sized>(rng: &mut R, count: usize, password: &str) -> Vec<NewUser> {
    (0..count)
        .map(|_| {
            let first_name: String = FirstName().fake_with_rng(rng);
            let last_name: String = LastName().fake_with_rng(rng);
            let provider: String = FreeEmailProvider().fake_with_rng(rng);
            let email = format!(
                "{}.{}{}@{}",
                email_local(&first_name),
                email_local(&last_name),
                rng.random_range(0..10_000),
                provider
            );
            let role = if rng.random_bool(0.5) { Role::Admin } else { Role::User };
            NewUser {
                first_name,
                last_name,
                email,
                password: password.to_string(),
                role,
                pets: Vec::new(),
            }
        })
        .collect()
}

pub fn generate_pets(count: usize) -> Vec<NewPet> {
    generate_pets_with(&mut rand::rng(), count)
}

pub fn generate_pets_with<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<NewPet> {
    let now = Utc::now();
    (0..count)
        .map(|_| {
            let name = PET_NAMES[rng.random_range(0..PET_NAMES.len())];
            let specie = SPECIES[rng.random_range(0..SPECIES.len())];
            NewPet {
                name: name.to_string(),
                specie: specie.to_string(),
                birth_date: now - Duration::seconds(rng.random_range(1..=MAX_AGE_SECS)),
                adopted: rng.random_bool(0.5),
                owner: None,
                image: Some(format!("https://loremflickr.com/320/240/{}", specie)),
            }
        })
        .collect()
}

fn email_local(part: &str) -> String {
    part.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::service::is_valid_email;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[tokio::test]
    async fn zero_counts_yield_empty_sequences() {
        assert!(generate_users(0).await.unwrap().is_empty());
        assert!(generate_pets(0).is_empty());
    }

    #[test]
    fn users_have_valid_shape() {
        let users = generate_users_with(&mut StdRng::seed_from_u64(3), 25, "hash");
        assert_eq!(users.len(), 25);
        for u in &users {
            assert!(is_valid_email(&u.email), "bad email {}", u.email);
            assert!(matches!(u.role, Role::User | Role::Admin));
            assert!(u.pets.is_empty());
            assert!(!u.first_name.is_empty() && !u.last_name.is_empty());
        }
    }

    #[tokio::test]
    async fn users_share_one_placeholder_hash() {
        let users = generate_users(3).await.unwrap();
        assert!(users.iter().all(|u| u.password == users[0].password));
        assert!(verify_password(PLACEHOLDER_PASSWORD, &users[0].password).await.unwrap());
    }

    #[test]
    fn pets_draw_from_fixed_pools() {
        let mut rng = StdRng::seed_from_u64(7);
        let pets = generate_pets_with(&mut rng, 50);
        let now = Utc::now();
        assert_eq!(pets.len(), 50);
        for p in &pets {
            assert!(PET_NAMES.contains(&p.name.as_str()));
            assert!(SPECIES.contains(&p.specie.as_str()));
            assert!(p.birth_date < now);
            assert!(p.birth_date > now - Duration::seconds(MAX_AGE_SECS + 60));
            assert!(p.owner.is_none());
        }
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a = generate_pets_with(&mut StdRng::seed_from_u64(42), 5);
        let b = generate_pets_with(&mut StdRng::seed_from_u64(42), 5);
        let names = |v: &[NewPet]| v.iter().map(|p| (p.name.clone(), p.specie.clone(), p.adopted)).collect::<Vec<_>>();
        assert_eq!(names(&a), names(&b));
    }
}
