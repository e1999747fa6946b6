//! Persistence models for users, pets and adoptions, plus the write shapes and
//! lookup filters the services pass to a [`Store`](crate::store::Store).
//!
//! Entities are flat value records that reference each other by id only.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

#[derive(Error, Debug)]
#[error("unknown role: {0}")]
pub struct UnknownRole(String);

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownRole(value)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing)]
    pub password: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub pets: Vec<Uuid>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Pet {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub specie: String,
    #[serde(rename = "birthDate")]
    pub birth_date: DateTime<Utc>,
    pub adopted: bool,
    pub owner: Option<Uuid>,
    pub image: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Adoption {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: Uuid,
    pub pet: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// An adoption with `owner` and `pet` resolved. A dangling reference resolves to `null`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AdoptionView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: Option<User>,
    pub pet: Option<Pet>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub pets: Vec<Uuid>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewPet {
    pub name: String,
    pub specie: String,
    #[serde(rename = "birthDate")]
    pub birth_date: DateTime<Utc>,
    pub adopted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewAdoption {
    pub owner: Uuid,
    pub pet: Uuid,
}

/// Partial user update. Absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub pets: Option<Vec<Uuid>>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self == &UserPatch::default()
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(v) = &self.first_name {
            user.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            user.last_name = v.clone();
        }
        if let Some(v) = &self.email {
            user.email = v.clone();
        }
        if let Some(v) = &self.password {
            user.password = v.clone();
        }
        if let Some(v) = self.role {
            user.role = v;
        }
        if let Some(v) = &self.pets {
            user.pets = v.clone();
        }
    }
}

/// Partial pet update. Absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PetPatch {
    pub name: Option<String>,
    pub specie: Option<String>,
    #[serde(rename = "birthDate", deserialize_with = "birth_date::deserialize_option")]
    pub birth_date: Option<DateTime<Utc>>,
    pub adopted: Option<bool>,
    pub owner: Option<Uuid>,
    pub image: Option<String>,
}

impl PetPatch {
    pub fn is_empty(&self) -> bool {
        self == &PetPatch::default()
    }

    pub fn apply(&self, pet: &mut Pet) {
        if let Some(v) = &self.name {
            pet.name = v.clone();
        }
        if let Some(v) = &self.specie {
            pet.specie = v.clone();
        }
        if let Some(v) = self.birth_date {
            pet.birth_date = v;
        }
        if let Some(v) = self.adopted {
            pet.adopted = v;
        }
        if let Some(v) = self.owner {
            pet.owner = Some(v);
        }
        if let Some(v) = &self.image {
            pet.image = Some(v.clone());
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdoptionPatch {
    pub owner: Option<Uuid>,
    pub pet: Option<Uuid>,
}

impl AdoptionPatch {
    pub fn is_empty(&self) -> bool {
        self == &AdoptionPatch::default()
    }

    pub fn apply(&self, adoption: &mut Adoption) {
        if let Some(v) = self.owner {
            adoption.owner = v;
        }
        if let Some(v) = self.pet {
            adoption.pet = v;
        }
    }
}

/// Field predicates accepted by `get_by` lookups; the first match wins.
#[derive(Clone, Debug, PartialEq)]
pub enum UserFilter {
    Id(Uuid),
    Email(String),
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserFilter::Id(id) => user.id == *id,
            UserFilter::Email(email) => user.email == *email,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PetFilter {
    Id(Uuid),
    Name(String),
    Specie(String),
    Adopted(bool),
    Owner(Uuid),
}

impl PetFilter {
    pub fn matches(&self, pet: &Pet) -> bool {
        match self {
            PetFilter::Id(id) => pet.id == *id,
            PetFilter::Name(name) => pet.name == *name,
            PetFilter::Specie(specie) => pet.specie == *specie,
            PetFilter::Adopted(adopted) => pet.adopted == *adopted,
            PetFilter::Owner(owner) => pet.owner == Some(*owner),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AdoptionFilter {
    Id(Uuid),
    Owner(Uuid),
    Pet(Uuid),
}

impl AdoptionFilter {
    pub fn matches(&self, adoption: &Adoption) -> bool {
        match self {
            AdoptionFilter::Id(id) => adoption.id == *id,
            AdoptionFilter::Owner(owner) => adoption.owner == *owner,
            AdoptionFilter::Pet(pet) => adoption.pet == *pet,
        }
    }
}

/// Birth dates arrive either as `YYYY-MM-DD` or as a full RFC 3339 timestamp.
pub mod birth_date {
    use super::*;
    use serde::Deserializer;

    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid birthDate: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn birth_date_accepts_plain_date_and_rfc3339() {
        let d = birth_date::parse("2020-01-01").unwrap();
        assert_eq!((d.year(), d.month(), d.day(), d.hour()), (2020, 1, 1, 0));
        let t = birth_date::parse("2025-12-18T00:00:00.000Z").unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2025, 12, 18));
        assert!(birth_date::parse("yesterday").is_none());
    }

    #[test]
    fn pet_patch_reads_camel_case_birth_date() {
        let patch: PetPatch = serde_json::from_value(json!({"birthDate": "2019-05-04", "adopted": true})).unwrap();
        assert_eq!(patch.birth_date, birth_date::parse("2019-05-04"));
        assert_eq!(patch.adopted, Some(true));
        assert!(patch.name.is_none());
    }

    #[test]
    fn pet_patch_rejects_garbage_dates() {
        let res: Result<PetPatch, _> = serde_json::from_value(json!({"birthDate": "soon"}));
        assert!(res.is_err());
    }

    #[test]
    fn user_serialization_hides_password() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "$argon2id$secret".into(),
            role: Role::Admin,
            pets: vec![],
            created_at: now,
            updated_at: now,
        };
        let v = serde_json::to_value(&user).unwrap();
        assert!(v.get("password").is_none());
        assert_eq!(v["role"], "admin");
        assert_eq!(v["_id"], user.id.to_string());
        assert_eq!(user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn role_round_trips_through_text() {
        assert_eq!(Role::try_from("admin".to_string()).unwrap(), Role::Admin);
        assert_eq!(Role::try_from(Role::User.as_str().to_string()).unwrap(), Role::User);
        assert!(Role::try_from("root".to_string()).is_err());
    }

    #[test]
    fn empty_patches_are_detected() {
        assert!(UserPatch::default().is_empty());
        assert!(!PetPatch { adopted: Some(false), ..Default::default() }.is_empty());
        assert!(AdoptionPatch::default().is_empty());
    }
}
