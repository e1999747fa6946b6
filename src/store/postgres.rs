//! PostgreSQL store: table DDL and typed queries for users, pets and adoptions.

use super::{AdoptionStore, PetStore, Store, UserStore};
use crate::error::{map_unique_violation, AppError};
use crate::model::{
    Adoption, AdoptionFilter, AdoptionPatch, NewAdoption, NewPet, NewUser, Pet, PetFilter, PetPatch, User,
    UserFilter, UserPatch,
};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{ConnectOptions, Postgres, QueryBuilder};
use std::str::FromStr;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, first_name, last_name, email, password, role, pets, created_at, updated_at";
const PET_COLUMNS: &str = "id, name, specie, birth_date, adopted, owner, image, created_at, updated_at";
const ADOPTION_COLUMNS: &str = "id, owner, pet, created_at, updated_at";

const DUPLICATE_EMAIL: &str = "User already exists";

const TABLES_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
        pets UUID[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pets (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        specie TEXT NOT NULL,
        birth_date TIMESTAMPTZ NOT NULL,
        adopted BOOLEAN NOT NULL DEFAULT FALSE,
        owner UUID,
        image TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS adoptions (
        id UUID PRIMARY KEY,
        owner UUID NOT NULL,
        pet UUID NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

/// Create the three collections if missing. References are plain UUID columns without foreign keys.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    for ddl in TABLES_DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

/// Connect to the `postgres` maintenance database and create the target database when it does not exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::Internal(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::Internal("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(PgStore { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at, id", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_user(&self, filter: &UserFilter) -> Result<Option<User>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM users WHERE ", USER_COLUMNS));
        match filter {
            UserFilter::Id(id) => qb.push("id = ").push_bind(*id),
            UserFilter::Email(email) => qb.push("email = ").push_bind(email.clone()),
        };
        qb.push(" ORDER BY created_at, id LIMIT 1");
        tracing::debug!(sql = %qb.sql(), "query");
        Ok(qb.build_query_as::<User>().fetch_optional(&self.pool).await?)
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).bind(ids.to_vec()).fetch_all(&self.pool).await?)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (id, first_name, last_name, email, password, role, pets) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(user.first_name)
            .bind(user.last_name)
            .bind(user.email)
            .bind(user.password)
            .bind(user.role.as_str())
            .bind(user.pets)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, DUPLICATE_EMAIL))
    }

    async fn insert_users(&self, users: Vec<NewUser>) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "INSERT INTO users (id, first_name, last_name, email, password, role, pets) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            USER_COLUMNS
        );
        let mut out = Vec::with_capacity(users.len());
        let mut tx = self.pool.begin().await?;
        for user in users {
            let row = sqlx::query_as::<_, User>(&sql)
                .bind(Uuid::new_v4())
                .bind(user.first_name)
                .bind(user.last_name)
                .bind(user.email)
                .bind(user.password)
                .bind(user.role.as_str())
                .bind(user.pets)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_unique_violation(e, DUPLICATE_EMAIL))?;
            out.push(row);
        }
        tx.commit().await?;
        Ok(out)
    }

    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> Result<Option<User>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = NOW()");
        if let Some(v) = &patch.first_name {
            qb.push(", first_name = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.last_name {
            qb.push(", last_name = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.email {
            qb.push(", email = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.password {
            qb.push(", password = ").push_bind(v.clone());
        }
        if let Some(v) = patch.role {
            qb.push(", role = ").push_bind(v.as_str());
        }
        if let Some(v) = &patch.pets {
            qb.push(", pets = ").push_bind(v.clone());
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING ").push(USER_COLUMNS);
        tracing::debug!(sql = %qb.sql(), "query");
        qb.build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, DUPLICATE_EMAIL))
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("DELETE FROM users WHERE id = $1 RETURNING {}", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }
}

#[async_trait]
impl PetStore for PgStore {
    async fn list_pets(&self) -> Result<Vec<Pet>, AppError> {
        let sql = format!("SELECT {} FROM pets ORDER BY created_at, id", PET_COLUMNS);
        Ok(sqlx::query_as::<_, Pet>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_pet(&self, filter: &PetFilter) -> Result<Option<Pet>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM pets WHERE ", PET_COLUMNS));
        match filter {
            PetFilter::Id(id) => qb.push("id = ").push_bind(*id),
            PetFilter::Name(name) => qb.push("name = ").push_bind(name.clone()),
            PetFilter::Specie(specie) => qb.push("specie = ").push_bind(specie.clone()),
            PetFilter::Adopted(adopted) => qb.push("adopted = ").push_bind(*adopted),
            PetFilter::Owner(owner) => qb.push("owner = ").push_bind(*owner),
        };
        qb.push(" ORDER BY created_at, id LIMIT 1");
        tracing::debug!(sql = %qb.sql(), "query");
        Ok(qb.build_query_as::<Pet>().fetch_optional(&self.pool).await?)
    }

    async fn pets_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Pet>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM pets WHERE id = ANY($1)", PET_COLUMNS);
        Ok(sqlx::query_as::<_, Pet>(&sql).bind(ids.to_vec()).fetch_all(&self.pool).await?)
    }

    async fn insert_pet(&self, pet: NewPet) -> Result<Pet, AppError> {
        let sql = format!(
            "INSERT INTO pets (id, name, specie, birth_date, adopted, owner, image) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            PET_COLUMNS
        );
        Ok(sqlx::query_as::<_, Pet>(&sql)
            .bind(Uuid::new_v4())
            .bind(pet.name)
            .bind(pet.specie)
            .bind(pet.birth_date)
            .bind(pet.adopted)
            .bind(pet.owner)
            .bind(pet.image)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn insert_pets(&self, pets: Vec<NewPet>) -> Result<Vec<Pet>, AppError> {
        let sql = format!(
            "INSERT INTO pets (id, name, specie, birth_date, adopted, owner, image) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            PET_COLUMNS
        );
        let mut out = Vec::with_capacity(pets.len());
        let mut tx = self.pool.begin().await?;
        for pet in pets {
            let row = sqlx::query_as::<_, Pet>(&sql)
                .bind(Uuid::new_v4())
                .bind(pet.name)
                .bind(pet.specie)
                .bind(pet.birth_date)
                .bind(pet.adopted)
                .bind(pet.owner)
                .bind(pet.image)
                .fetch_one(&mut *tx)
                .await?;
            out.push(row);
        }
        tx.commit().await?;
        Ok(out)
    }

    async fn update_pet(&self, id: Uuid, patch: &PetPatch) -> Result<Option<Pet>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE pets SET updated_at = NOW()");
        if let Some(v) = &patch.name {
            qb.push(", name = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.specie {
            qb.push(", specie = ").push_bind(v.clone());
        }
        if let Some(v) = patch.birth_date {
            qb.push(", birth_date = ").push_bind(v);
        }
        if let Some(v) = patch.adopted {
            qb.push(", adopted = ").push_bind(v);
        }
        if let Some(v) = patch.owner {
            qb.push(", owner = ").push_bind(v);
        }
        if let Some(v) = &patch.image {
            qb.push(", image = ").push_bind(v.clone());
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING ").push(PET_COLUMNS);
        tracing::debug!(sql = %qb.sql(), "query");
        Ok(qb.build_query_as::<Pet>().fetch_optional(&self.pool).await?)
    }

    async fn delete_pet(&self, id: Uuid) -> Result<Option<Pet>, AppError> {
        let sql = format!("DELETE FROM pets WHERE id = $1 RETURNING {}", PET_COLUMNS);
        Ok(sqlx::query_as::<_, Pet>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }
}

#[async_trait]
impl AdoptionStore for PgStore {
    async fn list_adoptions(&self) -> Result<Vec<Adoption>, AppError> {
        let sql = format!("SELECT {} FROM adoptions ORDER BY created_at, id", ADOPTION_COLUMNS);
        Ok(sqlx::query_as::<_, Adoption>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_adoption(&self, filter: &AdoptionFilter) -> Result<Option<Adoption>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM adoptions WHERE ", ADOPTION_COLUMNS));
        match filter {
            AdoptionFilter::Id(id) => qb.push("id = ").push_bind(*id),
            AdoptionFilter::Owner(owner) => qb.push("owner = ").push_bind(*owner),
            AdoptionFilter::Pet(pet) => qb.push("pet = ").push_bind(*pet),
        };
        qb.push(" ORDER BY created_at, id LIMIT 1");
        Ok(qb.build_query_as::<Adoption>().fetch_optional(&self.pool).await?)
    }

    async fn insert_adoption(&self, adoption: NewAdoption) -> Result<Adoption, AppError> {
        let sql = format!(
            "INSERT INTO adoptions (id, owner, pet) VALUES ($1, $2, $3) RETURNING {}",
            ADOPTION_COLUMNS
        );
        Ok(sqlx::query_as::<_, Adoption>(&sql)
            .bind(Uuid::new_v4())
            .bind(adoption.owner)
            .bind(adoption.pet)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_adoption(&self, id: Uuid, patch: &AdoptionPatch) -> Result<Option<Adoption>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE adoptions SET updated_at = NOW()");
        if let Some(v) = patch.owner {
            qb.push(", owner = ").push_bind(v);
        }
        if let Some(v) = patch.pet {
            qb.push(", pet = ").push_bind(v);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING ").push(ADOPTION_COLUMNS);
        Ok(qb.build_query_as::<Adoption>().fetch_optional(&self.pool).await?)
    }

    async fn delete_adoption(&self, id: Uuid) -> Result<Option<Adoption>, AppError> {
        let sql = format!("DELETE FROM adoptions WHERE id = $1 RETURNING {}", ADOPTION_COLUMNS);
        Ok(sqlx::query_as::<_, Adoption>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_url_targets_postgres_database() {
        let (admin, db) = parse_db_name_from_url("postgres://me:pw@localhost:5432/adoptme?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://me:pw@localhost:5432/postgres");
        assert_eq!(db, "adoptme");
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("adopt\"me"), "\"adopt\"\"me\"");
    }
}
