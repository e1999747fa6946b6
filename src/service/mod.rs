//! Data-access services, the adoption workflow and the session handler.

mod adoptions;
mod pets;
mod seed;
mod sessions;
mod users;
mod validation;
mod workflow;
pub use adoptions::AdoptionsService;
pub use pets::PetsService;
pub use seed::{SeedCounts, SeedService};
pub use sessions::{Credentials, Registration, SessionService};
pub use users::UsersService;
pub use validation::{is_valid_email, RequestValidator};
pub use workflow::AdoptionWorkflow;
