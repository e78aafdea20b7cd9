//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod admin;
pub mod card;
pub mod package;
pub mod session;
pub mod subscriber;

// Re-export specific types to avoid conflicts
pub use admin::{Column as AdminColumn, Entity as Admin, Model as AdminModel};
pub use card::{CardStatus, Column as CardColumn, Entity as Card, Model as CardModel};
pub use package::{Column as PackageColumn, Entity as Package, Model as PackageModel};
pub use session::{Column as SessionColumn, Entity as Session, Model as SessionModel};
pub use subscriber::{
    Column as SubscriberColumn, Entity as Subscriber, Model as SubscriberModel, SubscriberStatus,
};
