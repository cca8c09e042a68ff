//! Database entities

pub mod media;
pub mod podcast;

pub use media::Entity as Media;
pub use podcast::Entity as Podcast;
pub use podcast::Explicit;
