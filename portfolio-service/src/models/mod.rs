pub mod artwork;
pub mod inquiry;
pub mod record;

pub use artwork::Artwork;
pub use inquiry::Inquiry;
pub use record::{CollectionName, Record, Stored};
