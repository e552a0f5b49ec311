pub mod changeset;
pub mod offer;
