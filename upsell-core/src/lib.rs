pub mod session;
pub mod signing;

pub use session::{AuthError, SessionClaims, SessionVerifier};
pub use signing::{ChangesetClaims, ChangesetSigner, SignError, SignedChangeset};
