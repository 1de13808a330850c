pub mod post;
pub mod user;

pub(crate) use post::{CategoryRecord, PostRecord};
pub(crate) use user::{CredentialsRecord, UserRecord};
