pub mod config;
pub mod error;
pub mod operation;
pub mod path;
pub mod relocate;

pub use config::{ExistingFilePolicy, OrganizeConfig, RelocateAction};
pub use error::OrganizerError;
pub use operation::{OrganizeOperation, OrganizeStatus};
pub use relocate::organize;
