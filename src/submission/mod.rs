//! @ai:module:intent Raw submission data model and file discovery
//! @ai:module:layer domain
//! @ai:module:public_api RawSubmission, SubmissionLoader

pub mod loader;
pub mod raw;

pub use loader::{SubmissionFile, SubmissionLoader, SubmissionLoaderTrait};
pub use raw::{RawOption, RawQuestion, RawSection, RawSubject, RawSubmission};
