pub mod age;
pub mod condition;
pub mod enums;
pub mod link;
pub mod therapy;
pub mod trial;

pub use age::AgeSpan;
pub use condition::ConditionKey;
pub use enums::{InclusionLabel, ModelError, RelevanceLabel};
pub use link::ReferenceLink;
pub use therapy::TherapyRecord;
pub use trial::{TrialPhase, TrialSummary};
