pub mod aggregator;
pub mod analyzer;
pub mod matcher;
pub mod selector;

pub use crate::domain::model::{
    CourseQuery, CourseRecord, InterestSelection, MatchResult, SkillMap, SkillProfile,
    SkillRecord,
};
pub use crate::domain::ports::{ConfigProvider, NarrativeGenerator, RegistrySource};
pub use crate::utils::error::Result;
