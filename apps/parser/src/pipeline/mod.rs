// Résumé parsing pipeline: normalize, segment, delimit entries, extract, score.
// Every stage is a pure function of its input; failures are contained per stage (see stage.rs).

pub mod capabilities;
pub mod confidence;
pub mod dates;
pub mod entities;
pub mod entries;
pub mod normalize;
pub mod orchestrator;
pub mod personal;
pub mod postprocess;
pub mod sections;
pub mod skills;
pub mod stage;
pub mod summary;
pub mod text;
pub mod vocabulary;

pub use orchestrator::ResumeParsingPipeline;
