pub mod case_service;
pub mod challenge_service;
pub mod gateway;
pub mod history_service;
pub mod report_writer;
pub mod submit_service;

pub use case_service::CaseService;
pub use challenge_service::ChallengeService;
pub use gateway::{CourtGateway, SearchGateway};
pub use history_service::HistoryService;
pub use report_writer::ReportWriter;
pub use submit_service::{SubmitService, SubmitVerdict};
