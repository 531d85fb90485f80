pub mod case_report;
pub mod challenge;
pub mod history;
pub mod loaders;
pub mod search;

pub use case_report::{CaseDetail, CaseDocument, CaseReport, Proceeding};
pub use challenge::ChallengeSession;
pub use history::{HistoryRecord, QueryStatus};
pub use loaders::{load_all_lookup_requests, load_lookup_request, LookupRequest};
pub use search::{CaseType, Court, SearchParameters};
