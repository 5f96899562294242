pub mod search;

pub use search::DoctorSearchService;
