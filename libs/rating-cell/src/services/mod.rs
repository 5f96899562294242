pub mod ledger;

pub use ledger::RatingLedgerService;
