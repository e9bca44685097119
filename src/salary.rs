pub mod drafts;
pub mod reconcile;
