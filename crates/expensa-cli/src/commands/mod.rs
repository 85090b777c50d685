pub mod attach;
pub mod audit;
pub mod dispatch;
pub mod history;
pub mod record;
pub mod schema;
pub mod shared;
pub mod status;
