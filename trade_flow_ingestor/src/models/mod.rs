pub mod category;
pub mod date;
pub mod granularity;
pub mod horizon;
pub mod record;
pub mod request_params;
pub mod table;
