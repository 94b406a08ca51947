pub mod ejv_batch;
pub mod statement_due;
