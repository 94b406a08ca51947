pub mod cfs_account_statuses;
pub mod disbursement_statuses;
pub mod ejv_batch_types;
pub mod invoice_statuses;
pub mod payment_methods;
pub mod payment_statuses;
pub mod statement_due_actions;
pub mod statement_frequencies;
pub mod transaction_statuses;
