pub mod payment_transactions;
