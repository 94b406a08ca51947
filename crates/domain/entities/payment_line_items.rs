use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::infra::db::postgres::schema::payment_line_items;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payment_line_items)]
pub struct PaymentLineItemEntity {
    pub id: i64,
    pub invoice_id: i64,
    pub fee_distribution_id: i64,
    pub total: Decimal,
    pub description: Option<String>,
}
