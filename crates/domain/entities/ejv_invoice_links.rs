use diesel::prelude::*;

use crate::infra::db::postgres::schema::ejv_invoice_links;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = ejv_invoice_links)]
pub struct EjvInvoiceLinkEntity {
    pub id: i64,
    pub ejv_file_id: i64,
    pub invoice_id: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ejv_invoice_links)]
pub struct InsertEjvInvoiceLinkEntity {
    pub ejv_file_id: i64,
    pub invoice_id: i64,
}
