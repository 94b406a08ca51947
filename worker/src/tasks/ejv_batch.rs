use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Utc};
use crates::domain::{
    entities::{corp_types::CorpTypeEntity, ejv_files::InsertEjvFileEntity},
    repositories::{
        corp_types::CorpTypeRepository, distribution_codes::DistributionCodeRepository,
        ejv_files::EjvFileRepository, invoices::InvoiceRepository,
        object_storage::ObjectStorage,
    },
    value_objects::enums::{
        disbursement_statuses::DisbursementStatus, ejv_batch_types::EjvBatchType,
    },
};
use rust_decimal::Decimal;
use tracing::{error, info};

use crate::config::config_model::EjvConfig;
use crate::ejv::{self, EjvBatchWriter};

/// Generates Electronic Journal Voucher batch files for partner
/// disbursements and uploads them to object storage.
///
/// Partners are processed sequentially; each partner's database changes
/// commit before its content is rendered and uploaded, so an upload failure
/// never rolls back ledger state. A partner failure is logged and does not
/// abort the remaining partners.
pub struct EjvBatchTask {
    corp_type_repo: Arc<dyn CorpTypeRepository + Send + Sync>,
    invoice_repo: Arc<dyn InvoiceRepository + Send + Sync>,
    distribution_repo: Arc<dyn DistributionCodeRepository + Send + Sync>,
    ejv_file_repo: Arc<dyn EjvFileRepository + Send + Sync>,
    storage: Arc<dyn ObjectStorage + Send + Sync>,
    config: EjvConfig,
    legislative_utc_offset: FixedOffset,
}

struct ResolvedJournal {
    credit_distribution: String,
    debit_distribution: String,
    line_totals: Vec<Decimal>,
}

impl EjvBatchTask {
    pub fn new(
        corp_type_repo: Arc<dyn CorpTypeRepository + Send + Sync>,
        invoice_repo: Arc<dyn InvoiceRepository + Send + Sync>,
        distribution_repo: Arc<dyn DistributionCodeRepository + Send + Sync>,
        ejv_file_repo: Arc<dyn EjvFileRepository + Send + Sync>,
        storage: Arc<dyn ObjectStorage + Send + Sync>,
        config: EjvConfig,
        legislative_utc_offset: FixedOffset,
    ) -> Self {
        Self {
            corp_type_repo,
            invoice_repo,
            distribution_repo,
            ejv_file_repo,
            storage,
            config,
            legislative_utc_offset,
        }
    }

    pub async fn run(&self) -> Result<()> {
        for batch_type in EjvBatchType::all() {
            self.create_disbursement_file(batch_type).await?;
        }
        Ok(())
    }

    async fn create_disbursement_file(&self, batch_type: EjvBatchType) -> Result<()> {
        let local_now: DateTime<FixedOffset> =
            Utc::now().with_timezone(&self.legislative_utc_offset);
        let file_name = ejv::batch_file_name(&self.config.feeder_number, local_now.naive_local());
        let fiscal_year = ejv::fiscal_year(local_now.date_naive());
        let effective_date = ejv::effective_date(local_now.date_naive());
        let description = ejv::pad_description(&format!(
            "{} {} {:0>2}",
            self.config.disbursement_desc,
            local_now.format("%B").to_string().to_uppercase(),
            local_now.format("%d")
        ));

        let partners = self
            .corp_type_repo
            .find_by_batch_type(batch_type.as_str().to_string())
            .await?;

        info!(
            batch_type = batch_type.as_str(),
            partner_count = partners.len(),
            file_name = %file_name,
            "ejv: processing batch type"
        );

        // Every partner's records append to one file per run; each upload
        // re-puts the accumulated content so the final object holds the
        // whole run.
        let mut accumulated = String::new();

        for partner in partners {
            if let Err(err) = self
                .process_partner(
                    &partner,
                    batch_type,
                    &file_name,
                    fiscal_year,
                    &effective_date,
                    &description,
                    &mut accumulated,
                )
                .await
            {
                error!(
                    partner = %partner.code,
                    batch_type = batch_type.as_str(),
                    error = ?err,
                    "ejv: partner disbursement failed; continuing with remaining partners"
                );
            }
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn process_partner(
        &self,
        partner: &CorpTypeEntity,
        batch_type: EjvBatchType,
        file_name: &str,
        fiscal_year: i32,
        effective_date: &str,
        description: &str,
        accumulated: &mut String,
    ) -> Result<()> {
        let invoices = self
            .invoice_repo
            .find_disbursable_by_corp_type(partner.code.clone())
            .await?;

        if invoices.is_empty() {
            return Ok(());
        }

        let invoice_ids: Vec<i64> = invoices.iter().map(|invoice| invoice.id).collect();
        let line_items = self.invoice_repo.find_line_items(invoice_ids.clone()).await?;

        // Group line items by fee distribution; the BTreeMap keeps the
        // group order deterministic so totals are reproducible.
        let mut groups: BTreeMap<i64, Vec<Decimal>> = BTreeMap::new();
        for line in &line_items {
            groups.entry(line.fee_distribution_id).or_default().push(line.total);
        }

        // Resolve every distribution pairing before touching the database
        // so nothing can fail between the commit and the rendered content.
        let mut journals: Vec<ResolvedJournal> = Vec::with_capacity(groups.len());
        for (&distribution_code_id, line_totals) in &groups {
            let debit_code = self
                .distribution_repo
                .find_by_id(distribution_code_id)
                .await?
                .ok_or_else(|| anyhow!("distribution code {distribution_code_id} not found"))?;

            let credit_code_id = debit_code.disbursement_distribution_code_id.with_context(|| {
                format!("distribution code {distribution_code_id} has no disbursement pairing")
            })?;
            let credit_code = self
                .distribution_repo
                .find_by_id(credit_code_id)
                .await?
                .ok_or_else(|| {
                    anyhow!("disbursement distribution code {credit_code_id} not found")
                })?;

            journals.push(ResolvedJournal {
                credit_distribution: ejv::distribution_string(&credit_code),
                debit_distribution: ejv::distribution_string(&debit_code),
                line_totals: line_totals.clone(),
            });
        }

        let file_id = self
            .ejv_file_repo
            .commit_partner_batch(
                InsertEjvFileEntity {
                    file_ref: file_name.to_string(),
                    is_distribution: true,
                    disbursement_status_code: Some(DisbursementStatus::Uploaded.to_string()),
                },
                invoice_ids.clone(),
            )
            .await?;

        info!(
            partner = %partner.code,
            file_id,
            invoice_count = invoice_ids.len(),
            "ejv: partner batch committed"
        );

        let mut writer = EjvBatchWriter::new(
            &self.config.feeder_number,
            batch_type,
            fiscal_year,
            file_id,
            &self.config.ministry_prefix,
        );
        let journal_name =
            EjvBatchWriter::journal_name(&self.config.ministry_prefix, &partner.code);

        writer.add_batch_header(&self.config.message_version);
        for journal in &journals {
            writer.add_journal(
                &journal_name,
                effective_date,
                &journal.credit_distribution,
                &journal.debit_distribution,
                &journal.line_totals,
                description,
            );
        }
        writer.add_trailer();

        info!(
            partner = %partner.code,
            control_unit = writer.control_unit(),
            batch_total = %writer.batch_total(),
            "ejv: partner batch rendered"
        );

        accumulated.push_str(&writer.into_content());

        // Upload is best effort; the database commit above stands either
        // way and a later sweep reconciles missing objects.
        if let Err(err) = self
            .storage
            .put(file_name.to_string(), Bytes::from(accumulated.clone()))
            .await
        {
            error!(
                file_name = %file_name,
                error = ?err,
                "ejv: upload failed; database changes already committed"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::entities::distribution_codes::DistributionCodeEntity;
    use crates::domain::entities::invoices::InvoiceEntity;
    use crates::domain::entities::payment_line_items::PaymentLineItemEntity;
    use crates::domain::repositories::corp_types::MockCorpTypeRepository;
    use crates::domain::repositories::distribution_codes::MockDistributionCodeRepository;
    use crates::domain::repositories::ejv_files::MockEjvFileRepository;
    use crates::domain::repositories::invoices::MockInvoiceRepository;
    use crates::domain::repositories::object_storage::MockObjectStorage;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn config() -> EjvConfig {
        EjvConfig {
            feeder_number: "3535".to_string(),
            ministry_prefix: "GV".to_string(),
            message_version: "4010".to_string(),
            disbursement_desc: "GOVERNMENT DISBURSEMENTS".to_string(),
            interval_secs: 3600,
        }
    }

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(-8 * 3600).unwrap()
    }

    fn partner(code: &str, batch_type: &str) -> CorpTypeEntity {
        CorpTypeEntity {
            code: code.to_string(),
            description: None,
            batch_type: Some(batch_type.to_string()),
        }
    }

    fn invoice(id: i64, corp_type_code: &str) -> InvoiceEntity {
        InvoiceEntity {
            id,
            invoice_status_code: "PAID".to_string(),
            payment_account_id: 1,
            corp_type_code: corp_type_code.to_string(),
            payment_method_code: "DIRECT_PAY".to_string(),
            disbursement_status_code: None,
            overdue_date: None,
            total: dec!(10.00),
            paid: dec!(10.00),
            created_at: Utc::now(),
        }
    }

    fn line_item(id: i64, invoice_id: i64, fee_distribution_id: i64, total: Decimal) -> PaymentLineItemEntity {
        PaymentLineItemEntity {
            id,
            invoice_id,
            fee_distribution_id,
            total,
            description: None,
        }
    }

    fn distribution(id: i64, disbursement_id: Option<i64>) -> DistributionCodeEntity {
        DistributionCodeEntity {
            distribution_code_id: id,
            client: "112".to_string(),
            responsibility_centre: "22222".to_string(),
            service_line: "33333".to_string(),
            stob: "4444".to_string(),
            project_code: "5555555".to_string(),
            disbursement_distribution_code_id: disbursement_id,
        }
    }

    fn task(
        corp_type_repo: MockCorpTypeRepository,
        invoice_repo: MockInvoiceRepository,
        distribution_repo: MockDistributionCodeRepository,
        ejv_file_repo: MockEjvFileRepository,
        storage: MockObjectStorage,
    ) -> EjvBatchTask {
        EjvBatchTask::new(
            Arc::new(corp_type_repo),
            Arc::new(invoice_repo),
            Arc::new(distribution_repo),
            Arc::new(ejv_file_repo),
            Arc::new(storage),
            config(),
            offset(),
        )
    }

    #[tokio::test]
    async fn partner_without_eligible_invoices_creates_nothing() {
        let mut corp_type_repo = MockCorpTypeRepository::new();
        let mut invoice_repo = MockInvoiceRepository::new();
        let mut ejv_file_repo = MockEjvFileRepository::new();
        let mut storage = MockObjectStorage::new();

        corp_type_repo
            .expect_find_by_batch_type()
            .returning(|batch_type| {
                if batch_type == "GI" {
                    Ok(vec![partner("VS", "GI")])
                } else {
                    Ok(vec![])
                }
            });
        invoice_repo
            .expect_find_disbursable_by_corp_type()
            .returning(|_| Ok(vec![]));
        ejv_file_repo.expect_commit_partner_batch().times(0);
        storage.expect_put().times(0);

        task(
            corp_type_repo,
            invoice_repo,
            MockDistributionCodeRepository::new(),
            ejv_file_repo,
            storage,
        )
        .run()
        .await
        .expect("run should succeed");
    }

    #[tokio::test]
    async fn partner_batch_renders_and_uploads_with_control_totals() {
        let mut corp_type_repo = MockCorpTypeRepository::new();
        let mut invoice_repo = MockInvoiceRepository::new();
        let mut distribution_repo = MockDistributionCodeRepository::new();
        let mut ejv_file_repo = MockEjvFileRepository::new();
        let mut storage = MockObjectStorage::new();

        corp_type_repo
            .expect_find_by_batch_type()
            .returning(|batch_type| {
                if batch_type == "GI" {
                    Ok(vec![partner("VS", "GI")])
                } else {
                    Ok(vec![])
                }
            });
        invoice_repo
            .expect_find_disbursable_by_corp_type()
            .returning(|code| Ok(vec![invoice(101, &code), invoice(102, &code)]));
        invoice_repo.expect_find_line_items().returning(|_| {
            Ok(vec![
                line_item(1, 101, 7, dec!(10.00)),
                line_item(2, 101, 8, dec!(2.50)),
                line_item(3, 102, 7, dec!(5.00)),
            ])
        });
        // fee distributions 7 and 8 pair with disbursement codes 70 and 80
        distribution_repo.expect_find_by_id().returning(|id| match id {
            7 => Ok(Some(distribution(7, Some(70)))),
            8 => Ok(Some(distribution(8, Some(80)))),
            70 => Ok(Some(distribution(70, None))),
            80 => Ok(Some(distribution(80, None))),
            _ => Ok(None),
        });
        ejv_file_repo
            .expect_commit_partner_batch()
            .withf(|file, invoice_ids| {
                file.is_distribution
                    && file.disbursement_status_code.as_deref() == Some("UPLOADED")
                    && invoice_ids == &[101, 102]
            })
            .times(1)
            .returning(|_, _| Ok(42));

        let uploaded = Arc::new(Mutex::new(String::new()));
        let uploaded_ref = Arc::clone(&uploaded);
        storage.expect_put().times(1).returning(move |file_name, content| {
            assert!(file_name.starts_with("INBOX.F3535."));
            *uploaded_ref.lock().unwrap() = String::from_utf8(content.to_vec()).unwrap();
            Ok(())
        });

        task(
            corp_type_repo,
            invoice_repo,
            distribution_repo,
            ejv_file_repo,
            storage,
        )
        .run()
        .await
        .expect("run should succeed");

        let content = uploaded.lock().unwrap().clone();
        let lines: Vec<&str> = content.lines().filter(|l| !l.is_empty()).collect();

        // BH + 2 journal groups (JH + line pairs) + BT
        assert_eq!(lines.len(), 1 + (1 + 2 * 2) + (1 + 2) + 1);
        // control unit = 2 groups + 2 * 3 line items
        let trailer = lines.last().unwrap();
        assert!(trailer.starts_with("3535GIBT"));
        assert!(trailer.contains("000000000000008"));
        assert!(trailer.contains("000000000017.50"));
    }

    #[tokio::test]
    async fn upload_failure_is_non_fatal_after_commit() {
        let mut corp_type_repo = MockCorpTypeRepository::new();
        let mut invoice_repo = MockInvoiceRepository::new();
        let mut distribution_repo = MockDistributionCodeRepository::new();
        let mut ejv_file_repo = MockEjvFileRepository::new();
        let mut storage = MockObjectStorage::new();

        corp_type_repo
            .expect_find_by_batch_type()
            .returning(|batch_type| {
                if batch_type == "GI" {
                    Ok(vec![partner("VS", "GI")])
                } else {
                    Ok(vec![])
                }
            });
        invoice_repo
            .expect_find_disbursable_by_corp_type()
            .returning(|code| Ok(vec![invoice(101, &code)]));
        invoice_repo
            .expect_find_line_items()
            .returning(|_| Ok(vec![line_item(1, 101, 7, dec!(10.00))]));
        distribution_repo.expect_find_by_id().returning(|id| match id {
            7 => Ok(Some(distribution(7, Some(70)))),
            70 => Ok(Some(distribution(70, None))),
            _ => Ok(None),
        });
        ejv_file_repo
            .expect_commit_partner_batch()
            .times(1)
            .returning(|_, _| Ok(43));
        storage
            .expect_put()
            .times(1)
            .returning(|_, _| Err(anyhow!("bucket unavailable")));

        task(
            corp_type_repo,
            invoice_repo,
            distribution_repo,
            ejv_file_repo,
            storage,
        )
        .run()
        .await
        .expect("upload failures must not fail the run");
    }

    #[tokio::test]
    async fn failing_partner_does_not_abort_the_rest() {
        let mut corp_type_repo = MockCorpTypeRepository::new();
        let mut invoice_repo = MockInvoiceRepository::new();
        let mut distribution_repo = MockDistributionCodeRepository::new();
        let mut ejv_file_repo = MockEjvFileRepository::new();
        let mut storage = MockObjectStorage::new();

        corp_type_repo
            .expect_find_by_batch_type()
            .returning(|batch_type| {
                if batch_type == "GI" {
                    Ok(vec![partner("BAD", "GI"), partner("VS", "GI")])
                } else {
                    Ok(vec![])
                }
            });
        invoice_repo
            .expect_find_disbursable_by_corp_type()
            .returning(|code| {
                if code == "BAD" {
                    Ok(vec![invoice(201, &code)])
                } else {
                    Ok(vec![invoice(202, &code)])
                }
            });
        invoice_repo
            .expect_find_line_items()
            .returning(|invoice_ids| {
                // the BAD partner's line items point at an unpaired
                // distribution
                if invoice_ids == vec![201] {
                    Ok(vec![line_item(1, 201, 9, dec!(3.00))])
                } else {
                    Ok(vec![line_item(2, 202, 7, dec!(4.00))])
                }
            });
        distribution_repo.expect_find_by_id().returning(|id| match id {
            9 => Ok(Some(distribution(9, None))),
            7 => Ok(Some(distribution(7, Some(70)))),
            70 => Ok(Some(distribution(70, None))),
            _ => Ok(None),
        });
        ejv_file_repo
            .expect_commit_partner_batch()
            .withf(|_, invoice_ids| invoice_ids == &[202])
            .times(1)
            .returning(|_, _| Ok(44));
        storage.expect_put().times(1).returning(|_, _| Ok(()));

        task(
            corp_type_repo,
            invoice_repo,
            distribution_repo,
            ejv_file_repo,
            storage,
        )
        .run()
        .await
        .expect("a failing partner must not abort the run");
    }
}
