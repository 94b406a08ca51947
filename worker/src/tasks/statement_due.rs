use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use crates::domain::{
    entities::payment_accounts::PaymentAccountEntity,
    repositories::{
        cfs_accounts::CfsAccountRepository, events::EventPublisher,
        invoices::InvoiceRepository, non_sufficient_funds::NonSufficientFundsRepository,
        payment_accounts::PaymentAccountRepository, statements::StatementRepository,
    },
    value_objects::{
        enums::{
            payment_methods::PaymentMethod, statement_due_actions::StatementDueAction,
            statement_frequencies::StatementFrequency,
        },
        statement_notifications::{LockAccountEvent, StatementNotificationInfo},
    },
};
use crates::domain::entities::non_sufficient_funds::InsertNonSufficientFundsEntity;
use rust_decimal::Decimal;
use tracing::{error, info};

use crate::config::config_model::StatementDueConfig;

const NSF_DESCRIPTION: &str = "Non-sufficient funds on overdue statement";

/// Classifies an invoice's due state for "today". The due date is the day
/// before the invoice goes overdue: already past means OVERDUE, today means
/// DUE, and exactly seven days out means REMINDER.
pub fn determine_action(
    invoice_overdue_date: NaiveDate,
    today: NaiveDate,
) -> Option<(StatementDueAction, NaiveDate)> {
    let due_date = invoice_overdue_date - Duration::days(1);
    let reminder_date = due_date - Duration::days(7);

    if due_date < today {
        Some((StatementDueAction::Overdue, due_date))
    } else if due_date == today {
        Some((StatementDueAction::Due, due_date))
    } else if reminder_date == today {
        Some((StatementDueAction::Reminder, due_date))
    } else {
        None
    }
}

/// Evaluates unpaid monthly statements for deferred-billing (EFT) accounts:
/// sweeps overdue invoices, then notifies each account of its due state.
/// OVERDUE additionally freezes the settlement profile, publishes a lock
/// event, and records NSF rows before the notification goes out. One
/// account's failure never aborts the rest.
pub struct StatementDueTask {
    account_repo: Arc<dyn PaymentAccountRepository + Send + Sync>,
    invoice_repo: Arc<dyn InvoiceRepository + Send + Sync>,
    statement_repo: Arc<dyn StatementRepository + Send + Sync>,
    cfs_account_repo: Arc<dyn CfsAccountRepository + Send + Sync>,
    nsf_repo: Arc<dyn NonSufficientFundsRepository + Send + Sync>,
    publisher: Arc<dyn EventPublisher + Send + Sync>,
    config: StatementDueConfig,
    legislative_utc_offset: FixedOffset,
}

impl StatementDueTask {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_repo: Arc<dyn PaymentAccountRepository + Send + Sync>,
        invoice_repo: Arc<dyn InvoiceRepository + Send + Sync>,
        statement_repo: Arc<dyn StatementRepository + Send + Sync>,
        cfs_account_repo: Arc<dyn CfsAccountRepository + Send + Sync>,
        nsf_repo: Arc<dyn NonSufficientFundsRepository + Send + Sync>,
        publisher: Arc<dyn EventPublisher + Send + Sync>,
        config: StatementDueConfig,
        legislative_utc_offset: FixedOffset,
    ) -> Self {
        Self {
            account_repo,
            invoice_repo,
            statement_repo,
            cfs_account_repo,
            nsf_repo,
            publisher,
            config,
            legislative_utc_offset,
        }
    }

    pub async fn run(&self) -> Result<()> {
        if !self.config.enabled {
            info!("statement_due: disabled by configuration; skipping");
            return Ok(());
        }

        let today = Utc::now()
            .with_timezone(&self.legislative_utc_offset)
            .date_naive();

        self.update_invoice_overdue_status(today).await?;
        self.notify_for_monthly(today).await?;

        Ok(())
    }

    /// Flips unpaid EFT invoices whose overdue date (in the legislative
    /// timezone) is on or before today to OVERDUE in one bulk update.
    pub async fn update_invoice_overdue_status(&self, today: NaiveDate) -> Result<()> {
        let cutoff = self.start_of_next_local_day(today)?;
        let updated = self.invoice_repo.mark_eft_invoices_overdue(cutoff).await?;

        info!(updated, "statement_due: overdue sweep completed");
        Ok(())
    }

    pub async fn notify_for_monthly(&self, today: NaiveDate) -> Result<()> {
        let accounts = self.account_repo.find_monthly_eft_accounts().await?;
        info!(
            account_count = accounts.len(),
            "statement_due: processing monthly EFT accounts"
        );

        for account in accounts {
            if let Err(err) = self.process_account(&account, today).await {
                error!(
                    auth_account_id = %account.auth_account_id,
                    error = ?err,
                    "statement_due: account processing failed; continuing with remaining accounts"
                );
            }
        }

        Ok(())
    }

    async fn process_account(
        &self,
        account: &PaymentAccountEntity,
        today: NaiveDate,
    ) -> Result<()> {
        let Some(statement) = self
            .statement_repo
            .find_most_recent_by_frequency(
                account.id,
                StatementFrequency::Monthly.as_str().to_string(),
            )
            .await?
        else {
            return Ok(());
        };

        let Some(invoice) = self
            .statement_repo
            .find_most_overdue_unpaid_invoice(statement.id)
            .await?
        else {
            return Ok(());
        };

        let overdue_date = invoice
            .overdue_date
            .context("unpaid invoice is missing an overdue date")?;
        let overdue_local = overdue_date
            .with_timezone(&self.legislative_utc_offset)
            .date_naive();

        let Some((action, due_date)) = determine_action(overdue_local, today) else {
            return Ok(());
        };

        let total_due = self.statement_repo.total_due(statement.id).await?;
        if total_due <= Decimal::ZERO {
            info!(
                auth_account_id = %account.auth_account_id,
                statement_id = statement.id,
                "statement_due: nothing owing; skipping notification"
            );
            return Ok(());
        }

        let emails = self
            .statement_repo
            .find_recipient_emails(account.id)
            .await?;
        if emails.is_empty() {
            info!(
                auth_account_id = %account.auth_account_id,
                statement_id = statement.id,
                "statement_due: no recipients found; skipping notification"
            );
            return Ok(());
        }

        if action == StatementDueAction::Overdue {
            self.freeze_cfs_account(account).await?;
            self.lock_account(account, total_due).await?;
            self.create_nsf_rows(account, statement.id).await?;
        }

        self.publisher
            .publish_statement_notification(StatementNotificationInfo {
                auth_account_id: account.auth_account_id.clone(),
                statement_id: statement.id,
                action,
                due_date,
                emails,
                total_amount_owing: total_due,
            })
            .await?;

        info!(
            auth_account_id = %account.auth_account_id,
            statement_id = statement.id,
            action = %action,
            due_date = %due_date,
            total_amount_owing = %total_due,
            "statement_due: notification published"
        );

        Ok(())
    }

    async fn freeze_cfs_account(&self, account: &PaymentAccountEntity) -> Result<()> {
        info!(
            auth_account_id = %account.auth_account_id,
            "statement_due: freezing settlement profile"
        );
        self.cfs_account_repo.freeze_by_account_id(account.id).await?;
        Ok(())
    }

    async fn lock_account(
        &self,
        account: &PaymentAccountEntity,
        total_due: Decimal,
    ) -> Result<()> {
        info!(
            auth_account_id = %account.auth_account_id,
            "statement_due: publishing lock-account event"
        );
        self.publisher
            .publish_lock_account(LockAccountEvent {
                auth_account_id: account.auth_account_id.clone(),
                payment_method: PaymentMethod::Eft.to_string(),
                outstanding_amount: total_due,
                original_amount: total_due,
                amount: total_due,
            })
            .await?;
        Ok(())
    }

    async fn create_nsf_rows(
        &self,
        account: &PaymentAccountEntity,
        statement_id: i64,
    ) -> Result<()> {
        let cfs_account = self
            .cfs_account_repo
            .find_effective_by_account_id(account.id)
            .await?
            .context("account has no CFS account on record")?;

        let unpaid = self.statement_repo.find_unpaid_invoices(statement_id).await?;
        let rows: Vec<InsertNonSufficientFundsEntity> = unpaid
            .iter()
            .map(|invoice| InsertNonSufficientFundsEntity {
                invoice_id: invoice.id,
                cfs_account_number: cfs_account.cfs_account_number.clone(),
                description: Some(NSF_DESCRIPTION.to_string()),
            })
            .collect();

        info!(
            auth_account_id = %account.auth_account_id,
            statement_id,
            nsf_rows = rows.len(),
            "statement_due: recording non-sufficient-funds rows"
        );

        self.nsf_repo.create_rows(rows).await?;
        Ok(())
    }

    fn start_of_next_local_day(&self, today: NaiveDate) -> Result<DateTime<Utc>> {
        let tomorrow = today.succ_opt().context("date overflow computing cutoff")?;
        let local_midnight = tomorrow
            .and_time(NaiveTime::MIN)
            .and_local_timezone(self.legislative_utc_offset)
            .single()
            .context("cutoff is not a valid local time")?;
        Ok(local_midnight.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crates::domain::entities::cfs_accounts::CfsAccountEntity;
    use crates::domain::entities::invoices::InvoiceEntity;
    use crates::domain::entities::statements::StatementEntity;
    use crates::domain::repositories::cfs_accounts::MockCfsAccountRepository;
    use crates::domain::repositories::events::MockEventPublisher;
    use crates::domain::repositories::invoices::MockInvoiceRepository;
    use crates::domain::repositories::non_sufficient_funds::MockNonSufficientFundsRepository;
    use crates::domain::repositories::payment_accounts::MockPaymentAccountRepository;
    use crates::domain::repositories::statements::MockStatementRepository;
    use mockall::Sequence;
    use rust_decimal_macros::dec;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(-8 * 3600).unwrap()
    }

    fn config(enabled: bool) -> StatementDueConfig {
        StatementDueConfig {
            enabled,
            interval_secs: 3600,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 7).unwrap()
    }

    fn account(id: i64) -> PaymentAccountEntity {
        PaymentAccountEntity {
            id,
            auth_account_id: format!("auth-{id}"),
            name: Some("Example Partner".to_string()),
            payment_method: Some("EFT".to_string()),
            created_at: Utc::now(),
        }
    }

    fn statement(id: i64, payment_account_id: i64) -> StatementEntity {
        StatementEntity {
            id,
            payment_account_id,
            frequency: "MONTHLY".to_string(),
            from_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            to_date: NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
        }
    }

    /// An invoice whose overdue date lands on the given legislative-local
    /// date (noon local, offset -8).
    fn overdue_invoice(id: i64, local_date: NaiveDate) -> InvoiceEntity {
        let overdue = offset()
            .from_local_datetime(&local_date.and_hms_opt(12, 0, 0).unwrap())
            .single()
            .unwrap()
            .with_timezone(&Utc);
        InvoiceEntity {
            id,
            invoice_status_code: "OVERDUE".to_string(),
            payment_account_id: 1,
            corp_type_code: "VS".to_string(),
            payment_method_code: "EFT".to_string(),
            disbursement_status_code: None,
            overdue_date: Some(overdue),
            total: dec!(25.00),
            paid: dec!(0.00),
            created_at: Utc::now(),
        }
    }

    struct Mocks {
        account_repo: MockPaymentAccountRepository,
        invoice_repo: MockInvoiceRepository,
        statement_repo: MockStatementRepository,
        cfs_account_repo: MockCfsAccountRepository,
        nsf_repo: MockNonSufficientFundsRepository,
        publisher: MockEventPublisher,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                account_repo: MockPaymentAccountRepository::new(),
                invoice_repo: MockInvoiceRepository::new(),
                statement_repo: MockStatementRepository::new(),
                cfs_account_repo: MockCfsAccountRepository::new(),
                nsf_repo: MockNonSufficientFundsRepository::new(),
                publisher: MockEventPublisher::new(),
            }
        }

        fn into_task(self, enabled: bool) -> StatementDueTask {
            StatementDueTask::new(
                Arc::new(self.account_repo),
                Arc::new(self.invoice_repo),
                Arc::new(self.statement_repo),
                Arc::new(self.cfs_account_repo),
                Arc::new(self.nsf_repo),
                Arc::new(self.publisher),
                config(enabled),
                offset(),
            )
        }
    }

    #[test]
    fn action_is_due_on_the_day_before_overdue() {
        let overdue = today().succ_opt().unwrap();
        let (action, due_date) = determine_action(overdue, today()).unwrap();
        assert_eq!(action, StatementDueAction::Due);
        assert_eq!(due_date, today());
    }

    #[test]
    fn action_is_reminder_seven_days_before_due() {
        let overdue = today() + Duration::days(8);
        let (action, due_date) = determine_action(overdue, today()).unwrap();
        assert_eq!(action, StatementDueAction::Reminder);
        assert_eq!(due_date, today() + Duration::days(7));
    }

    #[test]
    fn action_is_overdue_once_the_due_date_has_passed() {
        let overdue = today();
        let (action, due_date) = determine_action(overdue, today()).unwrap();
        assert_eq!(action, StatementDueAction::Overdue);
        assert_eq!(due_date, today() - Duration::days(1));
    }

    #[test]
    fn no_action_outside_the_due_windows() {
        assert!(determine_action(today() + Duration::days(3), today()).is_none());
        assert!(determine_action(today() + Duration::days(30), today()).is_none());
    }

    #[tokio::test]
    async fn run_is_a_noop_when_disabled() {
        let mut mocks = Mocks::new();
        mocks.invoice_repo.expect_mark_eft_invoices_overdue().times(0);
        mocks.account_repo.expect_find_monthly_eft_accounts().times(0);

        mocks.into_task(false).run().await.expect("disabled run should succeed");
    }

    #[tokio::test]
    async fn overdue_sweep_uses_the_local_day_boundary() {
        let mut mocks = Mocks::new();
        mocks
            .invoice_repo
            .expect_mark_eft_invoices_overdue()
            .withf(|cutoff| {
                // start of Aug 8 at UTC-8 is 08:00 UTC
                *cutoff == Utc.with_ymd_and_hms(2025, 8, 8, 8, 0, 0).unwrap()
            })
            .times(1)
            .returning(|_| Ok(3));

        mocks
            .into_task(true)
            .update_invoice_overdue_status(today())
            .await
            .expect("sweep should succeed");
    }

    #[tokio::test]
    async fn overdue_action_freezes_locks_and_records_nsf_before_notifying() {
        let mut mocks = Mocks::new();
        let mut sequence = Sequence::new();

        mocks
            .account_repo
            .expect_find_monthly_eft_accounts()
            .returning(|| Ok(vec![account(1)]));
        mocks
            .statement_repo
            .expect_find_most_recent_by_frequency()
            .returning(|_, _| Ok(Some(statement(5, 1))));
        mocks
            .statement_repo
            .expect_find_most_overdue_unpaid_invoice()
            .returning(|_| {
                Ok(Some(overdue_invoice(
                    31,
                    NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
                )))
            });
        mocks
            .statement_repo
            .expect_total_due()
            .returning(|_| Ok(dec!(25.00)));
        mocks
            .statement_repo
            .expect_find_recipient_emails()
            .returning(|_| Ok(vec!["billing@example.org".to_string()]));
        mocks
            .statement_repo
            .expect_find_unpaid_invoices()
            .returning(|_| {
                Ok(vec![overdue_invoice(
                    31,
                    NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
                )])
            });
        mocks
            .cfs_account_repo
            .expect_find_effective_by_account_id()
            .returning(|_| {
                Ok(Some(CfsAccountEntity {
                    id: 9,
                    account_id: 1,
                    cfs_account_number: "CFS-0001".to_string(),
                    status: "FREEZE".to_string(),
                }))
            });

        mocks
            .cfs_account_repo
            .expect_freeze_by_account_id()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(1));
        mocks
            .publisher
            .expect_publish_lock_account()
            .withf(|event| event.auth_account_id == "auth-1" && event.outstanding_amount == dec!(25.00))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(()));
        mocks
            .nsf_repo
            .expect_create_rows()
            .withf(|rows| {
                rows.len() == 1
                    && rows[0].invoice_id == 31
                    && rows[0].cfs_account_number == "CFS-0001"
            })
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(()));
        mocks
            .publisher
            .expect_publish_statement_notification()
            .withf(|info| {
                info.action == StatementDueAction::Overdue
                    && info.auth_account_id == "auth-1"
                    && info.total_amount_owing == dec!(25.00)
            })
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(()));

        mocks
            .into_task(true)
            .notify_for_monthly(today())
            .await
            .expect("notify should succeed");
    }

    #[tokio::test]
    async fn due_action_notifies_without_freezing() {
        let mut mocks = Mocks::new();

        mocks
            .account_repo
            .expect_find_monthly_eft_accounts()
            .returning(|| Ok(vec![account(1)]));
        mocks
            .statement_repo
            .expect_find_most_recent_by_frequency()
            .returning(|_, _| Ok(Some(statement(5, 1))));
        mocks
            .statement_repo
            .expect_find_most_overdue_unpaid_invoice()
            .returning(|_| Ok(Some(overdue_invoice(31, today().succ_opt().unwrap()))));
        mocks
            .statement_repo
            .expect_total_due()
            .returning(|_| Ok(dec!(25.00)));
        mocks
            .statement_repo
            .expect_find_recipient_emails()
            .returning(|_| Ok(vec!["billing@example.org".to_string()]));

        mocks.cfs_account_repo.expect_freeze_by_account_id().times(0);
        mocks.publisher.expect_publish_lock_account().times(0);
        mocks.nsf_repo.expect_create_rows().times(0);
        mocks
            .publisher
            .expect_publish_statement_notification()
            .withf(|info| info.action == StatementDueAction::Due && info.due_date == today())
            .times(1)
            .returning(|_| Ok(()));

        mocks
            .into_task(true)
            .notify_for_monthly(today())
            .await
            .expect("notify should succeed");
    }

    #[tokio::test]
    async fn nothing_owing_skips_the_notification() {
        let mut mocks = Mocks::new();

        mocks
            .account_repo
            .expect_find_monthly_eft_accounts()
            .returning(|| Ok(vec![account(1)]));
        mocks
            .statement_repo
            .expect_find_most_recent_by_frequency()
            .returning(|_, _| Ok(Some(statement(5, 1))));
        mocks
            .statement_repo
            .expect_find_most_overdue_unpaid_invoice()
            .returning(|_| Ok(Some(overdue_invoice(31, today().succ_opt().unwrap()))));
        mocks.statement_repo.expect_total_due().returning(|_| Ok(dec!(0.00)));
        mocks.statement_repo.expect_find_recipient_emails().times(0);
        mocks.publisher.expect_publish_statement_notification().times(0);

        mocks
            .into_task(true)
            .notify_for_monthly(today())
            .await
            .expect("notify should succeed");
    }

    #[tokio::test]
    async fn missing_recipients_skip_the_notification() {
        let mut mocks = Mocks::new();

        mocks
            .account_repo
            .expect_find_monthly_eft_accounts()
            .returning(|| Ok(vec![account(1)]));
        mocks
            .statement_repo
            .expect_find_most_recent_by_frequency()
            .returning(|_, _| Ok(Some(statement(5, 1))));
        mocks
            .statement_repo
            .expect_find_most_overdue_unpaid_invoice()
            .returning(|_| Ok(Some(overdue_invoice(31, today().succ_opt().unwrap()))));
        mocks.statement_repo.expect_total_due().returning(|_| Ok(dec!(25.00)));
        mocks
            .statement_repo
            .expect_find_recipient_emails()
            .returning(|_| Ok(vec![]));
        mocks.publisher.expect_publish_statement_notification().times(0);

        mocks
            .into_task(true)
            .notify_for_monthly(today())
            .await
            .expect("notify should succeed");
    }

    #[tokio::test]
    async fn one_failing_account_does_not_abort_the_rest() {
        let mut mocks = Mocks::new();

        mocks
            .account_repo
            .expect_find_monthly_eft_accounts()
            .returning(|| Ok(vec![account(1), account(2)]));
        mocks
            .statement_repo
            .expect_find_most_recent_by_frequency()
            .withf(|payment_account_id, _| *payment_account_id == 1)
            .returning(|_, _| Err(anyhow::anyhow!("statement lookup failed")));
        mocks
            .statement_repo
            .expect_find_most_recent_by_frequency()
            .withf(|payment_account_id, _| *payment_account_id == 2)
            .returning(|_, _| Ok(Some(statement(6, 2))));
        mocks
            .statement_repo
            .expect_find_most_overdue_unpaid_invoice()
            .returning(|_| Ok(Some(overdue_invoice(32, today().succ_opt().unwrap()))));
        mocks.statement_repo.expect_total_due().returning(|_| Ok(dec!(40.00)));
        mocks
            .statement_repo
            .expect_find_recipient_emails()
            .returning(|_| Ok(vec!["billing@example.org".to_string()]));
        mocks
            .publisher
            .expect_publish_statement_notification()
            .withf(|info| info.auth_account_id == "auth-2")
            .times(1)
            .returning(|_| Ok(()));

        mocks
            .into_task(true)
            .notify_for_monthly(today())
            .await
            .expect("notify should succeed despite one failing account");
    }
}
