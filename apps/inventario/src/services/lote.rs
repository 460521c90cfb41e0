//! # Lote Workflow
//!
//! Drives a [`LoteWizard`] against the store, the session and the quote
//! gateway.
//!
//! ## Commit Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit()                                                              │
//! │    1. wizard.commit_plan()      end date + ≥1 line, else VALIDATION    │
//! │    2. session → user id         else NOT_AUTHENTICATED                 │
//! │    3. gateway.fetch_rate()      fresh quote, else GATEWAY_UNAVAILABLE  │
//! │    4. one transaction: lote, usuario_lote, lines                       │
//! │    5. wizard.reset()                                                   │
//! │                                                                         │
//! │  Failure at any step leaves the wizard as it was, ready to retry.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::ApiResult;
use crate::exchange::ExchangeRateGateway;
use crate::session::{load_session, SessionStore};
use inventario_core::{
    CoreError, ExchangeRate, LoteSummary, LoteWizard, ProductOption, StagedLine, WizardStep,
};
use inventario_db::Database;

pub struct LoteWorkflow {
    db: Database,
    sessions: Arc<dyn SessionStore>,
    gateway: Arc<dyn ExchangeRateGateway>,
    wizard: LoteWizard,
}

impl LoteWorkflow {
    pub fn new(
        db: Database,
        sessions: Arc<dyn SessionStore>,
        gateway: Arc<dyn ExchangeRateGateway>,
    ) -> Self {
        LoteWorkflow {
            db,
            sessions,
            gateway,
            wizard: LoteWizard::new(),
        }
    }

    pub fn wizard(&self) -> &LoteWizard {
        &self.wizard
    }

    /// Field setters live on the wizard itself.
    pub fn wizard_mut(&mut self) -> &mut LoteWizard {
        &mut self.wizard
    }

    pub fn step(&self) -> WizardStep {
        self.wizard.step()
    }

    /// Products offered by the line picker.
    pub async fn available_products(&self) -> ApiResult<Vec<ProductOption>> {
        Ok(self.db.products().list_options().await?)
    }

    /// Header → Lines. The quote is only fetched once the header is valid.
    pub async fn next_step(&mut self) -> ApiResult<ExchangeRate> {
        self.wizard.check_can_advance()?;

        let quote = self.gateway.fetch_rate().await?;
        self.wizard.advance_with_quote(quote)?;

        info!(quote = %quote, "Lote wizard on lines step");
        Ok(quote)
    }

    pub fn previous_step(&mut self) {
        self.wizard.previous_step();
    }

    pub fn stage_line(&mut self) -> ApiResult<StagedLine> {
        let line = self.wizard.stage_line()?.clone();
        debug!(product_id = line.product_id, quantity = %line.quantity, "Line staged");
        Ok(line)
    }

    pub fn remove_line(&mut self, index: usize) -> ApiResult<StagedLine> {
        Ok(self.wizard.remove_line(index)?)
    }

    /// Writes the lote and its lines atomically, then resets the wizard.
    pub async fn commit(&mut self) -> ApiResult<LoteSummary> {
        let plan = self.wizard.commit_plan()?;

        let session = load_session(self.sessions.as_ref())
            .await?
            .ok_or(CoreError::NotAuthenticated)?;
        let user_id = self
            .db
            .users()
            .find_id_by_email(&session.user_email)
            .await?
            .ok_or(CoreError::NotAuthenticated)?;

        let quote = self.gateway.fetch_rate().await?;
        // registration day is the UTC calendar day, whatever the device zone
        let registered_on = chrono::Utc::now().date_naive();
        let line_count = plan.lines.len();

        let (lote, lines) = plan.into_records(user_id, registered_on, quote);
        let lote_id = self.db.lotes().create_with_lines(&lote, &lines).await?;

        self.wizard.reset();
        info!(lote_id, line_count, user_id, "Lote registered");

        Ok(LoteSummary {
            lote_id,
            line_count,
        })
    }

    /// Abandons the wizard. Nothing was written, so nothing is cleaned up.
    pub fn cancel(&mut self) {
        self.wizard.reset();
        debug!("Lote wizard cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::exchange::FixedExchangeRate;
    use crate::session::{save_session, MemorySessionStore};
    use chrono::NaiveDate;
    use crate::services::ProductCatalog;
    use inventario_core::{NewProduct, NewUser, Quantity, Session};
    use inventario_db::DbConfig;

    struct Fixture {
        workflow: LoteWorkflow,
        db: Database,
        sessions: Arc<MemorySessionStore>,
        gateway: Arc<FixedExchangeRate>,
        products: Vec<i64>,
    }

    async fn fixture(logged_in: bool) -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.users()
            .insert(&NewUser {
                email: "ana@example.com".into(),
                password_hash: "0".repeat(64),
                first_name: "Ana".into(),
                last_name: "Rojas".into(),
                phone: 71234567,
            })
            .await
            .unwrap();
        let user_id = db.users().find_id_by_email("ana@example.com").await.unwrap().unwrap();

        let mut products = Vec::new();
        for name in ["Leche", "Arroz"] {
            let id = db
                .products()
                .insert(&NewProduct {
                    name: name.into(),
                    quantity_hundredths: 0,
                    min_stock_hundredths: 0,
                    average_quantity_hundredths: 0,
                    description: String::new(),
                    image: None,
                    sell_price_cents: 1000,
                    buy_price_cents: 700,
                    category_id: None,
                    owner: "ana".into(),
                })
                .await
                .unwrap();
            products.push(id);
        }

        let sessions = Arc::new(MemorySessionStore::new());
        if logged_in {
            save_session(
                sessions.as_ref(),
                &Session {
                    user_id,
                    user_email: "ana@example.com".into(),
                    user_name: "Ana Rojas".into(),
                },
            )
            .await
            .unwrap();
        }

        let gateway = Arc::new(FixedExchangeRate::new(13.57));
        let workflow = LoteWorkflow::new(db.clone(), sessions.clone(), gateway.clone());

        Fixture {
            workflow,
            db,
            sessions,
            gateway,
            products,
        }
    }

    fn stage(wf: &mut LoteWorkflow, product: i64, qty: &str, price: &str, rate: &str) {
        let wizard = wf.wizard_mut();
        wizard.set_draft_product(Some(product));
        wizard.set_draft_quantity(qty);
        wizard.set_draft_purchase_price(price);
        wizard.set_draft_rate(rate);
        wf.stage_line().unwrap();
    }

    #[tokio::test]
    async fn test_commit_two_lines_resets_wizard() {
        let mut f = fixture(true).await;
        let wf = &mut f.workflow;

        wf.wizard_mut().set_detail("");
        wf.wizard_mut().set_end_date("2025-01-01").unwrap();
        let quote = wf.next_step().await.unwrap();
        assert_eq!(quote, ExchangeRate::from_hundredths(1357));
        assert_eq!(wf.step(), WizardStep::Lines);

        stage(wf, f.products[0], "2.5", "3.50", "");
        stage(wf, f.products[1], "0,75", "8", "7.00");

        // quote moves before commit; the first line takes the fresh one
        f.gateway.set_venta(13.60);

        let summary = wf.commit().await.unwrap();
        assert_eq!(summary.line_count, 2);

        assert_eq!(f.db.lotes().count().await.unwrap(), 1);
        let lote = f.db.lotes().get_by_id(summary.lote_id).await.unwrap();
        assert_eq!(lote.detail, "");
        assert_eq!(lote.ends_on, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(lote.registered_on, chrono::Utc::now().date_naive());

        let lines = f.db.lotes().lines(summary.lote_id).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].quantity(), Quantity::from_hundredths(250));
        assert_eq!(lines[1].quantity(), Quantity::from_hundredths(75));
        assert!(lines.iter().all(|l| l.lote_id == summary.lote_id));
        assert_eq!(lines[0].rate(), ExchangeRate::from_hundredths(1360));
        assert_eq!(lines[1].rate(), ExchangeRate::from_hundredths(700));
        assert_eq!(lines[0].purchase_price_cents, 350);

        assert_eq!(wf.step(), WizardStep::Header);
        assert!(wf.wizard().lines().is_empty());
        assert!(wf.wizard().header().end_date.is_none());
        assert_eq!(f.gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_catalog_delete_after_commit_keeps_lines() {
        let mut f = fixture(true).await;
        let wf = &mut f.workflow;
        wf.wizard_mut().set_end_date("2025-01-01").unwrap();
        wf.next_step().await.unwrap();
        stage(wf, f.products[0], "3", "2", "");
        let summary = wf.commit().await.unwrap();

        let mut catalog = ProductCatalog::new(f.db.clone(), 10);
        catalog.refresh().await.unwrap();
        assert_eq!(catalog.items().len(), 2);

        catalog.delete(f.products[0]).await.unwrap();
        let ids: Vec<i64> = catalog.items().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![f.products[1]]);

        let lines = f.db.lotes().lines(summary.lote_id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, None);
        assert_eq!(lines[0].quantity(), Quantity::from_units(3));
    }

    #[tokio::test]
    async fn test_no_fetch_without_end_date() {
        let mut f = fixture(true).await;

        let err = f.workflow.next_step().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(f.workflow.step(), WizardStep::Header);
        assert_eq!(f.gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_gateway_failure_stays_on_header() {
        let mut f = fixture(true).await;
        f.gateway.set_available(false);
        f.workflow.wizard_mut().set_end_date("2025-01-01").unwrap();

        let err = f.workflow.next_step().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::GatewayUnavailable);
        assert_eq!(f.workflow.step(), WizardStep::Header);
        assert!(f.workflow.wizard().quote().is_none());
    }

    #[tokio::test]
    async fn test_commit_requires_session() {
        let mut f = fixture(false).await;
        let wf = &mut f.workflow;
        wf.wizard_mut().set_end_date("2025-01-01").unwrap();
        wf.next_step().await.unwrap();
        stage(wf, f.products[0], "1", "1", "");

        let err = wf.commit().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
        assert_eq!(wf.wizard().lines().len(), 1);
        assert_eq!(f.db.lotes().count().await.unwrap(), 0);
        assert!(f.sessions.get(inventario_core::SESSION_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_commit_without_lines_is_validation_error() {
        let mut f = fixture(true).await;
        f.workflow.wizard_mut().set_end_date("2025-01-01").unwrap();
        f.workflow.next_step().await.unwrap();

        let err = f.workflow.commit().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        // only the advance fetched
        assert_eq!(f.gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_commit_keeps_state_and_writes_nothing() {
        let mut f = fixture(true).await;
        let wf = &mut f.workflow;
        wf.wizard_mut().set_detail("Pedido semanal");
        wf.wizard_mut().set_end_date("2025-02-01").unwrap();
        wf.next_step().await.unwrap();
        stage(wf, f.products[0], "1", "2", "");
        stage(wf, 9999, "1", "2", "");

        let err = wf.commit().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CommitFailed);
        assert_eq!(f.db.lotes().count().await.unwrap(), 0);
        assert_eq!(f.db.lotes().count_lines().await.unwrap(), 0);

        // drop the bad line and retry
        assert_eq!(wf.wizard().lines().len(), 2);
        wf.remove_line(1).unwrap();
        let summary = wf.commit().await.unwrap();
        assert_eq!(summary.line_count, 1);
        assert_eq!(
            f.db.lotes().get_by_id(summary.lote_id).await.unwrap().detail,
            "Pedido semanal"
        );
    }

    #[tokio::test]
    async fn test_commit_fails_when_quote_unavailable() {
        let mut f = fixture(true).await;
        let wf = &mut f.workflow;
        wf.wizard_mut().set_end_date("2025-01-01").unwrap();
        wf.next_step().await.unwrap();
        stage(wf, f.products[0], "1", "1", "");

        f.gateway.set_available(false);
        let err = wf.commit().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::GatewayUnavailable);
        assert_eq!(wf.wizard().lines().len(), 1);
        assert_eq!(f.db.lotes().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_back_step_keeps_lines_and_cancel_clears() {
        let mut f = fixture(true).await;
        let wf = &mut f.workflow;
        wf.wizard_mut().set_end_date("2025-01-01").unwrap();
        wf.next_step().await.unwrap();
        stage(wf, f.products[0], "1", "1", "");

        wf.previous_step();
        assert_eq!(wf.step(), WizardStep::Header);
        assert_eq!(wf.wizard().lines().len(), 1);

        wf.cancel();
        assert!(wf.wizard().lines().is_empty());
        assert!(wf.wizard().header().end_date.is_none());
    }

    #[tokio::test]
    async fn test_available_products_sorted() {
        let f = fixture(true).await;
        let names: Vec<String> = f
            .workflow
            .available_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Arroz", "Leche"]);
    }
}
