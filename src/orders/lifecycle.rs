//! Order transition engine.
//!
//! Each operation: fetch, policy-check, CAS transition (+ any financial
//! effect) in one transaction, audit row, then best-effort notification
//! after commit. A CAS that affects zero rows surfaces as a Conflict; the
//! caller may re-fetch and decide, never retry blindly.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::models::{Order, PlaceOrderRequest};
use super::repository::{NewOrder, OrderRepository};
use super::status::OrderStatus;
use crate::audit::AuditRepository;
use crate::balance::BalanceEngine;
use crate::catalog::ServiceRepository;
use crate::db::Database;
use crate::error::MarketError;
use crate::notify::{Notifier, OrderEvent, notify_best_effort};
use crate::payments::repository::PaymentRepository;
use crate::policy::order::{OrderAction, allows};
use crate::policy::{self, Actor};

pub struct OrderLifecycle {
    db: Arc<Database>,
    notifier: Arc<dyn Notifier>,
    commission_rate: Decimal,
}

impl OrderLifecycle {
    pub fn new(db: Arc<Database>, notifier: Arc<dyn Notifier>, commission_rate: Decimal) -> Self {
        Self {
            db,
            notifier,
            commission_rate,
        }
    }

    /// Place an order for an active service.
    ///
    /// Creates the order in PENDING together with its escrow payment row;
    /// the platform commission rate is frozen onto the order here.
    pub async fn place(
        &self,
        actor: &Actor,
        req: &PlaceOrderRequest,
    ) -> Result<Order, MarketError> {
        if actor.role != crate::account::Role::Client {
            return Err(MarketError::Forbidden);
        }

        let service = ServiceRepository::get(self.db.pool(), req.service_id)
            .await?
            .ok_or_else(|| MarketError::not_found("service", req.service_id))?;

        if !service.status.is_orderable() {
            return Err(MarketError::conflict(format!(
                "service {} is {}, not orderable",
                service.service_id, service.status
            )));
        }
        if service.student_id == actor.user_id {
            return Err(MarketError::validation(
                "service_id",
                "cannot order your own service",
            ));
        }

        let deadline = Utc::now() + Duration::days(service.delivery_days as i64);

        let mut tx = self.db.pool().begin().await?;

        let order = OrderRepository::create(
            &mut tx,
            &NewOrder {
                client_id: actor.user_id,
                student_id: service.student_id,
                service_id: service.service_id,
                price: service.price,
                commission_rate: self.commission_rate,
                max_revisions: service.max_revisions,
                deadline: Some(deadline),
                requirements: req.requirements.clone(),
            },
        )
        .await?;

        PaymentRepository::create_pending(
            &mut tx,
            order.order_id,
            order.price,
            order.commission_rate,
        )
        .await?;

        AuditRepository::record_transition(
            &mut tx,
            order.order_id,
            actor.user_id,
            "place",
            OrderStatus::Pending,
            OrderStatus::Pending,
            None,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            order_id = order.order_id,
            client_id = actor.user_id,
            student_id = order.student_id,
            price = %order.price,
            "order placed"
        );
        notify_best_effort(
            self.notifier.as_ref(),
            order.student_id,
            order.order_id,
            OrderEvent::Placed,
        )
        .await;

        Ok(order)
    }

    /// Student accepts a pending order.
    pub async fn accept(&self, actor: &Actor, order_id: i64) -> Result<Order, MarketError> {
        let order = self.fetch(order_id).await?;
        if !allows(actor, &order, OrderAction::Accept) {
            return Err(self.deny(actor, &order, OrderAction::Accept));
        }

        let mut tx = self.db.pool().begin().await?;
        let moved = OrderRepository::update_status_if(
            &mut tx,
            order_id,
            &[OrderStatus::Pending],
            OrderStatus::InProgress,
        )
        .await?;
        if !moved {
            return Err(self.conflict(order_id, OrderStatus::Pending).await);
        }

        AuditRepository::record_transition(
            &mut tx,
            order_id,
            actor.user_id,
            "accept",
            OrderStatus::Pending,
            OrderStatus::InProgress,
            None,
        )
        .await?;
        tx.commit().await?;

        notify_best_effort(
            self.notifier.as_ref(),
            order.client_id,
            order_id,
            OrderEvent::Accepted,
        )
        .await;

        self.fetch(order_id).await
    }

    /// Student delivers work: requires a non-empty message and at least one
    /// stored file reference.
    pub async fn deliver(
        &self,
        actor: &Actor,
        order_id: i64,
        message: &str,
        files: &[String],
    ) -> Result<Order, MarketError> {
        if message.trim().is_empty() {
            return Err(MarketError::validation("message", "delivery message required"));
        }
        if files.is_empty() {
            return Err(MarketError::validation("files", "at least one file required"));
        }

        let order = self.fetch(order_id).await?;
        if !allows(actor, &order, OrderAction::Deliver) {
            return Err(self.deny(actor, &order, OrderAction::Deliver));
        }

        let from_status = order.status;
        let mut tx = self.db.pool().begin().await?;
        let moved = OrderRepository::set_delivery_if(&mut tx, order_id, message, files).await?;
        if !moved {
            return Err(self.conflict(order_id, OrderStatus::InProgress).await);
        }

        AuditRepository::record_transition(
            &mut tx,
            order_id,
            actor.user_id,
            "deliver",
            from_status,
            OrderStatus::Delivered,
            None,
        )
        .await?;
        tx.commit().await?;

        notify_best_effort(
            self.notifier.as_ref(),
            order.client_id,
            order_id,
            OrderEvent::Delivered,
        )
        .await;

        self.fetch(order_id).await
    }

    /// Client requests rework on a delivered order. Fails without touching
    /// the counter once the revision budget is spent.
    pub async fn request_revision(
        &self,
        actor: &Actor,
        order_id: i64,
        reason: &str,
    ) -> Result<Order, MarketError> {
        if reason.trim().len() < 10 {
            return Err(MarketError::validation(
                "reason",
                "revision reason too short (min 10 chars)",
            ));
        }

        let order = self.fetch(order_id).await?;

        // Distinguish an exhausted budget from the other policy denials so
        // the client gets a field-level message instead of a bare 403.
        let is_owning_client = actor.role == crate::account::Role::Client
            && order.client_id == actor.user_id;
        if is_owning_client
            && order.status == OrderStatus::Delivered
            && order.revision_count >= order.max_revisions
        {
            return Err(MarketError::validation(
                "revision_count",
                format!("revision budget of {} exhausted", order.max_revisions),
            ));
        }
        if !allows(actor, &order, OrderAction::RequestRevision) {
            return Err(self.deny(actor, &order, OrderAction::RequestRevision));
        }

        let mut tx = self.db.pool().begin().await?;
        let moved = OrderRepository::increment_revision_if(&mut tx, order_id).await?;
        if !moved {
            return Err(self.conflict(order_id, OrderStatus::Delivered).await);
        }

        AuditRepository::record_transition(
            &mut tx,
            order_id,
            actor.user_id,
            "request_revision",
            OrderStatus::Delivered,
            OrderStatus::RevisionRequested,
            Some(reason),
        )
        .await?;
        tx.commit().await?;

        notify_best_effort(
            self.notifier.as_ref(),
            order.student_id,
            order_id,
            OrderEvent::RevisionRequested,
        )
        .await;

        self.fetch(order_id).await
    }

    /// Client completes a delivered order.
    ///
    /// The only transition with a financial side effect: the status CAS and
    /// the commission split + balance credit share one transaction, so
    /// either both commit or neither does. A double submit loses the CAS
    /// and reports a conflict; the settlement flag makes the credit
    /// one-shot even against a racing webhook retry.
    pub async fn complete(&self, actor: &Actor, order_id: i64) -> Result<Order, MarketError> {
        let order = self.fetch(order_id).await?;
        if !allows(actor, &order, OrderAction::Complete) {
            return Err(self.deny(actor, &order, OrderAction::Complete));
        }

        // Fail fast before opening the transaction; settle() re-checks under
        // the row lock.
        let payment = PaymentRepository::get_by_order(self.db.pool(), order_id)
            .await?
            .ok_or_else(|| MarketError::not_found("payment for order", order_id))?;
        if payment.status != crate::payments::PaymentStatus::Succeeded {
            return Err(MarketError::conflict(format!(
                "payment for order {} is {}, completion requires a confirmed payment",
                order_id, payment.status
            )));
        }

        let mut tx = self.db.pool().begin().await?;

        let moved = OrderRepository::update_status_if(
            &mut tx,
            order_id,
            &[OrderStatus::Delivered],
            OrderStatus::Completed,
        )
        .await?;
        if !moved {
            return Err(self.conflict(order_id, OrderStatus::Delivered).await);
        }

        let mut completed = order.clone();
        completed.status = OrderStatus::Completed;
        BalanceEngine::settle(&mut tx, &completed).await?;

        AuditRepository::record_transition(
            &mut tx,
            order_id,
            actor.user_id,
            "complete",
            OrderStatus::Delivered,
            OrderStatus::Completed,
            None,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(order_id, client_id = actor.user_id, "order completed");
        notify_best_effort(
            self.notifier.as_ref(),
            order.student_id,
            order_id,
            OrderEvent::Completed,
        )
        .await;

        self.fetch(order_id).await
    }

    /// Admin cancels an order in any non-terminal state. Never reverses an
    /// applied balance credit: completed orders are simply not cancellable.
    pub async fn cancel(
        &self,
        actor: &Actor,
        order_id: i64,
        reason: Option<&str>,
    ) -> Result<Order, MarketError> {
        let order = self.fetch(order_id).await?;
        if !allows(actor, &order, OrderAction::Cancel) {
            return Err(self.deny(actor, &order, OrderAction::Cancel));
        }

        let from_status = order.status;
        let non_terminal: Vec<OrderStatus> = [
            OrderStatus::Pending,
            OrderStatus::InProgress,
            OrderStatus::Delivered,
            OrderStatus::RevisionRequested,
        ]
        .to_vec();

        let mut tx = self.db.pool().begin().await?;
        let moved = OrderRepository::update_status_if(
            &mut tx,
            order_id,
            &non_terminal,
            OrderStatus::Cancelled,
        )
        .await?;
        if !moved {
            return Err(self.conflict(order_id, from_status).await);
        }

        // Escrow goes back to the client; only unsettled payments qualify
        // (a settled credit is never reversed).
        let refunded = PaymentRepository::mark_refunded_if_unsettled(&mut tx, order_id).await?;

        AuditRepository::record_transition(
            &mut tx,
            order_id,
            actor.user_id,
            "cancel",
            from_status,
            OrderStatus::Cancelled,
            reason,
        )
        .await?;
        tx.commit().await?;

        if refunded {
            tracing::info!(order_id, "escrow payment marked refunded");
        }

        tracing::info!(order_id, admin_id = actor.user_id, "order cancelled");
        for recipient in [order.client_id, order.student_id] {
            notify_best_effort(
                self.notifier.as_ref(),
                recipient,
                order_id,
                OrderEvent::Cancelled,
            )
            .await;
        }

        self.fetch(order_id).await
    }

    /// Fetch an order the actor is allowed to view.
    pub async fn get_checked(&self, actor: &Actor, order_id: i64) -> Result<Order, MarketError> {
        let order = self.fetch(order_id).await?;
        if !policy::order::allows(actor, &order, OrderAction::View) {
            return Err(MarketError::Forbidden);
        }
        Ok(order)
    }

    async fn fetch(&self, order_id: i64) -> Result<Order, MarketError> {
        OrderRepository::get(self.db.pool(), order_id)
            .await?
            .ok_or_else(|| MarketError::not_found("order", order_id))
    }

    /// Map a policy denial: hide existence from strangers, explain state
    /// problems to the parties.
    fn deny(&self, actor: &Actor, order: &Order, action: OrderAction) -> MarketError {
        let is_party = actor.is_admin()
            || order.client_id == actor.user_id
            || order.student_id == actor.user_id;
        if is_party {
            MarketError::conflict(format!(
                "order {} is {}; {:?} not allowed for this role/state",
                order.order_id, order.status, action
            ))
        } else {
            MarketError::Forbidden
        }
    }

    /// A CAS lost the race: report what the row looks like now.
    async fn conflict(&self, order_id: i64, expected: OrderStatus) -> MarketError {
        match self.fetch(order_id).await {
            Ok(now) => MarketError::conflict(format!(
                "order {} is {}, expected {}",
                order_id, now.status, expected
            )),
            Err(e) => e,
        }
    }
}
