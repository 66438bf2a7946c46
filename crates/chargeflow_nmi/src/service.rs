// --- File: crates/chargeflow_nmi/src/service.rs ---
use std::sync::Arc;

use chargeflow_common::models::{OrderContext, PaymentInstrument, TransactionInfo};
use chargeflow_common::services::{BoxFuture, GatewayCapabilities, Notifier, PaymentMethod};
use chargeflow_config::{AppConfig, NmiConfig};

use crate::client::GatewayClient;
use crate::error::NmiError;
use crate::logic;

/// NMI payment-method implementation.
///
/// Configuration and the (optional) alert channel are injected at
/// construction; each operation is a single gateway round-trip.
pub struct NmiPaymentMethod {
    config: NmiConfig,
    client: GatewayClient,
    notifier: Option<Arc<dyn Notifier>>,
}

impl NmiPaymentMethod {
    /// Create a new NMI payment method from the application config.
    ///
    /// The notifier should only be passed when failure notifications are
    /// enabled site-wide; `None` disables alerting entirely.
    pub fn new(
        config: Arc<AppConfig>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Result<Self, NmiError> {
        let nmi_config = config.nmi.as_ref().ok_or(NmiError::ConfigError)?.clone();
        let client = GatewayClient::new(nmi_config.gateway_url.as_deref())?;
        Ok(NmiPaymentMethod {
            config: nmi_config,
            client,
            notifier,
        })
    }

    fn notifier(&self) -> Option<&dyn Notifier> {
        self.notifier.as_deref()
    }
}

impl PaymentMethod for NmiPaymentMethod {
    type Error = NmiError;

    fn capabilities(&self) -> GatewayCapabilities {
        GatewayCapabilities {
            is_gateway: true,
            can_authorize: true,
            can_capture: false,
            can_refund: true,
            can_void: true,
            can_fetch_transaction_info: true,
        }
    }

    fn authorize<'a>(
        &'a self,
        order: &'a OrderContext,
        payment: &'a mut PaymentInstrument,
        amount: i64,
    ) -> BoxFuture<'a, (), Self::Error> {
        Box::pin(async move {
            logic::authorize(
                &self.client,
                &self.config,
                self.notifier(),
                order,
                payment,
                amount,
            )
            .await
        })
    }

    fn refund<'a>(
        &'a self,
        payment: &'a mut PaymentInstrument,
        amount: i64,
    ) -> BoxFuture<'a, (), Self::Error> {
        Box::pin(async move {
            logic::refund(&self.client, &self.config, self.notifier(), payment, amount).await
        })
    }

    fn void<'a>(&'a self, payment: &'a mut PaymentInstrument) -> BoxFuture<'a, (), Self::Error> {
        Box::pin(
            async move { logic::void(&self.client, &self.config, self.notifier(), payment).await },
        )
    }

    fn cancel<'a>(&'a self, payment: &'a mut PaymentInstrument) -> BoxFuture<'a, (), Self::Error> {
        Box::pin(
            async move { logic::cancel(&self.client, &self.config, self.notifier(), payment).await },
        )
    }

    fn fetch_transaction_info(&self, payment: &PaymentInstrument) -> TransactionInfo {
        TransactionInfo::from_instrument(payment)
    }
}
