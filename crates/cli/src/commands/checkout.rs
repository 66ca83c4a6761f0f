//! Order submission command.

use std::io::Write;

use garval_cart::{CartConfig, CartStore, CheckoutClient, CheckoutError, CustomerInfo, submit_order};

use super::CommandError;

/// Submit the cart as an order and print the confirmation.
///
/// The cart is cleared only when the API confirms the order.
pub async fn run(
    cart: &mut CartStore,
    config: &CartConfig,
    customer: CustomerInfo,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let locale = cart.locale();
    let client = CheckoutClient::new(&config.api_base, config.http_timeout).map_err(|source| {
        CommandError::Checkout {
            message: locale.order_failed(),
            source,
        }
    })?;

    tracing::info!(
        items = cart.len(),
        total = %config.currency.format(cart.total()),
        endpoint = %client.endpoint(),
        "Submitting order"
    );

    let confirmation = submit_order(cart, &client, customer)
        .await
        .map_err(|source| {
            let message = match source {
                CheckoutError::EmptyCart => locale.empty_cart(),
                _ => locale.order_failed(),
            };
            CommandError::Checkout { message, source }
        })?;

    writeln!(out, "Order {}", confirmation.order_id)?;
    if let Some(url) = &confirmation.payment_url {
        writeln!(out, "Pay at {url}")?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use garval_cart::{LineItem, Locale, MemoryStorage, StoreOrigin};
    use garval_core::{CurrencyCode, Price, ProductId};
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(server: &MockServer) -> CartConfig {
        let uri = server.uri();
        CartConfig::from_lookup(|key| match key {
            "GARVAL_ORIGIN" => Some(uri.clone()),
            _ => None,
        })
        .unwrap()
    }

    fn customer() -> CustomerInfo {
        CustomerInfo {
            full_name: "Lucía Pérez".to_string(),
            email: "lucia@example.com".to_string(),
            ..CustomerInfo::default()
        }
    }

    fn cart(locale: Locale) -> CartStore {
        CartStore::open(
            Box::new(MemoryStorage::new()),
            StoreOrigin::parse("https://garval.es").unwrap(),
        )
        .with_locale(locale)
    }

    #[tokio::test]
    async fn test_checkout_prints_confirmation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": {"success": true, "order_id": "SAL-ORD-1", "payment_url": "https://pay/1"}
            })))
            .mount(&server)
            .await;

        let mut cart = cart(Locale::Es);
        cart.add_item(LineItem::new(
            ProductId::parse("ACE-500").unwrap(),
            "Aceite",
            Price::from_cents(1250).unwrap(),
        ));

        let config = config(&server);
        assert_eq!(config.currency, CurrencyCode::EUR);
        assert_eq!(config.http_timeout, Duration::from_secs(30));

        let mut out = Vec::new();
        run(&mut cart, &config, customer(), &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Order SAL-ORD-1\nPay at https://pay/1\n"
        );
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_message() {
        let server = MockServer::start().await;
        let mut cart = cart(Locale::En);

        let err = run(&mut cart, &config(&server), customer(), &mut Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CommandError::Checkout {
                message: "Your cart is empty",
                source: CheckoutError::EmptyCart,
            }
        ));
    }
}
