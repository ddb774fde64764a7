// 💳 Simulated payment
//
// No money moves. The processor records the charge and always succeeds.

use chrono::{DateTime, Utc};
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub reference: String,
    pub user_name: String,
    pub room_number: u32,
    pub amount: f64,
    pub processed_at: DateTime<Utc>,
}

/// Charges a guest for a room. Infallible by contract.
pub trait PaymentProcessor {
    fn charge(&self, user_name: &str, room_number: u32, amount: f64) -> PaymentReceipt;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedPayment;

impl PaymentProcessor for SimulatedPayment {
    fn charge(&self, user_name: &str, room_number: u32, amount: f64) -> PaymentReceipt {
        let receipt = PaymentReceipt {
            reference: uuid::Uuid::new_v4().to_string(),
            user_name: user_name.to_string(),
            room_number,
            amount,
            processed_at: Utc::now(),
        };

        info!(
            reference = %receipt.reference,
            user = user_name,
            room = room_number,
            amount,
            "processed simulated payment"
        );

        receipt
    }
}
