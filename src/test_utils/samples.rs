//! Sample payloads for every schema in the catalog.
//!
//! Values mirror the seed data shipped with the original catalog services so
//! tests exercise realistic records.

use serde_json::{Value, json};

use crate::domain::SchemaId;

pub fn sample_wallet_address() -> Value {
    json!({
        "wallet_address": {
            "chain": "solana",
            "address": "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin",
            "verified": true
        }
    })
}

pub fn sample_event() -> Value {
    json!({
        "event_data": {
            "kind": "listing_created",
            "model_id": "R1000",
            "block_height": 2048.0
        }
    })
}

pub fn sample_accounts() -> Value {
    json!({
        "addresses": [
            "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin",
            "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T"
        ]
    })
}

pub fn sample_transaction() -> Value {
    json!({ "transaction": "AQABAgMEBQYHCAk=" })
}

pub fn sample_payment() -> Value {
    json!({
        "invoiceId": "inv-2024-0042",
        "serviceId": "srv-robotics-01",
        "userId": "user-7f3a",
        "amount": "49.90",
        "expirationDate": "2024-08-01T00:00:00Z"
    })
}

pub fn sample_service() -> Value {
    json!({
        "serviceId": "srv-robotics-01",
        "category": "manufacturing",
        "description": "Robotic arm assembly line",
        "name": "AssemblyPro",
        "type": "subscription",
        "price": { "monthly": 99.0, "currency": "USD" },
        "providerId": "prov-12"
    })
}

pub fn sample_robot() -> Value {
    json!({
        "manufacturer": "Robotics Inc.",
        "manufacturer_id": "12345",
        "model_id": "R1000",
        "description": "High-performance industrial robot.",
        "price": {
            "model_id": "R1000",
            "subscription_price": 16.0,
            "premium_price": 300.0
        }
    })
}

pub fn sample_price() -> Value {
    json!({
        "model_id": "TB200",
        "subscription_price": 83.0,
        "premium_price": 1500.0
    })
}

pub fn sample_software() -> Value {
    json!({
        "name": "RobotControlApp",
        "version": "1.0.0",
        "author": "Robotics Inc.",
        "description": "Control application for robotic arms.",
        "compatibility": ["R1000", "TB200"],
        "license": "MIT License",
        "documentation_url": "https://example.com/robotcontrolapp-docs"
    })
}

/// Sample payload for any schema in the catalog.
pub fn sample_for(schema: SchemaId) -> Value {
    match schema {
        SchemaId::WalletAddress => sample_wallet_address(),
        SchemaId::Event => sample_event(),
        SchemaId::Accounts => sample_accounts(),
        SchemaId::Transaction => sample_transaction(),
        SchemaId::Payment => sample_payment(),
        SchemaId::Service => sample_service(),
        SchemaId::Robot => sample_robot(),
        SchemaId::Price => sample_price(),
        SchemaId::Software => sample_software(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validate;

    #[test]
    fn every_sample_validates_against_its_schema() {
        for schema in SchemaId::ALL {
            let record = validate(schema, &sample_for(schema))
                .unwrap_or_else(|err| panic!("sample for {schema} rejected: {err}"));
            assert_eq!(record.schema(), schema);
        }
    }
}
