//! Declarative schema catalog and the validation walk.
//!
//! Each schema lists its fields in precedence order, required before optional.
//! The walk reports every offending field in that order rather than stopping
//! at the first problem.

use std::fmt;

use serde_json::Value;

use super::error::{FieldIssue, ValidationError};
use super::value::check_map_entries;

/// Expected shape of a single payload field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldShape {
    /// UTF-8 text. `non_empty` additionally rejects blank strings.
    Text { non_empty: bool },
    /// Numeric value, optionally bounded below.
    Number { min: Option<f64> },
    /// Loosely typed mapping of closed-union values.
    Mapping { non_empty: bool },
    /// Ordered sequence of strings.
    TextSequence { min_items: usize },
}

impl FieldShape {
    fn check(self, field: &str, value: &Value, issues: &mut Vec<FieldIssue>) {
        match self {
            FieldShape::Text { non_empty } => match value.as_str() {
                Some(text) if non_empty && text.trim().is_empty() => {
                    issues.push(FieldIssue::shape(field, "must not be empty"));
                }
                Some(_) => {}
                None => issues.push(FieldIssue::shape(field, "expected a string")),
            },
            FieldShape::Number { min } => match value.as_f64() {
                Some(number) => {
                    if let Some(min) = min {
                        if number < min {
                            issues.push(FieldIssue::shape(
                                field,
                                format!("must be greater than or equal to {min}"),
                            ));
                        }
                    }
                }
                None => issues.push(FieldIssue::shape(field, "expected a number")),
            },
            FieldShape::Mapping { non_empty } => match value.as_object() {
                Some(entries) => {
                    if non_empty && entries.is_empty() {
                        issues.push(FieldIssue::shape(field, "must not be empty"));
                    }
                    check_map_entries(field, entries, issues);
                }
                None => issues.push(FieldIssue::shape(field, "expected a mapping")),
            },
            FieldShape::TextSequence { min_items } => match value.as_array() {
                Some(entries) => {
                    if entries.len() < min_items {
                        let requirement = if min_items == 1 {
                            "must contain at least one entry".to_string()
                        } else {
                            format!("must contain at least {min_items} entries")
                        };
                        issues.push(FieldIssue::shape(field, requirement));
                    }
                    for (index, entry) in entries.iter().enumerate() {
                        if !entry.is_string() {
                            issues.push(FieldIssue::shape(
                                format!("{field}[{index}]"),
                                "expected a string",
                            ));
                        }
                    }
                }
                None => issues.push(FieldIssue::shape(field, "expected a list of strings")),
            },
        }
    }
}

/// Specification of one field: wire name, requiredness, expected shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub shape: FieldShape,
}

impl FieldSpec {
    pub const fn required(name: &'static str, shape: FieldShape) -> Self {
        Self {
            name,
            required: true,
            shape,
        }
    }

    pub const fn optional(name: &'static str, shape: FieldShape) -> Self {
        Self {
            name,
            required: false,
            shape,
        }
    }
}

/// A schema: its identifier plus field specifications in precedence order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemaDescriptor {
    pub id: SchemaId,
    pub fields: &'static [FieldSpec],
}

impl SchemaDescriptor {
    /// Check `payload` against this schema, reporting every offending field.
    ///
    /// An explicit `null` is treated the same as an absent field.
    pub fn check(&self, payload: &Value) -> Result<(), ValidationError> {
        let Some(map) = payload.as_object() else {
            return Err(ValidationError::new(vec![FieldIssue::shape(
                "payload",
                "expected a JSON object",
            )]));
        };

        let mut issues = Vec::new();
        for spec in self.fields {
            match map.get(spec.name).filter(|value| !value.is_null()) {
                Some(value) => spec.shape.check(spec.name, value, &mut issues),
                None if spec.required => issues.push(FieldIssue::missing(spec.name)),
                None => {}
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }
}

/// Identifier of a schema registered in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaId {
    WalletAddress,
    Event,
    Accounts,
    Transaction,
    Payment,
    Service,
    Robot,
    Price,
    Software,
}

const WALLET_ADDRESS_FIELDS: &[FieldSpec] = &[FieldSpec::required(
    "wallet_address",
    FieldShape::Mapping { non_empty: false },
)];

const EVENT_FIELDS: &[FieldSpec] = &[FieldSpec::required(
    "event_data",
    FieldShape::Mapping { non_empty: true },
)];

const ACCOUNTS_FIELDS: &[FieldSpec] = &[FieldSpec::required(
    "addresses",
    FieldShape::TextSequence { min_items: 1 },
)];

const TRANSACTION_FIELDS: &[FieldSpec] = &[FieldSpec::required(
    "transaction",
    FieldShape::Text { non_empty: true },
)];

const PAYMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("invoiceId", FieldShape::Text { non_empty: false }),
    FieldSpec::required("serviceId", FieldShape::Text { non_empty: false }),
    FieldSpec::required("userId", FieldShape::Text { non_empty: false }),
    FieldSpec::required("amount", FieldShape::Text { non_empty: false }),
    FieldSpec::optional("expirationDate", FieldShape::Text { non_empty: false }),
    FieldSpec::optional("status", FieldShape::Text { non_empty: false }),
];

const SERVICE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("serviceId", FieldShape::Text { non_empty: false }),
    FieldSpec::required("category", FieldShape::Text { non_empty: false }),
    FieldSpec::required("description", FieldShape::Text { non_empty: false }),
    FieldSpec::required("name", FieldShape::Text { non_empty: false }),
    FieldSpec::required("type", FieldShape::Text { non_empty: false }),
    FieldSpec::optional("price", FieldShape::Mapping { non_empty: false }),
    FieldSpec::optional("providerId", FieldShape::Text { non_empty: false }),
    FieldSpec::optional("reviewsId", FieldShape::Text { non_empty: false }),
];

const ROBOT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("manufacturer", FieldShape::Text { non_empty: false }),
    FieldSpec::required("manufacturer_id", FieldShape::Text { non_empty: false }),
    FieldSpec::required("model_id", FieldShape::Text { non_empty: false }),
    FieldSpec::required("description", FieldShape::Text { non_empty: false }),
    FieldSpec::optional("price", FieldShape::Mapping { non_empty: false }),
    FieldSpec::optional("image_url", FieldShape::Text { non_empty: false }),
];

const PRICE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("model_id", FieldShape::Text { non_empty: false }),
    FieldSpec::required("subscription_price", FieldShape::Number { min: Some(0.0) }),
    FieldSpec::optional("premium_price", FieldShape::Number { min: None }),
];

const SOFTWARE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldShape::Text { non_empty: false }),
    FieldSpec::required("version", FieldShape::Text { non_empty: false }),
    FieldSpec::required("author", FieldShape::Text { non_empty: false }),
    FieldSpec::required("description", FieldShape::Text { non_empty: false }),
    FieldSpec::required("compatibility", FieldShape::TextSequence { min_items: 0 }),
    FieldSpec::required("license", FieldShape::Text { non_empty: false }),
    FieldSpec::required("documentation_url", FieldShape::Text { non_empty: false }),
    FieldSpec::optional("image_url", FieldShape::Text { non_empty: false }),
];

static WALLET_ADDRESS: SchemaDescriptor = SchemaDescriptor {
    id: SchemaId::WalletAddress,
    fields: WALLET_ADDRESS_FIELDS,
};
static EVENT: SchemaDescriptor = SchemaDescriptor {
    id: SchemaId::Event,
    fields: EVENT_FIELDS,
};
static ACCOUNTS: SchemaDescriptor = SchemaDescriptor {
    id: SchemaId::Accounts,
    fields: ACCOUNTS_FIELDS,
};
static TRANSACTION: SchemaDescriptor = SchemaDescriptor {
    id: SchemaId::Transaction,
    fields: TRANSACTION_FIELDS,
};
static PAYMENT: SchemaDescriptor = SchemaDescriptor {
    id: SchemaId::Payment,
    fields: PAYMENT_FIELDS,
};
static SERVICE: SchemaDescriptor = SchemaDescriptor {
    id: SchemaId::Service,
    fields: SERVICE_FIELDS,
};
static ROBOT: SchemaDescriptor = SchemaDescriptor {
    id: SchemaId::Robot,
    fields: ROBOT_FIELDS,
};
static PRICE: SchemaDescriptor = SchemaDescriptor {
    id: SchemaId::Price,
    fields: PRICE_FIELDS,
};
static SOFTWARE: SchemaDescriptor = SchemaDescriptor {
    id: SchemaId::Software,
    fields: SOFTWARE_FIELDS,
};

impl SchemaId {
    pub const ALL: [SchemaId; 9] = [
        SchemaId::WalletAddress,
        SchemaId::Event,
        SchemaId::Accounts,
        SchemaId::Transaction,
        SchemaId::Payment,
        SchemaId::Service,
        SchemaId::Robot,
        SchemaId::Price,
        SchemaId::Software,
    ];

    /// External name, as used in routes and log fields.
    pub const fn name(self) -> &'static str {
        match self {
            SchemaId::WalletAddress => "wallet_address",
            SchemaId::Event => "event",
            SchemaId::Accounts => "accounts",
            SchemaId::Transaction => "transaction",
            SchemaId::Payment => "payment",
            SchemaId::Service => "service",
            SchemaId::Robot => "robot",
            SchemaId::Price => "price",
            SchemaId::Software => "software",
        }
    }

    /// Look up a schema by its external name.
    pub fn from_name(name: &str) -> Option<SchemaId> {
        SchemaId::ALL.into_iter().find(|id| id.name() == name)
    }

    pub fn descriptor(self) -> &'static SchemaDescriptor {
        match self {
            SchemaId::WalletAddress => &WALLET_ADDRESS,
            SchemaId::Event => &EVENT,
            SchemaId::Accounts => &ACCOUNTS,
            SchemaId::Transaction => &TRANSACTION,
            SchemaId::Payment => &PAYMENT,
            SchemaId::Service => &SERVICE,
            SchemaId::Robot => &ROBOT,
            SchemaId::Price => &PRICE,
            SchemaId::Software => &SOFTWARE,
        }
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_schema_resolves_by_name() {
        for id in SchemaId::ALL {
            assert_eq!(SchemaId::from_name(id.name()), Some(id));
            assert_eq!(id.descriptor().id, id);
        }
        assert_eq!(SchemaId::from_name("governance"), None);
    }

    #[test]
    fn required_fields_precede_optional_fields() {
        for id in SchemaId::ALL {
            let fields = id.descriptor().fields;
            let first_optional = fields.iter().position(|spec| !spec.required);
            if let Some(boundary) = first_optional {
                assert!(
                    fields[boundary..].iter().all(|spec| !spec.required),
                    "schema {id} interleaves required and optional fields"
                );
            }
        }
    }

    #[test]
    fn missing_required_fields_are_all_reported_in_order() {
        let err = SchemaId::Payment
            .descriptor()
            .check(&json!({}))
            .unwrap_err();

        let fields: Vec<&str> = err.issues.iter().map(|issue| issue.field()).collect();
        assert_eq!(fields, vec!["invoiceId", "serviceId", "userId", "amount"]);
    }

    #[test]
    fn explicit_null_counts_as_absent() {
        let err = SchemaId::Transaction
            .descriptor()
            .check(&json!({ "transaction": null }))
            .unwrap_err();
        assert!(err.names_field("transaction"));

        // null on an optional field is fine
        SchemaId::Payment
            .descriptor()
            .check(&json!({
                "invoiceId": "i1",
                "serviceId": "s1",
                "userId": "u1",
                "amount": "10.00",
                "status": null
            }))
            .unwrap();
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = SchemaId::Event.descriptor().check(&json!([1, 2])).unwrap_err();
        assert!(err.names_field("payload"));
    }

    #[test]
    fn empty_transaction_string_is_rejected() {
        let err = SchemaId::Transaction
            .descriptor()
            .check(&json!({ "transaction": "  " }))
            .unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn empty_address_sequence_is_rejected() {
        let err = SchemaId::Accounts
            .descriptor()
            .check(&json!({ "addresses": [] }))
            .unwrap_err();
        assert!(err.to_string().contains("at least one entry"));
    }

    #[test]
    fn non_string_sequence_entries_are_reported_by_index() {
        let err = SchemaId::Accounts
            .descriptor()
            .check(&json!({ "addresses": ["ok", 42, true] }))
            .unwrap_err();

        assert!(err.names_field("addresses[1]"));
        assert!(err.names_field("addresses[2]"));
        assert!(!err.names_field("addresses[0]"));
    }

    #[test]
    fn empty_event_mapping_is_rejected() {
        let err = SchemaId::Event
            .descriptor()
            .check(&json!({ "event_data": {} }))
            .unwrap_err();
        assert!(err.names_field("event_data"));

        SchemaId::WalletAddress
            .descriptor()
            .check(&json!({ "wallet_address": {} }))
            .unwrap();
    }

    #[test]
    fn negative_subscription_price_is_rejected() {
        let err = SchemaId::Price
            .descriptor()
            .check(&json!({ "model_id": "R1000", "subscription_price": -1.0 }))
            .unwrap_err();
        assert!(err.names_field("subscription_price"));

        SchemaId::Price
            .descriptor()
            .check(&json!({ "model_id": "R1000", "subscription_price": 0 }))
            .unwrap();
    }

    #[test]
    fn shape_and_missing_issues_are_collected_together() {
        let err = SchemaId::Robot
            .descriptor()
            .check(&json!({
                "manufacturer": "Robotics Inc.",
                "manufacturer_id": 12345,
                "description": "High-performance industrial robot.",
                "price": "not-a-mapping"
            }))
            .unwrap_err();

        let fields: Vec<&str> = err.issues.iter().map(|issue| issue.field()).collect();
        assert_eq!(fields, vec!["manufacturer_id", "model_id", "price"]);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        SchemaId::Transaction
            .descriptor()
            .check(&json!({ "transaction": "AQID", "signer": "ignored" }))
            .unwrap();
    }
}
