use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(BillId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Employee,
    #[serde(rename = "Admin", alias = "Administrator")]
    Administrator,
}

/// The record kept under the `user` key of the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "type")]
    pub role: Role,
    #[serde(default)]
    pub email: String,
}

impl User {
    pub fn employee(email: impl Into<String>) -> Self {
        Self {
            role: Role::Employee,
            email: email.into(),
        }
    }

    pub fn administrator(email: impl Into<String>) -> Self {
        Self {
            role: Role::Administrator,
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
    #[serde(other)]
    Unknown,
}

/// One expense line as stored by the remote bills service.
///
/// `date` stays a raw string: records with a malformed date are still listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: BillId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default = "default_status", deserialize_with = "lenient_status")]
    pub status: BillStatus,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub commentary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pct: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_admin: Option<String>,
}

fn default_status() -> BillStatus {
    BillStatus::Pending
}

// A single badly typed field must not fail the whole bill list.

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64().unwrap_or_default(),
        Value::String(text) => text.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

fn lenient_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BillStatus, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::String(_) => serde_json::from_value(value).unwrap_or(BillStatus::Unknown),
        _ => BillStatus::Unknown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_record_uses_type_key_and_short_admin_name() {
        let user: User =
            serde_json::from_str(r#"{"type":"Admin","email":"a@a"}"#).expect("decode admin");
        assert_eq!(user.role, Role::Administrator);

        let encoded = serde_json::to_value(User::employee("e@e")).expect("encode");
        assert_eq!(encoded["type"], "Employee");
        assert_eq!(encoded["email"], "e@e");
    }

    #[test]
    fn user_without_email_is_still_a_session() {
        let user: User = serde_json::from_str(r#"{"type":"Employee"}"#).expect("decode");
        assert_eq!(user.role, Role::Employee);
        assert!(user.email.is_empty());
    }

    #[test]
    fn bill_decodes_store_field_names() {
        let raw = r#"{
            "id": "47qAXb6fIm2zOKkLzMro",
            "vat": "80",
            "fileUrl": "https://example.test/receipt.jpg",
            "status": "pending",
            "type": "Hôtel et logement",
            "commentary": "séminaire billed",
            "name": "encore",
            "fileName": "preview-facture-free-201801-pdf-1.jpg",
            "date": "2004-04-04",
            "amount": 400,
            "commentAdmin": "ok",
            "email": "a@a",
            "pct": 20
        }"#;
        let bill: Bill = serde_json::from_str(raw).expect("decode bill");

        assert_eq!(bill.id, BillId("47qAXb6fIm2zOKkLzMro".into()));
        assert_eq!(bill.kind, "Hôtel et logement");
        assert_eq!(bill.status, BillStatus::Pending);
        assert_eq!(bill.amount, 400.0);
        assert_eq!(bill.pct, Some(20));
        assert_eq!(
            bill.file_url.as_deref(),
            Some("https://example.test/receipt.jpg")
        );
    }

    #[test]
    fn badly_typed_fields_degrade_instead_of_failing_the_list() {
        let raw = r#"[
            {"id":"a","date":"2004-04-04","status":"accepted","amount":10},
            {"id":"b","date":null,"status":null,"amount":null,"name":null},
            {"id":"c","date":20040404,"status":7,"amount":"12.5","type":false}
        ]"#;
        let bills: Vec<Bill> = serde_json::from_str(raw).expect("decode list");

        assert_eq!(bills.len(), 3);
        assert_eq!(bills[0].status, BillStatus::Accepted);
        assert_eq!(bills[1].date, "");
        assert_eq!(bills[1].status, BillStatus::Unknown);
        assert_eq!(bills[1].amount, 0.0);
        assert!(bills[1].name.is_empty());
        assert_eq!(bills[2].date, "20040404");
        assert_eq!(bills[2].status, BillStatus::Unknown);
        assert_eq!(bills[2].amount, 12.5);
        assert_eq!(bills[2].kind, "false");
    }

    #[test]
    fn missing_status_defaults_to_pending() {
        let bill: Bill = serde_json::from_str(r#"{"id":"x"}"#).expect("decode bill");
        assert_eq!(bill.status, BillStatus::Pending);
        assert!(bill.date.is_empty());
    }

    #[test]
    fn unexpected_status_decodes_as_unknown() {
        let bill: Bill =
            serde_json::from_str(r#"{"id":"x","status":"archived"}"#).expect("decode bill");
        assert_eq!(bill.status, BillStatus::Unknown);
        assert!(bill.file_url.is_none());
    }
}
