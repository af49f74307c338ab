//! Role records: the documents asserting that an identity holds a role

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Document;

/// Admin singleton (`settings/adminAuth`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRecord {
    #[serde(default)]
    pub email: String,
}

impl AdminRecord {
    /// Read the admin singleton. A missing or non-string `email` yields an
    /// empty record, which never matches.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            email: doc
                .field("email")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Exact, case-sensitive email comparison. An empty record never matches.
    pub fn matches(&self, email: &str) -> bool {
        !self.email.is_empty() && self.email == email
    }
}

/// Staff member document (`staff/{id}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffRecord {
    pub email: String,
    #[serde(rename = "isActive", default)]
    pub is_active: bool,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl StaffRecord {
    pub fn display_name(&self) -> Option<&str> {
        self.profile.get("name").and_then(Value::as_str)
    }
}

/// Student document (`students/{id}`), keyed by the student identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl From<Document> for StudentRecord {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            profile: doc.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_admin_match() {
        let admin = AdminRecord {
            email: "a@x.com".into(),
        };
        assert!(admin.matches("a@x.com"));
        assert!(!admin.matches("A@x.com"));
        assert!(!AdminRecord { email: String::new() }.matches(""));
    }

    #[test]
    fn test_admin_from_malformed_document() {
        for fields in [json!({ "email": null }), json!({ "email": 42 }), json!({})] {
            let doc = Document::new("adminAuth", fields.as_object().cloned().unwrap());
            let admin = AdminRecord::from_document(&doc);
            assert!(admin.email.is_empty());
            assert!(!admin.matches("a@x.com"));
        }

        let doc = Document::new("adminAuth", json!({ "email": "a@x.com" }).as_object().cloned().unwrap());
        assert!(AdminRecord::from_document(&doc).matches("a@x.com"));
    }

    #[test]
    fn test_student_from_document() {
        let doc = Document::new("S1", json!({ "name": "Asha", "class": "7B" }).as_object().cloned().unwrap());
        let student = StudentRecord::from(doc);
        assert_eq!(student.id, "S1");
        assert_eq!(student.profile.get("class"), Some(&json!("7B")));
    }

    #[test]
    fn test_staff_profile_flatten() {
        let staff: StaffRecord = serde_json::from_value(json!({
            "email": "b@x.com",
            "isActive": true,
            "name": "Bina",
            "phone": "98765"
        }))
        .unwrap();

        assert!(staff.is_active);
        assert_eq!(staff.display_name(), Some("Bina"));
        assert_eq!(staff.profile.len(), 2);
    }
}
