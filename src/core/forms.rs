use std::collections::HashMap;

use time::format_description::well_known::Iso8601;

use crate::core::wizard::Step;

/// How a field is entered and checked. Rule content stays on the backend;
/// the client only enforces presence and shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Date,
    Flag,
}

/// One field of a step form. The generic step runner renders and validates
/// forms purely from these descriptors.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn text(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Text,
        required: true,
    }
}

const fn date(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Date,
        required: true,
    }
}

const fn flag(key: &'static str, label: &'static str, required: bool) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Flag,
        required,
    }
}

/// The form fields of each step. Steps whose input is a file pick (documents,
/// photo) have no text fields; their screens collect attachments instead.
pub fn step_fields(step: Step) -> &'static [FieldSpec] {
    match step {
        Step::ApplicantDetails => const { &[
            text("given_names", "Given names"),
            text("surname", "Surname"),
            date("date_of_birth", "Date of birth"),
            text("nationality", "Nationality"),
            FieldSpec {
                key: "email",
                label: "Email address",
                kind: FieldKind::Email,
                required: true,
            },
            text("phone", "Phone number"),
        ] },
        Step::PassportDetails => const { &[
            text("passport_number", "Passport number"),
            text("issuing_country", "Issuing country"),
            date("issue_date", "Date of issue"),
            date("expiry_date", "Date of expiry"),
        ] },
        Step::ContactDetails => const { &[
            text("address_line", "Street address"),
            text("city", "City"),
            text("postal_code", "Postal code"),
            text("country", "Country of residence"),
        ] },
        Step::TravelDetails => const { &[
            date("arrival_date", "Arrival date"),
            date("departure_date", "Departure date"),
            text("purpose", "Purpose of travel"),
            text("port_of_entry", "Port of entry"),
        ] },
        Step::Background => const { &[
            flag("criminal_record", "I have a criminal record", false),
            flag("prior_visa_refusal", "I have been refused a visa before", false),
            flag("previous_overstay", "I have overstayed a visa before", false),
        ] },
        Step::Documents => &[],
        Step::Photo => &[],
        Step::Terms => const { &[flag(
            "accepted",
            "I accept the terms and conditions",
            true,
        )] },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub key: &'static str,
    pub message: String,
}

/// Check raw form values against the field descriptors.
pub fn validate(
    fields: &[FieldSpec],
    values: &HashMap<String, String>,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    for field in fields {
        let value = values.get(field.key).map(String::as_str).unwrap_or("");
        let value = value.trim();
        match field.kind {
            FieldKind::Flag => {
                if field.required && value != "true" {
                    errors.push(FieldError {
                        key: field.key,
                        message: format!("{} must be accepted", field.label),
                    });
                }
            }
            _ if value.is_empty() => {
                if field.required {
                    errors.push(FieldError {
                        key: field.key,
                        message: format!("{} is required", field.label),
                    });
                }
            }
            FieldKind::Date => {
                if time::Date::parse(value, &Iso8601::DEFAULT).is_err() {
                    errors.push(FieldError {
                        key: field.key,
                        message: format!("{} must be a date (YYYY-MM-DD)", field.label),
                    });
                }
            }
            FieldKind::Email => {
                let valid = value
                    .split_once('@')
                    .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
                if !valid {
                    errors.push(FieldError {
                        key: field.key,
                        message: format!("{} must be a valid email address", field.label),
                    });
                }
            }
            FieldKind::Text => {}
        }
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Build the JSON body submitted for a step from its raw form values.
pub fn payload(fields: &[FieldSpec], values: &HashMap<String, String>) -> serde_json::Value {
    let mut object = serde_json::Map::new();
    for field in fields {
        let value = values.get(field.key).map(String::as_str).unwrap_or("");
        let json = match field.kind {
            FieldKind::Flag => serde_json::Value::Bool(value == "true"),
            _ => serde_json::Value::String(value.trim().to_string()),
        };
        object.insert(field.key.to_string(), json);
    }
    serde_json::Value::Object(object)
}

/// Flatten a fetched sub-document back into raw form values, for prefilling
/// the update variant of a step.
pub fn values_from_document(document: &serde_json::Value) -> HashMap<String, String> {
    let mut values = HashMap::new();
    if let Some(object) = document.as_object() {
        for (key, value) in object {
            let raw = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => continue,
            };
            values.insert(key.clone(), raw);
        }
    }
    values
}
