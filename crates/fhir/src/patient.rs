//! FHIR-aligned patient wire models and translation helpers.
//!
//! This module provides both domain-level types and wire models for the Patient resource
//! sent to the registration backend.
//!
//! Responsibilities:
//! - Define public domain-level types for the intake pipeline
//! - Define a wire model that reproduces the FHIR JSON shape (arrays of names,
//!   identifiers and addresses, `resourceType` discriminator)
//! - Provide translation from domain values to the wire model
//!
//! Notes:
//! - A record is built once per submission attempt and never mutated afterwards
//! - Only one name, identifier and address are captured by the intake form, so the
//!   domain type holds single values and the wire model wraps them in arrays
//! - The `use`/`system` enums carry only the codes the intake form emits, not the full
//!   FHIR value sets

use crate::FhirResult;
use serde::{Serialize, Serializer};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Purpose of a human name. The intake form only captures the official name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameUse {
    Official,
}

impl NameUse {
    /// Convert to FHIR wire format string.
    fn to_wire(self) -> &'static str {
        match self {
            NameUse::Official => "official",
        }
    }
}

/// Telecommunications form for a contact point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactSystem {
    Phone,
    Email,
}

impl ContactSystem {
    /// Convert to FHIR wire format string.
    pub fn to_wire(self) -> &'static str {
        match self {
            ContactSystem::Phone => "phone",
            ContactSystem::Email => "email",
        }
    }
}

/// Purpose of a contact point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactUse {
    Home,
}

impl ContactUse {
    /// Convert to FHIR wire format string.
    fn to_wire(self) -> &'static str {
        match self {
            ContactUse::Home => "home",
        }
    }
}

/// Purpose of an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressUse {
    Home,
}

impl AddressUse {
    /// Convert to FHIR wire format string.
    fn to_wire(self) -> &'static str {
        match self {
            AddressUse::Home => "home",
        }
    }
}

/// Human name of the patient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HumanName {
    /// Purpose of the name.
    pub use_type: NameUse,

    /// Given names (first name, middle names).
    pub given: Vec<String>,

    /// Family name (surname).
    pub family: String,
}

/// Business identifier of the patient (for example a national ID number).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identifier {
    /// Namespace of the identifier value (for example `CC` for a citizenship card).
    pub system: String,

    /// The identifier value itself.
    pub value: String,
}

/// A phone number, email address or similar contact detail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactPoint {
    pub system: ContactSystem,
    pub value: String,
    pub use_type: ContactUse,
}

/// Postal address of the patient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    pub use_type: AddressUse,
    pub line: Vec<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Domain-level carrier for a patient registration.
///
/// Serialises to the FHIR Patient JSON shape through the internal wire model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientRecord {
    pub name: HumanName,

    /// Administrative gender as entered (`male`, `female`, `other`, `unknown`, or empty).
    pub gender: String,

    /// Date of birth (ISO 8601 date format: YYYY-MM-DD).
    pub birth_date: String,

    pub identifier: Identifier,

    /// Contact points in form order (phone first, then email).
    pub telecom: Vec<ContactPoint>,

    pub address: Address,
}

impl PatientRecord {
    /// Value of the first contact point using the given system, if any.
    pub fn telecom_value(&self, system: ContactSystem) -> Option<&str> {
        self.telecom
            .iter()
            .find(|c| c.system == system)
            .map(|c| c.value.as_str())
    }

    /// Reduced projection used for key-only duplicate lookups.
    pub fn lookup_key(&self) -> LookupKey<'_> {
        LookupKey {
            identifier: &self.identifier,
            name: &self.name,
            birth_date: &self.birth_date,
        }
    }
}

/// Canonical reduced lookup key: identifier, name and birth date of a [`PatientRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookupKey<'a> {
    pub identifier: &'a Identifier,
    pub name: &'a HumanName,
    pub birth_date: &'a str,
}

// ============================================================================
// Public Patient operations
// ============================================================================

/// Patient resource operations.
///
/// This is a zero-sized type used for namespacing patient-related operations.
/// All methods are associated functions.
pub struct Patient;

impl Patient {
    /// Resource type discriminator written to every rendered record.
    pub const RESOURCE_TYPE: &'static str = "Patient";

    /// Render a patient record as pretty-printed FHIR JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FhirError`] if serialisation fails.
    pub fn render(record: &PatientRecord) -> FhirResult<String> {
        Ok(serde_json::to_string_pretty(&domain_to_wire(record))?)
    }

    /// Convert a patient record into a JSON value with the FHIR shape.
    pub fn to_value(record: &PatientRecord) -> FhirResult<serde_json::Value> {
        Ok(serde_json::to_value(domain_to_wire(record))?)
    }
}

impl Serialize for PatientRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        domain_to_wire(self).serialize(serializer)
    }
}

impl Serialize for LookupKey<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        LookupKeyWire {
            identifier: vec![identifier_to_wire(self.identifier)],
            name: vec![name_to_wire(self.name)],
            birth_date: self.birth_date,
        }
        .serialize(serializer)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// Wire representation of a patient resource.
///
/// This is the exact structure that is sent to the backend.
#[derive(Debug, Serialize)]
struct PatientWire<'a> {
    #[serde(rename = "resourceType")]
    resource_type: &'static str,

    name: Vec<HumanNameWire<'a>>,

    gender: &'a str,

    #[serde(rename = "birthDate")]
    birth_date: &'a str,

    identifier: Vec<IdentifierWire<'a>>,

    telecom: Vec<ContactPointWire<'a>>,

    address: Vec<AddressWire<'a>>,
}

#[derive(Debug, Serialize)]
struct LookupKeyWire<'a> {
    identifier: Vec<IdentifierWire<'a>>,

    name: Vec<HumanNameWire<'a>>,

    #[serde(rename = "birthDate")]
    birth_date: &'a str,
}

#[derive(Debug, Serialize)]
struct HumanNameWire<'a> {
    #[serde(rename = "use")]
    use_type: &'static str,
    given: &'a [String],
    family: &'a str,
}

#[derive(Debug, Serialize)]
struct IdentifierWire<'a> {
    system: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct ContactPointWire<'a> {
    system: &'static str,
    value: &'a str,
    #[serde(rename = "use")]
    use_type: &'static str,
}

#[derive(Debug, Serialize)]
struct AddressWire<'a> {
    #[serde(rename = "use")]
    use_type: &'static str,
    line: &'a [String],
    city: &'a str,
    #[serde(rename = "postalCode")]
    postal_code: &'a str,
    country: &'a str,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn name_to_wire(name: &HumanName) -> HumanNameWire<'_> {
    HumanNameWire {
        use_type: name.use_type.to_wire(),
        given: &name.given,
        family: &name.family,
    }
}

fn identifier_to_wire(identifier: &Identifier) -> IdentifierWire<'_> {
    IdentifierWire {
        system: &identifier.system,
        value: &identifier.value,
    }
}

/// Convert the domain record to its wire format.
fn domain_to_wire(record: &PatientRecord) -> PatientWire<'_> {
    PatientWire {
        resource_type: Patient::RESOURCE_TYPE,
        name: vec![name_to_wire(&record.name)],
        gender: &record.gender,
        birth_date: &record.birth_date,
        identifier: vec![identifier_to_wire(&record.identifier)],
        telecom: record
            .telecom
            .iter()
            .map(|c| ContactPointWire {
                system: c.system.to_wire(),
                value: &c.value,
                use_type: c.use_type.to_wire(),
            })
            .collect(),
        address: vec![AddressWire {
            use_type: record.address.use_type.to_wire(),
            line: &record.address.line,
            city: &record.address.city,
            postal_code: &record.address.postal_code,
            country: &record.address.country,
        }],
    }
}
