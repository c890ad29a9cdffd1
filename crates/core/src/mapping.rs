//! Translation from the flat form snapshot to the Patient resource.

use crate::constants::DEFAULT_COUNTRY;
use crate::form::FormInput;
use fhir::{
    Address, AddressUse, ContactPoint, ContactSystem, ContactUse, HumanName, Identifier,
    NameUse, PatientRecord,
};

/// Map a form snapshot to a [`PatientRecord`].
///
/// Pure and infallible. Assumes the input already passed [`crate::validate`]. Both telecom
/// entries are always emitted, so an empty email becomes an email contact point with an
/// empty value. The address country is always [`DEFAULT_COUNTRY`].
pub fn to_patient_record(input: &FormInput) -> PatientRecord {
    PatientRecord {
        name: HumanName {
            use_type: NameUse::Official,
            given: vec![input.name.clone()],
            family: input.family_name.clone(),
        },
        gender: input.gender.clone(),
        birth_date: input.birth_date.clone(),
        identifier: Identifier {
            system: input.identifier_system.clone(),
            value: input.identifier_value.clone(),
        },
        telecom: vec![
            ContactPoint {
                system: ContactSystem::Phone,
                value: input.cell_phone.clone(),
                use_type: ContactUse::Home,
            },
            ContactPoint {
                system: ContactSystem::Email,
                value: input.email.clone(),
                use_type: ContactUse::Home,
            },
        ],
        address: Address {
            use_type: AddressUse::Home,
            line: vec![input.address.clone()],
            city: input.city.clone(),
            postal_code: input.postal_code.clone(),
            country: DEFAULT_COUNTRY.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> FormInput {
        FormInput {
            name: "Ana".into(),
            family_name: "Ruiz".into(),
            gender: "female".into(),
            birth_date: "1990-01-01".into(),
            identifier_system: "CC".into(),
            identifier_value: "1002003".into(),
            cell_phone: "3001234567".into(),
            email: String::new(),
            address: String::new(),
            city: String::new(),
            postal_code: String::new(),
        }
    }

    #[test]
    fn maps_registration_scenario() {
        let input = ana();
        assert!(crate::validate(&input).is_valid());

        let record = to_patient_record(&input);
        assert_eq!(
            record.identifier,
            Identifier {
                system: "CC".into(),
                value: "1002003".into()
            }
        );
        assert_eq!(record.telecom_value(ContactSystem::Phone), Some("3001234567"));
        assert_eq!(record.telecom_value(ContactSystem::Email), Some(""));
        assert_eq!(record.name.given, vec!["Ana".to_string()]);
        assert_eq!(record.name.family, "Ruiz");
        assert_eq!(record.name.use_type, NameUse::Official);
        assert!(record.telecom.iter().all(|c| c.use_type == ContactUse::Home));
    }

    #[test]
    fn country_is_always_the_default() {
        let mut input = ana();
        input.city = "Lima".into();
        input.address = "Av. Arequipa 100".into();

        let record = to_patient_record(&input);
        assert_eq!(record.address.country, DEFAULT_COUNTRY);
        assert_eq!(to_patient_record(&FormInput::default()).address.country, DEFAULT_COUNTRY);
    }

    #[test]
    fn mapping_is_deterministic() {
        let input = ana();
        assert_eq!(to_patient_record(&input), to_patient_record(&input));
        assert_eq!(
            fhir::Patient::to_value(&to_patient_record(&input)).expect("serialise"),
            fhir::Patient::to_value(&to_patient_record(&input.clone())).expect("serialise")
        );
    }
}
