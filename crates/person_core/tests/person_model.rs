use person_core::{Person, PersonValidationError};
use uuid::Uuid;

#[test]
fn person_new_generates_real_id() {
    let person = Person::new("Leia", "Organa");

    assert!(person.has_id());
    assert_eq!(person.first_name, "Leia");
    assert_eq!(person.last_name, "Organa");
    assert_eq!(person.validate(), Ok(()));
}

#[test]
fn person_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("b0452eaf-537d-4221-84d9-2252f8bc5aef").unwrap();
    let person = Person::with_id(id, "Luke", "Skywalker");

    let json = serde_json::to_value(&person).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "b0452eaf-537d-4221-84d9-2252f8bc5aef",
            "firstName": "Luke",
            "lastName": "Skywalker"
        })
    );

    let decoded: Person = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, person);
}

#[test]
fn missing_fields_decode_as_empty_and_fail_validation() {
    let value = serde_json::json!({
        "id": "bea1522b-fcc3-4f84-a021-9875d7bb2bbd",
        "firstName": "Leia"
    });

    let person: Person = serde_json::from_value(value).unwrap();
    assert_eq!(person.last_name, "");
    assert_eq!(
        person.validate(),
        Err(PersonValidationError::MissingLastName)
    );
}

#[test]
fn missing_id_decodes_as_nil() {
    let value = serde_json::json!({ "firstName": "Han", "lastName": "Solo" });

    let person: Person = serde_json::from_value(value).unwrap();
    assert!(!person.has_id());
    assert_eq!(person.validate(), Err(PersonValidationError::NilId));
}

#[test]
fn validate_rejects_blank_names() {
    let blank_first = Person::new("   ", "Doe");
    assert_eq!(
        blank_first.validate(),
        Err(PersonValidationError::MissingFirstName)
    );

    let blank_last = Person::new("John", "");
    assert_eq!(
        blank_last.validate(),
        Err(PersonValidationError::MissingLastName)
    );
}
