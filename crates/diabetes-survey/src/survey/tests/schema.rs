use super::common::*;
use crate::survey::field::SurveyField;
use crate::survey::schema::{FieldKind, FormSchema, FormSection, SchemaError, ValidationError};
use crate::survey::value::{EncodedValue, RawValue};
use std::collections::{BTreeMap, HashSet};

#[test]
fn catalogue_declares_every_field_once_in_feature_order() {
    let schema = FormSchema::standard();
    let names: Vec<&str> = schema.fields().iter().map(|spec| spec.field.name()).collect();
    assert_eq!(
        names,
        vec![
            "HighBP",
            "HighChol",
            "CholCheck",
            "BMI",
            "Smoker",
            "Stroke",
            "HeartDiseaseorAttack",
            "PhysActivity",
            "Fruits",
            "Veggies",
            "HvyAlcoholConsump",
            "AnyHealthcare",
            "NoDocbcCost",
            "GenHlth",
            "MentHlth",
            "PhysHlth",
            "DiffWalk",
            "Sex",
            "Age",
            "Education",
            "Income",
        ]
    );

    let unique: HashSet<_> = names.iter().collect();
    assert_eq!(unique.len(), 21);

    for (spec, field) in schema.fields().iter().zip(SurveyField::ALL) {
        assert_eq!(spec.field, field);
        assert_eq!(field.spec().field, field);
    }
}

#[test]
fn field_names_round_trip_through_from_str() {
    for field in SurveyField::ALL {
        assert_eq!(field.name().parse::<SurveyField>(), Ok(field));
    }
    assert_eq!(
        "Diabetes_012".parse::<SurveyField>(),
        Err(SchemaError::UnknownField("Diabetes_012".to_string()))
    );
    assert!(FormSchema::standard().lookup("highbp").is_err());
}

#[test]
fn option_domains_match_catalogue() {
    let codes = |field: SurveyField| -> Vec<u8> {
        let mut codes: Vec<u8> = field.spec().options().iter().map(|o| o.code).collect();
        codes.sort_unstable();
        codes
    };

    assert_eq!(codes(SurveyField::HighBp), vec![0, 1]);
    assert_eq!(codes(SurveyField::Sex), vec![0, 1]);
    assert_eq!(codes(SurveyField::GenHlth), vec![1, 2, 3, 4, 5]);
    assert_eq!(codes(SurveyField::Education), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(codes(SurveyField::Income), (1..=8).collect::<Vec<u8>>());
    assert!(codes(SurveyField::Bmi).is_empty());

    let sex_labels: Vec<&str> = SurveyField::Sex
        .spec()
        .options()
        .iter()
        .map(|o| o.label)
        .collect();
    assert_eq!(sex_labels, vec!["Male", "Female"]);
}

#[test]
fn empty_values_are_required_for_every_field() {
    let schema = FormSchema::standard();
    for field in SurveyField::ALL {
        for raw in [RawValue::Empty, RawValue::from("   ")] {
            let err = schema.validate(field, &raw).expect_err("empty rejected");
            assert_eq!(err.to_string(), format!("{} is required.", field.label()));
            assert_eq!(err.field(), field);
        }
    }
}

#[test]
fn unparseable_numbers_read_as_missing() {
    let schema = FormSchema::standard();
    for raw in ["abc", "NaN", "inf", "12kg"] {
        let err = schema
            .validate(SurveyField::Bmi, &RawValue::from(raw))
            .expect_err("rejected");
        assert_eq!(err.to_string(), "BMI is required.");
    }
}

#[test]
fn bmi_accepts_any_finite_number() {
    let schema = FormSchema::standard();
    assert_eq!(
        schema.validate(SurveyField::Bmi, &RawValue::from("27.5")),
        Ok(EncodedValue::Number(27.5))
    );
    assert_eq!(
        schema.validate(SurveyField::Bmi, &RawValue::from("250")),
        Ok(EncodedValue::Number(250.0))
    );
}

#[test]
fn bounded_numeric_fields_enforce_inclusive_ranges() {
    let schema = FormSchema::standard();
    let check = |field: SurveyField, raw: &str| schema.validate(field, &RawValue::from(raw));

    assert!(check(SurveyField::MentHlth, "30").is_ok());
    assert!(check(SurveyField::MentHlth, "0").is_ok());
    assert_eq!(
        check(SurveyField::MentHlth, "31")
            .expect_err("31 rejected")
            .to_string(),
        "Must be between 0 and 30."
    );
    assert_eq!(
        check(SurveyField::PhysHlth, "-1")
            .expect_err("-1 rejected")
            .to_string(),
        "Must be between 0 and 30."
    );

    assert!(check(SurveyField::Age, "1").is_ok());
    assert!(check(SurveyField::Age, "130").is_ok());
    assert_eq!(
        check(SurveyField::Age, "0").expect_err("0 rejected").to_string(),
        "Age must be positive."
    );
    assert_eq!(
        check(SurveyField::Age, "131")
            .expect_err("131 rejected")
            .to_string(),
        "Age seems too high."
    );
    assert!(matches!(
        check(SurveyField::Age, "131"),
        Err(ValidationError::OutOfRange { value, .. }) if value == 131.0
    ));
}

#[test]
fn choice_fields_reject_values_outside_their_options() {
    let schema = FormSchema::standard();
    let check = |field: SurveyField, raw: &str| schema.validate(field, &RawValue::from(raw));

    assert_eq!(check(SurveyField::HighBp, "1"), Ok(EncodedValue::Code(1)));
    assert_eq!(check(SurveyField::Sex, "0"), Ok(EncodedValue::Code(0)));
    assert_eq!(check(SurveyField::Income, "8"), Ok(EncodedValue::Code(8)));
    assert_eq!(check(SurveyField::Smoker, "1.0"), Ok(EncodedValue::Code(1)));

    for (field, raw) in [
        (SurveyField::HighBp, "2"),
        (SurveyField::GenHlth, "0"),
        (SurveyField::GenHlth, "6"),
        (SurveyField::Education, "yes"),
        (SurveyField::Income, "2.5"),
    ] {
        let err = check(field, raw).expect_err("invalid option rejected");
        assert_eq!(
            err.to_string(),
            format!("Select a valid option for {}.", field.label())
        );
    }
}

#[test]
fn encode_agrees_with_validate() {
    let schema = FormSchema::standard();
    let samples = ["", "0", "1", "3", "5", "8", "30", "31", "130", "131", "27.5", "x", "-4"];

    for field in SurveyField::ALL {
        for sample in samples {
            let raw = RawValue::from(sample);
            match schema.validate(field, &raw) {
                Ok(encoded) => {
                    let number = schema.encode(field, &raw).expect("validated values encode");
                    assert_eq!(number, encoded.as_f64());
                    assert!(number.is_finite());
                }
                Err(_) => assert_eq!(
                    schema.encode(field, &raw),
                    Err(SchemaError::UnvalidatedValue { field })
                ),
            }
        }
    }
}

#[test]
fn validate_all_reports_every_failing_field() {
    let schema = FormSchema::standard();
    let errors = schema
        .validate_all(&BTreeMap::new())
        .expect_err("empty form rejected");
    assert_eq!(errors.len(), 21);

    let mut values: BTreeMap<SurveyField, RawValue> = valid_answers()
        .into_iter()
        .map(|(field, value)| (field, RawValue::from(value)))
        .collect();
    values.insert(SurveyField::Age, RawValue::from("0"));
    values.insert(SurveyField::Sex, RawValue::Empty);

    let errors = schema.validate_all(&values).expect_err("two failures");
    let failing: Vec<SurveyField> = errors.keys().copied().collect();
    assert_eq!(failing, vec![SurveyField::Sex, SurveyField::Age]);
}

#[test]
fn encoded_answers_serialize_with_exactly_the_wire_names() {
    let schema = FormSchema::standard();
    let values = valid_answers()
        .into_iter()
        .map(|(field, value)| (field, RawValue::from(value)))
        .collect();
    let answers = schema.validate_all(&values).expect("valid answers");
    assert_eq!(answers.len(), 21);

    let payload = serde_json::to_value(&answers).expect("serializes");
    let object = payload.as_object().expect("json object");
    assert_eq!(object.len(), 21);
    for field in SurveyField::ALL {
        assert!(object[field.name()].is_number(), "{field} is numeric");
    }
    assert_eq!(object["HighBP"], serde_json::json!(1));
    assert_eq!(object["BMI"], serde_json::json!(31.4));
    assert_eq!(object["Age"], serde_json::json!(57.0));
}

#[test]
fn sections_group_fields_in_display_order() {
    let sections = FormSchema::standard().sections();
    let titles: Vec<&str> = sections.iter().map(|(section, _)| section.title()).collect();
    assert_eq!(
        titles,
        vec![
            "Health Indicators",
            "Healthcare Access",
            "Physical & Mental Health",
            "General Health & Socioeconomic",
        ]
    );

    let (_, indicators) = &sections[0];
    assert_eq!(indicators.len(), 12);
    assert_eq!(
        indicators.last().map(|spec| spec.field),
        Some(SurveyField::Sex)
    );

    let (section, general) = &sections[3];
    assert_eq!(*section, FormSection::GeneralHealthAndSocioeconomic);
    let fields: Vec<SurveyField> = general.iter().map(|spec| spec.field).collect();
    assert_eq!(
        fields,
        vec![
            SurveyField::GenHlth,
            SurveyField::Age,
            SurveyField::Education,
            SurveyField::Income
        ]
    );
}

#[test]
fn prompts_follow_input_kind() {
    assert_eq!(
        SurveyField::MentHlth.spec().prompt().as_deref(),
        Some("0-30 days")
    );
    assert_eq!(
        SurveyField::Education.spec().prompt().as_deref(),
        Some("Select education level")
    );
    assert_eq!(SurveyField::Stroke.spec().prompt(), None);
    assert!(matches!(
        SurveyField::Bmi.spec().kind,
        FieldKind::Numeric { bounds: None, .. }
    ));
}
