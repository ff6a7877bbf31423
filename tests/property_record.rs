//! Property tests for record assembly and merge policies

use proptest::prelude::*;
use registrar::{FixedId, MergePolicy, RunRecord, RunRecorder, TemplateSchema};
use serde_json::{json, Value};

fn arb_field_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,10}(\\.[a-z][a-z0-9_]{0,6}){0,2}").unwrap()
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 _-]{0,16}".prop_map(Value::from),
    ]
}

fn arb_config() -> impl Strategy<Value = Value> {
    let leaf = arb_scalar();
    leaf.prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z][a-z0-9_]{0,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn fresh_record_is_template_plus_id(
        fields in prop::collection::vec(arb_field_name(), 0..12)
    ) {
        let schema = TemplateSchema::from_fields(fields);
        let record = RunRecord::from_schema(&schema, "run-1");

        prop_assert!(record.contains("ID"));
        prop_assert!(!record.is_empty_field("ID"));
        for field in schema.fields() {
            prop_assert!(record.contains(field));
            if field != "ID" {
                prop_assert!(record.is_empty_field(field));
            }
        }
        let expected = schema.len() + usize::from(!schema.contains("ID"));
        prop_assert_eq!(record.fields().len(), expected);
    }

    #[test]
    fn populate_never_fails_on_arbitrary_configs(
        fields in prop::collection::vec(arb_field_name(), 0..8),
        config in arb_config()
    ) {
        let schema = TemplateSchema::from_fields(fields);
        let mut recorder = RunRecorder::from_schema(schema)
            .with_id_provider(FixedId::new("run-1"));

        recorder.populate_from_value(config);

        // Whatever resolved, the column order is still the template's.
        prop_assert_eq!(
            recorder.record().fields().len(),
            recorder.schema().len() + usize::from(!recorder.schema().contains("ID"))
        );
    }

    #[test]
    fn match_template_never_adds_columns(
        fields in prop::collection::vec("[a-z][a-z0-9_]{0,8}", 0..8),
        metrics in prop::collection::btree_map("[A-Z][A-Z0-9_]{0,8}", 0i64..100, 0..8)
    ) {
        // Metric keys are upper-case, template fields lower-case, so every
        // metric key is unknown to the record.
        let schema = TemplateSchema::from_fields(fields);
        let mut record = RunRecord::from_schema(&schema, "run-1");
        let before = record.fields().to_vec();

        let outcome = record.merge_metrics(
            metrics.iter().map(|(k, v)| (k.clone(), json!(v))),
            MergePolicy::MatchTemplate,
        );

        prop_assert_eq!(record.fields(), &before[..]);
        prop_assert!(outcome.applied.iter().all(|k| k == "ID"));
    }

    #[test]
    fn extend_applies_every_metric(
        metrics in prop::collection::btree_map("[a-z][a-z0-9_]{0,8}", 0i64..100, 0..8)
    ) {
        let schema = TemplateSchema::from_fields(["ID"]);
        let mut record = RunRecord::from_schema(&schema, "run-1");

        let outcome = record.merge_metrics(
            metrics.iter().map(|(k, v)| (k.clone(), json!(v))),
            MergePolicy::Extend,
        );

        prop_assert_eq!(outcome.applied.len(), metrics.len());
        prop_assert!(outcome.skipped.is_empty());
        for key in metrics.keys() {
            prop_assert!(record.contains(key));
        }
    }

    #[test]
    fn preview_is_idempotent(
        fields in prop::collection::vec("[a-z][a-z0-9_]{0,8}", 0..8),
        config in arb_config()
    ) {
        let schema = TemplateSchema::from_fields(fields);
        let mut recorder = RunRecorder::from_schema(schema)
            .with_id_provider(FixedId::new("run-1"));
        recorder.populate_from_value(config);

        prop_assert_eq!(recorder.preview().unwrap(), recorder.preview().unwrap());
    }
}
