use es_core::IonId;
use es_synapps::{Component, Config, ConfigParams, Ion, Synapps, Variable, VariableColumns};
use proptest::prelude::*;
use serde_json::json;

// Quarter steps keep every value exact through text round trips.
fn quarter() -> impl Strategy<Value = f64> {
    (-4000i32..4000).prop_map(|n| f64::from(n) / 4.0)
}

fn variable_strategy() -> impl Strategy<Value = Variable> {
    (any::<bool>(), quarter(), quarter(), quarter(), quarter())
        .prop_map(|(fixed, start, lower, upper, scale)| Variable {
            fixed,
            start,
            lower,
            upper,
            scale,
        })
}

fn ion_id_strategy() -> impl Strategy<Value = IonId> {
    prop_oneof![
        (100i64..10_000).prop_map(IonId::Code),
        "[A-Z][a-z]?I{1,3}".prop_map(IonId::Label),
    ]
}

fn ion_strategy() -> impl Strategy<Value = Ion> {
    (
        ion_id_strategy(),
        any::<bool>(),
        any::<bool>(),
        prop::array::uniform5(variable_strategy()),
    )
        .prop_map(|(ion, active, detach, [log_tau, v_min, v_max, aux, temp])| Ion {
            ion,
            active,
            detach,
            log_tau,
            v_min,
            v_max,
            aux,
            temp,
        })
}

proptest! {
    #[test]
    fn ion_records_survive_column_round_trip(ions in prop::collection::vec(ion_strategy(), 0..8)) {
        let config = Config { ions, ..Config::default() };
        let params = config.to_params();
        prop_assert_eq!(params.ions.as_ref().map_or(0, Vec::len), config.ions.len());
        let rebuilt = Config::create(Some(params)).expect("rebuild");
        prop_assert_eq!(&rebuilt, &config);
    }

    #[test]
    fn whole_job_survives_json_export(ions in prop::collection::vec(ion_strategy(), 0..5)) {
        let job = Synapps {
            config: Config { ions, ..Config::default() },
            ..Synapps::default()
        };
        let value = job.to_json_value().expect("export");
        let rebuilt = Synapps::from_json_value(value).expect("import");
        prop_assert_eq!(rebuilt, job);
    }

    #[test]
    fn rendering_is_idempotent(ions in prop::collection::vec(ion_strategy(), 0..5)) {
        let config = Config { ions, ..Config::default() };
        let first = config.render();
        prop_assert_eq!(&first, &config.render());
        prop_assert_eq!(&first, &config.clone().to_string());
        prop_assert!(!first.contains("true") && !first.contains("false"));
    }

    #[test]
    fn any_short_column_fails(count in 1usize..6, short_by in 1usize..3) {
        let found = count.saturating_sub(short_by);
        let columns = |n: usize| VariableColumns {
            fixed: Some(vec![false; n]),
            start: Some(vec![1.0; n]),
            lower: Some(vec![0.0; n]),
            upper: Some(vec![2.0; n]),
            scale: Some(vec![1.0; n]),
        };
        let params = ConfigParams {
            ions: Some((0..count as i64).map(IonId::Code).collect()),
            active: Some(vec![true; count]),
            detach: Some(vec![false; count]),
            log_tau: Some(columns(count)),
            v_min: Some(columns(count)),
            v_max: Some(columns(found)),
            aux: Some(columns(count)),
            temp: Some(columns(count)),
            ..ConfigParams::default()
        };
        let err = Config::create(Some(params)).unwrap_err();
        prop_assert_eq!(err.info().code.as_str(), "column_length");
        prop_assert_eq!(err.field_path(), Some("config.v_max.fixed".to_string()));
    }
}

#[test]
fn mismatched_active_column_is_not_truncated() {
    let document = json!({
        "config": {
            "ions": ["SiII", "CaII", "FeII"],
            "active": [true, true],
            "detach": [false, false, false],
        }
    });
    let err = Synapps::from_json_value(document).unwrap_err();
    assert_eq!(err.info().code, "column_length");
    assert_eq!(err.field_path().as_deref(), Some("config.active"));
    assert_eq!(err.info().context["expected"], "3");
    assert_eq!(err.info().context["found"], "2");
}

#[test]
fn columns_without_ions_are_rejected() {
    let document = json!({ "config": { "active": [true] } });
    let err = Synapps::from_json_value(document).unwrap_err();
    assert_eq!(err.field_path().as_deref(), Some("config.active"));
}

#[test]
fn duplicate_ion_identifiers_are_kept() {
    let column = json!({
        "fixed": [false, false],
        "start": [1.0, 2.0],
        "lower": [0.0, 0.0],
        "upper": [5.0, 5.0],
        "scale": [1.0, 1.0],
    });
    let document = json!({
        "config": {
            "ions": [1401, 1401],
            "active": [true, false],
            "detach": [false, false],
            "log_tau": column,
            "v_min": column,
            "v_max": column,
            "aux": column,
            "temp": column,
        }
    });
    let job = Synapps::from_json_value(document).expect("job");
    assert_eq!(job.config.ions.len(), 2);
    assert_eq!(job.config.ions[0].ion, job.config.ions[1].ion);
    assert_eq!(job.config.ions[1].log_tau.start, 2.0);
}
