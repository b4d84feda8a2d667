use es_core::IonId;
use es_synpp::{Component, Ion, Setup, SetupParams, Synpp};
use proptest::prelude::*;

// Quarter steps keep every value exact through text round trips.
fn quarter() -> impl Strategy<Value = f64> {
    (-40_000i32..40_000).prop_map(|n| f64::from(n) / 4.0)
}

fn ion_strategy() -> impl Strategy<Value = Ion> {
    let id = prop_oneof![
        (100i64..10_000).prop_map(IonId::Code),
        "[A-Z][a-z]?I{1,3}".prop_map(IonId::Label),
    ];
    (id, any::<bool>(), prop::array::uniform5(quarter())).prop_map(
        |(ion, active, [log_tau, v_min, v_max, aux, temp])| Ion {
            ion,
            active,
            log_tau,
            v_min,
            v_max,
            aux,
            temp,
        },
    )
}

fn setup_strategy() -> impl Strategy<Value = Setup> {
    (
        prop::array::uniform6(quarter()),
        prop::collection::vec(ion_strategy(), 0..6),
    )
        .prop_map(|([a0, a1, a2, v_phot, v_outer, t_phot], ions)| Setup {
            a0,
            a1,
            a2,
            v_phot,
            v_outer,
            t_phot,
            ions,
        })
}

proptest! {
    #[test]
    fn setups_survive_column_round_trip(setup in setup_strategy()) {
        let rebuilt = Setup::create(Some(setup.to_params())).expect("rebuild");
        prop_assert_eq!(rebuilt, setup);
    }

    #[test]
    fn jobs_survive_yaml_round_trip(setups in prop::collection::vec(setup_strategy(), 1..4)) {
        let job = Synpp { setups, ..Synpp::default() };
        let text = job.to_yaml_string().expect("export");
        let rebuilt = Synpp::from_yaml_str(&text).expect("import");
        prop_assert_eq!(rebuilt, job);
    }

    #[test]
    fn any_length_mismatch_fails(count in 1usize..6, extra in 1usize..3) {
        let params = SetupParams {
            ions: Some((0..count as i64).map(IonId::Code).collect()),
            active: Some(vec![true; count]),
            log_tau: Some(vec![0.0; count]),
            v_min: Some(vec![0.0; count + extra]),
            v_max: Some(vec![0.0; count]),
            aux: Some(vec![0.0; count]),
            temp: Some(vec![0.0; count]),
            ..SetupParams::default()
        };
        let err = Setup::create(Some(params)).unwrap_err();
        prop_assert_eq!(err.info().code.as_str(), "column_length");
        prop_assert_eq!(err.field_path(), Some("setup.v_min".to_string()));
    }
}

#[test]
fn duplicate_ion_identifiers_are_kept() {
    let document = serde_json::json!({
        "setups": [{
            "ions": ["SiII", "SiII"],
            "active": [true, false],
            "log_tau": [0.5, 1.5],
            "v_min": [8.0, 12.0],
            "v_max": [20.0, 20.0],
            "aux": [1.0, 1.0],
            "temp": [10.0, 10.0],
        }]
    });
    let job = Synpp::from_json_value(document).expect("job");
    let ions = &job.setups[0].ions;
    assert_eq!(ions.len(), 2);
    assert_eq!(ions[0].ion, ions[1].ion);
    assert!(ions[0].active && !ions[1].active);
    assert_eq!(ions[1].log_tau, 1.5);
    assert_eq!(ions[1].v_min, 12.0);
}
