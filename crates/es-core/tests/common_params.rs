use es_core::report::bracket;
use es_core::{
    export_column, take_column, Component, Grid, GridParams, Opacity, OpacityForm, OpacityParams,
    Scalar, Spectrum, SpectrumParams,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn columns_of_the_declared_length_pass_through(values in prop::collection::vec(any::<i32>(), 0..16)) {
        let count = values.len();
        let taken = take_column("setup", "active", Some(values.clone()), count).unwrap();
        prop_assert_eq!(&taken, &values);
        let exported = export_column(&taken, |v| *v);
        prop_assert_eq!(exported.is_none(), values.is_empty());
    }

    #[test]
    fn other_lengths_are_rejected(len in 0usize..10, count in 0usize..10) {
        prop_assume!(len != count);
        let err = take_column("config", "temp", Some(vec![0.0f64; len]), count).unwrap_err();
        prop_assert_eq!(err.info().code.as_str(), "column_length");
        prop_assert_eq!(err.field_path(), Some("config.temp".to_string()));
    }

    #[test]
    fn fixed_cells_never_shrink_below_width(value in -1.0e6..1.0e6f64, flag in any::<bool>()) {
        prop_assert!(Scalar::Real(value).fixed(6, 2).len() >= 6);
        let cell = Scalar::Flag(flag).fixed(6, 2);
        prop_assert_eq!(cell.trim(), if flag { "Yes" } else { "No" });
    }

    #[test]
    fn partial_grid_keeps_supplied_fields(bin_width in 0.01..5.0f64, v_size in proptest::option::of(10.0..500.0f64)) {
        let grid = Grid::create(Some(GridParams {
            bin_width: Some(bin_width),
            v_size,
            ..GridParams::default()
        }))
        .unwrap();
        prop_assert_eq!(grid.bin_width, bin_width);
        prop_assert_eq!(grid.v_size, v_size.unwrap_or(100.0));
        prop_assert_eq!(grid.v_outer_max, 30.0);
    }
}

#[test]
fn empty_brackets_have_no_stray_comma() {
    assert_eq!(bracket("[", Vec::new()), "[ ]");
    assert_eq!(
        bracket("[", vec![" a".to_string(), " b".to_string()]),
        "[ a, b ]"
    );
}

#[test]
fn opacity_form_spellings_are_case_insensitive() {
    for (text, form) in [
        ("Exponential", OpacityForm::Exp),
        ("POW", OpacityForm::Power),
        ("user", OpacityForm::UserProfile),
    ] {
        let opacity = Opacity::create(Some(OpacityParams {
            form: Some(text.to_string()),
            ..OpacityParams::default()
        }))
        .unwrap();
        assert_eq!(opacity.form, form);
    }
}

#[test]
fn spectrum_flag_renders_as_yes() {
    let spectrum = Spectrum::create(Some(SpectrumParams {
        flatten: Some(true),
        ..SpectrumParams::default()
    }))
    .unwrap();
    assert_eq!(spectrum.render(), "spectrum :\n    p_size       : 60\n    flatten      : Yes");
}
