use approx::assert_relative_eq;
use famms_core::{
    Assignment, Error, ExtraCallback, Famms, FammsConfig, Field, FieldError, FunctorKind,
    Solution, Symbol,
    functor::{ExtensionFunctor, FieldFunctor},
};
use integration_tests::simulators::{CallableSolver, ExtensionSolver, Recorder};

/// One-dimensional heat equation: F(v) = dv/dt - d²v/dx².
fn heat(v: &[Field]) -> Result<Field, FieldError> {
    let x = Symbol::new("x_0");
    let t = Symbol::new("t");
    let v = v[0].as_scalar()?;
    Ok(Field::scalar(v.diff(&t) - v.diff_n(&x, 2)))
}

fn famms(kind: FunctorKind) -> Famms {
    Famms::new(&FammsConfig {
        nsd: 1,
        time: true,
        functor_kind: kind,
        ..FammsConfig::default()
    })
    .unwrap()
}

fn quadratic_in_space(famms: &Famms) -> Solution {
    let x = &famms.spatial_symbols()[0];
    let t = famms.time_symbol().unwrap();
    Solution::scalar(x.expr().powi(2) + t.expr())
}

#[test]
fn manufactured_heat_solution() {
    let mut famms = famms(FunctorKind::GenericCallable);
    let solution = quadratic_in_space(&famms);
    let mut solver = CallableSolver::default();

    famms
        .assign(
            Assignment::new()
                .equation(&heat)
                .solution(solution)
                .simulator(&mut solver),
        )
        .unwrap();

    let value = solver.boundary_value(&[2.0], 0.5).unwrap().unwrap();
    assert_relative_eq!(value, 4.5);

    for x in [-1.0, 0.0, 0.25, 3.0] {
        for t in [0.0, 0.5, 10.0] {
            let source = solver.forcing_value(&[x], t).unwrap().unwrap();
            assert_relative_eq!(source, -1.0);
        }
    }
}

#[test]
fn native_simulator_gets_field_functors() {
    let mut famms = famms(FunctorKind::NativeSimulator);
    let solution = quadratic_in_space(&famms);
    let mut solver = Recorder::with_setters(["set_v_func", "set_b_func"]);

    famms
        .assign(
            Assignment::new()
                .equation(&heat)
                .solution(solution)
                .simulator(&mut solver),
        )
        .unwrap();

    let value = solver.functor("set_v_func").unwrap();
    let field = value.as_any().downcast_ref::<FieldFunctor>().unwrap();
    assert_relative_eq!(field.value_pt(&[3.0], 1.0).unwrap(), 10.0);
    assert_eq!(field.gradient_pt(&[3.0], 1.0).unwrap(), vec![6.0]);
}

#[test]
fn extension_simulator_checks_functor_kind() {
    let mut callable = famms(FunctorKind::GenericCallable);
    callable.set_callback_names("setExact", "setRhs").unwrap();
    let solution = quadratic_in_space(&callable);
    let mut solver = ExtensionSolver::default();

    let err = callable
        .assign(
            Assignment::new()
                .equation(&heat)
                .solution(solution)
                .simulator(&mut solver),
        )
        .unwrap_err();
    assert!(matches!(err, Error::CallbackAttachment { .. }));
    assert!(solver.exact.is_none());

    let mut extension = famms(FunctorKind::CompiledExtension);
    extension.set_callback_names("setExact", "setRhs").unwrap();
    let solution = quadratic_in_space(&extension);
    extension
        .assign(
            Assignment::new()
                .equation(&heat)
                .solution(solution)
                .simulator(&mut solver),
        )
        .unwrap();

    let mut out = [0.0; 4];
    assert_eq!(solver.fill_rhs(&[0.7], &mut out, 2.0), Some(1));
    assert_relative_eq!(out[0], -1.0);

    let exact = solver.exact.as_ref().unwrap();
    let exact = exact.as_any().downcast_ref::<ExtensionFunctor>().unwrap();
    assert_relative_eq!(exact.call_scalar(&[1.0], 2.0).unwrap(), 3.0);
}

#[test]
fn callbacks_without_a_simulator() {
    let mut famms = famms(FunctorKind::GenericCallable);
    let solution = quadratic_in_space(&famms);
    famms
        .assign(Assignment::new().equation(&heat).solution(solution))
        .unwrap();

    let callbacks = famms.callbacks().unwrap();
    let first = callbacks.value.evaluate(&[1.5], 0.25).unwrap();
    let second = callbacks.value.evaluate(&[1.5], 0.25).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        callbacks.value.evaluate_at(&[1.5]).unwrap().as_scalar(),
        Some(2.25)
    );
}

#[test]
fn extra_setters_are_checked_before_any_attachment() {
    let mut famms = famms(FunctorKind::GenericCallable);
    famms
        .add_extra_callback(ExtraCallback::new("flux", |p, _| -2.0 * p[0]))
        .unwrap();
    let solution = quadratic_in_space(&famms);
    let mut solver = Recorder::with_setters(["set_v_func", "set_b_func"]);

    let err = famms
        .assign(
            Assignment::new()
                .equation(&heat)
                .solution(solution.clone())
                .simulator(&mut solver),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ExtraCallbackAttachment { ref setter, .. } if setter == "set_flux"
    ));
    assert!(solver.called().is_empty());
    assert!(!famms.is_prepared());

    let mut solver = Recorder::with_setters(["set_v_func", "set_b_func", "set_flux"]);
    famms
        .assign(
            Assignment::new()
                .equation(&heat)
                .solution(solution)
                .simulator(&mut solver),
        )
        .unwrap();
    assert_eq!(solver.called(), ["set_v_func", "set_b_func", "set_flux"]);
}
