use approx::assert_relative_eq;
use famms_core::{
    ConfigError, Dimensions, Equation, Error, Field, FieldError, Simulator, Solution, Symbol,
    SystemConfig, SystemFamms,
};
use integration_tests::{cases::SystemCase, simulators::Recorder};

const CASE: &str = r#"
dimensions = [1, 2, 3]
value_setters = ["setV0", "setV1", "setV2"]
source_setters = ["setB0", "setB1", "setB2"]

[system]
nproblems = 3
max_nsd = 3
time = true
functor_kind = "Python"
"#;

fn sum_of(symbols: &[Symbol]) -> famms_core::Expr {
    symbols
        .iter()
        .fold(famms_core::Expr::zero(), |acc, s| acc + s.expr())
}

#[test]
fn three_problem_system_from_toml() {
    let case: SystemCase = toml::from_str(CASE).unwrap();
    let mut system = SystemFamms::new(&case.system).unwrap();
    system
        .assign_callback_names(case.value_setters.clone(), case.source_setters.clone())
        .unwrap();

    let x = system.spatial_symbols().to_vec();
    let t = system.time_symbol().unwrap().clone();

    // Problem i depends on the first i + 1 coordinates and on time.
    let solutions: Vec<Solution> = (1..=3)
        .map(|k| Solution::scalar(sum_of(&x[..k]) * t.expr()))
        .collect();

    // Each source is dv/dt of its own solution plus the problem-0 solution.
    let t_eq = t.clone();
    let coupled = move |i: usize| {
        let t = t_eq.clone();
        move |v: &[Field]| -> Result<Field, FieldError> {
            Ok(Field::scalar(v[i].as_scalar()?.diff(&t) + v[0].as_scalar()?.clone()))
        }
    };
    let (e0, e1, e2) = (coupled(0), coupled(1), coupled(2));
    let equations: [&dyn Equation; 3] = [&e0, &e1, &e2];

    let mut sims: Vec<Recorder> = (0..3)
        .map(|i| Recorder::with_setters([format!("setV{i}"), format!("setB{i}")]))
        .collect();
    {
        let mut handles: Vec<Option<&mut dyn Simulator>> = sims
            .iter_mut()
            .map(|s| Some(s as &mut dyn Simulator))
            .collect();
        system
            .assign(&mut handles, solutions, &equations, case.dimensions.clone())
            .unwrap();
    }

    assert_eq!(system.dimensions(), [1, 2, 3]);
    for (i, sim) in sims.iter().enumerate() {
        assert_eq!(sim.called(), [format!("setV{i}"), format!("setB{i}")]);
        assert_eq!(system.problem(i).unwrap().spatial_symbols(), &x[..=i]);
    }

    // Problem 2 at (1, 2, 3), t = 0.5: v = 3.0, f = (1 + 2 + 3) + 1 * 0.5.
    let callbacks = system.problem(2).unwrap().callbacks().unwrap();
    let v = callbacks.value.evaluate(&[1.0, 2.0, 3.0], 0.5).unwrap();
    assert_relative_eq!(v.as_scalar().unwrap(), 3.0);
    let f = callbacks.source.evaluate(&[1.0, 2.0, 3.0], 0.5).unwrap();
    assert_relative_eq!(f.as_scalar().unwrap(), 6.5);

    // Problem 0 only sees x_0.
    let callbacks = system.problem(0).unwrap().callbacks().unwrap();
    assert!(callbacks.value.evaluate(&[1.0, 2.0], 0.5).is_err());
    let g = callbacks.value.evaluate_gradient(&[4.0], 0.25).unwrap();
    assert_relative_eq!(g[0], 0.25);
}

#[test]
fn mismatched_names_and_dimensions() {
    let config = SystemConfig {
        nproblems: 2,
        max_nsd: 2,
        ..SystemConfig::default()
    };
    let mut system = SystemFamms::new(&config).unwrap();

    assert!(matches!(
        system.assign_callback_names(["setV0"], ["setB0", "setB1"]),
        Err(Error::Configuration(ConfigError::CallbackNamesLength { .. }))
    ));

    let x = system.spatial_symbols().to_vec();
    let identity = |v: &[Field]| -> Result<Field, FieldError> { Ok(v[0].clone()) };
    let equations: [&dyn Equation; 2] = [&identity, &identity];
    let (mut a, mut b) = (Recorder::default(), Recorder::default());
    let mut sims: [Option<&mut dyn Simulator>; 2] = [Some(&mut a), Some(&mut b)];
    let solutions = || vec![Solution::scalar(x[0].expr()), Solution::scalar(x[1].expr())];

    assert!(matches!(
        system.assign(&mut sims, solutions(), &equations, vec![1_usize, 2, 2]),
        Err(Error::Configuration(ConfigError::InvalidDimensionSpec {
            expected: 2,
            got: 3
        }))
    ));
    assert!(matches!(
        system.assign(&mut sims, solutions(), &equations, Dimensions::Uniform(3)),
        Err(Error::Configuration(ConfigError::DimensionOutOfRange { .. }))
    ));
    assert!(!system.is_prepared());
}
