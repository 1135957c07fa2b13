use lpdispatch::{
    resolve, LpModel, ModelBuilder, OptimizationDirection, Relation, Solution, SolverRegistry,
};

const TOLERANCE: f64 = 1e-6;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Every compiled-in backend, by canonical name
fn backends() -> Vec<&'static str> {
    #[allow(unused_mut)]
    let mut names = vec!["microlp"];
    #[cfg(feature = "highs")]
    names.push("highs");
    names
}

fn solve_on(backend: &str, model: &mut LpModel) -> Solution {
    SolverRegistry::global()
        .create(backend)
        .expect("built-in backend")
        .solve(model)
        .expect("valid model")
}

fn assert_close(actual: f64, expected: f64, tolerance: f64, what: &str, backend: &str) {
    assert!(
        (actual - expected).abs() < tolerance,
        "[{}] expected {} ~{}, got {}",
        backend,
        what,
        expected,
        actual
    );
}

fn assert_objective_round_trip(model: &LpModel, solution: &Solution, backend: &str) {
    let recomputed: f64 = model
        .variables()
        .map(|v| model.objective_coefficient(v.name()) * solution.value(v.name()).unwrap())
        .sum();
    assert_close(
        solution.objective_value(),
        recomputed,
        TOLERANCE,
        "round-trip objective",
        backend,
    );
}

fn scenario_a() -> LpModel {
    // max 3x + 5y  s.t.  2x + y <= 6,  x + y <= 4,  x, y >= 0
    let mut model = LpModel::new();
    model.add_variable("x", 0.0, f64::INFINITY).unwrap();
    model.add_variable("y", 0.0, f64::INFINITY).unwrap();
    model.set_objective([("x", 3.0), ("y", 5.0)], OptimizationDirection::Maximize);
    model
        .add_constraint("c1", [("x", 2.0), ("y", 1.0)], Relation::Leq, 6.0)
        .unwrap();
    model
        .add_constraint("c2", [("x", 1.0), ("y", 1.0)], Relation::Leq, 4.0)
        .unwrap();
    model.build();
    model
}

fn scenario_b() -> LpModel {
    // min x + y  s.t.  x >= 1,  y >= 2
    ModelBuilder::new()
        .minimize()
        .var("x", 0.0, f64::INFINITY)
        .var("y", 0.0, f64::INFINITY)
        .obj("x", 1.0)
        .obj("y", 1.0)
        .geq("x_min", [("x", 1.0)], 1.0)
        .geq("y_min", [("y", 1.0)], 2.0)
        .build()
        .unwrap()
}

fn scenario_c() -> LpModel {
    // max x  s.t.  3x = 1,  x >= 0
    ModelBuilder::new()
        .maximize()
        .var("x", 0.0, f64::INFINITY)
        .obj("x", 1.0)
        .eq("third", [("x", 3.0)], 1.0)
        .build()
        .unwrap()
}

fn mixed_bounds_model() -> LpModel {
    // min 2a - b + c  s.t.  a + b + c = 4,  a - c >= -6
    // a in [-5, 5], b <= 3, c >= 1; unique optimum a = -2.5, b = 3, c = 3.5
    ModelBuilder::new()
        .minimize()
        .var("a", -5.0, 5.0)
        .var("b", f64::NEG_INFINITY, 3.0)
        .var("c", 1.0, f64::INFINITY)
        .obj("a", 2.0)
        .obj("b", -1.0)
        .obj("c", 1.0)
        .eq("total", [("a", 1.0), ("b", 1.0), ("c", 1.0)], 4.0)
        .geq("spread", [("a", 1.0), ("c", -1.0)], -6.0)
        .build()
        .unwrap()
}

#[test]
fn test_scenario_a_maximization() {
    init_tracing();
    for backend in backends() {
        let mut model = scenario_a();
        let solution = solve_on(backend, &mut model);

        assert!(solution.is_feasible(), "[{}] should be feasible", backend);
        assert_close(solution.value("x").unwrap(), 0.0, TOLERANCE, "x", backend);
        assert_close(solution.value("y").unwrap(), 4.0, TOLERANCE, "y", backend);
        assert_close(solution.objective_value(), 20.0, TOLERANCE, "objective", backend);
        assert_objective_round_trip(&model, &solution, backend);
    }
}

#[test]
fn test_scenario_b_minimization() {
    for backend in backends() {
        let mut model = scenario_b();
        let solution = solve_on(backend, &mut model);

        assert!(solution.is_feasible(), "[{}] should be feasible", backend);
        assert_close(solution.value("x").unwrap(), 1.0, TOLERANCE, "x", backend);
        assert_close(solution.value("y").unwrap(), 2.0, TOLERANCE, "y", backend);
        assert_close(solution.objective_value(), 3.0, TOLERANCE, "objective", backend);
        assert_objective_round_trip(&model, &solution, backend);
    }
}

#[test]
fn test_scenario_c_equality() {
    for backend in backends() {
        let mut model = scenario_c();
        let solution = solve_on(backend, &mut model);

        assert!(solution.is_feasible(), "[{}] should be feasible", backend);
        assert_close(solution.value("x").unwrap(), 1.0 / 3.0, 1e-8, "x", backend);
        assert_close(solution.objective_value(), 1.0 / 3.0, 1e-8, "objective", backend);
    }
}

#[test]
fn test_scenario_d_infeasible() {
    for backend in backends() {
        let mut model = ModelBuilder::new()
            .var("x", 0.0, f64::INFINITY)
            .obj("x", 1.0)
            .geq("low", [("x", 1.0)], 2.0)
            .leq("high", [("x", 1.0)], 1.0)
            .build()
            .unwrap();

        let solution = solve_on(backend, &mut model);
        assert!(!solution.is_feasible(), "[{}] should be infeasible", backend);
        assert!(solution.objective_value().is_nan());
        assert_eq!(solution.values().len(), 1);
    }
}

#[test]
fn test_scenario_e_unbounded_is_not_an_error() {
    for backend in backends() {
        // max x + y  s.t.  x - 2y <= -1,  x, y >= 0
        let mut model = ModelBuilder::new()
            .maximize()
            .var("x", 0.0, f64::INFINITY)
            .var("y", 0.0, f64::INFINITY)
            .obj("x", 1.0)
            .obj("y", 1.0)
            .leq("c", [("x", 1.0), ("y", -2.0)], -1.0)
            .build()
            .unwrap();

        let solution = solve_on(backend, &mut model);
        assert!(
            !solution.is_feasible() || !solution.objective_value().is_finite(),
            "[{}] unbounded model must not report a finite optimum",
            backend
        );
        let names: Vec<&String> = solution.values().keys().collect();
        assert_eq!(names, vec!["x", "y"]);
    }
}

#[test]
fn test_bounded_variables_from_model_tests() {
    // max 3x + 5y with x, y in [0, 10]
    for backend in backends() {
        let mut model = ModelBuilder::new()
            .maximize()
            .var("x", 0.0, 10.0)
            .var("y", 0.0, 10.0)
            .obj("x", 3.0)
            .obj("y", 5.0)
            .leq("c1", [("x", 2.0), ("y", 1.0)], 6.0)
            .leq("c2", [("x", 1.0), ("y", 1.0)], 4.0)
            .build()
            .unwrap();

        let solution = solve_on(backend, &mut model);
        assert!(solution.is_feasible());
        assert_close(solution.objective_value(), 20.0, TOLERANCE, "objective", backend);

        // max x + 2y, x + y <= 8
        let mut model = ModelBuilder::new()
            .maximize()
            .var("x", 0.0, 10.0)
            .obj("x", 1.0)
            .var("y", 0.0, 10.0)
            .obj("y", 2.0)
            .leq("c1", [("x", 1.0), ("y", 1.0)], 8.0)
            .build()
            .unwrap();

        let solution = solve_on(backend, &mut model);
        assert!(solution.is_feasible());
        assert_close(solution.objective_value(), 16.0, TOLERANCE, "objective", backend);
        assert_close(solution.value("y").unwrap(), 8.0, TOLERANCE, "y", backend);
    }
}

#[test]
fn test_backends_agree_on_unique_optima() {
    let builders: [fn() -> LpModel; 4] = [scenario_a, scenario_b, scenario_c, mixed_bounds_model];

    for build in builders {
        let objectives: Vec<(&str, f64)> = backends()
            .into_iter()
            .map(|backend| {
                let mut model = build();
                let solution = solve_on(backend, &mut model);
                assert!(solution.is_feasible(), "[{}] should be feasible", backend);
                assert_objective_round_trip(&model, &solution, backend);
                (backend, solution.objective_value())
            })
            .collect();

        let (_, reference) = objectives[0];
        for (backend, objective) in &objectives {
            assert_close(*objective, reference, TOLERANCE, "objective", backend);
        }
    }
}

#[test]
fn test_mixed_bounds_optimum() {
    for backend in backends() {
        let mut model = mixed_bounds_model();
        let solution = solve_on(backend, &mut model);

        assert!(solution.is_feasible(), "[{}] should be feasible", backend);
        assert_close(solution.value("a").unwrap(), -2.5, TOLERANCE, "a", backend);
        assert_close(solution.value("b").unwrap(), 3.0, TOLERANCE, "b", backend);
        assert_close(solution.value("c").unwrap(), 3.5, TOLERANCE, "c", backend);
        assert_close(solution.objective_value(), -4.5, TOLERANCE, "objective", backend);
    }
}

#[test]
fn test_model_can_be_edited_and_solved_again() {
    for backend in backends() {
        let mut model = scenario_a();
        let first = solve_on(backend, &mut model);
        assert_close(first.objective_value(), 20.0, TOLERANCE, "objective", backend);

        model
            .add_constraint("y_cap", [("y", 1.0)], Relation::Leq, 3.0)
            .unwrap();
        assert!(!model.is_built());

        let second = solve_on(backend, &mut model);
        assert!(model.is_built(), "solve builds the model implicitly");
        assert_close(second.value("x").unwrap(), 1.0, TOLERANCE, "x", backend);
        assert_close(second.value("y").unwrap(), 3.0, TOLERANCE, "y", backend);
        assert_close(second.objective_value(), 18.0, TOLERANCE, "objective", backend);

        // first solution is a value object and stays untouched
        assert_close(first.value("y").unwrap(), 4.0, TOLERANCE, "y", backend);
    }
}

#[test]
fn test_variables_outside_objective_and_constraints() {
    for backend in backends() {
        let mut model = ModelBuilder::new()
            .minimize()
            .var("used", 1.0, 2.0)
            .var("idle", 0.0, 0.0)
            .obj("used", 1.0)
            .build()
            .unwrap();

        let solution = solve_on(backend, &mut model);
        assert!(solution.is_feasible());
        assert_eq!(solution.values().len(), 2);
        assert_close(solution.value("used").unwrap(), 1.0, TOLERANCE, "used", backend);
        assert_close(solution.value("idle").unwrap(), 0.0, TOLERANCE, "idle", backend);
    }
}

#[test]
fn test_resolve_honours_model_preference() {
    let mut model = scenario_b();
    model.set_preferred_solver(Some("SIMPLEX"));

    let solver = resolve(Some(&model), None).unwrap();
    assert_eq!(solver.name(), "microlp");

    let solution = solver.solve(&mut model).unwrap();
    assert_eq!(solution.statistics().backend, "microlp");
    assert_close(solution.objective_value(), 3.0, TOLERANCE, "objective", "microlp");
}
