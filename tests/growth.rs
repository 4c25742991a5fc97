// tests/growth.rs
use std::f32::consts::PI;
use symbios_arbor::{
    GrowthGrammar, GrowthParams, ProductionRule, ReplaceRule, RuleSet, StochasticRule, TubeConfig,
};

fn fern() -> GrowthGrammar {
    GrowthGrammar::new(
        "X",
        ReplaceRule::new("X", "F[-X]F[-X]"),
        GrowthParams {
            delta_inclination: PI / 6.0,
            delta_azimuth: 2.0 * PI / 3.0,
            initial_thickness: 1.0,
            thickness_decay: 0.7,
            initial_length: 1.0,
            length_decay: 0.8,
        },
    )
}

#[test]
fn test_single_pass_leaves_reintroduced_placeholders() {
    let grammar = fern();
    assert_eq!(grammar.grow(0), "X");
    assert_eq!(grammar.grow(1), "F[-X]F[-X]");
    assert_eq!(grammar.grow(2), "F[-F[-X]F[-X]]F[-F[-X]F[-X]]");
}

#[test]
fn test_grow_is_iterated_rule() {
    let grammar = fern();
    let rule = ReplaceRule::new("X", "F[-X]F[-X]");
    for n in 0..5 {
        assert_eq!(grammar.grow(n + 1), rule.apply(&grammar.grow(n)));
    }
}

#[test]
fn test_growth_is_monotonic_for_expanding_rules() {
    let grammar = fern();
    let lengths: Vec<usize> = grammar.generations(6).iter().map(String::len).collect();
    assert!(lengths.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_closure_rule() {
    let grammar = GrowthGrammar::new(
        "F",
        |s: &str| s.replace('F', "F[+F]F"),
        GrowthParams::default(),
    );
    assert_eq!(grammar.grow(1), "F[+F]F");
    assert_eq!(grammar.grow(2).matches('F').count(), 9);
}

#[test]
fn test_rule_set_keeps_drawing_alphabet() {
    let rules = RuleSet::new().with('A', "F[+#A][-#A]$B").with('B', "FA");
    let grammar = GrowthGrammar::new("A", rules, GrowthParams::default());
    let grown = grammar.grow(3);
    assert!(grown.starts_with("F[+#F[+#"));

    let mesh = grammar.build(&grown, TubeConfig::default()).unwrap();
    assert_eq!(mesh.segments.len(), grown.matches('F').count());
}

#[test]
fn test_stochastic_grammar_is_seed_stable() {
    let make = |seed| {
        GrowthGrammar::new(
            "X",
            StochasticRule::new('X', seed)
                .with_alternative("F[+X]$X", 1.0)
                .with_alternative("F[-X]$X", 1.0)
                .with_alternative("F>X", 0.5),
            GrowthParams::default(),
        )
    };
    assert_eq!(make(42).grow(4), make(42).grow(4));

    let grown = make(42).grow(4);
    let mesh = make(42).build(&grown, TubeConfig::default()).unwrap();
    assert_eq!(mesh.vertex_count(), 10 * grown.matches('F').count());
}

#[test]
fn test_grown_tree_builds() {
    let grammar = fern();
    let symbols = grammar.grow(4);
    let f_count = symbols.matches('F').count();

    let mesh = grammar.build(&symbols, TubeConfig::default()).unwrap();
    assert_eq!(mesh.vertex_count(), 2 * 5 * f_count);
    assert_eq!(mesh.triangle_count(), 2 * 5 * f_count);
    assert!(
        mesh.indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertex_count())
    );
}

#[test]
fn test_independent_builds_run_in_parallel() {
    let grammar = fern();
    let config = TubeConfig::default();

    let meshes: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=4)
            .map(|n| {
                let grammar = &grammar;
                let config = config.clone();
                scope.spawn(move || grammar.build(&grammar.grow(n), config))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (n, mesh) in (1..=4).zip(meshes) {
        let expected = grammar.build(&grammar.grow(n), config.clone()).unwrap();
        assert_eq!(mesh.unwrap(), expected);
    }
}
