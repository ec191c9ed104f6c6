use riskgraph_core::model::parse_model;
use riskgraph_core::{GraphType, Role};

const MODEL: &str = r#"{
    "config": {"seed": 11, "nsim": 2000},
    "nodes": [
        {"kind": "random", "name": "camera_lifetime", "distribution": "gamma",
         "parameters": {"shape": 2.0, "scale": 1.5}, "description": "Years until failure"},
        {"kind": "input", "name": "warranty_period", "value": 1.5},
        {"kind": "input", "name": "replacement_cost", "value": 225.0},
        {"kind": "operation", "name": "failure_within_warranty", "operation": "less_than",
         "incoming": ["camera_lifetime", "warranty_period"], "graph_type": "pie"},
        {"kind": "goal", "name": "cost_to_company", "operation": "multiply",
         "incoming": ["failure_within_warranty", "replacement_cost"]}
    ]
}"#;

#[test]
fn test_warranty_cost_from_model_file() {
    let mut g = parse_model(MODEL).unwrap().build().unwrap();
    assert_eq!(g.node("failure_within_warranty").unwrap().graph_type, GraphType::Pie);
    assert_eq!(g.nodes_with_role(Role::Random), vec!["camera_lifetime"]);

    let cost = g.eval("cost_to_company").unwrap().to_vec();
    assert_eq!(cost.len(), 2000);
    assert!(cost.iter().all(|&c| c == 0.0 || c == 225.0));

    let lifetime = g.value("camera_lifetime").unwrap().unwrap().to_vec();
    assert!(lifetime.iter().all(|&t| t > 0.0));
    let early = lifetime.iter().filter(|&&t| t < 1.5).count();
    assert_eq!(cost.iter().filter(|&&c| c > 0.0).count(), early);

    // Gamma(2, 1.5): P(T < 1.5) = 1 - 2/e, about 0.264.
    let stats = g.generate_stats("cost_to_company").unwrap();
    assert!((stats.mean / 225.0 - 0.264).abs() < 0.05, "mean = {}", stats.mean);
}

#[test]
fn test_dot_export_lists_every_node() {
    let g = parse_model(MODEL).unwrap().build().unwrap();
    let dot = g.to_dot();
    for name in g.node_names() {
        assert!(dot.contains(name), "{} missing from {}", name, dot);
    }
    assert!(g.is_acyclic());
}
