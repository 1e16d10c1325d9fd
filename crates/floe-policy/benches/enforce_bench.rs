//! Criterion benchmarks for floe-policy.
//!
//! Targets:
//! - Policy resolution (3 tiers) < 1ms
//! - Full enforcement, 500 models, all validators < 50ms
//! - Downstream impact fill, 500 models < 20ms

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};

use floe_policy::enforcement::{EnforcerOptions, PolicyEnforcer};
use floe_policy::graph::{GraphModel, ModelNode};
use floe_policy::inheritance::{InheritanceResolver, PolicyDocument, ResolvedPolicy, Tier};

const LAYERS: [&str; 3] = ["bronze", "silver", "gold"];

const FOUNDATION: &str = "
enforcement_level: warn
naming:
  convention: medallion
coverage:
  min_coverage: 50
documentation:
  require_model_description: true
";

const PLATFORM: &str = "
enforcement_level: strict
coverage:
  layers:
    gold: 90
documentation:
  require_column_descriptions: true
  min_description_length: 10
custom_rules:
  - type: require_meta_field
    target_pattern: 'gold_*'
    parameters:
      fields: [owner]
";

const PRODUCT: &str = "
policy_overrides:
  - pattern: 'legacy_*'
    action: downgrade
    expires: 2030-01-01
";

/// Layered project: each model refs up to two models from the layer below.
/// Every tenth model is misnamed, every seventh is undocumented.
fn make_graph(n: usize) -> GraphModel {
    let nodes = (0..n).map(|i| {
        let layer = LAYERS[i % 3];
        let name = if i % 10 == 0 {
            format!("legacy_{i}")
        } else {
            format!("{layer}_{i}")
        };
        let mut node = ModelNode::new(format!("model.bench.{name}"), name).with_layer(layer);
        if i % 7 != 0 {
            node = node.with_description(format!("Benchmark model number {i}"));
        }
        for c in 0..6 {
            node = node.with_column(format!("col_{c}"), "Benchmark column");
            if c % 2 == 0 {
                node = node.with_test("not_null", Some(&format!("col_{c}")));
            }
        }
        if i >= 3 {
            for back in [3, 6] {
                if let Some(j) = i.checked_sub(back) {
                    let target = if j % 10 == 0 {
                        format!("model.bench.legacy_{j}")
                    } else {
                        format!("model.bench.{}_{j}", LAYERS[j % 3])
                    };
                    node = node.with_ref(target);
                }
            }
        }
        node
    });
    GraphModel::builder().nodes(nodes).build().unwrap()
}

fn resolve() -> ResolvedPolicy {
    let tiers = vec![
        (Tier::Foundation, PolicyDocument::from_yaml_str(FOUNDATION, Tier::Foundation).unwrap()),
        (Tier::Platform, PolicyDocument::from_yaml_str(PLATFORM, Tier::Platform).unwrap()),
        (Tier::Product, PolicyDocument::from_yaml_str(PRODUCT, Tier::Product).unwrap()),
    ];
    InheritanceResolver::new().resolve(&tiers).unwrap()
}

// FLOE-BENCH-01: three-tier resolution
fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve_three_tiers", |b| b.iter(resolve));
}

// FLOE-BENCH-02: full enforcement, 500 models
fn bench_enforce_500(c: &mut Criterion) {
    let graph = make_graph(500);
    let policy = resolve();
    let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
    let enforcer = PolicyEnforcer::new();
    c.bench_function("enforce_500_models", |b| {
        b.iter(|| enforcer.enforce_at(&graph, &policy, today))
    });
}

// FLOE-BENCH-03: enforcement with downstream impact attached
fn bench_enforce_with_impact(c: &mut Criterion) {
    let graph = make_graph(500);
    let policy = resolve();
    let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
    let enforcer = PolicyEnforcer::with_options(EnforcerOptions {
        include_downstream_impact: true,
        ..Default::default()
    });
    c.bench_function("enforce_500_models_with_impact", |b| {
        b.iter(|| enforcer.enforce_at(&graph, &policy, today))
    });
}

criterion_group!(benches, bench_resolve, bench_enforce_500, bench_enforce_with_impact);
criterion_main!(benches);
