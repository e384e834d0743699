//! Benchmarks for Bindforge binding generation

use bindforge::codegen::{generate_all, CodeGenOptions, Target};
use bindforge::marshal;
use bindforge::model::{Class, ComponentDefinition, Method, Param, ParamPass, ParamType, Scope};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

/// Component with `classes` classes of four methods each
fn create_component(classes: usize) -> ComponentDefinition {
    let mut component = ComponentDefinition::new("Bench", "Bench Library", "bench");
    for i in 0..classes {
        let class = Class::new(format!("Class{}", i))
            .with_method(
                Method::new("GetName")
                    .with_param(Param::new("Name", ParamType::String, ParamPass::Out)),
            )
            .with_method(
                Method::new("SetName")
                    .with_param(Param::new("Name", ParamType::String, ParamPass::In)),
            )
            .with_method(
                Method::new("GetValues").with_param(
                    Param::new("Values", ParamType::BasicArray, ParamPass::Out)
                        .with_class("uint32"),
                ),
            )
            .with_method(
                Method::new("GetCount")
                    .with_param(Param::new("Count", ParamType::Uint64, ParamPass::Return)),
            );
        component = component.with_class(class);
    }
    component
}

/// Benchmark full generation of every surface for varying model sizes
fn bench_generate_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_all");
    let options = CodeGenOptions::default();

    for &size in &[1, 8, 32, 128] {
        let component = create_component(size);
        group.throughput(Throughput::Elements((size * 4) as u64));

        group.bench_function(format!("{}_classes", size), |b| {
            b.iter(|| {
                let artifacts = generate_all(&component, &Target::ALL, &options);
                black_box(artifacts)
            })
        });
    }

    group.finish();
}

/// Benchmark parameter expansion of a single method
fn bench_expand_method(c: &mut Criterion) {
    let component = create_component(1);
    let class = &component.classes[0];
    let method = &class.methods[2];

    c.bench_function("expand_method", |b| {
        b.iter(|| {
            let params = marshal::expand_method("Bench", Scope::Class(&class.class_name), method);
            black_box(params)
        })
    });
}

criterion_group!(benches, bench_generate_all, bench_expand_method);
criterion_main!(benches);
