//! Benchmarks for the XHTML and HAL-FORMS renderers
//!
//! Run with:
//! ```bash
//! cargo bench -p hyperform-render
//! ```

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hyperform_core::prelude::*;
use hyperform_core::SELF_REL;
use hyperform_render::hal_forms::HalFormsDocument;
use hyperform_render::XhtmlWriter;
use serde_json::json;
use std::hint::black_box;

/// A resource whose self link carries GET, PUT and DELETE affordances over
/// `properties` body fields, one of them enumerated.
fn create_resource(properties: usize) -> Resource {
    let mut bean = BeanType::new("Event").property(
        PropertyDescriptor::new("eventStatus", ValueType::String).with_possible_values(
            PossibleValues::enumeration(["EVENT_SCHEDULED", "EVENT_CANCELLED", "EVENT_POSTPONED"]),
        ),
    );
    let mut body = serde_json::Map::new();
    for i in 0..properties {
        let name = format!("field{i}");
        body.insert(name.clone(), json!(format!("value {i}")));
        bean = bean.property(PropertyDescriptor::new(name, ValueType::String));
    }

    let handler = HandlerMethod::new("event", "/events/{eventId}")
        .method(HttpMethod::Get)
        .method(HttpMethod::Put)
        .method(HttpMethod::Delete)
        .param(MethodParameter::path_variable("eventId"))
        .param(MethodParameter::request_body("event", bean));
    let args = Arguments::new().bind("eventId", 1).bind("event", body.clone());
    let affordances = AffordanceAssembler::new()
        .assemble(&handler, &args)
        .expect("assemble failed");

    Resource::new("Event", body).with_link(Link::from_affordances(SELF_REL, affordances).expect("link failed"))
}

/// Benchmark XHTML form rendering
fn bench_xhtml_forms(c: &mut Criterion) {
    let mut group = c.benchmark_group("xhtml_write_links");
    for properties in [4usize, 32] {
        let resource = create_resource(properties);
        group.bench_with_input(BenchmarkId::from_parameter(properties), &resource, |b, resource| {
            b.iter(|| {
                let mut writer = XhtmlWriter::new(Vec::with_capacity(4096));
                writer
                    .write_links(black_box(resource.links()))
                    .expect("render failed");
                black_box(writer.into_inner())
            })
        });
    }
    group.finish();
}

/// Benchmark HAL-FORMS document serialization
fn bench_hal_forms(c: &mut Criterion) {
    let mut group = c.benchmark_group("hal_forms_serialize");
    for properties in [4usize, 32] {
        let resource = create_resource(properties);
        group.bench_with_input(BenchmarkId::from_parameter(properties), &resource, |b, resource| {
            b.iter(|| {
                let document = HalFormsDocument::from_resource(black_box(resource), "default");
                black_box(serde_json::to_vec(&document).expect("serialize failed"))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_xhtml_forms, bench_hal_forms);
criterion_main!(benches);
