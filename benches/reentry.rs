// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lofform::format::parse_form;
use lofform::highlight::classify;
use lofform::reentry::{collect_links, plan_reentries, resolve_connectors};

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Group names in this file: `reentry.parse`, `reentry.collect`, `reentry.resolve`,
//   `reentry.highlight`
// - Case IDs come from `fixtures::Case::id` and must not be renamed.
fn benches_reentry(c: &mut Criterion) {
    let mut group = c.benchmark_group("reentry.parse");
    for case in fixtures::Case::ALL {
        let notation = fixtures::notation(case);
        group.bench_function(case.id(), move |b| {
            b.iter(|| {
                let tree = parse_form(black_box(&notation)).expect("parse_form");
                black_box(tree.node_count())
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("reentry.collect");
    for case in fixtures::Case::ALL {
        let tree = fixtures::tree(case);
        group.bench_function(case.id(), move |b| {
            b.iter(|| black_box(collect_links(black_box(&tree)).links().len()))
        });
    }
    group.finish();

    let mut group = c.benchmark_group("reentry.resolve");
    for case in fixtures::Case::ALL {
        let collection = collect_links(&fixtures::tree(case));
        group.bench_function(case.id(), move |b| {
            b.iter(|| black_box(resolve_connectors(black_box(&collection)).connectors().len()))
        });
    }
    group.bench_function("plan_wide_reentry", |b| {
        let tree = fixtures::tree(fixtures::Case::WideReentry);
        b.iter(|| black_box(plan_reentries(black_box(&tree)).connectors().len()))
    });
    group.finish();

    let mut group = c.benchmark_group("reentry.highlight");
    for case in fixtures::Case::ALL {
        let notation = fixtures::notation(case);
        group.bench_function(case.id(), move |b| {
            b.iter(|| black_box(classify(black_box(&notation)).len()))
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_reentry
}
criterion_main!(benches);
