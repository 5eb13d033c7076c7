// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lofform::render::{render_form_unicode, RenderOptions, TextSurface};
use lofform::Form;

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Group names in this file: `render.layout`, `render.unicode`
// - Case IDs come from `fixtures::Case::id` and must not be renamed.
fn benches_render(c: &mut Criterion) {
    let options = RenderOptions::default();

    let mut group = c.benchmark_group("render.layout");
    for case in fixtures::Case::ALL {
        let form = Form::builder()
            .tree(fixtures::tree(case))
            .build()
            .expect("form");
        let mut surface = TextSurface::new(options);
        if let Some(tree) = form.tree() {
            surface.measure(tree, form.draws_outer_cross(), &BTreeMap::new());
        }
        group.bench_function(case.id(), move |b| {
            b.iter(|| {
                let pass = form.render_pass(black_box(&mut surface));
                black_box(pass.layout().placements().len())
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("render.unicode");
    for case in fixtures::Case::ALL {
        let form = Form::builder()
            .tree(fixtures::tree(case))
            .build()
            .expect("form");
        group.bench_function(case.id(), move |b| {
            b.iter(|| {
                let rendered =
                    render_form_unicode(black_box(&form), black_box(&options)).expect("render");
                black_box(rendered.len())
            })
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_render
}
criterion_main!(benches);
