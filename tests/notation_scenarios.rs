// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Path, PathBuf};

use lofform::format::parse_form;
use lofform::highlight::classify;
use lofform::model::{ExpressionId, ExpressionTree};
use lofform::render::RenderOptions;
use lofform::Form;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("forms")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read {path:?}: {err}"))
}

fn notation_fixtures() -> Vec<(String, String)> {
    let mut names = fs::read_dir(fixtures_dir())
        .expect("fixtures dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".lof"))
        .collect::<Vec<_>>();
    names.sort();
    assert!(!names.is_empty(), "expected notation fixtures");

    names
        .into_iter()
        .map(|name| {
            let source = read_fixture(&name);
            (name, source)
        })
        .collect()
}

#[test]
fn single_cross_is_one_node_without_connectors() {
    let form = Form::builder().source("()").build().expect("form");
    let tree = form.tree().expect("tree");

    assert_eq!(tree.root().child_nodes().count(), 1);
    assert_eq!(tree.node_count(), 2);
    assert!(form.plan().is_empty());
    assert_eq!(form.render_unicode(&RenderOptions::default()).expect("render"), "─┐\n │");
}

#[test]
fn reentry_pairs_reference_with_outer_defining_cross() {
    let form = Form::builder().source("(([0])$0)").build().expect("form");
    let tree = form.tree().expect("tree");

    let anchor = tree.find(&ExpressionId::Space(0)).expect("defining node");
    assert_eq!(anchor.depth(), 1);
    let site = tree.find(&ExpressionId::label("_2")).expect("reference site");
    assert_eq!(site.depth(), 2);
    assert_eq!(site.children()[0].as_reference(), Some(0));

    let connectors = form.plan().connectors();
    assert_eq!(connectors.len(), 1);
    assert_eq!(connectors[0].anchor_depth(), 1);
    assert_eq!(connectors[0].placement_depth(), 2);
    assert_eq!(connectors[0].depth_delta(), 1);
}

#[test]
fn reference_without_defining_node_is_dropped() {
    let form = Form::builder().source("(a [5])(b)").build().expect("form");

    assert!(form.plan().connectors().is_empty());
    assert_eq!(form.plan().unresolved().len(), 1);
    assert_eq!(form.plan().unresolved()[0].anchor_id(), 5);

    let rendered = form.render_unicode(&RenderOptions::default()).expect("render");
    assert_eq!(rendered, "──┐ ──┐\n a│  b│");
}

#[test]
fn json_tree_matches_parsed_notation() {
    let from_json = ExpressionTree::from_json(&read_fixture("reentry.json")).expect("json tree");
    let parsed = parse_form("(([0])$0)").expect("parse");
    assert_eq!(from_json, parsed);

    let form = Form::builder().tree(from_json).build().expect("form");
    let from_notation = Form::builder().source("(([0])$0)").build().expect("form");
    assert_eq!(form.plan(), from_notation.plan());

    let options = RenderOptions::default();
    assert_eq!(
        form.render_unicode(&options).expect("render"),
        from_notation.render_unicode(&options).expect("render")
    );
}

#[test]
fn notation_fixtures_render_with_their_connectors() {
    for (name, source) in notation_fixtures() {
        let form = Form::builder()
            .source(source.trim())
            .build()
            .unwrap_or_else(|err| panic!("expected {name} to build, got error: {err}"));
        assert!(form.parse_error().is_none(), "expected {name} to parse");
        assert!(form.plan().unresolved().is_empty(), "expected {name} to resolve fully");

        let rendered = form
            .render_unicode(&RenderOptions::default())
            .unwrap_or_else(|err| panic!("expected {name} to render, got error: {err}"));
        assert!(!rendered.trim().is_empty(), "expected {name} to render non-empty output");

        let form_rows = form
            .tree()
            .map(|tree| {
                let mut depth = tree.root().subtree_max_depth();
                if form.draws_outer_cross() {
                    depth += 1;
                }
                depth + 1
            })
            .expect("tree");
        if !form.plan().is_empty() {
            assert!(
                rendered.lines().count() > form_rows,
                "expected {name} connectors to hang below the form:\n{rendered}"
            );
        }
    }
}

#[test]
fn notation_fixtures_highlight_losslessly() {
    for (name, source) in notation_fixtures() {
        let joined = classify(&source).iter().map(|span| span.text).collect::<String>();
        assert_eq!(joined, source, "expected {name} to highlight losslessly");
    }
}
