// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::fmt::Write as _;

use lofform::format::parse_form;
use lofform::model::ExpressionTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Small,
    DeepNested,
    WideReentry,
    SelfLoops,
}

impl Case {
    pub const ALL: [Self; 4] = [Self::Small, Self::DeepNested, Self::WideReentry, Self::SelfLoops];

    pub const fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::DeepNested => "deep_nested",
            Self::WideReentry => "wide_reentry",
            Self::SelfLoops => "self_loops",
        }
    }
}

/// A chain of `depth` crosses, each defining its own space and re-entering its parent's.
fn deep_nested(depth: usize) -> String {
    let mut out = String::new();
    for level in 0..depth {
        out.push('(');
        write!(out, "x{level} ").expect("write to string");
        if level > 0 {
            write!(out, "[{}]", level - 1).expect("write to string");
        }
    }
    for level in (0..depth).rev() {
        write!(out, "${level})").expect("write to string");
    }
    out
}

/// `anchors` defining crosses followed by `sites` crosses that each re-enter one of them.
fn wide_reentry(anchors: usize, sites: usize) -> String {
    let mut out = String::new();
    for anchor in 0..anchors {
        write!(out, "((d{anchor})${anchor}) ").expect("write to string");
    }
    for site in 0..sites {
        let anchor = (site * 7) % anchors.max(1);
        let nested = if site % 3 == 0 { "(n)" } else { "" };
        write!(out, "(a{site} {nested}[{anchor}]) ").expect("write to string");
    }
    out
}

fn self_loops(count: usize) -> String {
    let mut out = String::new();
    for index in 0..count {
        write!(out, "(s{index} [{index}] ${index}) ").expect("write to string");
    }
    out
}

pub fn notation(case: Case) -> String {
    match case {
        Case::Small => "(([0] a)$0)(b [0])".to_owned(),
        Case::DeepNested => deep_nested(40),
        Case::WideReentry => wide_reentry(12, 240),
        Case::SelfLoops => self_loops(120),
    }
}

pub fn tree(case: Case) -> ExpressionTree {
    parse_form(&notation(case)).expect("fixture notation parses")
}
