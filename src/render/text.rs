// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Width of `text` in terminal cells (one per char).
pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn trimmed_lines(rows: impl Iterator<Item = String>) -> String {
    let mut lines = rows
        .map(|row| row.trim_end_matches(' ').to_owned())
        .collect::<Vec<_>>();

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{text_len, trimmed_lines};

    #[test]
    fn text_len_counts_chars_not_bytes() {
        assert_eq!(text_len("äö€"), 3);
        assert_eq!(text_len(""), 0);
    }

    #[test]
    fn trimmed_lines_keeps_inner_blank_lines() {
        let rows = ["a  ", "   ", " b ", "   ", ""].into_iter().map(str::to_owned);
        assert_eq!(trimmed_lines(rows), "a\n\n b");
    }
}
