//! Greedy longest-match segmentation of strings into IPA signs.

use crate::signs::IpaSign;
use crate::table::IpaTable;
use serde::Serialize;
use std::iter::once;

/// A slice of the input and the sign it spells, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub sign: Option<&'a IpaSign>,
}

impl<'a> Segment<'a> {
    pub fn is_recognized(&self) -> bool {
        self.sign.is_some()
    }
}

impl IpaTable {
    /// Splits `text` into the longest keys of the table, left to right.
    ///
    /// Characters that start no key become single-character segments
    /// without a sign.
    pub fn segment<'a>(&'a self, text: &'a str) -> Vec<Segment<'a>> {
        let bounds = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(once(text.len()))
            .collect::<Vec<_>>();
        let chars = bounds.len() - 1;
        let mut segments = vec![];
        let mut start = 0;
        while start < chars {
            let widest = self.max_key_length().min(chars - start);
            let hit = (1..=widest).rev().find_map(|width| {
                let piece = &text[bounds[start]..bounds[start + width]];
                self.get(piece).map(|sign| (width, piece, sign))
            });
            match hit {
                Some((width, piece, sign)) => {
                    segments.push(Segment {
                        text: piece,
                        sign: Some(sign),
                    });
                    start += width;
                }
                None => {
                    segments.push(Segment {
                        text: &text[bounds[start]..bounds[start + 1]],
                        sign: None,
                    });
                    start += 1;
                }
            }
        }
        segments
    }

    /// Whether `text` is made of table keys only.
    pub fn is_ipa(&self, text: &str) -> bool {
        self.segment(text).iter().all(Segment::is_recognized)
    }

    /// Respells every recognized sign with its primary representation.
    pub fn canonical_string(&self, text: &str) -> String {
        self.segment(text)
            .into_iter()
            .map(|s| s.sign.and_then(IpaSign::unicode_repr).unwrap_or(s.text))
            .collect()
    }
}
