// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Text measurement for sizing node boxes.  Widths are those of Arial at 1000 points, scaled to
// the font size.  Characters missing from the table count as 1000.

use vector_utils::*;

const DEFAULT_WIDTH: usize = 1000;

pub fn arial_width(s: &str, font_size: usize) -> f64 {
    let len: usize = s
        .chars()
        .map(|c| {
            let p = bin_position1_2(&ARIAL_1000_WIDTH_TABLE, &c);
            if p < 0 {
                DEFAULT_WIDTH
            } else {
                ARIAL_1000_WIDTH_TABLE[p as usize].1
            }
        })
        .sum();
    len as f64 * font_size as f64 / 1000.0
}

// Break text into lines no wider than max_width, splitting at spaces.  A single word that is
// too wide is kept whole on its own line.

pub fn wrap_to_width(s: &str, font_size: usize, max_width: f64) -> Vec<String> {
    let mut lines = Vec::<String>::new();
    let mut line = String::new();
    for word in s.split_whitespace() {
        if line.is_empty() {
            line = word.to_string();
            continue;
        }
        let trial = format!("{} {}", line, word);
        if arial_width(&trial, font_size) <= max_width {
            line = trial;
        } else {
            lines.push(line);
            line = word.to_string();
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

// The following table must be sorted.

const ARIAL_1000_WIDTH_TABLE: [(char, usize); 66] = [
    (' ', 278),
    ('-', 334),
    ('.', 278),
    ('0', 557),
    ('1', 557),
    ('2', 557),
    ('3', 557),
    ('4', 557),
    ('5', 557),
    ('6', 557),
    ('7', 557),
    ('8', 557),
    ('9', 557),
    ('A', 667),
    ('B', 667),
    ('C', 723),
    ('D', 723),
    ('E', 667),
    ('F', 611),
    ('G', 778),
    ('H', 723),
    ('I', 278),
    ('J', 500),
    ('K', 667),
    ('L', 557),
    ('M', 834),
    ('N', 723),
    ('O', 778),
    ('P', 667),
    ('Q', 778),
    ('R', 723),
    ('S', 667),
    ('T', 611),
    ('U', 723),
    ('V', 667),
    ('W', 944),
    ('X', 667),
    ('Y', 667),
    ('Z', 611),
    ('_', 557),
    ('a', 557),
    ('b', 557),
    ('c', 500),
    ('d', 557),
    ('e', 557),
    ('f', 278),
    ('g', 557),
    ('h', 557),
    ('i', 223),
    ('j', 223),
    ('k', 500),
    ('l', 223),
    ('m', 834),
    ('n', 557),
    ('o', 557),
    ('p', 557),
    ('q', 557),
    ('r', 334),
    ('s', 500),
    ('t', 278),
    ('u', 557),
    ('v', 500),
    ('w', 723),
    ('x', 500),
    ('y', 500),
    ('z', 500),
];
