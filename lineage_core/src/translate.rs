// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Translation of nucleotide sequences into amino acids, using the standard genetic code.
//
// Translation starts at the first base and reads non-overlapping codons.  One or two trailing
// bases are dropped.  Codons not in the table, for example those containing N or another
// ambiguity code, translate to X.  This is not an error.  Stop codons translate to *, and an
// aligned gap codon --- translates to -.

use string_utils::*;
use vector_utils::*;

pub const UNKNOWN_AA: u8 = b'X';

// Note that the following table must be sorted.

const CODON_TABLE: [(&[u8; 3], u8); 65] = [
    (b"---", b'-'),
    (b"AAA", b'K'),
    (b"AAC", b'N'),
    (b"AAG", b'K'),
    (b"AAT", b'N'),
    (b"ACA", b'T'),
    (b"ACC", b'T'),
    (b"ACG", b'T'),
    (b"ACT", b'T'),
    (b"AGA", b'R'),
    (b"AGC", b'S'),
    (b"AGG", b'R'),
    (b"AGT", b'S'),
    (b"ATA", b'I'),
    (b"ATC", b'I'),
    (b"ATG", b'M'),
    (b"ATT", b'I'),
    (b"CAA", b'Q'),
    (b"CAC", b'H'),
    (b"CAG", b'Q'),
    (b"CAT", b'H'),
    (b"CCA", b'P'),
    (b"CCC", b'P'),
    (b"CCG", b'P'),
    (b"CCT", b'P'),
    (b"CGA", b'R'),
    (b"CGC", b'R'),
    (b"CGG", b'R'),
    (b"CGT", b'R'),
    (b"CTA", b'L'),
    (b"CTC", b'L'),
    (b"CTG", b'L'),
    (b"CTT", b'L'),
    (b"GAA", b'E'),
    (b"GAC", b'D'),
    (b"GAG", b'E'),
    (b"GAT", b'D'),
    (b"GCA", b'A'),
    (b"GCC", b'A'),
    (b"GCG", b'A'),
    (b"GCT", b'A'),
    (b"GGA", b'G'),
    (b"GGC", b'G'),
    (b"GGG", b'G'),
    (b"GGT", b'G'),
    (b"GTA", b'V'),
    (b"GTC", b'V'),
    (b"GTG", b'V'),
    (b"GTT", b'V'),
    (b"TAA", b'*'),
    (b"TAC", b'Y'),
    (b"TAG", b'*'),
    (b"TAT", b'Y'),
    (b"TCA", b'S'),
    (b"TCC", b'S'),
    (b"TCG", b'S'),
    (b"TCT", b'S'),
    (b"TGA", b'*'),
    (b"TGC", b'C'),
    (b"TGG", b'W'),
    (b"TGT", b'C'),
    (b"TTA", b'L'),
    (b"TTC", b'F'),
    (b"TTG", b'L'),
    (b"TTT", b'F'),
];

// Translate one codon.  Anything that is not exactly a tabulated codon yields X.

pub fn codon_to_aa(codon: &[u8]) -> u8 {
    let codon: &[u8; 3] = match codon.try_into() {
        Ok(c) => c,
        Err(_) => return UNKNOWN_AA,
    };
    let p = bin_position1_2(&CODON_TABLE, &codon);
    if p < 0 {
        UNKNOWN_AA
    } else {
        CODON_TABLE[p as usize].1
    }
}

pub fn aa_seq(dna: &[u8]) -> Vec<u8> {
    dna.chunks_exact(3).map(codon_to_aa).collect()
}

// Translate a sequence, or return it unchanged if it is already a protein sequence.

pub fn translate(seq: &str, is_nucleotide: bool) -> String {
    if !is_nucleotide {
        return seq.to_string();
    }
    stringme(&aa_seq(seq.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codon_table() {
        let bases = [b'A', b'C', b'G', b'T'];
        let mut n = 0;
        for b1 in bases.iter() {
            for b2 in bases.iter() {
                for b3 in bases.iter() {
                    let aa = codon_to_aa(&[*b1, *b2, *b3]);
                    assert_ne!(aa, UNKNOWN_AA);
                    n += 1;
                }
            }
        }
        assert_eq!(n, 64);
        for i in 1..CODON_TABLE.len() {
            assert!(CODON_TABLE[i - 1].0 < CODON_TABLE[i].0);
        }
        assert_eq!(codon_to_aa(b"ATG"), b'M');
        assert_eq!(codon_to_aa(b"TGG"), b'W');
        assert_eq!(codon_to_aa(b"TAA"), b'*');
        assert_eq!(codon_to_aa(b"TAG"), b'*');
        assert_eq!(codon_to_aa(b"TGA"), b'*');
        assert_eq!(codon_to_aa(b"---"), b'-');
    }

    #[test]
    fn test_unknown_codons() {
        assert_eq!(codon_to_aa(b"ANG"), b'X');
        assert_eq!(codon_to_aa(b"..."), b'X');
        assert_eq!(codon_to_aa(b"atg"), b'X');
        assert_eq!(codon_to_aa(b"AT"), b'X');
        assert_eq!(translate("ATGNNNTGG", true), "MXW");
    }

    #[test]
    fn test_translate() {
        assert_eq!(translate("ATGGCCTAA", true), "MA*");
        // trailing partial codon is dropped
        assert_eq!(translate("ATGGCCTA", true), "MA");
        assert_eq!(translate("AT", true), "");
        assert_eq!(translate("ATG---GCC", true), "M-A");
        assert_eq!(translate("MAVLQ", false), "MAVLQ");
        assert_eq!(translate("", true), "");
    }
}
